/// Identifies a tracked pointing device (usually a controller) that can hold objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u32);

/// A component that represents the "side" or "handedness" of a controller.
/// The two sides map onto the two well-known device ids.
#[derive(Debug, PartialEq, Clone, Copy, Eq, PartialOrd, Ord)]
pub enum Handedness {
    /// Left hand side
    Left,
    /// Right hand side
    Right,
}

impl From<Handedness> for DeviceId {
    fn from(handedness: Handedness) -> Self {
        match handedness {
            Handedness::Left => DeviceId(0),
            Handedness::Right => DeviceId(1),
        }
    }
}

/// Whoever is currently holding an object.
///
/// A hand has no identity beyond the event that selected the object, while a device
/// is always named. Holders never own the object they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Holder {
    /// Direct manipulation by a tracked hand
    Hand,
    /// A pointing device that hit the object with its ray
    Device(DeviceId),
}
