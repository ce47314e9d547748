use glam::Vec3;

use super::DeviceId;

/// A component added to an entity to draw a laser from a device, showing where its
/// grab ray will land. Updated by `pointers_system`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Which device is the pointer attached to?
    pub device: DeviceId,
    /// How long is the laser?
    pub length: f32,
    /// Where the laser starts this frame, in global space
    pub start: Vec3,
    /// Where the laser ends this frame, in global space
    pub end: Vec3,
}

impl Pointer {
    pub fn new(device: DeviceId, length: f32) -> Self {
        Self {
            device,
            length,
            start: Vec3::ZERO,
            end: Vec3::ZERO,
        }
    }
}
