use glam::{Affine3A, Vec3};
use hecs::Entity;

use crate::{components::DeviceId, GrabError, GrabResult};

/// Polled state of a single pointing device.
#[derive(Debug, Clone)]
pub struct DeviceInput {
    id: DeviceId,
    grab_button: bool,
    grab_button_prev: bool,
    global_from_device: Affine3A,
}

impl DeviceInput {
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            grab_button: false,
            grab_button_prev: false,
            global_from_device: Affine3A::IDENTITY,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }
    pub fn grab_button(&self) -> bool {
        self.grab_button
    }
    pub fn grab_button_just_pressed(&self) -> bool {
        self.grab_button && !self.grab_button_prev
    }
    pub fn grab_button_just_released(&self) -> bool {
        !self.grab_button && self.grab_button_prev
    }
    pub fn global_from_device(&self) -> Affine3A {
        self.global_from_device
    }
    pub fn position(&self) -> Vec3 {
        self.global_from_device.translation.into()
    }
    /// Devices point down their local -Z axis.
    pub fn forward(&self) -> Vec3 {
        self.global_from_device
            .transform_vector3(Vec3::NEG_Z)
            .normalize_or_zero()
    }
}

/// A select or unselect notification raised by hand tracking against an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandSignal {
    Select,
    Unselect,
}

#[derive(Debug, Default)]
/// Context that holds input state for both modalities. Devices are polled: the host
/// samples them once per tick with [`InputContext::update_device`]. Hand notifications
/// arrive whenever hand tracking raises them and are held until the next grabbing pass.
pub struct InputContext {
    devices: Vec<DeviceInput>,
    hand_signals: Vec<(Entity, HandSignal)>,
}

impl InputContext {
    /// Start tracking a device. Adding the same device twice does nothing.
    pub fn add_device(&mut self, id: DeviceId) {
        if self.device(id).is_none() {
            self.devices.push(DeviceInput::new(id));
        }
    }

    pub fn device(&self, id: DeviceId) -> Option<&DeviceInput> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn devices(&self) -> impl Iterator<Item = &DeviceInput> {
        self.devices.iter()
    }

    /// Synchronize a device with its latest sample. Must be called once per tick for each
    /// device, otherwise a press will be seen as "just pressed" more than once.
    pub fn update_device(
        &mut self,
        id: DeviceId,
        grab_button: bool,
        global_from_device: Affine3A,
    ) -> GrabResult<()> {
        let device = self
            .devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(GrabError::UnknownDevice(id))?;

        device.grab_button_prev = device.grab_button;
        device.grab_button = grab_button;
        device.global_from_device = global_from_device;
        Ok(())
    }

    /// Hand tracking started holding `entity`
    pub fn hand_select(&mut self, entity: Entity) {
        self.hand_signals.push((entity, HandSignal::Select));
    }

    /// Hand tracking stopped holding `entity`
    pub fn hand_unselect(&mut self, entity: Entity) {
        self.hand_signals.push((entity, HandSignal::Unselect));
    }

    pub(crate) fn take_hand_signals(&mut self) -> Vec<(Entity, HandSignal)> {
        std::mem::take(&mut self.hand_signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Quat;

    #[test]
    pub fn test_grab_button_edges() {
        let mut input_context = InputContext::default();
        let id = DeviceId(3);
        input_context.add_device(id);
        input_context.add_device(id);
        assert_eq!(input_context.devices().count(), 1);

        input_context
            .update_device(id, true, Affine3A::IDENTITY)
            .unwrap();
        let device = input_context.device(id).unwrap();
        assert!(device.grab_button());
        assert!(device.grab_button_just_pressed());
        assert!(!device.grab_button_just_released());

        input_context
            .update_device(id, true, Affine3A::IDENTITY)
            .unwrap();
        let device = input_context.device(id).unwrap();
        assert!(device.grab_button());
        assert!(!device.grab_button_just_pressed());

        input_context
            .update_device(id, false, Affine3A::IDENTITY)
            .unwrap();
        let device = input_context.device(id).unwrap();
        assert!(!device.grab_button());
        assert!(device.grab_button_just_released());
    }

    #[test]
    pub fn test_device_pose() {
        let mut input_context = InputContext::default();
        let id = DeviceId(0);
        input_context.add_device(id);

        let pose = Affine3A::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            [1., 1.5, 0.].into(),
        );
        input_context.update_device(id, false, pose).unwrap();

        let device = input_context.device(id).unwrap();
        assert_relative_eq!(device.position(), Vec3::new(1., 1.5, 0.));
        // Turning left a quarter turn points -Z at -X
        assert_relative_eq!(device.forward(), Vec3::NEG_X, epsilon = 1e-6);
    }

    #[test]
    pub fn test_unknown_device() {
        let mut input_context = InputContext::default();
        let result = input_context.update_device(DeviceId(9), true, Affine3A::IDENTITY);
        assert!(matches!(result, Err(GrabError::UnknownDevice(DeviceId(9)))));
    }

    #[test]
    pub fn test_hand_signals_are_drained() {
        let mut world = hecs::World::default();
        let entity = world.spawn(());
        let mut input_context = InputContext::default();
        input_context.hand_select(entity);
        input_context.hand_unselect(entity);

        let signals = input_context.take_hand_signals();
        assert_eq!(
            signals,
            vec![(entity, HandSignal::Select), (entity, HandSignal::Unselect)]
        );
        assert!(input_context.take_hand_signals().is_empty());
    }
}
