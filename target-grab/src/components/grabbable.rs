use glam::Affine3A;

use super::{DeviceId, Holder, SimulationState};

/// Who, if anyone, is holding a grabbable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrabState {
    #[default]
    Idle,
    HeldByHand,
    HeldByDevice(DeviceId),
}

impl GrabState {
    pub fn is_held(&self) -> bool {
        !matches!(self, GrabState::Idle)
    }

    pub fn holder(&self) -> Option<Holder> {
        match self {
            GrabState::Idle => None,
            GrabState::HeldByHand => Some(Holder::Hand),
            GrabState::HeldByDevice(id) => Some(Holder::Device(*id)),
        }
    }
}

impl From<Holder> for GrabState {
    fn from(holder: Holder) -> Self {
        match holder {
            Holder::Hand => GrabState::HeldByHand,
            Holder::Device(id) => GrabState::HeldByDevice(id),
        }
    }
}

/// A component added to each member of the target pool so it can be picked up.
/// Requires `grabbing_system`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grabbable {
    /// Current holder
    pub state: GrabState,
    /// Has the success path already run for the current hold?
    pub success_consumed: bool,
    /// Should the rigid body become kinematic while held?
    pub make_kinematic_while_held: bool,
    /// What to put the rigid body back to when the current hold ends
    pub simulation_before_grab: Option<SimulationState>,
}

impl Grabbable {
    pub fn new(make_kinematic_while_held: bool) -> Self {
        Self {
            state: GrabState::Idle,
            success_consumed: false,
            make_kinematic_while_held,
            simulation_before_grab: None,
        }
    }
}

/// Present on an entity while a device holds it. The entity follows the device,
/// keeping the offset it had when it was grabbed.
#[derive(Debug, Clone, Copy)]
pub struct Grabbed {
    pub device: DeviceId,
    pub device_from_local: Affine3A,
}
