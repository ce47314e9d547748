use rapier3d::prelude::{RigidBodyHandle, RigidBodyType};

/// A component used to reach this entity's body in the physics simulation.
///
/// Grabbing only ever asks the body to become kinematic or dynamic again, to accept an
/// impulse, or to be teleported. Stepping the simulation is left to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigidBody {
    pub handle: RigidBodyHandle,
}

/// How a body was being simulated before it was made kinematic for a grab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub body_type: RigidBodyType,
    pub gravity_scale: f32,
}
