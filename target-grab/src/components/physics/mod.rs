pub mod collider;
pub mod rigid_body;

pub use collider::Collider;
pub use rigid_body::{RigidBody, SimulationState};
