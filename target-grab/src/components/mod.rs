pub mod grabbable;
pub mod holder;
pub mod info;
pub mod layer;
pub mod panel;
pub mod parent;
pub mod physics;
pub mod pointer;
pub mod transform;

pub use grabbable::{GrabState, Grabbable, Grabbed};
pub use holder::{DeviceId, Handedness, Holder};
pub use info::Info;
pub use layer::{Layer, LayerId, LayerSwitch};
pub use panel::Panel;
pub use parent::Parent;
pub use physics::{Collider, RigidBody, SimulationState};
pub use pointer::Pointer;
pub use transform::Transform;
