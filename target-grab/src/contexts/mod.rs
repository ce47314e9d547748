pub mod audio_context;
pub mod broadcast_bus;
pub mod input_context;
pub mod layer_registry;
pub mod physics_context;
pub mod target_registry;

pub use audio_context::{AudioContext, ClipHandle};
pub use broadcast_bus::{BroadcastBus, BusMessage};
pub use input_context::{DeviceInput, HandSignal, InputContext};
pub use layer_registry::LayerRegistry;
pub use physics_context::PhysicsContext;
pub use target_registry::{PlacementSlot, TargetRegistry};
