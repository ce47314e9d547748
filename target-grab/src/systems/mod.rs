#![allow(missing_docs)]
pub mod grabbing;
pub mod held_objects;
pub mod layer_switch;
pub mod pointers;

pub use grabbing::grabbing_system;
pub use held_objects::held_objects_system;
pub use layer_switch::{apply_grabbed_layer, init_layer_switch, restore_original_layer};
pub use pointers::pointers_system;
