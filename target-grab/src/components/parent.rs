use hecs::Entity;

/// Component added to indicate that an entity belongs to another entity's sub-tree.
/// Layer switching walks these links once, when a session starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parent(pub Entity);
