/// Component that adds some information about the entity
/// The name is what the display panel shows when this entity becomes the target
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct Info {
    /// A helpful name
    pub name: String,
}

impl Info {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
