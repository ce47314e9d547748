/// A component added to an entity that displays text in the scene, such as the name
/// of the object the player should find next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    /// The text to be displayed
    pub text: String,
}

impl Panel {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}
