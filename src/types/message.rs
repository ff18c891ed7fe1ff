/// Transient on-screen guidance shown while the user holds the card to the
/// reader. Carries no persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Short headline
    pub header: Option<String>,
    /// Longer body text
    pub body: Option<String>,
}

impl Message {
    /// Message with a header only.
    pub fn header(text: impl Into<String>) -> Self {
        Self {
            header: Some(text.into()),
            body: None,
        }
    }
}
