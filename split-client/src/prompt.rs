//! The unit of work sent to the model.

/// Prompt text plus the maximum number of output tokens to request.
///
/// Constructed per call and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    max_tokens: u32,
}

impl Prompt {
    /// Creates a prompt with the given output budget.
    #[must_use]
    pub fn new(text: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            text: text.into(),
            max_tokens,
        }
    }

    /// The prompt text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Maximum output size, in tokens.
    #[must_use]
    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
