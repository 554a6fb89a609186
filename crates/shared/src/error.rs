use thiserror::Error;

/// Failures reported by a talk store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Load/save/fetch failed; the message is shown to the user as-is.
    #[error("{message}")]
    Transient { message: String },
    /// The requesting session went away before the call finished.
    #[error("request cancelled")]
    Cancelled,
}

impl StoreError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
