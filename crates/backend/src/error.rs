/// Crate-wide result type for backend operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed backend errors shared across the collaborator traits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A user, group or member ID could not be resolved.
    #[error("unknown contact: {id}")]
    UnknownContact { id: i64 },

    /// Operation is not supported for this contact (e.g. audio to a friend).
    #[error("backend operation unsupported: {message}")]
    Unsupported { message: String },
}

impl Error {
    #[must_use]
    pub fn unsupported(message: impl std::fmt::Display) -> Self {
        Self::Unsupported {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unknown_contact(id: i64) -> Self {
        Self::UnknownContact { id }
    }
}
