use thiserror::Error;

/// Why a single segment could not be decoded.
///
/// Never escapes a translation: the segment becomes empty text and the
/// rest of the message is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("[{kind}] missing required attribute `{attr}`")]
    MissingAttribute { kind: String, attr: &'static str },

    #[error("[{kind}] invalid value `{value}` for attribute `{attr}`")]
    InvalidAttribute {
        kind: String,
        attr: &'static str,
        value: String,
    },

    #[error("{message}")]
    Argument { message: String },
}

impl DecodeError {
    #[must_use]
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }
}

/// Errors from translator setup and reply bookkeeping.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0:#}")]
    Config(anyhow::Error),

    #[error(transparent)]
    Media(#[from] cqbridge_media::Error),

    #[error(transparent)]
    Store(#[from] cqbridge_store::Error),

    #[error("message chain serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message chain has no source to key it by")]
    MissingSource,

    #[error("no cache store configured")]
    NoStore,
}

pub type Result<T> = std::result::Result<T, Error>;
