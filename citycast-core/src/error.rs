use thiserror::Error;

/// Errors surfaced by the core library.
///
/// Transport and provider failures are translated here, so callers only see
/// a caller-facing category ("city not found", "provider error", ...).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("City required")]
    EmptyCity,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather provider request failed with status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Failed to reach weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode weather provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A sample or observation is missing a field the core needs.
    #[error("Invalid weather sample: {0}")]
    InvalidSample(String),

    #[error("History store error: {0}")]
    History(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn invalid_sample(message: impl Into<String>) -> Self {
        Self::InvalidSample(message.into())
    }

    pub fn history(message: impl Into<String>) -> Self {
        Self::History(message.into())
    }

    /// True when the failure means the searched city does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CityNotFound(_))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
