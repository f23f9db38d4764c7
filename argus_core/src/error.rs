// argus_core/src/error.rs

use thiserror::Error;

/// Errors surfaced by the perception core.
///
/// All of these are configuration or usage errors raised synchronously at the
/// call that caused them; nothing here is transient.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerceptionError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("perception module is not enabled")]
    NotEnabled,
}

impl PerceptionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PerceptionError::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PerceptionError>;
