//! Error taxonomy for the exporter
//!
//! Every failure that reaches the caller carries a stable four-digit code.
//! Downstream log correlation depends on these codes, so they must never be
//! renumbered.

use serde::{Deserialize, Serialize};

/// HTTP status used for every fatal pipeline failure.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Failures raised while loading and validating the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read file.")]
    Read,

    #[error("Failed to unmarshal yaml.")]
    Parse,

    #[error("{0} setting is required.")]
    Missing(&'static str),

    #[error("{0} Format of the url is invalid.")]
    Format(&'static str),

    #[error("{0} value is out of range.")]
    Range(&'static str),

    #[error("{0} value is nil.")]
    Nil(&'static str),

    #[error("{0} value is blank.")]
    Blank(&'static str),
}

impl ConfigError {
    /// Stable error code reported to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read => "0001",
            ConfigError::Parse => "0002",
            ConfigError::Missing(_) => "0010",
            ConfigError::Format(_) => "0011",
            ConfigError::Range(_) => "0012",
            ConfigError::Nil(_) => "0013",
            ConfigError::Blank(_) => "0014",
        }
    }
}

/// Failures raised while pulling the inventory from the collector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Get request failure.")]
    RequestFailed,

    #[error("Collect target failure.")]
    CollectFailed,

    #[error("Failed to read response.")]
    ResponseRead,

    #[error("Failed to unmarshal response.")]
    ResponseDecode,
}

impl FetchError {
    /// Stable error code reported to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::RequestFailed => "0006",
            FetchError::CollectFailed => "0007",
            FetchError::ResponseRead => "0008",
            FetchError::ResponseDecode => "0009",
        }
    }
}

/// Terminal failure of a sync invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("http status code = {status}, code = {code} message = {message}")]
pub struct PipelineError {
    pub status: u16,
    pub code: &'static str,
    pub message: String,
}

impl PipelineError {
    /// JSON body returned to the caller.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code.to_string(),
            message: self.message.clone(),
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        Self {
            status: INTERNAL_SERVER_ERROR,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<FetchError> for PipelineError {
    fn from(err: FetchError) -> Self {
        Self {
            status: INTERNAL_SERVER_ERROR,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Wire shape of an error response: `{ "code": ..., "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
