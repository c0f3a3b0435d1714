use std::time::Duration;

/// Failure of one call across the generative-service boundary.
///
/// None of these are fatal to a job: every capability has an entry in the fallback table.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExternalCallError {
    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    #[error("service returned status {code}")]
    Status { code: u16 },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("service returned no usable image")]
    NoImage,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("capability not supported by this backend: {0}")]
    Unsupported(&'static str),
}

impl ExternalCallError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

impl From<reqwest::Error> for ExternalCallError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Transport(format!("request timed out: {err}"));
        }
        if let Some(status) = err.status() {
            return Self::Status {
                code: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Self::Malformed(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}
