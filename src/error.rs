//! Error taxonomy for pr-automerge
//!
//! The orchestrator distinguishes two classes of platform failure:
//! transport-level errors (network faults, 5xx) which abort the whole run,
//! and platform rejections (4xx with an error body) which are definitive
//! negative answers handled per pull request.

use thiserror::Error;

/// All errors produced by this crate
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failure, server error, or undecodable response
    #[error("transport error: {0}")]
    Transport(String),

    /// The platform refused the request (4xx) with an error body
    #[error("platform rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code of the rejection
        status: u16,
        /// Error body reported by the platform
        message: String,
    },

    /// Invariant violation inside this crate
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        match e {
            octocrab::Error::GitHub { source, .. } if source.status_code.is_client_error() => {
                Self::Rejected {
                    status: source.status_code.as_u16(),
                    message: source.message,
                }
            }
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
