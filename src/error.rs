// src/error.rs
//! Error taxonomy for the client core.
//!
//! Three families, matching how failures are surfaced to the view:
//! validation failures never reach the network, remote failures carry the
//! server-provided detail when the body has one, and session failures mean
//! the local credentials are gone and the user has to sign in again.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Client-side validation failure. The offending call was never issued.
    #[error("{0}")]
    Validation(String),

    /// Missing or rejected session credentials.
    #[error("session unavailable: {0}")]
    Session(String),

    /// Non-2xx response or transport failure. `status` is `None` when the
    /// request never produced a response.
    #[error("{message}")]
    Remote { status: Option<u16>, message: String },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn session(message: impl Into<String>) -> Self {
        Error::Session(message.into())
    }

    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Remote {
            status,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote { .. })
    }
}
