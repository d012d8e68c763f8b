//! Failure raised by every adapter that talks to the managed backend.

use tracing::error;

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Errors surfaced by auth-provider and repository adapters.
    ///
    /// Services log these in full and translate them into the
    /// operation-specific messages returned to clients.
    pub enum BackendError {
        /// The presented token or credentials were refused.
        Unauthorized { message: String } => "backend refused credentials: {message}",
        /// The backend rejected the request (validation, constraint, duplicate).
        Rejected { message: String } => "backend rejected request: {message}",
        /// The request did not complete in time.
        Timeout { message: String } => "backend request timed out: {message}",
        /// The request could not be sent or the backend failed.
        Transport { message: String } => "backend transport failed: {message}",
        /// The response body did not have the expected shape.
        Decode { message: String } => "backend response could not be decoded: {message}",
    }
}

impl BackendError {
    /// Human-readable detail supplied by the backend.
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized { message }
            | Self::Rejected { message }
            | Self::Timeout { message }
            | Self::Transport { message }
            | Self::Decode { message } => message.as_str(),
        }
    }

    /// Log the full failure and hide it behind an internal error carrying
    /// only the operation's client-facing `message`.
    pub fn into_internal(self, message: &str) -> Error {
        error!(error = %self, "{message}");
        Error::internal(message)
    }
}
