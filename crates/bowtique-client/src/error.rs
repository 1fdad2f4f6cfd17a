//! Error type for outbound API calls.

use thiserror::Error;

/// Failure surfaced by the API gateway.
///
/// The only structured distinction callers are promised is the
/// session-expired case; everything else is a composed message string.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be sent, or the response could not be read or
    /// decoded.
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered 401. The gateway has already cleared the stored
    /// token by the time this is returned; callers are expected to redirect
    /// to a sign-in surface.
    #[error("session expired: {message}")]
    SessionExpired { message: String },

    /// Any other non-success HTTP status, with the message composed from the
    /// response body.
    #[error("{status}: {message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    /// True for the distinguishable "unauthorized" condition.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// HTTP status carried by the error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::SessionExpired { .. } => Some(401),
            Self::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
