//! Session error types

use mural_core::{StoreError, TokenError};
use mural_http::ClientError;
use thiserror::Error;

/// Why the stored credentials do not authenticate the user
///
/// Every variant means "not authenticated" to callers that only want a
/// boolean; the distinction exists for logging and diagnostics.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No access token stored")]
    NoToken,

    #[error("No refresh token stored")]
    NoRefreshToken,

    #[error(transparent)]
    Decode(#[from] TokenError),

    #[error("Token refresh failed: {0}")]
    Network(#[from] ClientError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not authenticated: {0}")]
    NotAuthenticated(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ClientError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Whether the caller should send the user back to the login screen
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated(_) | Self::Api(ClientError::AuthenticationFailed(_))
        )
    }
}
