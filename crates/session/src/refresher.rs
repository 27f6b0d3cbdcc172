//! Exchange of a refresh token for a new access token

use async_trait::async_trait;
use mural_http::types::RefreshTokenRequest;
use mural_http::{ApiClient, ClientError};
use tracing::debug;

/// Remote collaborator that mints access tokens
///
/// One call is one attempt; implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Returns the new access token
    async fn exchange(&self, refresh_token: &str) -> Result<String, ClientError>;
}

/// Refresher backed by the `/api/auth/refresh-token` endpoint
#[derive(Clone)]
pub struct HttpTokenRefresher {
    client: ApiClient,
}

impl HttpTokenRefresher {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn exchange(&self, refresh_token: &str) -> Result<String, ClientError> {
        debug!(base_url = %self.client.base_url(), "Requesting new access token");
        let response = self
            .client
            .refresh_token(&RefreshTokenRequest {
                refresh_token: refresh_token.to_string(),
            })
            .await?;
        Ok(response.access_token)
    }
}
