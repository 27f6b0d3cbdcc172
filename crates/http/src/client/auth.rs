//! Authentication API client methods

use super::{ApiClient, ClientError};
use crate::types::{
    Credentials, LoginResponse, MessageResponse, RefreshTokenRequest, RefreshTokenResponse,
};
use reqwest::Method;

impl ApiClient {
    /// Exchange username and password for tokens
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let req = self
            .request(Method::POST, "/api/auth/login")
            .json(credentials);
        self.execute(req).await
    }

    /// Create a new account
    pub async fn register(&self, credentials: &Credentials) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, "/api/auth/register")
            .json(credentials);
        self.execute_ack(req).await
    }

    /// Mint a new access token from a refresh token
    pub async fn refresh_token(
        &self,
        request: &RefreshTokenRequest,
    ) -> Result<RefreshTokenResponse, ClientError> {
        let req = self
            .request(Method::POST, "/api/auth/refresh-token")
            .json(request);
        self.execute(req).await
    }
}
