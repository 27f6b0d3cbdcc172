//! User API client methods

use super::{ApiClient, ClientError};
use crate::types::{MessageResponse, PushTokenRequest};
use reqwest::Method;

impl ApiClient {
    /// Register this device's push-notification token with the signed-in user
    pub async fn register_push_token(
        &self,
        request: &PushTokenRequest,
    ) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, "/api/users/push-token")
            .json(request);
        self.execute_ack(req).await
    }
}
