//! Access-token lifecycle: expiry check and refresh

use crate::error::AuthError;
use crate::refresher::TokenRefresher;
use mural_core::{Clock, KeyValueStore, StorageKey, SystemClock, decode_claims};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Decides whether the stored credentials authenticate the user
///
/// Fails closed: any missing token, undecodable token or failed refresh
/// means "not authenticated".
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn KeyValueStore>,
    refresher: Arc<dyn TokenRefresher>,
    clock: Arc<dyn Clock>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn KeyValueStore>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self::with_clock(store, refresher, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        refresher: Arc<dyn TokenRefresher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            refresher,
            clock,
        }
    }

    /// `true` when the user is authenticated, refreshing an expired token first
    pub async fn is_authenticated(&self) -> bool {
        match self.check().await {
            Ok(()) => true,
            Err(AuthError::NoToken) => {
                debug!("No access token stored");
                false
            }
            Err(e) => {
                warn!(error = %e, "Authentication check failed");
                false
            }
        }
    }

    /// Check the stored access token, refreshing it once if it has expired
    pub async fn check(&self) -> Result<(), AuthError> {
        let token = self
            .store
            .get(StorageKey::UserToken.as_str())
            .await?
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::NoToken)?;

        let claims = decode_claims(&token)?;
        let now = self.clock.now();

        if claims.is_expired_at(now) {
            info!(exp = claims.exp, now, "Access token expired, attempting refresh");
            return self.try_refresh().await;
        }

        debug!(exp = claims.exp, "User authenticated");
        Ok(())
    }

    /// `true` when a new access token was obtained and stored
    pub async fn refresh(&self) -> bool {
        match self.try_refresh().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                false
            }
        }
    }

    /// Exchange the stored refresh token for a new access token
    ///
    /// Without a refresh token (an empty one counts as none) nothing is touched. Any other failure removes
    /// the stored access token so the next check routes the user to login.
    pub async fn try_refresh(&self) -> Result<(), AuthError> {
        let refresh_token = match self.store.get(StorageKey::RefreshToken.as_str()).await {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return Err(AuthError::NoRefreshToken),
            Err(e) => {
                self.discard_access_token().await;
                return Err(e.into());
            }
        };

        let access_token = match self.refresher.exchange(&refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                self.discard_access_token().await;
                return Err(e.into());
            }
        };

        if let Err(e) = self
            .store
            .set(StorageKey::UserToken.as_str(), &access_token)
            .await
        {
            self.discard_access_token().await;
            return Err(e.into());
        }

        info!("Access token refreshed");
        Ok(())
    }

    async fn discard_access_token(&self) {
        if let Err(e) = self.store.remove(StorageKey::UserToken.as_str()).await {
            warn!(error = %e, "Failed to remove access token after refresh failure");
        }
    }
}
