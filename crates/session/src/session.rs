//! Signed-in user session over the persisted store

use crate::auth::Authenticator;
use crate::error::{AuthError, SessionError};
use crate::feed::FeedPager;
use crate::refresher::{HttpTokenRefresher, TokenRefresher};
use mural_core::{KeyValueStore, StorageKey};
use mural_http::ApiClient;
use mural_http::types::{Credentials, ImageUpload, LoginResponse, NewPublication, PushTokenRequest};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Category used when a draft does not name one
pub const DEFAULT_PUBLICATION_KIND: &str = "evento";

const DEFAULT_UPLOAD_NAME: &str = "upload.jpg";

/// Publication as entered by the user, before validation
#[derive(Debug, Clone, Default)]
pub struct PublicationDraft {
    pub kind: Option<String>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub image: Option<PathBuf>,
}

/// Login state plus the API operations that depend on it
#[derive(Clone)]
pub struct Session {
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
    auth: Authenticator,
}

impl Session {
    /// Session that refreshes tokens through the same API the client talks to
    pub fn new(client: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        let refresher = Arc::new(HttpTokenRefresher::new(client.clone()));
        let auth = Authenticator::new(store.clone(), refresher);
        Self {
            client,
            store,
            auth,
        }
    }

    pub fn with_refresher(
        client: ApiClient,
        store: Arc<dyn KeyValueStore>,
        refresher: Arc<dyn TokenRefresher>,
    ) -> Self {
        let auth = Authenticator::new(store.clone(), refresher);
        Self {
            client,
            store,
            auth,
        }
    }

    pub fn with_authenticator(
        client: ApiClient,
        store: Arc<dyn KeyValueStore>,
        auth: Authenticator,
    ) -> Self {
        Self {
            client,
            store,
            auth,
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Sign in and persist the returned credentials
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, SessionError> {
        let response = self
            .client
            .login(&Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.store
            .set(StorageKey::UserToken.as_str(), &response.token)
            .await?;

        match response.refresh_token.as_deref().filter(|t| !t.is_empty()) {
            Some(refresh_token) => {
                self.store
                    .set(StorageKey::RefreshToken.as_str(), refresh_token)
                    .await?
            }
            // a stale refresh token from an earlier login must not outlive this one
            None => self.store.remove(StorageKey::RefreshToken.as_str()).await?,
        }

        let display_name = response.username.as_deref().unwrap_or(username);
        self.store
            .set(StorageKey::Username.as_str(), display_name)
            .await?;

        info!(username = display_name, "Logged in");
        Ok(response)
    }

    /// Create an account; the user still has to log in afterwards
    pub async fn register(&self, username: &str, password: &str) -> Result<Option<String>, SessionError> {
        let ack = self
            .client
            .register(&Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        info!(username, "Account registered");
        Ok(ack.message)
    }

    /// Forget every stored credential
    pub async fn logout(&self) -> Result<(), SessionError> {
        for key in StorageKey::ALL {
            self.store.remove(key.as_str()).await?;
        }
        info!("Logged out");
        Ok(())
    }

    pub async fn username(&self) -> Result<Option<String>, SessionError> {
        Ok(self.store.get(StorageKey::Username.as_str()).await?)
    }

    /// `true` when the stored credentials authenticate the user
    pub async fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated().await
    }

    /// Client carrying a currently valid access token
    ///
    /// Refreshes an expired token first.
    pub async fn authorized_client(&self) -> Result<ApiClient, SessionError> {
        self.auth.check().await?;

        let token = self
            .store
            .get(StorageKey::UserToken.as_str())
            .await?
            .ok_or(AuthError::NoToken)?;

        Ok(self.client.with_bearer(token))
    }

    /// Validate and upload a new publication
    pub async fn publish(&self, draft: PublicationDraft) -> Result<(), SessionError> {
        let publication = prepare_publication(draft).await?;
        let client = self.authorized_client().await?;

        let ack = client.create_publication(publication).await?;
        info!(server_message = ?ack.message, "Publication created");
        Ok(())
    }

    /// Send the device push token to the backend
    ///
    /// Returns `false` without contacting the server when nobody is signed in.
    pub async fn register_push_token(&self, push_token: &str) -> Result<bool, SessionError> {
        let stored = self.store.get(StorageKey::UserToken.as_str()).await?;
        let Some(token) = stored.filter(|t| !t.is_empty()) else {
            debug!("No access token stored, push token not registered");
            return Ok(false);
        };

        let ack = self
            .client
            .with_bearer(token)
            .register_push_token(&PushTokenRequest {
                push_token: push_token.to_string(),
            })
            .await?;

        info!(server_message = ?ack.message, "Push token registered");
        Ok(true)
    }

    /// Feed pager over the public publication listing
    pub fn feed(&self, page_size: u32) -> FeedPager<ApiClient> {
        FeedPager::new(self.client.clone(), page_size)
    }
}

async fn prepare_publication(draft: PublicationDraft) -> Result<NewPublication, SessionError> {
    let missing: Vec<&str> = [
        ("title", &draft.title),
        ("description", &draft.description),
        ("location", &draft.location),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if !missing.is_empty() {
        return Err(SessionError::Validation(format!(
            "required fields missing: {}",
            missing.join(", ")
        )));
    }

    let image = match draft.image {
        Some(path) => Some(read_image(&path).await?),
        None => None,
    };

    Ok(NewPublication {
        kind: draft
            .kind
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PUBLICATION_KIND.to_string()),
        title: draft.title,
        description: draft.description,
        location: draft.location,
        date: draft.date,
        image,
    })
}

async fn read_image(path: &Path) -> Result<ImageUpload, SessionError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_UPLOAD_NAME)
        .to_string();

    if bytes.is_empty() {
        warn!(path = %path.display(), "Attaching empty image file");
    }

    Ok(ImageUpload {
        mime_type: image_mime_type(&file_name),
        file_name,
        bytes,
    })
}

/// `image/<extension>`, falling back to JPEG
fn image_mime_type(file_name: &str) -> String {
    match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("image/{}", ext.to_ascii_lowercase()),
        _ => "image/jpeg".to_string(),
    }
}
