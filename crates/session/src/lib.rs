//! Mural session layer
//!
//! Decides whether the stored credentials still authenticate the user,
//! refreshes them when they have expired, and wraps the API operations that
//! depend on them.

pub mod auth;
pub mod error;
pub mod feed;
pub mod refresher;
pub mod session;

pub use auth::Authenticator;
pub use error::{AuthError, SessionError};
pub use feed::{FeedPager, PublicationSource};
pub use refresher::{HttpTokenRefresher, TokenRefresher};
pub use session::{PublicationDraft, Session};
