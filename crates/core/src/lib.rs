//! Mural core types: session storage, access tokens and time

pub mod clock;
pub mod error;
pub mod store;
pub mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{StoreError, StoreResult};
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageKey};
pub use token::{TokenClaims, TokenError, decode_claims};
