//! Mural HTTP module: typed client and wire types for the backend API

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder, error::ClientError};
