//! HTTP clients for the hosted backend's auth and file storage services.
//!
//! The backend is a black box: the dashboard verifies access tokens against
//! its auth endpoint and hands uploaded blobs to its storage endpoint,
//! storing nothing but the returned URL. Row storage goes through the
//! `db` module instead (the backend exposes its `PostgreSQL` directly).

pub mod auth;
pub mod files;

use thiserror::Error;

pub use auth::AuthClient;
pub use files::FileStorageClient;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BaasError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the credentials or token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backend returned an unexpected payload or status.
    #[error("unexpected response ({status}): {message}")]
    Unexpected {
        /// HTTP status returned.
        status: u16,
        /// Error detail, if any.
        message: String,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}
