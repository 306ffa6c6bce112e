//! File storage collaborator: blob upload.
//!
//! The dashboard uploads venue images on behalf of owners and stores only
//! the URL the backend returns, along with a caption and kind tag. No
//! resizing, validation of image contents, or other transformation happens
//! here.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;
use uuid::Uuid;

use buzzvar_core::VenueId;

use super::BaasError;
use crate::config::BaasConfig;

/// Storage bucket for venue imagery.
const VENUE_IMAGE_BUCKET: &str = "venue-images";

/// File storage API client for the hosted backend.
#[derive(Clone)]
pub struct FileStorageClient {
    inner: Arc<FileStorageClientInner>,
}

struct FileStorageClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl FileStorageClient {
    /// Create a new file storage client.
    ///
    /// # Panics
    ///
    /// Panics if the service key contains invalid header characters.
    #[must_use]
    pub fn new(config: &BaasConfig) -> Self {
        let mut headers = HeaderMap::new();
        let key = config.service_key.expose_secret();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key).expect("Invalid service key for header"),
        );
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}"))
                .expect("Invalid service key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(FileStorageClientInner {
                client,
                base_url: config.url.clone(),
            }),
        }
    }

    /// Upload a venue image blob and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns `BaasError::Unexpected` if the storage service rejects the
    /// upload.
    #[instrument(skip(self, bytes), fields(%venue_id, size = bytes.len()))]
    pub async fn upload_venue_image(
        &self,
        venue_id: VenueId,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BaasError> {
        let object_path = format!("{venue_id}/{}", Uuid::new_v4());
        let url = format!(
            "{}/storage/v1/object/{VENUE_IMAGE_BUCKET}/{object_path}",
            self.inner.base_url
        );

        let response = self
            .inner
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BaasError::Unexpected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(format!(
            "{}/storage/v1/object/public/{VENUE_IMAGE_BUCKET}/{object_path}",
            self.inner.base_url
        ))
    }
}
