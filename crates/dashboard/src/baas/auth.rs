//! Auth collaborator: access-token verification.
//!
//! Login hands the dashboard a backend-issued access token; this client
//! asks the backend who the token belongs to and when it expires. The
//! dashboard never mints or refreshes tokens itself.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use buzzvar_core::{Email, UserId};

use super::BaasError;
use crate::config::BaasConfig;
use crate::models::CurrentPrincipal;

/// Auth API client for the hosted backend.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    base_url: String,
}

/// Response body of the backend's token introspection endpoint.
#[derive(Debug, Deserialize)]
struct TokenUser {
    id: uuid::Uuid,
    email: String,
    /// Unix timestamp of session expiry.
    expires_at: i64,
}

impl AuthClient {
    /// Create a new auth client.
    ///
    /// # Panics
    ///
    /// Panics if the service key contains invalid header characters.
    #[must_use]
    pub fn new(config: &BaasConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(config.service_key.expose_secret())
                .expect("Invalid service key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(AuthClientInner {
                client,
                base_url: config.url.clone(),
            }),
        }
    }

    /// Verify an access token and return the principal it identifies.
    ///
    /// # Errors
    ///
    /// Returns `BaasError::Unauthorized` for invalid or expired tokens and
    /// `BaasError::Unexpected` for any other non-success status.
    #[instrument(skip(self, access_token))]
    pub async fn verify_token(
        &self,
        access_token: &SecretString,
    ) -> Result<CurrentPrincipal, BaasError> {
        let url = format!("{}/auth/v1/user", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(access_token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BaasError::Unauthorized(
                "invalid or expired access token".to_owned(),
            ));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BaasError::Unexpected {
                status: status.as_u16(),
                message,
            });
        }

        let user: TokenUser = response.json().await?;

        let email = Email::parse(&user.email)
            .map_err(|e| BaasError::Parse(format!("invalid email from auth service: {e}")))?;

        let expires_at: DateTime<Utc> = Utc
            .timestamp_opt(user.expires_at, 0)
            .single()
            .ok_or_else(|| BaasError::Parse("invalid expiry timestamp".to_owned()))?;

        Ok(CurrentPrincipal {
            id: UserId::new(user.id),
            email,
            expires_at,
        })
    }
}
