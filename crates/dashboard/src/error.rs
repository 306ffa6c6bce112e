//! Unified error handling for the dashboard.
//!
//! Services never let a raw collaborator error escape: repository and BaaS
//! failures are mapped into [`AppError`], and route handlers surface it as
//! the uniform `{success: false, error, code}` JSON body. Authorization
//! failures on specific resources use [`AppError::AccessDenied`], which is
//! deliberately worded so callers cannot tell "does not exist" from
//! "exists but not yours".

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::baas::BaasError;
use crate::db::RepositoryError;

/// The deliberately ambiguous denial message for venue-scoped resources.
pub const VENUE_DENIED: &str = "Venue not found or access denied";

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid principal on the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid principal, insufficient role or ownership for this resource.
    /// The message never confirms the resource exists.
    #[error("{0}")]
    AccessDenied(String),

    /// Malformed input, with field-level detail.
    #[error("Validation failed on {field}: {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// Human-readable description.
        message: String,
    },

    /// Resource genuinely absent (distinguished from `AccessDenied`
    /// internally, sometimes deliberately merged in user-facing text).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation's backing table or column does not exist in the
    /// deployed schema. A normal, expected failure mode - not retryable.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// External BaaS collaborator failed.
    #[error("Backend error: {0}")]
    Baas(#[from] BaasError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Denial for a venue-scoped resource, worded ambiguously.
    #[must_use]
    pub fn venue_access_denied() -> Self {
        Self::AccessDenied(VENUE_DENIED.to_owned())
    }

    /// Generic role-based denial, also worded without confirming existence.
    #[must_use]
    pub fn role_denied() -> Self {
        Self::AccessDenied("Not found or access denied".to_owned())
    }

    /// Stable machine-readable code for the failure body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::AccessDenied(_) => "ACCESS_DENIED",
            Self::Validation { .. } => "VALIDATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unavailable(_) => "FEATURE_UNAVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Baas(_) => "UPSTREAM_ERROR",
            Self::Internal(_) => "UNEXPECTED_ERROR",
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::MissingTable(table) => Self::Unavailable(format!(
                "the {table} table does not exist in the current deployment"
            )),
            other => Self::Database(other),
        }
    }
}

/// Uniform failure body: `{"success": false, "error": ..., "code": ...}`.
#[derive(Debug, Serialize)]
struct ApiFailure<'a> {
    success: bool,
    error: String,
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_) | Self::Baas(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Dashboard request error"
            );
        }

        let status = match &self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            // Denial renders as "not found"; callers cannot probe for existence
            Self::AccessDenied(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unavailable(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Baas(_) => StatusCode::BAD_GATEWAY,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Baas(_) => "External service error".to_owned(),
            other => other.to_string(),
        };

        let field = match &self {
            Self::Validation { field, .. } => Some(field.as_str()),
            _ => None,
        };

        let body = ApiFailure {
            success: false,
            error: message,
            code: self.code(),
            field,
        };

        (status, Json(body)).into_response()
    }
}

/// Set the Sentry user context from an authenticated principal.
pub fn set_sentry_user(user_id: buzzvar_core::UserId, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
