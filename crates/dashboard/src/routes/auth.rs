//! Login and logout handlers.
//!
//! The dashboard never sees credentials: the web front end obtains an
//! access token from the hosted backend's auth flow and posts it here. We
//! verify it against the backend, then keep only the principal's identity
//! in the session.

use axum::extract::State;
use axum::Json;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use buzzvar_core::Role;

use crate::baas::BaasError;
use crate::error::{AppError, set_sentry_user};
use crate::middleware::{clear_current_principal, set_current_principal};
use crate::models::CurrentPrincipal;
use crate::routes::{ApiResult, ApiSuccess};
use crate::state::AppState;

/// Login request: a backend-issued access token.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub access_token: String,
}

/// Login response: who you are and which area you may enter.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub principal: CurrentPrincipal,
    pub role: Role,
}

/// Verify a backend access token and open a dashboard session.
///
/// The resolved role is returned so the front end can route to the right
/// area, but it is not stored; every later request re-derives it.
///
/// # Errors
///
/// `Unauthorized` for a rejected token, upstream/storage failures
/// otherwise.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let token = SecretString::from(body.access_token);
    let principal = state
        .auth
        .verify_token(&token)
        .await
        .map_err(|err| match err {
            BaasError::Unauthorized(message) => AppError::Unauthorized(message),
            other => AppError::Baas(other),
        })?;
    let role = state.roles.resolve(&principal).await?;

    set_current_principal(&session, &principal)
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist session: {e}")))?;
    set_sentry_user(principal.id, Some(principal.email.as_ref()));

    tracing::info!(user_id = %principal.id, role = role.as_str(), "dashboard login");
    Ok(ApiSuccess::new(LoginResponse { principal, role }))
}

/// Close the dashboard session.
///
/// # Errors
///
/// `Internal` if the session cannot be modified.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> ApiResult<()> {
    clear_current_principal(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    crate::error::clear_sentry_user();
    Ok(ApiSuccess::new(()))
}
