//! Authentication extractor and session helpers.
//!
//! The session stores only the principal's identity, never a role; every
//! authorization boundary re-derives the role through the resolver. The
//! extractor treats an expired principal exactly like a missing one.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentPrincipal, session_keys};

/// Path prefixes that get a JSON 401 instead of a login redirect.
const API_PREFIXES: &[&str] = &["/api/", "/super-admin", "/admin", "/owner"];

/// Extractor that requires an authenticated, unexpired principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     RequirePrincipal(principal): RequirePrincipal,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", principal.email)
/// }
/// ```
pub struct RequirePrincipal(pub CurrentPrincipal);

/// Rejection for requests without a valid principal.
pub enum AuthRejection {
    /// Redirect to the login page (page-style requests).
    RedirectToLogin,
    /// 401 Unauthorized (JSON/API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

fn is_api_path(path: &str) -> bool {
    API_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

impl<S> FromRequestParts<S> for RequirePrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The session is placed in extensions by SessionManagerLayer.
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let rejection = || {
            if is_api_path(parts.uri.path()) {
                AuthRejection::Unauthorized
            } else {
                AuthRejection::RedirectToLogin
            }
        };

        let principal: CurrentPrincipal = session
            .get(session_keys::CURRENT_PRINCIPAL)
            .await
            .ok()
            .flatten()
            .ok_or_else(rejection)?;

        // An expired backend session is as good as no session.
        if !principal.is_valid() {
            let _ = session
                .remove::<CurrentPrincipal>(session_keys::CURRENT_PRINCIPAL)
                .await;
            return Err(rejection());
        }

        Ok(Self(principal))
    }
}

/// Store the principal in the session after a successful login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_principal(
    session: &Session,
    principal: &CurrentPrincipal,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_PRINCIPAL, principal)
        .await
}

/// Remove the principal from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_principal(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentPrincipal>(session_keys::CURRENT_PRINCIPAL)
        .await?;
    Ok(())
}
