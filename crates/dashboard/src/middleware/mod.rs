//! HTTP middleware: sessions and the authentication extractor.

pub mod auth;
pub mod session;

pub use auth::{RequirePrincipal, clear_current_principal, set_current_principal};
pub use session::create_session_layer;
