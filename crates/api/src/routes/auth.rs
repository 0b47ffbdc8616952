//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login              -> login
/// POST /register           -> register
/// GET  /me                 -> me (requires auth)
/// POST /change-password    -> change_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/me", get(auth::me))
        .route("/change-password", post(auth::change_password))
}
