//! Route definitions for the `/admin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin, audit};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users                          -> list_users
/// POST   /users                          -> create_user
/// GET    /users/{id}                     -> get_user
/// PUT    /users/{id}                     -> update_user
/// PUT    /users/{id}/status              -> update_user_status
/// POST   /users/{id}/reset-password      -> reset_password
/// GET    /audit-logs                     -> query_audit_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/users/{id}", get(admin::get_user).put(admin::update_user))
        .route("/users/{id}/status", put(admin::update_user_status))
        .route("/users/{id}/reset-password", post(admin::reset_password))
        .route("/audit-logs", get(audit::query_audit_logs))
}
