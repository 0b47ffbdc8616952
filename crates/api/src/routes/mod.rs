pub mod admin;
pub mod auth;
pub mod cases;
pub mod health;
pub mod questions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/register                                   student sign-up (public)
/// /auth/me                                         current user
/// /auth/change-password                            change own password
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update (admin only)
/// /admin/users/{id}/status                         activate, deactivate (admin only)
/// /admin/users/{id}/reset-password                 set a new password (admin only)
/// /admin/audit-logs                                query audit log (admin only)
///
/// /cases                                           list, create
/// /cases/positions                                 distinct positions
/// /cases/{id}                                      get, update, delete
///
/// /questions                                       list, create
/// /questions/pending                               review queue (teacher, admin)
/// /questions/{id}                                  get, update, delete
/// /questions/{id}/revisions                        list, add
/// /questions/{id}/revisions/{revision_id}          delete
/// /questions/{id}/approve                          approve or reject (teacher, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes.
        .nest("/auth", auth::router())
        // Admin routes (user management, audit log).
        .nest("/admin", admin::router())
        // Interview cases.
        .nest("/cases", cases::router())
        // Questions, revisions and moderation.
        .nest("/questions", questions::router())
}
