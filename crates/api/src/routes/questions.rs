//! Route definitions for the `/questions` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::questions;
use crate::state::AppState;

/// Routes mounted at `/questions`.
///
/// ```text
/// GET    /                                -> list
/// POST   /                                -> create
/// GET    /pending                         -> list_pending
/// GET    /{id}                            -> get_by_id
/// PUT    /{id}                            -> update
/// DELETE /{id}                            -> delete
/// GET    /{id}/revisions                  -> list_revisions
/// POST   /{id}/revisions                  -> add_revision
/// DELETE /{id}/revisions/{revision_id}    -> delete_revision
/// POST   /{id}/approve                    -> approve
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(questions::list).post(questions::create))
        .route("/pending", get(questions::list_pending))
        .route(
            "/{id}",
            get(questions::get_by_id)
                .put(questions::update)
                .delete(questions::delete),
        )
        .route(
            "/{id}/revisions",
            get(questions::list_revisions).post(questions::add_revision),
        )
        .route(
            "/{id}/revisions/{revision_id}",
            delete(questions::delete_revision),
        )
        .route("/{id}/approve", post(questions::approve))
}
