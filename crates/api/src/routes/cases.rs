//! Route definitions for the `/cases` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::cases;
use crate::state::AppState;

/// Routes mounted at `/cases`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /positions     -> list_positions
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cases::list).post(cases::create))
        .route("/positions", get(cases::list_positions))
        .route(
            "/{id}",
            get(cases::get_by_id)
                .put(cases::update)
                .delete(cases::delete),
        )
}
