//! Handlers for the `/cases` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use casebook_core::paging::Page;
use casebook_core::types::DbId;
use casebook_db::models::case::{Case, CaseDetail, CaseQuery, CaseSummary, CreateCase, UpdateCase};
use casebook_db::stores::CaseStore;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// POST /api/v1/cases
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<CreateCase>,
) -> AppResult<(StatusCode, Json<DataResponse<Case>>)> {
    let case = CaseStore::create(&state.pool, &user.actor(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: case })))
}

/// GET /api/v1/cases
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<CaseQuery>,
) -> AppResult<Json<DataResponse<Page<CaseSummary>>>> {
    let page = CaseStore::list(&state.pool, &user.actor(), &query).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/cases/positions
pub async fn list_positions(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let positions = CaseStore::list_positions(&state.pool).await?;
    Ok(Json(DataResponse { data: positions }))
}

/// GET /api/v1/cases/{id}
///
/// The case plus the questions the caller is allowed to see.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<CaseDetail>>> {
    let detail = CaseStore::get(&state.pool, &user.actor(), id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/cases/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateCase>,
) -> AppResult<Json<DataResponse<Case>>> {
    let case = CaseStore::update(&state.pool, &user.actor(), id, &input).await?;
    Ok(Json(DataResponse { data: case }))
}

/// DELETE /api/v1/cases/{id}
///
/// Fails with `CONFLICT` while any question still references the case.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    CaseStore::delete(&state.pool, &user.actor(), id).await?;
    Ok(Json(MessageResponse::new("Case deleted")))
}
