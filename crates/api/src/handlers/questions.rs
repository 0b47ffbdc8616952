//! Handlers for the `/questions` resource and its revisions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use casebook_core::paging::Page;
use casebook_core::types::DbId;
use casebook_db::models::question::{
    ApproveQuestion, CreateQuestion, Question, QuestionDetail, QuestionListItem, QuestionQuery,
    UpdateQuestion,
};
use casebook_db::models::revision::{CreateRevision, QuestionRevision, RevisionView};
use casebook_db::stores::QuestionStore;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireReviewer;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// POST /api/v1/questions
///
/// Student submissions start `pending`; teacher and admin submissions are
/// approved immediately.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<CreateQuestion>,
) -> AppResult<(StatusCode, Json<DataResponse<Question>>)> {
    let question = QuestionStore::create(&state.pool, &user.actor(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: question })))
}

/// GET /api/v1/questions
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<QuestionQuery>,
) -> AppResult<Json<DataResponse<Page<QuestionListItem>>>> {
    let page = QuestionStore::list(&state.pool, &user.actor(), &query).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/questions/pending
pub async fn list_pending(
    State(state): State<AppState>,
    RequireReviewer(user): RequireReviewer,
    AppQuery(query): AppQuery<QuestionQuery>,
) -> AppResult<Json<DataResponse<Page<QuestionListItem>>>> {
    let page = QuestionStore::list_pending(&state.pool, &user.actor(), &query).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/questions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<QuestionDetail>>> {
    let detail = QuestionStore::get(&state.pool, &user.actor(), id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/questions/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateQuestion>,
) -> AppResult<Json<DataResponse<Question>>> {
    let question = QuestionStore::update(&state.pool, &user.actor(), id, &input).await?;
    Ok(Json(DataResponse { data: question }))
}

/// DELETE /api/v1/questions/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    QuestionStore::delete(&state.pool, &user.actor(), id).await?;
    Ok(Json(MessageResponse::new("Question deleted")))
}

/// POST /api/v1/questions/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireReviewer(user): RequireReviewer,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ApproveQuestion>,
) -> AppResult<Json<DataResponse<Question>>> {
    let question = QuestionStore::approve(&state.pool, &user.actor(), id, &input).await?;
    Ok(Json(DataResponse { data: question }))
}

// ---------------------------------------------------------------------------
// Revisions
// ---------------------------------------------------------------------------

/// GET /api/v1/questions/{id}/revisions
pub async fn list_revisions(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<RevisionView>>>> {
    let revisions = QuestionStore::list_revisions(&state.pool, &user.actor(), id).await?;
    Ok(Json(DataResponse { data: revisions }))
}

/// POST /api/v1/questions/{id}/revisions
pub async fn add_revision(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CreateRevision>,
) -> AppResult<(StatusCode, Json<DataResponse<QuestionRevision>>)> {
    let revision = QuestionStore::add_revision(&state.pool, &user.actor(), id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: revision })))
}

/// DELETE /api/v1/questions/{id}/revisions/{revision_id}
pub async fn delete_revision(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath((id, revision_id)): AppPath<(DbId, DbId)>,
) -> AppResult<Json<MessageResponse>> {
    QuestionStore::delete_revision(&state.pool, &user.actor(), id, revision_id).await?;
    Ok(Json(MessageResponse::new("Revision deleted")))
}
