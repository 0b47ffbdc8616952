//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use casebook_core::error::CoreError;
use casebook_core::roles::Role;
use casebook_core::types::DbId;
use casebook_db::models::user::{CreateUser, UpdateUser, UserResponse};
use casebook_db::repositories::UserRepo;
use casebook_db::stores::UserStore;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    pub password: String,
    /// Defaults to `student`.
    pub role: Option<String>,
}

/// Request body for `PUT /admin/users/{id}`. Absent fields are unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Request body for `PUT /admin/users/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub is_active: bool,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// POST /api/v1/admin/users
///
/// Create a new account. Validates the request, hashes the password and
/// returns a safe [`UserResponse`] with 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = match input.role.as_deref() {
        Some(raw) => raw.parse::<Role>()?,
        None => Role::Student,
    };

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        username: input.username.trim().to_string(),
        email: input.email.trim().to_string(),
        password_hash,
        role,
    };

    let user = UserStore::create(&state.pool, Some(admin.user_id), &create_dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let dto = UpdateUser {
        username: input.username.map(|u| u.trim().to_string()),
        email: input.email.map(|e| e.trim().to_string()),
        role: input.role.as_deref().map(str::parse::<Role>).transpose()?,
    };

    let user = UserStore::update(&state.pool, admin.user_id, id, &dto).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/admin/users/{id}/status
///
/// Activate or deactivate an account. The last active admin cannot be
/// deactivated.
pub async fn update_user_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateUserStatusRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserStore::set_status(&state.pool, admin.user_id, id, input.is_active).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/v1/admin/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    UserStore::reset_password(&state.pool, admin.user_id, id, &password_hash).await?;
    Ok(Json(MessageResponse::new("Password has been reset")))
}
