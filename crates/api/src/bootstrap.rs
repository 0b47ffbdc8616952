//! First-run seeding of an administrator account.

use casebook_core::error::CoreError;
use casebook_core::roles::Role;
use casebook_db::models::user::{CreateUser, User};
use casebook_db::repositories::UserRepo;
use casebook_db::stores::UserStore;
use casebook_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin when the `users` table is empty.
///
/// Returns the new account, or `None` when nothing was configured or users
/// already exist.
pub async fn ensure_bootstrap_admin(
    pool: &DbPool,
    admin: Option<&BootstrapAdmin>,
) -> AppResult<Option<User>> {
    let Some(admin) = admin else {
        return Ok(None);
    };

    if UserRepo::count(pool).await? > 0 {
        tracing::debug!("Users already exist, skipping bootstrap admin");
        return Ok(None);
    }

    if admin.password.chars().count() < crate::auth::password::MIN_PASSWORD_LENGTH {
        return Err(AppError::Core(CoreError::Validation(
            "BOOTSTRAP_ADMIN_PASSWORD is too short".into(),
        )));
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserStore::create(
        pool,
        None,
        &CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role: Role::Admin,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(Some(user))
}
