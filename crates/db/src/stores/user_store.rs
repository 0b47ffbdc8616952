//! Account lifecycle: creation, self-registration, admin edits, activation
//! and password changes. Each change writes one audit entry in the same
//! transaction.

use casebook_core::audit::{AuditAction, ENTITY_USER};
use casebook_core::error::CoreError;
use casebook_core::roles::{ensure_admin_remains, Role};
use casebook_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::StoreError;
use crate::models::audit::CreateAuditLog;
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repositories::{AuditLogRepo, UserRepo};

pub struct UserStore;

impl UserStore {
    /// Create an account.
    ///
    /// `created_by` is the administrator performing the action; `None` when
    /// the server seeds its first admin, in which case the entry is
    /// attributed to the new account itself.
    pub async fn create(
        pool: &PgPool,
        created_by: Option<DbId>,
        input: &CreateUser,
    ) -> Result<User, StoreError> {
        let mut tx = pool.begin().await?;
        let user = insert_unique(&mut tx, input).await?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                created_by.unwrap_or(user.id),
                AuditAction::CreateUser,
                ENTITY_USER,
                user.id,
                format!("Created {} account '{}'", user.role, user.username),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            created_by = ?created_by,
            user_id = user.id,
            role = %user.role,
            "User created",
        );
        Ok(user)
    }

    /// Self-service sign-up. The account is always a student.
    pub async fn register(pool: &PgPool, input: &CreateUser) -> Result<User, StoreError> {
        let input = CreateUser {
            role: Role::Student,
            ..input.clone()
        };

        let mut tx = pool.begin().await?;
        let user = insert_unique(&mut tx, &input).await?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                user.id,
                AuditAction::Register,
                ENTITY_USER,
                user.id,
                format!("Registered account '{}'", user.username),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Edit username, email or role.
    ///
    /// A new username or email must not belong to another account, and the
    /// last active admin cannot be demoted.
    pub async fn update(
        pool: &PgPool,
        admin_id: DbId,
        user_id: DbId,
        input: &UpdateUser,
    ) -> Result<User, StoreError> {
        let mut tx = pool.begin().await?;
        let existing = find_user(&mut tx, user_id).await?;

        if let Some(username) = input.username.as_deref() {
            if let Some(other) = UserRepo::find_by_username(&mut *tx, username).await? {
                if other.id != user_id {
                    return Err(username_taken(username));
                }
            }
        }
        if let Some(email) = input.email.as_deref() {
            if let Some(other) = UserRepo::find_by_email(&mut *tx, email).await? {
                if other.id != user_id {
                    return Err(email_taken(email));
                }
            }
        }

        let demotes = input.role.is_some_and(|role| role != Role::Admin);
        if demotes && existing.role == Role::Admin && existing.is_active {
            let others = UserRepo::count_other_active_admins(&mut *tx, user_id).await?;
            ensure_admin_remains(true, others)?;
        }

        let user = UserRepo::update(&mut *tx, user_id, input)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                admin_id,
                AuditAction::UpdateUser,
                ENTITY_USER,
                user.id,
                format!("Updated account '{}' ({})", user.username, user.role),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(admin_id, user_id, role = %user.role, "User updated");
        Ok(user)
    }

    /// Activate or deactivate an account. Deactivated accounts cannot log
    /// in; the last active admin cannot be deactivated.
    pub async fn set_status(
        pool: &PgPool,
        admin_id: DbId,
        user_id: DbId,
        is_active: bool,
    ) -> Result<User, StoreError> {
        let mut tx = pool.begin().await?;
        let existing = find_user(&mut tx, user_id).await?;

        if !is_active && existing.role == Role::Admin && existing.is_active {
            let others = UserRepo::count_other_active_admins(&mut *tx, user_id).await?;
            ensure_admin_remains(true, others)?;
        }

        let user = UserRepo::set_active(&mut *tx, user_id, is_active)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: user_id,
            })?;
        let verb = if is_active { "Activated" } else { "Deactivated" };
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                admin_id,
                AuditAction::UpdateUserStatus,
                ENTITY_USER,
                user.id,
                format!("{verb} account '{}'", user.username),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(admin_id, user_id, is_active, "User status changed");
        Ok(user)
    }

    /// Admin override of another account's password. `password_hash` is
    /// already hashed.
    pub async fn reset_password(
        pool: &PgPool,
        admin_id: DbId,
        user_id: DbId,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut tx = pool.begin().await?;
        let user = find_user(&mut tx, user_id).await?;

        UserRepo::set_password_hash(&mut *tx, user_id, password_hash).await?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                admin_id,
                AuditAction::ResetPassword,
                ENTITY_USER,
                user.id,
                format!("Reset password of '{}'", user.username),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(admin_id, user_id, "Password reset by admin");
        Ok(())
    }

    /// Store a new password for the caller's own account.
    ///
    /// The caller has already verified the current password.
    pub async fn change_password(
        pool: &PgPool,
        user_id: DbId,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut tx = pool.begin().await?;
        let user = find_user(&mut tx, user_id).await?;

        UserRepo::set_password_hash(&mut *tx, user_id, password_hash).await?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                user.id,
                AuditAction::ChangePassword,
                ENTITY_USER,
                user.id,
                format!("Changed own password ('{}')", user.username),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id, "Password changed");
        Ok(())
    }
}

async fn find_user(tx: &mut Transaction<'_, Postgres>, user_id: DbId) -> Result<User, StoreError> {
    UserRepo::find_by_id(&mut **tx, user_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "user",
                id: user_id,
            }
            .into()
        })
}

/// Insert after checking that username and email are free.
async fn insert_unique(
    tx: &mut Transaction<'_, Postgres>,
    input: &CreateUser,
) -> Result<User, StoreError> {
    if UserRepo::find_by_username(&mut **tx, &input.username).await?.is_some() {
        return Err(username_taken(&input.username));
    }
    if UserRepo::find_by_email(&mut **tx, &input.email).await?.is_some() {
        return Err(email_taken(&input.email));
    }
    Ok(UserRepo::create(&mut **tx, input).await?)
}

fn username_taken(username: &str) -> StoreError {
    CoreError::Conflict(format!("Username '{username}' is already taken")).into()
}

fn email_taken(email: &str) -> StoreError {
    CoreError::Conflict(format!("Email '{email}' is already registered")).into()
}
