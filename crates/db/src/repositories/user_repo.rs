//! Repository for the `users` table.

use casebook_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role, is_active, created_at";

/// Provides lookup and insert operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(executor)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username<'e>(
        executor: impl PgExecutor<'e>,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(executor)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// Apply an admin edit. Absent fields keep their current value.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                role = COALESCE($4, role)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.role.map(|r| r.as_str()))
            .fetch_optional(executor)
            .await
    }

    /// Activate or deactivate an account.
    pub async fn set_active<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET is_active = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(executor)
            .await
    }

    /// Replace the stored password hash. Returns `true` if the user existed.
    pub async fn set_password_hash<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active admins other than `excluding`.
    ///
    /// Locks every active admin row (in id order) for the rest of the
    /// transaction, so two concurrent demotions cannot both count the other
    /// admin as still active.
    pub async fn count_other_active_admins<'e>(
        executor: impl PgExecutor<'e>,
        excluding: DbId,
    ) -> Result<i64, sqlx::Error> {
        let ids: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM users
             WHERE role = 'admin' AND is_active = true
             ORDER BY id
             FOR UPDATE",
        )
        .fetch_all(executor)
        .await?;
        Ok(ids.iter().filter(|&&id| id != excluding).count() as i64)
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Total number of user accounts.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}
