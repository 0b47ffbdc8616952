//! Audit log entity models.
//!
//! Audit rows are append-only: there is no update DTO and no `updated_at`.

use casebook_core::audit::AuditAction;
use casebook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub description: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for inserting an audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub user_id: Option<DbId>,
    pub action: AuditAction,
    pub description: String,
    pub entity_type: Option<&'static str>,
    pub entity_id: Option<DbId>,
}

impl CreateAuditLog {
    /// Entry for an action by `user_id` on the given entity.
    pub fn new(
        user_id: DbId,
        action: AuditAction,
        entity_type: &'static str,
        entity_id: DbId,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            action,
            description: description.into(),
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
        }
    }
}

/// Filter parameters for querying audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub user_id: Option<DbId>,
    pub action: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One page of audit log entries with the total match count.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogPage {
    pub items: Vec<AuditLog>,
    pub total: i64,
}
