//! Repository for the `audit_logs` table.

use casebook_core::paging::{clamp_limit, clamp_offset};
use sqlx::{PgExecutor, PgPool};

use crate::models::audit::{AuditLog, AuditQuery, CreateAuditLog};
use crate::repositories::{bind_values, bind_values_scalar, BindValue, FilterBuilder};

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "id, user_id, action, description, entity_type, entity_id, created_at";

/// Default page size for audit log queries.
pub const DEFAULT_AUDIT_LIMIT: i64 = 50;

/// Upper bound on audit log page size.
pub const MAX_AUDIT_LIMIT: i64 = 500;

/// Provides append and query operations for audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one audit entry.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        entry: &CreateAuditLog,
    ) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs (user_id, action, description, entity_type, entity_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.user_id)
            .bind(entry.action.as_str())
            .bind(&entry.description)
            .bind(entry.entity_type)
            .bind(entry.entity_id)
            .fetch_one(executor)
            .await
    }

    /// Query audit logs with filtering and pagination, newest first.
    pub async fn query(pool: &PgPool, params: &AuditQuery) -> Result<Vec<AuditLog>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_AUDIT_LIMIT, MAX_AUDIT_LIMIT);
        let offset = clamp_offset(params.offset);

        let (where_clause, values) = build_audit_filter(params);
        let bind_idx = values.len() + 1;

        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_values(sqlx::query_as::<_, AuditLog>(&query), &values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count audit logs matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, values) = build_audit_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM audit_logs {where_clause}");
        let q = bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &values);
        q.fetch_one(pool).await
    }
}

/// Build a WHERE clause and bind values from `AuditQuery` filter parameters.
fn build_audit_filter(params: &AuditQuery) -> (String, Vec<BindValue>) {
    let mut filter = FilterBuilder::new();

    if let Some(user_id) = params.user_id {
        filter.push(BindValue::BigInt(user_id), |p| format!("user_id = {p}"));
    }

    if let Some(action) = params.action.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        filter.push(BindValue::Text(action.to_string()), |p| format!("action = {p}"));
    }

    filter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_yield_empty_where_clause() {
        let (clause, values) = build_audit_filter(&AuditQuery::default());
        assert!(clause.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn user_and_action_filters_are_combined() {
        let params = AuditQuery {
            user_id: Some(4),
            action: Some("ApproveQuestion".into()),
            ..Default::default()
        };
        let (clause, values) = build_audit_filter(&params);
        assert_eq!(clause, "WHERE user_id = $1 AND action = $2");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn blank_action_is_ignored() {
        let params = AuditQuery {
            action: Some("  ".into()),
            ..Default::default()
        };
        let (clause, _) = build_audit_filter(&params);
        assert!(clause.is_empty());
    }
}
