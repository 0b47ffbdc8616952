//! Repository for the `cases` table.

use casebook_core::cases::{CaseSortKey, CaseStatus};
use casebook_core::paging::SortDirection;
use casebook_core::search::like_pattern;
use casebook_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::case::{Case, CaseSummary, CreateCase, UpdateCase};
use crate::repositories::{bind_values, bind_values_scalar, BindValue, FilterBuilder};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, company, position, interview_date, location, \
                       contact_person, contact_info, description, status, created_by, created_at";

/// Select list for [`CaseSummary`] rows (`c` = cases, `u` = creator).
const SUMMARY_SELECT: &str = "\
    SELECT c.id, c.name, c.company, c.position, c.interview_date, c.status, c.created_by, \
           u.username AS creator_name, \
           (SELECT COUNT(*) FROM questions q WHERE q.case_id = c.id) AS question_count, \
           c.created_at \
    FROM cases c \
    JOIN users u ON u.id = c.created_by";

/// Resolved filters for the case listing.
#[derive(Debug, Clone, Default)]
pub struct CaseListFilter {
    /// Substring matched against name, company and position.
    pub keyword: Option<String>,
    pub status: Option<CaseStatus>,
    pub created_by: Option<DbId>,
    pub sort: CaseSortKey,
    pub direction: SortDirection,
}

/// Provides CRUD and listing operations for cases.
pub struct CaseRepo;

impl CaseRepo {
    /// Insert a new case with status `active`, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        created_by: DbId,
        input: &CreateCase,
    ) -> Result<Case, sqlx::Error> {
        let query = format!(
            "INSERT INTO cases (name, company, position, interview_date, location, \
                                contact_person, contact_info, description, status, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Case>(&query)
            .bind(input.name.trim())
            .bind(&input.company)
            .bind(&input.position)
            .bind(input.interview_date)
            .bind(&input.location)
            .bind(&input.contact_person)
            .bind(&input.contact_info)
            .bind(&input.description)
            .bind(CaseStatus::Active.as_str())
            .bind(created_by)
            .fetch_one(executor)
            .await
    }

    /// Find a case by internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Case>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cases WHERE id = $1");
        sqlx::query_as::<_, Case>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Update a case. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateCase,
    ) -> Result<Option<Case>, sqlx::Error> {
        let query = format!(
            "UPDATE cases SET
                name = COALESCE($2, name),
                company = COALESCE($3, company),
                position = COALESCE($4, position),
                interview_date = COALESCE($5, interview_date),
                location = COALESCE($6, location),
                contact_person = COALESCE($7, contact_person),
                contact_info = COALESCE($8, contact_info),
                description = COALESCE($9, description),
                status = COALESCE($10, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Case>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.company)
            .bind(&input.position)
            .bind(input.interview_date)
            .bind(&input.location)
            .bind(&input.contact_person)
            .bind(&input.contact_info)
            .bind(&input.description)
            .bind(input.status.map(CaseStatus::as_str))
            .fetch_optional(executor)
            .await
    }

    /// Delete a case. Returns `true` if a row was removed.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cases WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Distinct non-empty positions across all cases, sorted.
    pub async fn list_positions(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT position FROM cases \
             WHERE position IS NOT NULL AND btrim(position) <> '' \
             ORDER BY position",
        )
        .fetch_all(pool)
        .await
    }

    /// One page of case summaries matching `filter`.
    pub async fn list(
        pool: &PgPool,
        filter: &CaseListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CaseSummary>, sqlx::Error> {
        let (where_clause, values) = build_case_filter(filter);
        let bind_idx = values.len() + 1;
        let order_by = filter.direction.order_by(filter.sort.column(), "c.id");

        let query = format!(
            "{SUMMARY_SELECT} {where_clause} \
             ORDER BY {order_by} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_values(sqlx::query_as::<_, CaseSummary>(&query), &values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count cases matching `filter`.
    pub async fn count(pool: &PgPool, filter: &CaseListFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, values) = build_case_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT FROM cases c {where_clause}");
        let q = bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &values);
        q.fetch_one(pool).await
    }
}

/// Build the WHERE clause for the case listing. Only references `c.*`.
fn build_case_filter(filter: &CaseListFilter) -> (String, Vec<BindValue>) {
    let mut builder = FilterBuilder::new();

    if let Some(pattern) = filter.keyword.as_deref().and_then(like_pattern) {
        builder.push(BindValue::Text(pattern), |p| {
            format!("(c.name ILIKE {p} OR c.company ILIKE {p} OR c.position ILIKE {p})")
        });
    }

    if let Some(status) = filter.status {
        builder.push(BindValue::Text(status.as_str().to_string()), |p| {
            format!("c.status = {p}")
        });
    }

    if let Some(created_by) = filter.created_by {
        builder.push(BindValue::BigInt(created_by), |p| format!("c.created_by = {p}"));
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_searches_name_company_and_position() {
        let filter = CaseListFilter {
            keyword: Some("acme".into()),
            ..Default::default()
        };
        let (clause, values) = build_case_filter(&filter);
        assert_eq!(
            clause,
            "WHERE (c.name ILIKE $1 OR c.company ILIKE $1 OR c.position ILIKE $1)"
        );
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn blank_keyword_is_ignored() {
        let filter = CaseListFilter {
            keyword: Some("   ".into()),
            ..Default::default()
        };
        let (clause, _) = build_case_filter(&filter);
        assert!(clause.is_empty());
    }

    #[test]
    fn status_and_creator_filters_follow_keyword() {
        let filter = CaseListFilter {
            keyword: Some("acme".into()),
            status: Some(CaseStatus::Completed),
            created_by: Some(3),
            ..Default::default()
        };
        let (clause, values) = build_case_filter(&filter);
        assert!(clause.ends_with("AND c.status = $2 AND c.created_by = $3"));
        assert_eq!(values.len(), 3);
    }
}
