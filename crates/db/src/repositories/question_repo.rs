//! Repository for the `questions` table and the question listing query.

use casebook_core::access::QuestionScope;
use casebook_core::paging::SortDirection;
use casebook_core::questions::{QuestionSortKey, QuestionSource, QuestionStatus};
use casebook_core::search::like_pattern;
use casebook_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::case::CaseQuestionBrief;
use crate::models::question::{CreateQuestion, Question, QuestionHeader, QuestionListItem};
use crate::repositories::{bind_values, bind_values_scalar, BindValue, FilterBuilder};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, case_id, user_id, question_text, answer, source, status, created_at";

/// `FROM` clause shared by the listing, its count and the detail header.
const LISTING_FROM: &str = "\
    FROM questions q \
    JOIN cases c ON c.id = q.case_id \
    JOIN users u ON u.id = q.user_id";

/// Select list for [`QuestionListItem`] rows.
const LIST_ITEM_SELECT: &str = "\
    SELECT q.id, q.case_id, c.name AS case_name, c.company AS company_name, c.position, \
           q.user_id, u.username, q.question_text, q.source, q.status, \
           (SELECT COUNT(*) FROM question_revisions r WHERE r.question_id = q.id) AS revision_count, \
           q.created_at";

/// Resolved filters for the question listing.
///
/// Everything here is evaluated in SQL. The multi-position filter is applied
/// afterwards by the caller.
#[derive(Debug, Clone)]
pub struct QuestionListFilter {
    /// Substring matched against question text and answer.
    pub keyword: Option<String>,
    pub case_id: Option<DbId>,
    pub source: Option<QuestionSource>,
    pub status: Option<QuestionStatus>,
    pub user_id: Option<DbId>,
    pub scope: QuestionScope,
    pub sort: QuestionSortKey,
    pub direction: SortDirection,
}

impl QuestionListFilter {
    /// A filter with no predicates other than `scope`.
    pub fn scoped(scope: QuestionScope) -> Self {
        Self {
            keyword: None,
            case_id: None,
            source: None,
            status: None,
            user_id: None,
            scope,
            sort: QuestionSortKey::default(),
            direction: SortDirection::default(),
        }
    }
}

/// Provides CRUD and listing operations for questions.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Insert a new question, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        input: &CreateQuestion,
        answer: Option<&str>,
        status: QuestionStatus,
    ) -> Result<Question, sqlx::Error> {
        let query = format!(
            "INSERT INTO questions (case_id, user_id, question_text, answer, source, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(input.case_id)
            .bind(user_id)
            .bind(&input.question_text)
            .bind(answer)
            .bind(input.source.as_str())
            .bind(status.as_str())
            .fetch_one(executor)
            .await
    }

    /// Find a question by internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions WHERE id = $1");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a question joined with its case and author.
    pub async fn find_header<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<QuestionHeader>, sqlx::Error> {
        let query = format!(
            "SELECT q.id, q.case_id, c.name AS case_name, c.company AS company_name, c.position, \
                    q.user_id, u.username, q.question_text, q.answer, q.source, q.status, \
                    q.created_at \
             {LISTING_FROM} \
             WHERE q.id = $1"
        );
        sqlx::query_as::<_, QuestionHeader>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Overwrite the text and/or answer. `None` keeps the current value.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        question_text: Option<&str>,
        answer: Option<&str>,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "UPDATE questions SET
                question_text = COALESCE($2, question_text),
                answer = COALESCE($3, answer)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(question_text)
            .bind(answer)
            .fetch_optional(executor)
            .await
    }

    /// Replace the answer. Returns `true` if the row was updated.
    pub async fn set_answer<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        answer: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE questions SET answer = $2 WHERE id = $1")
            .bind(id)
            .bind(answer)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the moderation status, returning the updated row.
    pub async fn set_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        status: QuestionStatus,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("UPDATE questions SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Delete a question. Returns `true` if a row was removed.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of questions attached to a case.
    pub async fn count_by_case<'e>(
        executor: impl PgExecutor<'e>,
        case_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions WHERE case_id = $1")
            .bind(case_id)
            .fetch_one(executor)
            .await
    }

    /// Questions of a case visible under `scope`, newest first.
    pub async fn list_briefs_for_case(
        pool: &PgPool,
        case_id: DbId,
        scope: QuestionScope,
    ) -> Result<Vec<CaseQuestionBrief>, sqlx::Error> {
        let mut filter = QuestionListFilter::scoped(scope);
        filter.case_id = Some(case_id);
        let (where_clause, values) = build_question_filter(&filter);

        let query = format!(
            "SELECT q.id, q.user_id, u.username, q.question_text, q.status, q.created_at \
             {LISTING_FROM} {where_clause} \
             ORDER BY q.created_at DESC, q.id DESC"
        );
        bind_values(sqlx::query_as::<_, CaseQuestionBrief>(&query), &values)
            .fetch_all(pool)
            .await
    }

    /// Sorted listing rows matching `filter`.
    ///
    /// `page` is `(limit, offset)`; `None` returns every matching row.
    pub async fn list(
        pool: &PgPool,
        filter: &QuestionListFilter,
        page: Option<(i64, i64)>,
    ) -> Result<Vec<QuestionListItem>, sqlx::Error> {
        let (where_clause, values) = build_question_filter(filter);
        let order_by = filter.direction.order_by(filter.sort.column(), "q.id");

        let mut query = format!(
            "{LIST_ITEM_SELECT} {LISTING_FROM} {where_clause} ORDER BY {order_by}"
        );

        match page {
            Some((limit, offset)) => {
                let bind_idx = values.len() + 1;
                query.push_str(&format!(" LIMIT ${bind_idx} OFFSET ${}", bind_idx + 1));
                bind_values(sqlx::query_as::<_, QuestionListItem>(&query), &values)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                bind_values(sqlx::query_as::<_, QuestionListItem>(&query), &values)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Count questions matching `filter`.
    pub async fn count(pool: &PgPool, filter: &QuestionListFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, values) = build_question_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT {LISTING_FROM} {where_clause}");
        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &values)
            .fetch_one(pool)
            .await
    }
}

/// Build the WHERE clause for the question listing.
///
/// Predicates are added in a fixed order: keyword, exact filters, then the
/// role scope.
fn build_question_filter(filter: &QuestionListFilter) -> (String, Vec<BindValue>) {
    let mut builder = FilterBuilder::new();

    if let Some(pattern) = filter.keyword.as_deref().and_then(like_pattern) {
        builder.push(BindValue::Text(pattern), |p| {
            format!("(q.question_text ILIKE {p} OR q.answer ILIKE {p})")
        });
    }

    if let Some(case_id) = filter.case_id {
        builder.push(BindValue::BigInt(case_id), |p| format!("q.case_id = {p}"));
    }

    if let Some(source) = filter.source {
        builder.push(BindValue::Text(source.as_str().to_string()), |p| {
            format!("q.source = {p}")
        });
    }

    if let Some(status) = filter.status {
        builder.push(BindValue::Text(status.as_str().to_string()), |p| {
            format!("q.status = {p}")
        });
    }

    if let Some(user_id) = filter.user_id {
        builder.push(BindValue::BigInt(user_id), |p| format!("q.user_id = {p}"));
    }

    if let QuestionScope::OwnOrApproved(viewer_id) = filter.scope {
        builder.push(BindValue::BigInt(viewer_id), |p| {
            format!("(q.user_id = {p} OR q.status = 'approved')")
        });
    }

    builder.finish()
}
