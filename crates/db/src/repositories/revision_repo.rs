//! Repository for the `question_revisions` table.

use casebook_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::revision::{NewRevision, QuestionRevision, RevisionView};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, question_id, user_id, revision_text, revision_type, comments, created_at";

/// Provides append, lookup and delete operations for revisions.
///
/// Revisions are never updated in place.
pub struct RevisionRepo;

impl RevisionRepo {
    /// Append a revision, returning the created row.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        input: &NewRevision<'_>,
    ) -> Result<QuestionRevision, sqlx::Error> {
        let query = format!(
            "INSERT INTO question_revisions (question_id, user_id, revision_text, revision_type, comments)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuestionRevision>(&query)
            .bind(input.question_id)
            .bind(input.user_id)
            .bind(input.revision_text)
            .bind(input.revision_type.as_str())
            .bind(input.comments)
            .fetch_one(executor)
            .await
    }

    /// Find a revision by ID, scoped to its parent question.
    pub async fn find_in_question<'e>(
        executor: impl PgExecutor<'e>,
        question_id: DbId,
        revision_id: DbId,
    ) -> Result<Option<QuestionRevision>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM question_revisions WHERE id = $1 AND question_id = $2");
        sqlx::query_as::<_, QuestionRevision>(&query)
            .bind(revision_id)
            .bind(question_id)
            .fetch_optional(executor)
            .await
    }

    /// Revisions of a question with author names, newest first.
    ///
    /// Rows written in one transaction share `created_at`, so ties fall back
    /// to the id.
    pub async fn list_for_question<'e>(
        executor: impl PgExecutor<'e>,
        question_id: DbId,
    ) -> Result<Vec<RevisionView>, sqlx::Error> {
        sqlx::query_as::<_, RevisionView>(
            "SELECT r.id, r.user_id, u.username, r.revision_text, r.revision_type, \
                    r.comments, r.created_at \
             FROM question_revisions r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.question_id = $1 \
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(question_id)
        .fetch_all(executor)
        .await
    }

    /// Delete one revision. Returns `true` if a row was removed.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM question_revisions WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every revision of a question, returning how many were removed.
    pub async fn delete_for_question<'e>(
        executor: impl PgExecutor<'e>,
        question_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM question_revisions WHERE question_id = $1")
            .bind(question_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
