//! Question revision models.

use casebook_core::questions::RevisionType;
use casebook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `question_revisions` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionRevision {
    pub id: DbId,
    pub question_id: DbId,
    pub user_id: DbId,
    pub revision_text: String,
    #[sqlx(try_from = "String")]
    pub revision_type: RevisionType,
    pub comments: Option<String>,
    pub created_at: Timestamp,
}

/// Insert parameters for a revision row.
#[derive(Debug, Clone)]
pub struct NewRevision<'a> {
    pub question_id: DbId,
    pub user_id: DbId,
    pub revision_text: &'a str,
    pub revision_type: RevisionType,
    pub comments: Option<&'a str>,
}

/// DTO for the add-revision action. The type defaults to a teacher comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRevision {
    pub revision_text: String,
    #[serde(default)]
    pub revision_type: RevisionType,
    pub comments: Option<String>,
}

/// A revision joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RevisionView {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub revision_text: String,
    #[sqlx(try_from = "String")]
    pub revision_type: RevisionType,
    pub comments: Option<String>,
    pub created_at: Timestamp,
}
