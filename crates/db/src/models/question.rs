//! Question models, DTOs and listing parameters.

use casebook_core::questions::{QuestionSource, QuestionStatus};
use casebook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::revision::RevisionView;

/// A row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub case_id: DbId,
    pub user_id: DbId,
    pub question_text: String,
    pub answer: Option<String>,
    #[sqlx(try_from = "String")]
    pub source: QuestionSource,
    #[sqlx(try_from = "String")]
    pub status: QuestionStatus,
    pub created_at: Timestamp,
}

/// DTO for creating a question.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestion {
    pub case_id: DbId,
    pub question_text: String,
    pub answer: Option<String>,
    #[serde(default)]
    pub source: QuestionSource,
}

/// DTO for updating a question's text and answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuestion {
    pub question_text: Option<String>,
    pub answer: Option<String>,
    /// Overwrite the answer without recording an "answer updated" revision.
    #[serde(default)]
    pub skip_revision: bool,
}

/// DTO for the approval action.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveQuestion {
    pub status: QuestionStatus,
    pub comments: Option<String>,
}

/// A question in a listing, joined with its case and author.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionListItem {
    pub id: DbId,
    pub case_id: DbId,
    pub case_name: String,
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub user_id: DbId,
    pub username: String,
    pub question_text: String,
    #[sqlx(try_from = "String")]
    pub source: QuestionSource,
    #[sqlx(try_from = "String")]
    pub status: QuestionStatus,
    pub revision_count: i64,
    pub created_at: Timestamp,
}

/// Question header row used to build [`QuestionDetail`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionHeader {
    pub id: DbId,
    pub case_id: DbId,
    pub case_name: String,
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub user_id: DbId,
    pub username: String,
    pub question_text: String,
    pub answer: Option<String>,
    #[sqlx(try_from = "String")]
    pub source: QuestionSource,
    #[sqlx(try_from = "String")]
    pub status: QuestionStatus,
    pub created_at: Timestamp,
}

/// A question with its case context and full revision history.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: QuestionHeader,
    pub revisions: Vec<RevisionView>,
}

/// Filter, sort and paging parameters for the question listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionQuery {
    pub case_id: Option<DbId>,
    pub keyword: Option<String>,
    pub source: Option<QuestionSource>,
    pub status: Option<QuestionStatus>,
    pub user_id: Option<DbId>,
    /// Comma-separated position tokens, matched as substrings (OR).
    pub position: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
