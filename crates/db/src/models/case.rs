//! Interview case models, DTOs and listing parameters.

use casebook_core::cases::CaseStatus;
use casebook_core::questions::QuestionStatus;
use casebook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `cases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Case {
    pub id: DbId,
    pub name: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub interview_date: Option<Timestamp>,
    pub location: Option<String>,
    pub contact_person: Option<String>,
    pub contact_info: Option<String>,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: CaseStatus,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a case. New cases always start `active`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCase {
    pub name: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub interview_date: Option<Timestamp>,
    pub location: Option<String>,
    pub contact_person: Option<String>,
    pub contact_info: Option<String>,
    pub description: Option<String>,
}

/// DTO for updating a case. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCase {
    pub name: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub interview_date: Option<Timestamp>,
    pub location: Option<String>,
    pub contact_person: Option<String>,
    pub contact_info: Option<String>,
    pub description: Option<String>,
    pub status: Option<CaseStatus>,
}

/// A case in a listing, with its creator and question count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseSummary {
    pub id: DbId,
    pub name: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub interview_date: Option<Timestamp>,
    #[sqlx(try_from = "String")]
    pub status: CaseStatus,
    pub created_by: DbId,
    pub creator_name: String,
    pub question_count: i64,
    pub created_at: Timestamp,
}

/// A question as shown on its case's detail page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseQuestionBrief {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub question_text: String,
    #[sqlx(try_from = "String")]
    pub status: QuestionStatus,
    pub created_at: Timestamp,
}

/// A case with its creator and the questions the viewer may see.
#[derive(Debug, Clone, Serialize)]
pub struct CaseDetail {
    #[serde(flatten)]
    pub case: Case,
    pub creator_name: String,
    pub questions: Vec<CaseQuestionBrief>,
}

/// Filter, sort and paging parameters for the case listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseQuery {
    pub keyword: Option<String>,
    pub status: Option<CaseStatus>,
    /// Restrict to the caller's own cases. Only honoured for students.
    pub only_mine: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
