//! Question moderation rules.
//!
//! Statuses are a flat, freely re-assignable field: approval is an explicit
//! action and is never inferred from revision content. What this module does
//! own is the set of rules that decide which revisions a mutation records and
//! when a question's answer is overwritten.

use crate::error::CoreError;
use crate::roles::Role;
use crate::text_enum::text_enum;

/// Comment attached to the revision recorded for an answer given at creation.
pub const CREATOR_ANSWER_COMMENT: &str = "creator answer";

/// Comment attached to the revision recorded when an update changes the answer.
pub const ANSWER_UPDATED_COMMENT: &str = "answer updated";

/// Maximum length of question text in characters.
pub const MAX_QUESTION_TEXT_LENGTH: usize = 5_000;

text_enum! {
    /// Moderation status of a question.
    QuestionStatus ("question status") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

text_enum! {
    /// Where a question came from.
    QuestionSource ("question source") {
        Personal => "personal",
        Company => "company",
    }
}

impl Default for QuestionSource {
    fn default() -> Self {
        QuestionSource::Personal
    }
}

text_enum! {
    /// Kind of entry in a question's revision history.
    RevisionType ("revision type") {
        Answer => "answer",
        TeacherEdit => "teacher_edit",
        TeacherComment => "teacher_comment",
    }
}

impl RevisionType {
    /// Whether recording this revision replaces the question's current answer.
    pub fn overwrites_answer(self) -> bool {
        matches!(self, RevisionType::Answer | RevisionType::TeacherEdit)
    }

    /// Whether only teachers and admins may record this revision type.
    pub fn requires_staff(self) -> bool {
        matches!(self, RevisionType::TeacherEdit | RevisionType::TeacherComment)
    }

    /// The type recorded when `role` changes an answer through a question update.
    pub fn for_answer_update(role: Role) -> Self {
        if role == Role::Teacher {
            RevisionType::TeacherEdit
        } else {
            RevisionType::Answer
        }
    }
}

impl Default for RevisionType {
    fn default() -> Self {
        RevisionType::TeacherComment
    }
}

text_enum! {
    /// Sort keys accepted by the question listing.
    QuestionSortKey ("question sort key") {
        CreatedAt => "created_at",
        QuestionText => "question_text",
        Username => "username",
        CaseName => "case_name",
        CompanyName => "company_name",
    }
}

impl Default for QuestionSortKey {
    fn default() -> Self {
        QuestionSortKey::CreatedAt
    }
}

impl QuestionSortKey {
    /// Resolve a user-supplied sort key, falling back to `created_at`.
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return QuestionSortKey::CreatedAt;
        };
        match raw.trim().to_ascii_lowercase().replace('_', "").as_str() {
            "questiontext" | "question" => QuestionSortKey::QuestionText,
            "username" | "author" => QuestionSortKey::Username,
            "casename" => QuestionSortKey::CaseName,
            "companyname" | "company" => QuestionSortKey::CompanyName,
            _ => QuestionSortKey::CreatedAt,
        }
    }

    /// Column expression used in `ORDER BY` (aliases from the question listing query).
    pub fn column(self) -> &'static str {
        match self {
            QuestionSortKey::CreatedAt => "q.created_at",
            QuestionSortKey::QuestionText => "q.question_text",
            QuestionSortKey::Username => "u.username",
            QuestionSortKey::CaseName => "c.name",
            QuestionSortKey::CompanyName => "c.company",
        }
    }
}

/// Status assigned to a freshly created question.
///
/// Student submissions wait for review; teachers and admins are trusted.
pub fn initial_status(author_role: Role) -> QuestionStatus {
    match author_role {
        Role::Student => QuestionStatus::Pending,
        Role::Teacher | Role::Admin => QuestionStatus::Approved,
    }
}

/// Validate question text: non-blank and within the length limit.
pub fn validate_question_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Question text is required".to_string()));
    }
    if text.chars().count() > MAX_QUESTION_TEXT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Question text exceeds maximum length of {MAX_QUESTION_TEXT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate revision text: must be non-empty.
pub fn validate_revision_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Revision text is required".to_string()));
    }
    Ok(())
}

/// Outcome of applying an answer patch to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerChange {
    /// Nothing supplied, empty, or identical to the current answer.
    Unchanged,
    /// Overwrite the answer; optionally record a revision of the given type.
    Replace {
        answer: String,
        revision: Option<RevisionType>,
    },
}

/// Decide what an update's `answer` field does to a question.
///
/// `skip_revision` is set by callers that already recorded the change as a
/// revision and only need the answer column brought in line.
pub fn plan_answer_update(
    current: Option<&str>,
    proposed: Option<&str>,
    editor_role: Role,
    skip_revision: bool,
) -> AnswerChange {
    let Some(proposed) = proposed.filter(|a| !a.is_empty()) else {
        return AnswerChange::Unchanged;
    };
    if current == Some(proposed) {
        return AnswerChange::Unchanged;
    }
    AnswerChange::Replace {
        answer: proposed.to_string(),
        revision: (!skip_revision).then(|| RevisionType::for_answer_update(editor_role)),
    }
}

/// Normalize an optional comment: blank comments count as absent.
pub fn non_blank(comment: Option<&str>) -> Option<&str> {
    comment.filter(|c| !c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn students_start_pending_and_staff_start_approved() {
        assert_eq!(initial_status(Role::Student), QuestionStatus::Pending);
        assert_eq!(initial_status(Role::Teacher), QuestionStatus::Approved);
        assert_eq!(initial_status(Role::Admin), QuestionStatus::Approved);
    }

    #[test]
    fn answer_and_teacher_edit_overwrite_the_answer() {
        assert!(RevisionType::Answer.overwrites_answer());
        assert!(RevisionType::TeacherEdit.overwrites_answer());
        assert!(!RevisionType::TeacherComment.overwrites_answer());
    }

    #[test]
    fn teacher_revision_types_require_staff() {
        assert!(!RevisionType::Answer.requires_staff());
        assert!(RevisionType::TeacherEdit.requires_staff());
        assert!(RevisionType::TeacherComment.requires_staff());
    }

    #[test]
    fn answer_update_type_depends_on_editor_role() {
        assert_eq!(
            RevisionType::for_answer_update(Role::Teacher),
            RevisionType::TeacherEdit
        );
        assert_eq!(
            RevisionType::for_answer_update(Role::Student),
            RevisionType::Answer
        );
        assert_eq!(
            RevisionType::for_answer_update(Role::Admin),
            RevisionType::Answer
        );
    }

    #[test]
    fn missing_or_empty_answer_leaves_question_unchanged() {
        assert_eq!(
            plan_answer_update(Some("draft"), None, Role::Student, false),
            AnswerChange::Unchanged
        );
        assert_eq!(
            plan_answer_update(Some("draft"), Some(""), Role::Student, false),
            AnswerChange::Unchanged
        );
    }

    #[test]
    fn identical_answer_is_not_recorded() {
        assert_eq!(
            plan_answer_update(Some("draft"), Some("draft"), Role::Teacher, false),
            AnswerChange::Unchanged
        );
    }

    #[test]
    fn changed_answer_records_a_revision() {
        assert_eq!(
            plan_answer_update(Some("draft"), Some("refined"), Role::Teacher, false),
            AnswerChange::Replace {
                answer: "refined".to_string(),
                revision: Some(RevisionType::TeacherEdit),
            }
        );
        assert_eq!(
            plan_answer_update(None, Some("first"), Role::Student, false),
            AnswerChange::Replace {
                answer: "first".to_string(),
                revision: Some(RevisionType::Answer),
            }
        );
    }

    #[test]
    fn skip_revision_still_replaces_the_answer() {
        assert_eq!(
            plan_answer_update(Some("draft"), Some("refined"), Role::Teacher, true),
            AnswerChange::Replace {
                answer: "refined".to_string(),
                revision: None,
            }
        );
    }

    #[test]
    fn sort_key_resolution() {
        assert_eq!(QuestionSortKey::resolve(None), QuestionSortKey::CreatedAt);
        assert_eq!(
            QuestionSortKey::resolve(Some("QuestionText")),
            QuestionSortKey::QuestionText
        );
        assert_eq!(
            QuestionSortKey::resolve(Some("username")),
            QuestionSortKey::Username
        );
        assert_eq!(
            QuestionSortKey::resolve(Some("case_name")),
            QuestionSortKey::CaseName
        );
        assert_eq!(
            QuestionSortKey::resolve(Some("companyName")),
            QuestionSortKey::CompanyName
        );
        assert_eq!(
            QuestionSortKey::resolve(Some("nonsense")),
            QuestionSortKey::CreatedAt
        );
    }

    #[test]
    fn revision_type_parses_snake_case() {
        assert_eq!(
            "teacher_edit".parse::<RevisionType>().unwrap(),
            RevisionType::TeacherEdit
        );
        assert_matches!("edit".parse::<RevisionType>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_question_text_is_rejected() {
        assert_matches!(validate_question_text(" \n"), Err(CoreError::Validation(_)));
        assert!(validate_question_text("What is OOP?").is_ok());
    }

    #[test]
    fn blank_comments_count_as_absent() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some("good")), Some("good"));
        assert_eq!(non_blank(None), None);
    }
}
