//! Audit log action names.
//!
//! Every state-changing operation appends one audit row with one of these
//! actions, in the same transaction as the change it records.

use crate::text_enum::text_enum;

text_enum! {
    /// A recorded mutation. Stored as the PascalCase action name.
    AuditAction ("audit action") {
        CreateCase => "CreateCase",
        UpdateCase => "UpdateCase",
        DeleteCase => "DeleteCase",
        CreateQuestion => "CreateQuestion",
        UpdateQuestion => "UpdateQuestion",
        DeleteQuestion => "DeleteQuestion",
        AddRevision => "AddRevision",
        DeleteRevision => "DeleteRevision",
        ApproveQuestion => "ApproveQuestion",
        CreateUser => "CreateUser",
        Register => "Register",
        UpdateUser => "UpdateUser",
        UpdateUserStatus => "UpdateUserStatus",
        ResetPassword => "ResetPassword",
        ChangePassword => "ChangePassword",
    }
}

/// Entity type recorded alongside case actions.
pub const ENTITY_CASE: &str = "case";
/// Entity type recorded alongside question actions.
pub const ENTITY_QUESTION: &str = "question";
/// Entity type recorded alongside revision actions.
pub const ENTITY_REVISION: &str = "question_revision";
/// Entity type recorded alongside user actions.
pub const ENTITY_USER: &str = "user";

/// Maximum characters of user-supplied text quoted in an audit description.
pub const MAX_QUOTED_LENGTH: usize = 120;

/// Truncate user text for inclusion in an audit description.
pub fn quote(text: &str) -> String {
    if text.chars().count() <= MAX_QUOTED_LENGTH {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_QUOTED_LENGTH).collect();
    out.push_str("...");
    out
}
