//! Access policy for cases, questions and revisions.
//!
//! Every function here is a pure decision over an [`Actor`] and the
//! ownership/status facts of a resource. Stores call the `ensure_*` variants
//! at the top of each mutation, so a visibility check elsewhere never implies
//! edit rights.

use crate::error::CoreError;
use crate::questions::{QuestionStatus, RevisionType};
use crate::roles::Role;
use crate::types::DbId;

/// The authenticated identity an operation runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// Which questions an actor may see in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionScope {
    /// Every question regardless of author or status.
    All,
    /// Questions authored by this user, plus every approved question.
    OwnOrApproved(DbId),
}

/// Listing scope for the actor.
pub fn question_scope(actor: &Actor) -> QuestionScope {
    match actor.role {
        Role::Student => QuestionScope::OwnOrApproved(actor.user_id),
        Role::Teacher | Role::Admin => QuestionScope::All,
    }
}

/// Whether the actor may see a question with the given author and status.
pub fn can_view_question(actor: &Actor, author_id: DbId, status: QuestionStatus) -> bool {
    match question_scope(actor) {
        QuestionScope::All => true,
        QuestionScope::OwnOrApproved(user_id) => {
            author_id == user_id || status == QuestionStatus::Approved
        }
    }
}

/// Students may only modify what they own; teachers and admins modify anything.
fn can_modify_owned(actor: &Actor, owner_id: DbId) -> bool {
    actor.is_staff() || actor.user_id == owner_id
}

pub fn can_edit_case(actor: &Actor, creator_id: DbId) -> bool {
    can_modify_owned(actor, creator_id)
}

pub fn can_edit_question(actor: &Actor, author_id: DbId) -> bool {
    can_modify_owned(actor, author_id)
}

/// Approval and the pending queue are reserved for teachers and admins.
pub fn can_review(actor: &Actor) -> bool {
    actor.is_staff()
}

/// Whether the actor may record a revision of the given type.
///
/// Any authenticated user may submit an answer; teacher edits and comments
/// are reserved for teachers and admins.
pub fn can_add_revision(actor: &Actor, revision_type: RevisionType) -> bool {
    !revision_type.requires_staff() || actor.is_staff()
}

/// Only teachers and admins may delete revisions, and only their own.
pub fn can_delete_revision(actor: &Actor, revision_author_id: DbId) -> bool {
    actor.is_staff() && actor.user_id == revision_author_id
}

pub fn ensure_can_view_question(
    actor: &Actor,
    author_id: DbId,
    status: QuestionStatus,
) -> Result<(), CoreError> {
    if can_view_question(actor, author_id, status) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "You do not have permission to view this question".into(),
        ))
    }
}

pub fn ensure_can_edit_case(actor: &Actor, creator_id: DbId) -> Result<(), CoreError> {
    if can_edit_case(actor, creator_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the creator, a teacher or an admin may modify this case".into(),
        ))
    }
}

pub fn ensure_can_edit_question(actor: &Actor, author_id: DbId) -> Result<(), CoreError> {
    if can_edit_question(actor, author_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the author, a teacher or an admin may modify this question".into(),
        ))
    }
}

pub fn ensure_can_review(actor: &Actor) -> Result<(), CoreError> {
    if can_review(actor) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Teacher or Admin role required".into(),
        ))
    }
}

pub fn ensure_can_add_revision(
    actor: &Actor,
    revision_type: RevisionType,
) -> Result<(), CoreError> {
    if can_add_revision(actor, revision_type) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Only teachers and admins may add '{revision_type}' revisions"
        )))
    }
}

pub fn ensure_can_delete_revision(
    actor: &Actor,
    revision_author_id: DbId,
) -> Result<(), CoreError> {
    if !actor.is_staff() {
        return Err(CoreError::Forbidden(
            "Teacher or Admin role required to delete revisions".into(),
        ));
    }
    if actor.user_id != revision_author_id {
        return Err(CoreError::Forbidden(
            "You can only delete your own revisions".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const STUDENT: Actor = Actor { user_id: 1, role: Role::Student };
    const OTHER_STUDENT: Actor = Actor { user_id: 2, role: Role::Student };
    const TEACHER: Actor = Actor { user_id: 10, role: Role::Teacher };
    const ADMIN: Actor = Actor { user_id: 20, role: Role::Admin };

    #[test]
    fn student_sees_own_questions_in_any_status() {
        for status in QuestionStatus::ALL {
            assert!(can_view_question(&STUDENT, STUDENT.user_id, *status));
        }
    }

    #[test]
    fn student_sees_others_questions_only_when_approved() {
        assert!(can_view_question(&STUDENT, OTHER_STUDENT.user_id, QuestionStatus::Approved));
        assert!(!can_view_question(&STUDENT, OTHER_STUDENT.user_id, QuestionStatus::Pending));
        assert!(!can_view_question(&STUDENT, OTHER_STUDENT.user_id, QuestionStatus::Rejected));
    }

    #[test]
    fn staff_see_everything() {
        for status in QuestionStatus::ALL {
            assert!(can_view_question(&TEACHER, STUDENT.user_id, *status));
            assert!(can_view_question(&ADMIN, STUDENT.user_id, *status));
        }
        assert_eq!(question_scope(&TEACHER), QuestionScope::All);
        assert_eq!(question_scope(&STUDENT), QuestionScope::OwnOrApproved(1));
    }

    #[test]
    fn students_edit_only_their_own_resources() {
        assert!(can_edit_case(&STUDENT, STUDENT.user_id));
        assert!(!can_edit_case(&STUDENT, OTHER_STUDENT.user_id));
        assert!(can_edit_question(&STUDENT, STUDENT.user_id));
        assert_matches!(
            ensure_can_edit_question(&STUDENT, OTHER_STUDENT.user_id),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn staff_edit_any_resource() {
        assert!(can_edit_case(&TEACHER, STUDENT.user_id));
        assert!(can_edit_question(&ADMIN, STUDENT.user_id));
    }

    #[test]
    fn students_may_only_add_answer_revisions() {
        assert!(can_add_revision(&STUDENT, RevisionType::Answer));
        assert!(!can_add_revision(&STUDENT, RevisionType::TeacherEdit));
        assert!(!can_add_revision(&STUDENT, RevisionType::TeacherComment));
        for revision_type in RevisionType::ALL {
            assert!(can_add_revision(&TEACHER, *revision_type));
            assert!(can_add_revision(&ADMIN, *revision_type));
        }
    }

    #[test]
    fn revision_deletion_matrix() {
        // Only staff deleting their own revision succeeds.
        assert!(ensure_can_delete_revision(&TEACHER, TEACHER.user_id).is_ok());
        assert!(ensure_can_delete_revision(&ADMIN, ADMIN.user_id).is_ok());

        assert_matches!(
            ensure_can_delete_revision(&TEACHER, ADMIN.user_id),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            ensure_can_delete_revision(&ADMIN, TEACHER.user_id),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            ensure_can_delete_revision(&STUDENT, STUDENT.user_id),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn only_staff_review() {
        assert!(!can_review(&STUDENT));
        assert!(can_review(&TEACHER));
        assert!(can_review(&ADMIN));
        assert_matches!(ensure_can_review(&STUDENT), Err(CoreError::Forbidden(_)));
    }
}
