//! Question store: the moderation workflow over questions and revisions.

use casebook_core::access::{
    ensure_can_add_revision, ensure_can_delete_revision, ensure_can_edit_question,
    ensure_can_review, ensure_can_view_question, question_scope, Actor,
};
use casebook_core::audit::{quote, AuditAction, ENTITY_CASE, ENTITY_QUESTION, ENTITY_REVISION};
use casebook_core::error::CoreError;
use casebook_core::paging::{Page, PageRequest, SortDirection};
use casebook_core::questions::{
    initial_status, non_blank, plan_answer_update, validate_question_text,
    validate_revision_text, AnswerChange, QuestionSortKey, QuestionStatus, RevisionType,
    ANSWER_UPDATED_COMMENT, CREATOR_ANSWER_COMMENT,
};
use casebook_core::search::{matches_any_position, parse_position_tokens};
use casebook_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::StoreError;
use crate::models::audit::CreateAuditLog;
use crate::models::question::{
    ApproveQuestion, CreateQuestion, Question, QuestionDetail, QuestionListItem, QuestionQuery,
    UpdateQuestion,
};
use crate::models::revision::{CreateRevision, NewRevision, QuestionRevision, RevisionView};
use crate::repositories::question_repo::QuestionListFilter;
use crate::repositories::{AuditLogRepo, CaseRepo, QuestionRepo, RevisionRepo};

fn question_not_found(id: DbId) -> StoreError {
    CoreError::NotFound {
        entity: ENTITY_QUESTION,
        id,
    }
    .into()
}

/// Load a question inside the transaction or fail with `NotFound`.
async fn load_question(conn: &mut PgConnection, id: DbId) -> Result<Question, StoreError> {
    QuestionRepo::find_by_id(conn, id)
        .await?
        .ok_or_else(|| question_not_found(id))
}

pub struct QuestionStore;

impl QuestionStore {
    /// Create a question on an existing case.
    ///
    /// Students' questions start `pending`; staff questions start `approved`.
    /// A non-empty answer is also recorded as the first `answer` revision.
    pub async fn create(
        pool: &PgPool,
        actor: &Actor,
        input: &CreateQuestion,
    ) -> Result<Question, StoreError> {
        validate_question_text(&input.question_text)?;
        let answer = input.answer.as_deref().filter(|a| !a.is_empty());

        let mut tx = pool.begin().await?;

        if CaseRepo::find_by_id(&mut *tx, input.case_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: ENTITY_CASE,
                id: input.case_id,
            }
            .into());
        }

        let question = QuestionRepo::create(
            &mut *tx,
            actor.user_id,
            input,
            answer,
            initial_status(actor.role),
        )
        .await?;

        if let Some(answer) = answer {
            RevisionRepo::insert(
                &mut *tx,
                &NewRevision {
                    question_id: question.id,
                    user_id: actor.user_id,
                    revision_text: answer,
                    revision_type: RevisionType::Answer,
                    comments: Some(CREATOR_ANSWER_COMMENT),
                },
            )
            .await?;
        }

        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                actor.user_id,
                AuditAction::CreateQuestion,
                ENTITY_QUESTION,
                question.id,
                format!("Created question '{}'", quote(&question.question_text)),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            user_id = actor.user_id,
            question_id = question.id,
            case_id = question.case_id,
            status = %question.status,
            "Question created",
        );
        Ok(question)
    }

    /// Update the text and/or answer of a question.
    ///
    /// A changed answer is recorded as a revision unless `skip_revision` is set.
    pub async fn update(
        pool: &PgPool,
        actor: &Actor,
        question_id: DbId,
        input: &UpdateQuestion,
    ) -> Result<Question, StoreError> {
        let mut tx = pool.begin().await?;

        let existing = load_question(&mut tx, question_id).await?;
        ensure_can_edit_question(actor, existing.user_id)?;

        let question_text = input
            .question_text
            .as_deref()
            .filter(|t| !t.trim().is_empty());
        if let Some(text) = question_text {
            validate_question_text(text)?;
        }

        let change = plan_answer_update(
            existing.answer.as_deref(),
            input.answer.as_deref(),
            actor.role,
            input.skip_revision,
        );
        let (new_answer, revision_type) = match &change {
            AnswerChange::Unchanged => (None, None),
            AnswerChange::Replace { answer, revision } => (Some(answer.as_str()), *revision),
        };

        let question = QuestionRepo::update(&mut *tx, question_id, question_text, new_answer)
            .await?
            .ok_or_else(|| question_not_found(question_id))?;

        if let (Some(answer), Some(revision_type)) = (new_answer, revision_type) {
            RevisionRepo::insert(
                &mut *tx,
                &NewRevision {
                    question_id,
                    user_id: actor.user_id,
                    revision_text: answer,
                    revision_type,
                    comments: Some(ANSWER_UPDATED_COMMENT),
                },
            )
            .await?;
        }

        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                actor.user_id,
                AuditAction::UpdateQuestion,
                ENTITY_QUESTION,
                question_id,
                format!("Updated question '{}'", quote(&question.question_text)),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = actor.user_id, question_id, "Question updated");
        Ok(question)
    }

    /// Delete a question together with its revisions.
    pub async fn delete(
        pool: &PgPool,
        actor: &Actor,
        question_id: DbId,
    ) -> Result<(), StoreError> {
        let mut tx = pool.begin().await?;

        let existing = load_question(&mut tx, question_id).await?;
        ensure_can_edit_question(actor, existing.user_id)?;

        let removed = RevisionRepo::delete_for_question(&mut *tx, question_id).await?;
        QuestionRepo::delete(&mut *tx, question_id).await?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                actor.user_id,
                AuditAction::DeleteQuestion,
                ENTITY_QUESTION,
                question_id,
                format!("Deleted question '{}'", quote(&existing.question_text)),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            user_id = actor.user_id,
            question_id,
            revisions_removed = removed,
            "Question deleted",
        );
        Ok(())
    }

    /// Append a revision to a visible question.
    ///
    /// `answer` and `teacher_edit` revisions also become the question's answer.
    pub async fn add_revision(
        pool: &PgPool,
        actor: &Actor,
        question_id: DbId,
        input: &CreateRevision,
    ) -> Result<QuestionRevision, StoreError> {
        validate_revision_text(&input.revision_text)?;

        let mut tx = pool.begin().await?;

        let question = load_question(&mut tx, question_id).await?;
        ensure_can_view_question(actor, question.user_id, question.status)?;
        ensure_can_add_revision(actor, input.revision_type)?;

        let revision = RevisionRepo::insert(
            &mut *tx,
            &NewRevision {
                question_id,
                user_id: actor.user_id,
                revision_text: &input.revision_text,
                revision_type: input.revision_type,
                comments: non_blank(input.comments.as_deref()),
            },
        )
        .await?;

        if input.revision_type.overwrites_answer() {
            QuestionRepo::set_answer(&mut *tx, question_id, &input.revision_text).await?;
        }

        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                actor.user_id,
                AuditAction::AddRevision,
                ENTITY_REVISION,
                revision.id,
                format!(
                    "Added {} revision to question {question_id}",
                    revision.revision_type
                ),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            user_id = actor.user_id,
            question_id,
            revision_id = revision.id,
            revision_type = %revision.revision_type,
            "Revision added",
        );
        Ok(revision)
    }

    /// Delete a revision. Only the staff member who wrote it may do so.
    pub async fn delete_revision(
        pool: &PgPool,
        actor: &Actor,
        question_id: DbId,
        revision_id: DbId,
    ) -> Result<(), StoreError> {
        let mut tx = pool.begin().await?;

        load_question(&mut tx, question_id).await?;
        let revision = RevisionRepo::find_in_question(&mut *tx, question_id, revision_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTITY_REVISION,
                id: revision_id,
            })?;
        ensure_can_delete_revision(actor, revision.user_id)?;

        RevisionRepo::delete(&mut *tx, revision_id).await?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                actor.user_id,
                AuditAction::DeleteRevision,
                ENTITY_REVISION,
                revision_id,
                format!(
                    "Deleted {} revision from question {question_id}",
                    revision.revision_type
                ),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = actor.user_id, question_id, revision_id, "Revision deleted");
        Ok(())
    }

    /// Set a question's moderation status.
    ///
    /// A non-blank comment is stored as a `teacher_comment` revision quoting
    /// the current answer.
    pub async fn approve(
        pool: &PgPool,
        actor: &Actor,
        question_id: DbId,
        input: &ApproveQuestion,
    ) -> Result<Question, StoreError> {
        ensure_can_review(actor)?;

        let mut tx = pool.begin().await?;

        let question = QuestionRepo::set_status(&mut *tx, question_id, input.status)
            .await?
            .ok_or_else(|| question_not_found(question_id))?;

        if let Some(comment) = non_blank(input.comments.as_deref()) {
            RevisionRepo::insert(
                &mut *tx,
                &NewRevision {
                    question_id,
                    user_id: actor.user_id,
                    revision_text: question.answer.as_deref().unwrap_or_default(),
                    revision_type: RevisionType::TeacherComment,
                    comments: Some(comment),
                },
            )
            .await?;
        }

        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                actor.user_id,
                AuditAction::ApproveQuestion,
                ENTITY_QUESTION,
                question_id,
                format!("Set question {question_id} status to {}", input.status),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            user_id = actor.user_id,
            question_id,
            status = %input.status,
            "Question status changed",
        );
        Ok(question)
    }

    /// Revision history of a visible question, newest first.
    pub async fn list_revisions(
        pool: &PgPool,
        actor: &Actor,
        question_id: DbId,
    ) -> Result<Vec<RevisionView>, StoreError> {
        let question = QuestionRepo::find_by_id(pool, question_id)
            .await?
            .ok_or_else(|| question_not_found(question_id))?;
        ensure_can_view_question(actor, question.user_id, question.status)?;
        Ok(RevisionRepo::list_for_question(pool, question_id).await?)
    }

    /// A visible question with its case context and revision history.
    pub async fn get(
        pool: &PgPool,
        actor: &Actor,
        question_id: DbId,
    ) -> Result<QuestionDetail, StoreError> {
        let question = QuestionRepo::find_header(pool, question_id)
            .await?
            .ok_or_else(|| question_not_found(question_id))?;
        ensure_can_view_question(actor, question.user_id, question.status)?;
        let revisions = RevisionRepo::list_for_question(pool, question_id).await?;
        Ok(QuestionDetail {
            question,
            revisions,
        })
    }

    /// Filtered, sorted, paginated question listing scoped to `actor`.
    pub async fn list(
        pool: &PgPool,
        actor: &Actor,
        query: &QuestionQuery,
    ) -> Result<Page<QuestionListItem>, StoreError> {
        let page = PageRequest::new(query.page, query.page_size);
        let filter = QuestionListFilter {
            keyword: query.keyword.clone(),
            case_id: query.case_id,
            source: query.source,
            status: query.status,
            user_id: query.user_id,
            scope: question_scope(actor),
            sort: QuestionSortKey::resolve(query.sort_by.as_deref()),
            direction: SortDirection::from_descending(query.sort_descending),
        };
        let positions = query
            .position
            .as_deref()
            .map(parse_position_tokens)
            .unwrap_or_default();

        if positions.is_empty() {
            let total = QuestionRepo::count(pool, &filter).await?;
            let items =
                QuestionRepo::list(pool, &filter, Some((page.page_size, page.offset()))).await?;
            return Ok(page.wrap(items, total));
        }

        // The position filter is an OR over substrings, so it runs on the
        // narrowed, already-sorted rows before counting and slicing.
        let matching: Vec<QuestionListItem> = QuestionRepo::list(pool, &filter, None)
            .await?
            .into_iter()
            .filter(|item| matches_any_position(item.position.as_deref(), &positions))
            .collect();
        Ok(page.slice(matching))
    }

    /// The review queue: the listing with status forced to `pending`.
    pub async fn list_pending(
        pool: &PgPool,
        actor: &Actor,
        query: &QuestionQuery,
    ) -> Result<Page<QuestionListItem>, StoreError> {
        ensure_can_review(actor)?;
        let query = QuestionQuery {
            status: Some(QuestionStatus::Pending),
            ..query.clone()
        };
        Self::list(pool, actor, &query).await
    }
}
