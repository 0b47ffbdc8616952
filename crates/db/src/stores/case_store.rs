//! Case registry: creation, editing, deletion and listing of interview cases.

use casebook_core::access::{ensure_can_edit_case, question_scope, Actor};
use casebook_core::audit::{quote, AuditAction, ENTITY_CASE};
use casebook_core::cases::{validate_case_name, CaseSortKey, CASE_HAS_QUESTIONS};
use casebook_core::error::CoreError;
use casebook_core::paging::{Page, PageRequest, SortDirection};
use casebook_core::roles::Role;
use casebook_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::audit::CreateAuditLog;
use crate::models::case::{Case, CaseDetail, CaseQuery, CaseSummary, CreateCase, UpdateCase};
use crate::repositories::case_repo::CaseListFilter;
use crate::repositories::{AuditLogRepo, CaseRepo, QuestionRepo, UserRepo};

fn case_not_found(id: DbId) -> StoreError {
    CoreError::NotFound {
        entity: ENTITY_CASE,
        id,
    }
    .into()
}

pub struct CaseStore;

impl CaseStore {
    /// Create a case owned by `actor`. New cases are always `active`.
    pub async fn create(
        pool: &PgPool,
        actor: &Actor,
        input: &CreateCase,
    ) -> Result<Case, StoreError> {
        validate_case_name(&input.name)?;

        let mut tx = pool.begin().await?;
        let case = CaseRepo::create(&mut *tx, actor.user_id, input).await?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                actor.user_id,
                AuditAction::CreateCase,
                ENTITY_CASE,
                case.id,
                format!("Created case '{}'", quote(&case.name)),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = actor.user_id, case_id = case.id, "Case created");
        Ok(case)
    }

    /// Apply a partial update. Students may only update cases they created.
    pub async fn update(
        pool: &PgPool,
        actor: &Actor,
        case_id: DbId,
        input: &UpdateCase,
    ) -> Result<Case, StoreError> {
        let mut tx = pool.begin().await?;

        let existing = CaseRepo::find_by_id(&mut *tx, case_id)
            .await?
            .ok_or_else(|| case_not_found(case_id))?;
        ensure_can_edit_case(actor, existing.created_by)?;

        if let Some(name) = input.name.as_deref() {
            validate_case_name(name)?;
        }

        let case = CaseRepo::update(&mut *tx, case_id, input)
            .await?
            .ok_or_else(|| case_not_found(case_id))?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                actor.user_id,
                AuditAction::UpdateCase,
                ENTITY_CASE,
                case.id,
                format!("Updated case '{}'", quote(&case.name)),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = actor.user_id, case_id, "Case updated");
        Ok(case)
    }

    /// Delete a case that has no questions.
    pub async fn delete(pool: &PgPool, actor: &Actor, case_id: DbId) -> Result<(), StoreError> {
        let mut tx = pool.begin().await?;

        let existing = CaseRepo::find_by_id(&mut *tx, case_id)
            .await?
            .ok_or_else(|| case_not_found(case_id))?;
        ensure_can_edit_case(actor, existing.created_by)?;

        if QuestionRepo::count_by_case(&mut *tx, case_id).await? > 0 {
            return Err(CoreError::Conflict(CASE_HAS_QUESTIONS.to_string()).into());
        }

        CaseRepo::delete(&mut *tx, case_id).await?;
        AuditLogRepo::insert(
            &mut *tx,
            &CreateAuditLog::new(
                actor.user_id,
                AuditAction::DeleteCase,
                ENTITY_CASE,
                case_id,
                format!("Deleted case '{}'", quote(&existing.name)),
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = actor.user_id, case_id, "Case deleted");
        Ok(())
    }

    /// A case with its creator and the questions `actor` may see.
    pub async fn get(pool: &PgPool, actor: &Actor, case_id: DbId) -> Result<CaseDetail, StoreError> {
        let case = CaseRepo::find_by_id(pool, case_id)
            .await?
            .ok_or_else(|| case_not_found(case_id))?;
        let creator_name = UserRepo::find_by_id(pool, case.created_by)
            .await?
            .map(|u| u.username)
            .unwrap_or_default();
        let questions =
            QuestionRepo::list_briefs_for_case(pool, case_id, question_scope(actor)).await?;

        Ok(CaseDetail {
            case,
            creator_name,
            questions,
        })
    }

    /// Distinct positions across all cases, for filter pickers.
    pub async fn list_positions(pool: &PgPool) -> Result<Vec<String>, StoreError> {
        Ok(CaseRepo::list_positions(pool).await?)
    }

    /// Filtered, sorted, paginated case summaries.
    pub async fn list(
        pool: &PgPool,
        actor: &Actor,
        query: &CaseQuery,
    ) -> Result<Page<CaseSummary>, StoreError> {
        let page = PageRequest::new(query.page, query.page_size);
        let filter = CaseListFilter {
            keyword: query.keyword.clone(),
            status: query.status,
            created_by: only_mine_filter(actor, query.only_mine),
            sort: CaseSortKey::resolve(query.sort_by.as_deref()),
            direction: SortDirection::from_descending(query.sort_descending),
        };

        let total = CaseRepo::count(pool, &filter).await?;
        let items = CaseRepo::list(pool, &filter, page.page_size, page.offset()).await?;
        Ok(page.wrap(items, total))
    }
}

/// `only_mine` narrows to the actor's own cases, for students only.
fn only_mine_filter(actor: &Actor, only_mine: Option<bool>) -> Option<DbId> {
    (only_mine.unwrap_or(false) && actor.role == Role::Student).then_some(actor.user_id)
}
