//! Handler for querying the audit log. Admin only.

use axum::extract::State;
use axum::Json;
use casebook_db::models::audit::{AuditLogPage, AuditQuery};
use casebook_db::repositories::AuditLogRepo;

use crate::error::AppResult;
use crate::extract::AppQuery;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/audit-logs
///
/// Newest entries first, filtered by `user_id` and `action`, paged with
/// `limit`/`offset`.
pub async fn query_audit_logs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(params): AppQuery<AuditQuery>,
) -> AppResult<Json<DataResponse<AuditLogPage>>> {
    let items = AuditLogRepo::query(&state.pool, &params).await?;
    let total = AuditLogRepo::count(&state.pool, &params).await?;
    Ok(Json(DataResponse {
        data: AuditLogPage { items, total },
    }))
}
