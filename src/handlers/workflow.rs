use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    database::Database,
    error::ApiError,
    middleware::{authenticate, begin_tenant_tx, tenant_scope, verify_company_access, TenantContext},
    models::{WorkflowEntry, WorkflowResponse},
};

#[derive(Deserialize)]
pub struct WorkflowListQuery {
    pub company_guid: Option<Uuid>,
    pub action_type: Option<String>,
    pub limit: Option<i64>,
}

/// Audit trail for the caller's tenant, newest first.
pub async fn list_workflow(
    State(db): State<Database>,
    headers: HeaderMap,
    Query(params): Query<WorkflowListQuery>,
) -> Result<Json<Vec<WorkflowResponse>>, ApiError> {
    let user = authenticate(&headers)?;
    if let Some(company_guid) = params.company_guid {
        verify_company_access(company_guid, &user)?;
    }

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let entries: Vec<WorkflowEntry> = sqlx::query_as(
        "SELECT * FROM workflow \
         WHERE ($1::uuid IS NULL OR company_guid = $1) \
           AND ($2::uuid IS NULL OR company_guid = $2) \
           AND ($3::text IS NULL OR action_type = $3) \
         ORDER BY created_at DESC \
         LIMIT $4",
    )
    .bind(tenant_scope(&ctx))
    .bind(params.company_guid)
    .bind(params.action_type)
    .bind(params.limit.unwrap_or(100).clamp(1, 1000))
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(entries.into_iter().map(WorkflowResponse::from).collect()))
}
