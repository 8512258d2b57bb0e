use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    database::Database,
    error::ApiError,
    hierarchy::EntityKind,
    middleware::{authenticate, begin_tenant_tx, tenant_scope, verify_company_access, TenantContext},
    models::{Assembly, AssemblyResponse},
};

#[derive(Deserialize)]
pub struct AssemblyListQuery {
    pub company_guid: Option<Uuid>,
    pub project_guid: Option<Uuid>,
    pub component_guid: Option<Uuid>,
    pub include_inactive: Option<bool>,
}

pub async fn list_assemblies(
    State(db): State<Database>,
    headers: HeaderMap,
    Query(params): Query<AssemblyListQuery>,
) -> Result<Json<Vec<AssemblyResponse>>, ApiError> {
    let user = authenticate(&headers)?;
    if let Some(company_guid) = params.company_guid {
        verify_company_access(company_guid, &user)?;
    }

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let assemblies: Vec<Assembly> = sqlx::query_as(
        "SELECT * FROM assemblies \
         WHERE ($1::uuid IS NULL OR company_guid = $1) \
           AND ($2::uuid IS NULL OR company_guid = $2) \
           AND ($3::uuid IS NULL OR project_guid = $3) \
           AND ($4::uuid IS NULL OR component_guid = $4) \
           AND ($5::boolean OR is_active = true) \
         ORDER BY created_at",
    )
    .bind(tenant_scope(&ctx))
    .bind(params.company_guid)
    .bind(params.project_guid)
    .bind(params.component_guid)
    .bind(params.include_inactive.unwrap_or(false))
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(
        assemblies.into_iter().map(AssemblyResponse::from).collect(),
    ))
}

pub async fn get_assembly(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<Json<AssemblyResponse>, ApiError> {
    let user = authenticate(&headers)?;
    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let assembly: Option<Assembly> = sqlx::query_as(
        "SELECT * FROM assemblies WHERE guid = $1 AND ($2::uuid IS NULL OR company_guid = $2)",
    )
    .bind(guid)
    .bind(tenant_scope(&ctx))
    .fetch_optional(&mut *tx)
    .await?;
    tx.commit().await?;

    let assembly =
        assembly.ok_or_else(|| ApiError::NotFound(format!("assembly {guid} not found")))?;
    Ok(Json(AssemblyResponse::from(assembly)))
}

pub async fn delete_assembly(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    super::cascade_delete(&db, &headers, EntityKind::Assembly, guid).await
}

pub async fn restore_assembly(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    super::cascade_restore(&db, &headers, EntityKind::Assembly, guid).await
}
