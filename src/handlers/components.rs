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
    models::{Component, ComponentResponse},
};

#[derive(Deserialize)]
pub struct ComponentListQuery {
    pub company_guid: Option<Uuid>,
    pub project_guid: Option<Uuid>,
    pub code: Option<String>,
    pub include_inactive: Option<bool>,
}

pub async fn list_components(
    State(db): State<Database>,
    headers: HeaderMap,
    Query(params): Query<ComponentListQuery>,
) -> Result<Json<Vec<ComponentResponse>>, ApiError> {
    let user = authenticate(&headers)?;
    if let Some(company_guid) = params.company_guid {
        verify_company_access(company_guid, &user)?;
    }

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let components: Vec<Component> = sqlx::query_as(
        "SELECT * FROM components \
         WHERE ($1::uuid IS NULL OR company_guid = $1) \
           AND ($2::uuid IS NULL OR company_guid = $2) \
           AND ($3::uuid IS NULL OR project_guid = $3) \
           AND ($4::text IS NULL OR code = $4) \
           AND ($5::boolean OR is_active = true) \
         ORDER BY created_at",
    )
    .bind(tenant_scope(&ctx))
    .bind(params.company_guid)
    .bind(params.project_guid)
    .bind(params.code)
    .bind(params.include_inactive.unwrap_or(false))
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(
        components.into_iter().map(ComponentResponse::from).collect(),
    ))
}

pub async fn get_component(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let user = authenticate(&headers)?;
    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let component: Option<Component> = sqlx::query_as(
        "SELECT * FROM components WHERE guid = $1 AND ($2::uuid IS NULL OR company_guid = $2)",
    )
    .bind(guid)
    .bind(tenant_scope(&ctx))
    .fetch_optional(&mut *tx)
    .await?;
    tx.commit().await?;

    let component =
        component.ok_or_else(|| ApiError::NotFound(format!("component {guid} not found")))?;
    Ok(Json(ComponentResponse::from(component)))
}

pub async fn delete_component(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    super::cascade_delete(&db, &headers, EntityKind::Component, guid).await
}

pub async fn restore_component(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    super::cascade_restore(&db, &headers, EntityKind::Component, guid).await
}
