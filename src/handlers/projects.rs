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
    models::{Project, ProjectResponse},
};

#[derive(Deserialize)]
pub struct ProjectListQuery {
    pub company_guid: Option<Uuid>,
    pub code: Option<String>,
    pub search: Option<String>,
    pub include_inactive: Option<bool>,
}

pub async fn list_projects(
    State(db): State<Database>,
    headers: HeaderMap,
    Query(params): Query<ProjectListQuery>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let user = authenticate(&headers)?;
    if let Some(company_guid) = params.company_guid {
        verify_company_access(company_guid, &user)?;
    }

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    // Explicit tenant filter on top of RLS, defense in depth.
    let projects: Vec<Project> = sqlx::query_as(
        "SELECT * FROM projects \
         WHERE ($1::uuid IS NULL OR company_guid = $1) \
           AND ($2::uuid IS NULL OR company_guid = $2) \
           AND ($3::text IS NULL OR code = $3) \
           AND ($4::text IS NULL OR code ILIKE '%' || $4 || '%') \
           AND ($5::boolean OR is_active = true) \
         ORDER BY created_at",
    )
    .bind(tenant_scope(&ctx))
    .bind(params.company_guid)
    .bind(params.code)
    .bind(params.search)
    .bind(params.include_inactive.unwrap_or(false))
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

/// Returns the project whether active or soft-deleted so callers can
/// inspect `deleted_at`. Rows of other tenants are invisible and
/// surface as 404.
pub async fn get_project(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let user = authenticate(&headers)?;
    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let project: Option<Project> = sqlx::query_as(
        "SELECT * FROM projects WHERE guid = $1 AND ($2::uuid IS NULL OR company_guid = $2)",
    )
    .bind(guid)
    .bind(tenant_scope(&ctx))
    .fetch_optional(&mut *tx)
    .await?;
    tx.commit().await?;

    let project = project.ok_or_else(|| ApiError::NotFound(format!("project {guid} not found")))?;
    Ok(Json(ProjectResponse::from(project)))
}

pub async fn delete_project(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    super::cascade_delete(&db, &headers, EntityKind::Project, guid).await
}

pub async fn restore_project(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    super::cascade_restore(&db, &headers, EntityKind::Project, guid).await
}
