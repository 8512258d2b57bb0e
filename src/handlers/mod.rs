pub mod articles;
pub mod assemblies;
pub mod auth;
pub mod companies;
pub mod components;
pub mod pieces;
pub mod projects;
pub mod sync;
pub mod workflow;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    cascade,
    database::Database,
    error::ApiError,
    hierarchy::EntityKind,
    middleware::{authenticate, begin_tenant_tx, require_roles, TenantContext},
    models::Role,
};

/// Roles allowed to cascade-delete and restore hierarchy entities.
const WRITE_ROLES: [Role; 3] = [Role::SystemAdmin, Role::CompanyAdmin, Role::ProjectManager];

pub async fn health(State(db): State<Database>) -> Json<Value> {
    let database = sqlx::query("SELECT 1").fetch_one(&db).await.is_ok();
    Json(json!({ "status": "ok", "database": database }))
}

/// Shared implementation behind every `DELETE /{entity}/{guid}` route:
/// one transaction, one cascade, 204 on success.
pub(crate) async fn cascade_delete(
    db: &Database,
    headers: &HeaderMap,
    kind: EntityKind,
    guid: Uuid,
) -> Result<StatusCode, ApiError> {
    let user = authenticate(headers)?;
    require_roles(&user, &WRITE_ROLES)?;

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(db, &ctx).await?;
    cascade::soft_delete(&mut tx, kind, guid, None, &user).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Shared implementation behind every `POST /{entity}/{guid}/restore`.
pub(crate) async fn cascade_restore(
    db: &Database,
    headers: &HeaderMap,
    kind: EntityKind,
    guid: Uuid,
) -> Result<StatusCode, ApiError> {
    let user = authenticate(headers)?;
    require_roles(&user, &WRITE_ROLES)?;

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(db, &ctx).await?;
    cascade::restore(&mut tx, kind, guid, None, &user).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
