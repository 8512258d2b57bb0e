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
    models::{Piece, PieceResponse},
};

#[derive(Deserialize)]
pub struct PieceListQuery {
    pub company_guid: Option<Uuid>,
    pub project_guid: Option<Uuid>,
    pub component_guid: Option<Uuid>,
    pub assembly_guid: Option<Uuid>,
    pub barcode: Option<String>,
    pub include_inactive: Option<bool>,
}

pub async fn list_pieces(
    State(db): State<Database>,
    headers: HeaderMap,
    Query(params): Query<PieceListQuery>,
) -> Result<Json<Vec<PieceResponse>>, ApiError> {
    let user = authenticate(&headers)?;
    if let Some(company_guid) = params.company_guid {
        verify_company_access(company_guid, &user)?;
    }

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let pieces: Vec<Piece> = sqlx::query_as(
        "SELECT * FROM pieces \
         WHERE ($1::uuid IS NULL OR company_guid = $1) \
           AND ($2::uuid IS NULL OR company_guid = $2) \
           AND ($3::uuid IS NULL OR project_guid = $3) \
           AND ($4::uuid IS NULL OR component_guid = $4) \
           AND ($5::uuid IS NULL OR assembly_guid = $5) \
           AND ($6::text IS NULL OR barcode = $6) \
           AND ($7::boolean OR is_active = true) \
         ORDER BY created_at",
    )
    .bind(tenant_scope(&ctx))
    .bind(params.company_guid)
    .bind(params.project_guid)
    .bind(params.component_guid)
    .bind(params.assembly_guid)
    .bind(params.barcode)
    .bind(params.include_inactive.unwrap_or(false))
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(pieces.into_iter().map(PieceResponse::from).collect()))
}

pub async fn get_piece(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<Json<PieceResponse>, ApiError> {
    let user = authenticate(&headers)?;
    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let piece: Option<Piece> = sqlx::query_as(
        "SELECT * FROM pieces WHERE guid = $1 AND ($2::uuid IS NULL OR company_guid = $2)",
    )
    .bind(guid)
    .bind(tenant_scope(&ctx))
    .fetch_optional(&mut *tx)
    .await?;
    tx.commit().await?;

    let piece = piece.ok_or_else(|| ApiError::NotFound(format!("piece {guid} not found")))?;
    Ok(Json(PieceResponse::from(piece)))
}

pub async fn delete_piece(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    super::cascade_delete(&db, &headers, EntityKind::Piece, guid).await
}

pub async fn restore_piece(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    super::cascade_restore(&db, &headers, EntityKind::Piece, guid).await
}
