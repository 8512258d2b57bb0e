use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A piece may hang off an assembly or sit directly under a component
/// (`assembly_guid` is null in that case). All ancestor guids are stored
/// redundantly so any ancestor can filter pieces without joins.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Piece {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub component_guid: Uuid,
    pub assembly_guid: Option<Uuid>,
    pub piece_code: String,
    pub barcode: Option<String>,
    pub outer_length: Option<i32>,
    pub orientation: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PieceResponse {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub component_guid: Uuid,
    pub assembly_guid: Option<Uuid>,
    pub piece_code: String,
    pub barcode: String,
    pub outer_length: Option<i32>,
    pub orientation: String,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Piece> for PieceResponse {
    fn from(piece: Piece) -> Self {
        Self {
            guid: piece.guid,
            company_guid: piece.company_guid,
            project_guid: piece.project_guid,
            component_guid: piece.component_guid,
            assembly_guid: piece.assembly_guid,
            piece_code: piece.piece_code,
            barcode: piece.barcode.unwrap_or_default(),
            outer_length: piece.outer_length,
            orientation: piece.orientation.unwrap_or_default(),
            is_active: piece.is_active,
            deleted_at: piece.deleted_at,
            created_at: piece.created_at,
            updated_at: piece.updated_at,
        }
    }
}
