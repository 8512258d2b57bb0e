use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An assembly always belongs to a component, and its `project_guid`
/// must match that component's `project_guid`.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Assembly {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub component_guid: Uuid,
    pub trolley: Option<String>,
    pub cell_number: Option<i32>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssemblyResponse {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub component_guid: Uuid,
    pub trolley: String,
    pub cell_number: Option<i32>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Assembly> for AssemblyResponse {
    fn from(assembly: Assembly) -> Self {
        Self {
            guid: assembly.guid,
            company_guid: assembly.company_guid,
            project_guid: assembly.project_guid,
            component_guid: assembly.component_guid,
            trolley: assembly.trolley.unwrap_or_default(),
            cell_number: assembly.cell_number,
            is_active: assembly.is_active,
            deleted_at: assembly.deleted_at,
            created_at: assembly.created_at,
            updated_at: assembly.updated_at,
        }
    }
}
