use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Component {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub code: String,
    pub designation: Option<String>,
    pub quantity: i32,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentResponse {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub code: String,
    pub designation: String,
    pub quantity: i32,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Component> for ComponentResponse {
    fn from(component: Component) -> Self {
        Self {
            guid: component.guid,
            company_guid: component.company_guid,
            project_guid: component.project_guid,
            code: component.code,
            designation: component.designation.unwrap_or_default(),
            quantity: component.quantity,
            is_active: component.is_active,
            deleted_at: component.deleted_at,
            created_at: component.created_at,
            updated_at: component.updated_at,
        }
    }
}
