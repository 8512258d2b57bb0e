use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub code: String,
    pub due_date: Option<DateTime<Utc>>,
    pub in_production: bool,
    pub company_name: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub code: String,
    pub due_date: Option<DateTime<Utc>>,
    pub in_production: bool,
    pub company_name: String,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            guid: project.guid,
            company_guid: project.company_guid,
            code: project.code,
            due_date: project.due_date,
            in_production: project.in_production,
            company_name: project.company_name.unwrap_or_default(),
            is_active: project.is_active,
            deleted_at: project.deleted_at,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}
