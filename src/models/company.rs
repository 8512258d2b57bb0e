use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub guid: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyResponse {
    pub guid: Uuid,
    pub name: String,
    pub short_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            guid: company.guid,
            name: company.name,
            short_name: company.short_name.unwrap_or_default(),
            is_active: company.is_active,
            created_at: company.created_at,
        }
    }
}
