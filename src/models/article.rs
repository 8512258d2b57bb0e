use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub component_guid: Uuid,
    pub code: String,
    pub designation: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub component_guid: Uuid,
    pub code: String,
    pub designation: String,
    pub quantity: Option<f64>,
    pub unit: String,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            guid: article.guid,
            company_guid: article.company_guid,
            project_guid: article.project_guid,
            component_guid: article.component_guid,
            code: article.code,
            designation: article.designation.unwrap_or_default(),
            quantity: article.quantity,
            unit: article.unit.unwrap_or_default(),
            is_active: article.is_active,
            deleted_at: article.deleted_at,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}
