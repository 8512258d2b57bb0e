use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Audit actions recorded in the workflow log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowAction {
    SoftDelete,
    Restore,
    SyncUpsert,
}

impl WorkflowAction {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowAction::SoftDelete => "soft_delete",
            WorkflowAction::Restore => "restore",
            WorkflowAction::SyncUpsert => "sync_upsert",
        }
    }
}

/// Append-only audit entry. Company and user display names are captured
/// at write time so the trail survives later renames.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct WorkflowEntry {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub company_name: Option<String>,
    pub user_guid: Option<Uuid>,
    pub user_name: Option<String>,
    pub action_type: String,
    pub action_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkflowResponse {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub company_name: String,
    pub user_name: String,
    pub action_type: String,
    pub action_value: String,
    pub created_at: DateTime<Utc>,
}

impl From<WorkflowEntry> for WorkflowResponse {
    fn from(entry: WorkflowEntry) -> Self {
        Self {
            guid: entry.guid,
            company_guid: entry.company_guid,
            company_name: entry.company_name.unwrap_or_default(),
            user_name: entry.user_name.unwrap_or_default(),
            action_type: entry.action_type,
            action_value: entry.action_value.unwrap_or_default(),
            created_at: entry.created_at,
        }
    }
}
