use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fixed role hierarchy. SystemAdmin is the only role that bypasses
/// tenant isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    SystemAdmin,
    CompanyAdmin,
    ProjectManager,
    Operator,
    Integration,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SystemAdmin => "SystemAdmin",
            Role::CompanyAdmin => "CompanyAdmin",
            Role::ProjectManager => "ProjectManager",
            Role::Operator => "Operator",
            Role::Integration => "Integration",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "SystemAdmin" => Some(Role::SystemAdmin),
            "CompanyAdmin" => Some(Role::CompanyAdmin),
            "ProjectManager" => Some(Role::ProjectManager),
            "Operator" => Some(Role::Operator),
            "Integration" => Some(Role::Integration),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [
            Role::SystemAdmin,
            Role::CompanyAdmin,
            Role::ProjectManager,
            Role::Operator,
            Role::Integration,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("Superuser"), None);
    }
}
