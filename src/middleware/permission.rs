use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::{error::ApiError, models::Role, utils::verify_token};

/// The authenticated principal, normalized from token claims once per
/// request and passed explicitly to everything that needs it.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub guid: Uuid,
    pub company_guid: Uuid,
    pub role: Role,
    pub email: String,
}

/// Extract and validate the principal from the Authorization header.
pub fn authenticate(headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)?;

    let claims = verify_token(token).map_err(|_| ApiError::Unauthenticated)?;

    let guid = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Unauthenticated)?;
    let company_guid = Uuid::parse_str(&claims.tenant).map_err(|_| ApiError::Unauthenticated)?;
    let role = Role::parse(&claims.role).ok_or(ApiError::Unauthenticated)?;

    Ok(CurrentUser {
        guid,
        company_guid,
        role,
        email: claims.email,
    })
}

/// Gate an operation on an explicit role list.
pub fn require_roles(user: &CurrentUser, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        let roles: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
        Err(ApiError::Forbidden(format!(
            "insufficient permissions, requires one of: {}",
            roles.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user_with_role(role: Role) -> CurrentUser {
        CurrentUser {
            guid: Uuid::new_v4(),
            company_guid: Uuid::new_v4(),
            role,
            email: "user@example.com".to_string(),
        }
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        let headers = HeaderMap::new();
        assert!(matches!(
            authenticate(&headers),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn non_bearer_header_is_unauthenticated() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert!(matches!(
            authenticate(&headers),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn bearer_token_round_trips() {
        std::env::set_var("JWT_SECRET", "unit-test-secret");
        let guid = Uuid::new_v4();
        let company = Uuid::new_v4();
        let token = crate::utils::create_token(
            guid,
            company,
            Role::Integration,
            "sync@example.com".to_string(),
        )
        .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let user = authenticate(&headers).unwrap();
        assert_eq!(user.guid, guid);
        assert_eq!(user.company_guid, company);
        assert_eq!(user.role, Role::Integration);
    }

    #[test]
    fn require_roles_allows_listed_role() {
        let user = user_with_role(Role::CompanyAdmin);
        assert!(require_roles(&user, &[Role::SystemAdmin, Role::CompanyAdmin]).is_ok());
    }

    #[test]
    fn require_roles_rejects_unlisted_role() {
        let user = user_with_role(Role::Operator);
        let err = require_roles(&user, &[Role::SystemAdmin]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
