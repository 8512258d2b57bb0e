use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use uuid::Uuid;

use crate::models::Role;

/// Claims carried by every access token: the user, their tenant, and
/// their role. Everything downstream (tenant context, RLS, role gates)
/// is derived from these on each request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub tenant: String,
    pub role: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_guid: Uuid, company_guid: Uuid, role: Role, email: String) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(24);

        Self {
            sub: user_guid.to_string(),
            tenant: company_guid.to_string(),
            role: role.as_str().to_string(),
            email,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

fn jwt_secret() -> String {
    env::var("JWT_SECRET").expect("JWT_SECRET must be set")
}

pub fn create_token(
    user_guid: Uuid,
    company_guid: Uuid,
    role: Role,
    email: String,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(user_guid, company_guid, role, email);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_ref()),
    )
}

pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_ref()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_secret() {
        env::set_var("JWT_SECRET", "unit-test-secret");
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        set_secret();
        let user = Uuid::new_v4();
        let company = Uuid::new_v4();

        let token = create_token(user, company, Role::CompanyAdmin, "ops@example.com".into())
            .expect("token should encode");
        let claims = verify_token(&token).expect("token should verify");

        assert_eq!(claims.sub, user.to_string());
        assert_eq!(claims.tenant, company.to_string());
        assert_eq!(claims.role, "CompanyAdmin");
        assert_eq!(claims.email, "ops@example.com");
    }

    #[test]
    fn tampered_token_is_rejected() {
        set_secret();
        let token = create_token(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Role::Operator,
            "op@example.com".into(),
        )
        .unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(verify_token(&tampered).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
