use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::{
    database::Database,
    error::ApiError,
    middleware::{begin_tenant_tx, TenantContext},
    models::{Role, User},
    utils::{create_token, verify_password},
};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Exchange credentials for a bearer token carrying tenant and role
/// claims. Credential lookup necessarily precedes tenant derivation, so
/// this is the one handler that runs a bypass unit of work.
pub async fn login(
    State(db): State<Database>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let ctx = TenantContext::system();
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let user: Option<User> =
        sqlx::query_as("SELECT * FROM users WHERE email = $1 AND is_active = true")
            .bind(&req.email)
            .fetch_optional(&mut *tx)
            .await?;
    tx.commit().await?;

    let user = user.ok_or(ApiError::Unauthenticated)?;

    if !verify_password(&req.password, &user.password_hash).unwrap_or(false) {
        return Err(ApiError::Unauthenticated);
    }

    let role = Role::parse(&user.role).ok_or_else(|| {
        log::error!("user {} has unknown role {:?}", user.guid, user.role);
        ApiError::Internal
    })?;

    let token = create_token(user.guid, user.company_guid, role, user.email.clone())
        .map_err(|_| ApiError::Internal)?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}
