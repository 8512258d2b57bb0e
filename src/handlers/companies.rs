use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use uuid::Uuid;

use crate::{
    database::Database,
    error::ApiError,
    middleware::{authenticate, verify_company_access},
    models::{Company, CompanyResponse, Role},
};

/// SystemAdmin sees every company; everyone else just their own.
/// The companies table is the tenant root itself (no `company_guid`
/// column), so isolation here is purely application-level.
pub async fn list_companies(
    State(db): State<Database>,
    headers: HeaderMap,
) -> Result<Json<Vec<CompanyResponse>>, ApiError> {
    let user = authenticate(&headers)?;

    let companies: Vec<Company> = if user.role == Role::SystemAdmin {
        sqlx::query_as("SELECT * FROM companies ORDER BY name")
            .fetch_all(&db)
            .await?
    } else {
        sqlx::query_as("SELECT * FROM companies WHERE guid = $1")
            .bind(user.company_guid)
            .fetch_all(&db)
            .await?
    };

    Ok(Json(companies.into_iter().map(CompanyResponse::from).collect()))
}

pub async fn get_company(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let user = authenticate(&headers)?;
    verify_company_access(guid, &user)?;

    let company: Option<Company> = sqlx::query_as("SELECT * FROM companies WHERE guid = $1")
        .bind(guid)
        .fetch_optional(&db)
        .await?;

    let company = company.ok_or_else(|| ApiError::NotFound(format!("company {guid} not found")))?;
    Ok(Json(CompanyResponse::from(company)))
}
