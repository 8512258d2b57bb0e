use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    database::Database,
    error::ApiError,
    hierarchy::EntityKind,
    middleware::{authenticate, begin_tenant_tx, tenant_scope, verify_company_access, TenantContext},
    models::{Article, ArticleResponse},
};

#[derive(Deserialize)]
pub struct ArticleListQuery {
    pub company_guid: Option<Uuid>,
    pub project_guid: Option<Uuid>,
    pub component_guid: Option<Uuid>,
    pub code: Option<String>,
    pub include_inactive: Option<bool>,
}

pub async fn list_articles(
    State(db): State<Database>,
    headers: HeaderMap,
    Query(params): Query<ArticleListQuery>,
) -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    let user = authenticate(&headers)?;
    if let Some(company_guid) = params.company_guid {
        verify_company_access(company_guid, &user)?;
    }

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let articles: Vec<Article> = sqlx::query_as(
        "SELECT * FROM articles \
         WHERE ($1::uuid IS NULL OR company_guid = $1) \
           AND ($2::uuid IS NULL OR company_guid = $2) \
           AND ($3::uuid IS NULL OR project_guid = $3) \
           AND ($4::uuid IS NULL OR component_guid = $4) \
           AND ($5::text IS NULL OR code = $5) \
           AND ($6::boolean OR is_active = true) \
         ORDER BY created_at",
    )
    .bind(tenant_scope(&ctx))
    .bind(params.company_guid)
    .bind(params.project_guid)
    .bind(params.component_guid)
    .bind(params.code)
    .bind(params.include_inactive.unwrap_or(false))
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(articles.into_iter().map(ArticleResponse::from).collect()))
}

pub async fn get_article(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let user = authenticate(&headers)?;
    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let article: Option<Article> = sqlx::query_as(
        "SELECT * FROM articles WHERE guid = $1 AND ($2::uuid IS NULL OR company_guid = $2)",
    )
    .bind(guid)
    .bind(tenant_scope(&ctx))
    .fetch_optional(&mut *tx)
    .await?;
    tx.commit().await?;

    let article = article.ok_or_else(|| ApiError::NotFound(format!("article {guid} not found")))?;
    Ok(Json(ArticleResponse::from(article)))
}

pub async fn delete_article(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    super::cascade_delete(&db, &headers, EntityKind::Article, guid).await
}

pub async fn restore_article(
    State(db): State<Database>,
    headers: HeaderMap,
    Path(guid): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    super::cascade_restore(&db, &headers, EntityKind::Article, guid).await
}
