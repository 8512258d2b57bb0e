use std::collections::{HashMap, HashSet};

use axum::{extract::State, http::HeaderMap, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    cascade,
    database::Database,
    error::ApiError,
    hierarchy::EntityKind,
    middleware::{authenticate, begin_tenant_tx, require_roles, CurrentUser, TenantContext},
    models::{Role, WorkflowAction},
    MAX_SYNC_BATCH,
};

const SYNC_ROLES: [Role; 3] = [Role::SystemAdmin, Role::CompanyAdmin, Role::Integration];

/// Each sync call is a full-replacement reconciliation for one entity
/// type and the caller's tenant: records present are upserted (soft-
/// deleted rows come back to life), active rows absent from the batch
/// are cascade-soft-deleted as removed upstream.
#[derive(Debug, Serialize)]
pub struct SyncResult {
    pub inserted: u64,
    pub updated: u64,
}

#[derive(Debug, Deserialize)]
pub struct ProjectSyncRecord {
    pub guid: Option<Uuid>,
    pub company_guid: Uuid,
    pub code: String,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub in_production: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProjectBatch {
    pub projects: Vec<ProjectSyncRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ComponentSyncRecord {
    pub guid: Option<Uuid>,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub code: String,
    pub designation: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct ComponentBatch {
    pub components: Vec<ComponentSyncRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AssemblySyncRecord {
    pub guid: Option<Uuid>,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub component_guid: Uuid,
    pub trolley: Option<String>,
    pub cell_number: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AssemblyBatch {
    pub assemblies: Vec<AssemblySyncRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PieceSyncRecord {
    pub guid: Option<Uuid>,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub component_guid: Uuid,
    pub assembly_guid: Option<Uuid>,
    pub piece_code: String,
    pub barcode: Option<String>,
    pub outer_length: Option<i32>,
    pub orientation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PieceBatch {
    pub pieces: Vec<PieceSyncRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleSyncRecord {
    pub guid: Option<Uuid>,
    pub company_guid: Uuid,
    pub project_guid: Uuid,
    pub component_guid: Uuid,
    pub code: String,
    pub designation: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleBatch {
    pub articles: Vec<ArticleSyncRecord>,
}

pub async fn sync_projects(
    State(db): State<Database>,
    headers: HeaderMap,
    Json(batch): Json<ProjectBatch>,
) -> Result<Json<SyncResult>, ApiError> {
    let user = authenticate(&headers)?;
    require_roles(&user, &SYNC_ROLES)?;
    let tenant = user.company_guid;
    let records = batch.projects;

    check_batch_size("projects", records.len())?;
    check_batch_tenant(
        "Project",
        &records.iter().map(|r| r.company_guid).collect::<Vec<_>>(),
        tenant,
    )?;
    check_duplicate_guids(
        "Project",
        &records.iter().map(|r| r.guid).collect::<Vec<_>>(),
    )?;

    let guids: Vec<Uuid> = records
        .iter()
        .map(|r| r.guid.unwrap_or_else(Uuid::new_v4))
        .collect();

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let company_name = company_display_name(&mut tx, tenant).await?;
    let existing = load_existing(&mut tx, EntityKind::Project, tenant, &guids).await?;

    let mut inserted = 0u64;
    let mut updated = 0u64;
    for (record, guid) in records.iter().zip(&guids) {
        if existing.contains(guid) {
            sqlx::query(
                "UPDATE projects SET code = $1, due_date = $2, in_production = $3, \
                 company_name = $4, is_active = true, deleted_at = NULL, updated_at = now() \
                 WHERE guid = $5 AND company_guid = $6",
            )
            .bind(&record.code)
            .bind(record.due_date)
            .bind(record.in_production)
            .bind(&company_name)
            .bind(guid)
            .bind(tenant)
            .execute(&mut *tx)
            .await?;
            updated += 1;
        } else {
            sqlx::query(
                "INSERT INTO projects (guid, company_guid, code, due_date, in_production, company_name) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(guid)
            .bind(tenant)
            .bind(&record.code)
            .bind(record.due_date)
            .bind(record.in_production)
            .bind(&company_name)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }
    }

    reconcile_missing(&mut tx, EntityKind::Project, tenant, &guids, &user).await?;
    record_sync(&mut tx, tenant, &company_name, &user, "projects", inserted, updated).await?;
    tx.commit().await?;

    Ok(Json(SyncResult { inserted, updated }))
}

pub async fn sync_components(
    State(db): State<Database>,
    headers: HeaderMap,
    Json(batch): Json<ComponentBatch>,
) -> Result<Json<SyncResult>, ApiError> {
    let user = authenticate(&headers)?;
    require_roles(&user, &SYNC_ROLES)?;
    let tenant = user.company_guid;
    let records = batch.components;

    check_batch_size("components", records.len())?;
    check_batch_tenant(
        "Component",
        &records.iter().map(|r| r.company_guid).collect::<Vec<_>>(),
        tenant,
    )?;
    check_duplicate_guids(
        "Component",
        &records.iter().map(|r| r.guid).collect::<Vec<_>>(),
    )?;

    let guids: Vec<Uuid> = records
        .iter()
        .map(|r| r.guid.unwrap_or_else(Uuid::new_v4))
        .collect();

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let projects = load_active_projects(&mut tx, tenant).await?;
    for (index, record) in records.iter().enumerate() {
        require_project("Component", index, record.project_guid, &projects)?;
    }

    let company_name = company_display_name(&mut tx, tenant).await?;
    let existing = load_existing(&mut tx, EntityKind::Component, tenant, &guids).await?;

    let mut inserted = 0u64;
    let mut updated = 0u64;
    for (record, guid) in records.iter().zip(&guids) {
        if existing.contains(guid) {
            sqlx::query(
                "UPDATE components SET project_guid = $1, code = $2, designation = $3, \
                 quantity = $4, is_active = true, deleted_at = NULL, updated_at = now() \
                 WHERE guid = $5 AND company_guid = $6",
            )
            .bind(record.project_guid)
            .bind(&record.code)
            .bind(&record.designation)
            .bind(record.quantity)
            .bind(guid)
            .bind(tenant)
            .execute(&mut *tx)
            .await?;
            updated += 1;
        } else {
            sqlx::query(
                "INSERT INTO components (guid, company_guid, project_guid, code, designation, quantity) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(guid)
            .bind(tenant)
            .bind(record.project_guid)
            .bind(&record.code)
            .bind(&record.designation)
            .bind(record.quantity)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }
    }

    reconcile_missing(&mut tx, EntityKind::Component, tenant, &guids, &user).await?;
    record_sync(&mut tx, tenant, &company_name, &user, "components", inserted, updated).await?;
    tx.commit().await?;

    Ok(Json(SyncResult { inserted, updated }))
}

pub async fn sync_assemblies(
    State(db): State<Database>,
    headers: HeaderMap,
    Json(batch): Json<AssemblyBatch>,
) -> Result<Json<SyncResult>, ApiError> {
    let user = authenticate(&headers)?;
    require_roles(&user, &SYNC_ROLES)?;
    let tenant = user.company_guid;
    let records = batch.assemblies;

    check_batch_size("assemblies", records.len())?;
    check_batch_tenant(
        "Assembly",
        &records.iter().map(|r| r.company_guid).collect::<Vec<_>>(),
        tenant,
    )?;
    check_duplicate_guids(
        "Assembly",
        &records.iter().map(|r| r.guid).collect::<Vec<_>>(),
    )?;

    let guids: Vec<Uuid> = records
        .iter()
        .map(|r| r.guid.unwrap_or_else(Uuid::new_v4))
        .collect();

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let components = load_active_components(&mut tx, tenant).await?;
    for (index, record) in records.iter().enumerate() {
        require_component(
            "Assembly",
            index,
            record.component_guid,
            record.project_guid,
            &components,
        )?;
    }

    let company_name = company_display_name(&mut tx, tenant).await?;
    let existing = load_existing(&mut tx, EntityKind::Assembly, tenant, &guids).await?;

    let mut inserted = 0u64;
    let mut updated = 0u64;
    for (record, guid) in records.iter().zip(&guids) {
        if existing.contains(guid) {
            sqlx::query(
                "UPDATE assemblies SET project_guid = $1, component_guid = $2, trolley = $3, \
                 cell_number = $4, is_active = true, deleted_at = NULL, updated_at = now() \
                 WHERE guid = $5 AND company_guid = $6",
            )
            .bind(record.project_guid)
            .bind(record.component_guid)
            .bind(&record.trolley)
            .bind(record.cell_number)
            .bind(guid)
            .bind(tenant)
            .execute(&mut *tx)
            .await?;
            updated += 1;
        } else {
            sqlx::query(
                "INSERT INTO assemblies (guid, company_guid, project_guid, component_guid, trolley, cell_number) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(guid)
            .bind(tenant)
            .bind(record.project_guid)
            .bind(record.component_guid)
            .bind(&record.trolley)
            .bind(record.cell_number)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }
    }

    reconcile_missing(&mut tx, EntityKind::Assembly, tenant, &guids, &user).await?;
    record_sync(&mut tx, tenant, &company_name, &user, "assemblies", inserted, updated).await?;
    tx.commit().await?;

    Ok(Json(SyncResult { inserted, updated }))
}

pub async fn sync_pieces(
    State(db): State<Database>,
    headers: HeaderMap,
    Json(batch): Json<PieceBatch>,
) -> Result<Json<SyncResult>, ApiError> {
    let user = authenticate(&headers)?;
    require_roles(&user, &SYNC_ROLES)?;
    let tenant = user.company_guid;
    let records = batch.pieces;

    check_batch_size("pieces", records.len())?;
    check_batch_tenant(
        "Piece",
        &records.iter().map(|r| r.company_guid).collect::<Vec<_>>(),
        tenant,
    )?;
    check_duplicate_guids("Piece", &records.iter().map(|r| r.guid).collect::<Vec<_>>())?;

    let guids: Vec<Uuid> = records
        .iter()
        .map(|r| r.guid.unwrap_or_else(Uuid::new_v4))
        .collect();

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let components = load_active_components(&mut tx, tenant).await?;
    let assemblies = load_active_assemblies(&mut tx, tenant).await?;
    for (index, record) in records.iter().enumerate() {
        require_component(
            "Piece",
            index,
            record.component_guid,
            record.project_guid,
            &components,
        )?;
        if let Some(assembly_guid) = record.assembly_guid {
            require_assembly(
                "Piece",
                index,
                assembly_guid,
                record.component_guid,
                record.project_guid,
                &assemblies,
            )?;
        }
    }

    let company_name = company_display_name(&mut tx, tenant).await?;
    let existing = load_existing(&mut tx, EntityKind::Piece, tenant, &guids).await?;

    let mut inserted = 0u64;
    let mut updated = 0u64;
    for (record, guid) in records.iter().zip(&guids) {
        if existing.contains(guid) {
            sqlx::query(
                "UPDATE pieces SET project_guid = $1, component_guid = $2, assembly_guid = $3, \
                 piece_code = $4, barcode = $5, outer_length = $6, orientation = $7, \
                 is_active = true, deleted_at = NULL, updated_at = now() \
                 WHERE guid = $8 AND company_guid = $9",
            )
            .bind(record.project_guid)
            .bind(record.component_guid)
            .bind(record.assembly_guid)
            .bind(&record.piece_code)
            .bind(&record.barcode)
            .bind(record.outer_length)
            .bind(&record.orientation)
            .bind(guid)
            .bind(tenant)
            .execute(&mut *tx)
            .await?;
            updated += 1;
        } else {
            sqlx::query(
                "INSERT INTO pieces (guid, company_guid, project_guid, component_guid, assembly_guid, \
                 piece_code, barcode, outer_length, orientation) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(guid)
            .bind(tenant)
            .bind(record.project_guid)
            .bind(record.component_guid)
            .bind(record.assembly_guid)
            .bind(&record.piece_code)
            .bind(&record.barcode)
            .bind(record.outer_length)
            .bind(&record.orientation)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }
    }

    reconcile_missing(&mut tx, EntityKind::Piece, tenant, &guids, &user).await?;
    record_sync(&mut tx, tenant, &company_name, &user, "pieces", inserted, updated).await?;
    tx.commit().await?;

    Ok(Json(SyncResult { inserted, updated }))
}

pub async fn sync_articles(
    State(db): State<Database>,
    headers: HeaderMap,
    Json(batch): Json<ArticleBatch>,
) -> Result<Json<SyncResult>, ApiError> {
    let user = authenticate(&headers)?;
    require_roles(&user, &SYNC_ROLES)?;
    let tenant = user.company_guid;
    let records = batch.articles;

    check_batch_size("articles", records.len())?;
    check_batch_tenant(
        "Article",
        &records.iter().map(|r| r.company_guid).collect::<Vec<_>>(),
        tenant,
    )?;
    check_duplicate_guids(
        "Article",
        &records.iter().map(|r| r.guid).collect::<Vec<_>>(),
    )?;

    let guids: Vec<Uuid> = records
        .iter()
        .map(|r| r.guid.unwrap_or_else(Uuid::new_v4))
        .collect();

    let ctx = TenantContext::from_user(&user);
    let mut tx = begin_tenant_tx(&db, &ctx).await?;

    let components = load_active_components(&mut tx, tenant).await?;
    for (index, record) in records.iter().enumerate() {
        require_component(
            "Article",
            index,
            record.component_guid,
            record.project_guid,
            &components,
        )?;
    }

    let company_name = company_display_name(&mut tx, tenant).await?;
    let existing = load_existing(&mut tx, EntityKind::Article, tenant, &guids).await?;

    let mut inserted = 0u64;
    let mut updated = 0u64;
    for (record, guid) in records.iter().zip(&guids) {
        if existing.contains(guid) {
            sqlx::query(
                "UPDATE articles SET project_guid = $1, component_guid = $2, code = $3, \
                 designation = $4, quantity = $5, unit = $6, \
                 is_active = true, deleted_at = NULL, updated_at = now() \
                 WHERE guid = $7 AND company_guid = $8",
            )
            .bind(record.project_guid)
            .bind(record.component_guid)
            .bind(&record.code)
            .bind(&record.designation)
            .bind(record.quantity)
            .bind(&record.unit)
            .bind(guid)
            .bind(tenant)
            .execute(&mut *tx)
            .await?;
            updated += 1;
        } else {
            sqlx::query(
                "INSERT INTO articles (guid, company_guid, project_guid, component_guid, code, \
                 designation, quantity, unit) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(guid)
            .bind(tenant)
            .bind(record.project_guid)
            .bind(record.component_guid)
            .bind(&record.code)
            .bind(&record.designation)
            .bind(record.quantity)
            .bind(&record.unit)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }
    }

    reconcile_missing(&mut tx, EntityKind::Article, tenant, &guids, &user).await?;
    record_sync(&mut tx, tenant, &company_name, &user, "articles", inserted, updated).await?;
    tx.commit().await?;

    Ok(Json(SyncResult { inserted, updated }))
}

fn check_batch_size(entity: &str, len: usize) -> Result<(), ApiError> {
    if len > MAX_SYNC_BATCH {
        return Err(ApiError::PayloadTooLarge(format!(
            "maximum batch size is {MAX_SYNC_BATCH} {entity}, got {len}"
        )));
    }
    Ok(())
}

/// A record declaring a tenant other than the authenticated one rejects
/// the whole batch; records are never silently reassigned.
fn check_batch_tenant(entity: &str, declared: &[Uuid], tenant: Uuid) -> Result<(), ApiError> {
    for (index, company_guid) in declared.iter().enumerate() {
        if *company_guid != tenant {
            return Err(ApiError::Forbidden(format!(
                "{entity} at index {index} declares company {company_guid} \
                 but the authenticated tenant is {tenant}"
            )));
        }
    }
    Ok(())
}

fn check_duplicate_guids(entity: &str, guids: &[Option<Uuid>]) -> Result<(), ApiError> {
    let mut seen = HashSet::new();
    for (index, guid) in guids.iter().enumerate() {
        if let Some(guid) = guid {
            if !seen.insert(*guid) {
                return Err(ApiError::Conflict(format!(
                    "{entity} at index {index} duplicates guid {guid}"
                )));
            }
        }
    }
    Ok(())
}

fn require_project(
    entity: &str,
    index: usize,
    project_guid: Uuid,
    projects: &HashSet<Uuid>,
) -> Result<(), ApiError> {
    if projects.contains(&project_guid) {
        Ok(())
    } else {
        Err(ApiError::ReferentialIntegrity(format!(
            "{entity} at index {index} references unknown project {project_guid}"
        )))
    }
}

/// `components` maps component guid to its project guid.
fn require_component(
    entity: &str,
    index: usize,
    component_guid: Uuid,
    project_guid: Uuid,
    components: &HashMap<Uuid, Uuid>,
) -> Result<(), ApiError> {
    match components.get(&component_guid) {
        None => Err(ApiError::ReferentialIntegrity(format!(
            "{entity} at index {index} references unknown component {component_guid}"
        ))),
        Some(parent_project) if *parent_project != project_guid => {
            Err(ApiError::ReferentialIntegrity(format!(
                "{entity} at index {index} declares project {project_guid} \
                 but component {component_guid} belongs to project {parent_project}"
            )))
        }
        Some(_) => Ok(()),
    }
}

/// `assemblies` maps assembly guid to its (project guid, component guid).
fn require_assembly(
    entity: &str,
    index: usize,
    assembly_guid: Uuid,
    component_guid: Uuid,
    project_guid: Uuid,
    assemblies: &HashMap<Uuid, (Uuid, Uuid)>,
) -> Result<(), ApiError> {
    match assemblies.get(&assembly_guid) {
        None => Err(ApiError::ReferentialIntegrity(format!(
            "{entity} at index {index} references unknown assembly {assembly_guid}"
        ))),
        Some((parent_project, _)) if *parent_project != project_guid => {
            Err(ApiError::ReferentialIntegrity(format!(
                "{entity} at index {index} declares project {project_guid} \
                 but assembly {assembly_guid} belongs to project {parent_project}"
            )))
        }
        Some((_, parent_component)) if *parent_component != component_guid => {
            Err(ApiError::ReferentialIntegrity(format!(
                "{entity} at index {index} declares component {component_guid} \
                 but assembly {assembly_guid} belongs to component {parent_component}"
            )))
        }
        Some(_) => Ok(()),
    }
}

async fn load_active_projects(
    tx: &mut Transaction<'_, Postgres>,
    tenant: Uuid,
) -> Result<HashSet<Uuid>, ApiError> {
    let guids: Vec<Uuid> =
        sqlx::query_scalar("SELECT guid FROM projects WHERE company_guid = $1 AND is_active = true")
            .bind(tenant)
            .fetch_all(&mut **tx)
            .await?;
    Ok(guids.into_iter().collect())
}

async fn load_active_components(
    tx: &mut Transaction<'_, Postgres>,
    tenant: Uuid,
) -> Result<HashMap<Uuid, Uuid>, ApiError> {
    let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
        "SELECT guid, project_guid FROM components WHERE company_guid = $1 AND is_active = true",
    )
    .bind(tenant)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows.into_iter().collect())
}

async fn load_active_assemblies(
    tx: &mut Transaction<'_, Postgres>,
    tenant: Uuid,
) -> Result<HashMap<Uuid, (Uuid, Uuid)>, ApiError> {
    let rows: Vec<(Uuid, Uuid, Uuid)> = sqlx::query_as(
        "SELECT guid, project_guid, component_guid FROM assemblies \
         WHERE company_guid = $1 AND is_active = true",
    )
    .bind(tenant)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(guid, project, component)| (guid, (project, component)))
        .collect())
}

async fn load_existing(
    tx: &mut Transaction<'_, Postgres>,
    kind: EntityKind,
    tenant: Uuid,
    guids: &[Uuid],
) -> Result<HashSet<Uuid>, ApiError> {
    if guids.is_empty() {
        return Ok(HashSet::new());
    }
    let rows: Vec<Uuid> = sqlx::query_scalar(&format!(
        "SELECT guid FROM {} WHERE company_guid = $1 AND guid = ANY($2)",
        kind.table()
    ))
    .bind(tenant)
    .bind(guids.to_vec())
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows.into_iter().collect())
}

/// Implicit deletion: active rows of this type and tenant absent from
/// the incoming snapshot were removed upstream. All roots swept by one
/// call share one generation timestamp.
async fn reconcile_missing(
    tx: &mut Transaction<'_, Postgres>,
    kind: EntityKind,
    tenant: Uuid,
    present: &[Uuid],
    actor: &CurrentUser,
) -> Result<u64, ApiError> {
    let missing: Vec<Uuid> = sqlx::query_scalar(&format!(
        "SELECT guid FROM {} WHERE company_guid = $1 AND is_active = true AND NOT (guid = ANY($2))",
        kind.table()
    ))
    .bind(tenant)
    .bind(present.to_vec())
    .fetch_all(&mut **tx)
    .await?;

    let sweep = Utc::now();
    for guid in &missing {
        cascade::soft_delete(tx, kind, *guid, Some(sweep), actor).await?;
    }
    Ok(missing.len() as u64)
}

async fn record_sync(
    tx: &mut Transaction<'_, Postgres>,
    tenant: Uuid,
    company_name: &str,
    actor: &CurrentUser,
    entity: &str,
    inserted: u64,
    updated: u64,
) -> Result<(), ApiError> {
    sqlx::query(
        "INSERT INTO workflow (company_guid, company_name, user_guid, user_name, action_type, action_value) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(tenant)
    .bind(company_name)
    .bind(actor.guid)
    .bind(&actor.email)
    .bind(WorkflowAction::SyncUpsert.as_str())
    .bind(format!("{entity}: inserted={inserted} updated={updated}"))
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn company_display_name(
    tx: &mut Transaction<'_, Postgres>,
    company_guid: Uuid,
) -> Result<String, ApiError> {
    let name: Option<String> = sqlx::query_scalar("SELECT name FROM companies WHERE guid = $1")
        .bind(company_guid)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(name.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_over_cap_is_too_large() {
        assert!(check_batch_size("pieces", MAX_SYNC_BATCH).is_ok());
        let err = check_batch_size("pieces", MAX_SYNC_BATCH + 1).unwrap_err();
        assert!(matches!(err, ApiError::PayloadTooLarge(_)));
    }

    #[test]
    fn foreign_tenant_rejects_whole_batch_with_index() {
        let tenant = Uuid::new_v4();
        let other = Uuid::new_v4();
        let err = check_batch_tenant("Project", &[tenant, other], tenant).unwrap_err();
        match err {
            ApiError::Forbidden(detail) => assert!(detail.contains("index 1"), "{detail}"),
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_guid_is_conflict_with_index() {
        let guid = Uuid::new_v4();
        let err = check_duplicate_guids("Component", &[Some(guid), None, Some(guid)]).unwrap_err();
        match err {
            ApiError::Conflict(detail) => assert!(detail.contains("index 2"), "{detail}"),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn records_without_guids_never_collide() {
        assert!(check_duplicate_guids("Piece", &[None, None, None]).is_ok());
    }

    #[test]
    fn unknown_project_reference_is_rejected() {
        let err = require_project("Component", 3, Uuid::new_v4(), &HashSet::new()).unwrap_err();
        match err {
            ApiError::ReferentialIntegrity(detail) => {
                assert!(detail.contains("Component at index 3"), "{detail}")
            }
            other => panic!("expected ReferentialIntegrity, got {other:?}"),
        }
    }

    #[test]
    fn component_in_wrong_project_is_rejected() {
        let component = Uuid::new_v4();
        let actual_project = Uuid::new_v4();
        let declared_project = Uuid::new_v4();
        let components = HashMap::from([(component, actual_project)]);

        let err = require_component("Assembly", 0, component, declared_project, &components)
            .unwrap_err();
        assert!(matches!(err, ApiError::ReferentialIntegrity(_)));

        assert!(require_component("Assembly", 0, component, actual_project, &components).is_ok());
    }

    #[test]
    fn assembly_chain_must_be_consistent() {
        let assembly = Uuid::new_v4();
        let project = Uuid::new_v4();
        let component = Uuid::new_v4();
        let assemblies = HashMap::from([(assembly, (project, component))]);

        assert!(require_assembly("Piece", 0, assembly, component, project, &assemblies).is_ok());

        // Wrong project for the declared assembly.
        let err = require_assembly("Piece", 1, assembly, component, Uuid::new_v4(), &assemblies)
            .unwrap_err();
        match err {
            ApiError::ReferentialIntegrity(detail) => {
                assert!(detail.contains("Piece at index 1"), "{detail}")
            }
            other => panic!("expected ReferentialIntegrity, got {other:?}"),
        }

        // Wrong component for the declared assembly.
        let err = require_assembly("Piece", 2, assembly, Uuid::new_v4(), project, &assemblies)
            .unwrap_err();
        assert!(matches!(err, ApiError::ReferentialIntegrity(_)));

        // Unknown assembly.
        let err = require_assembly("Piece", 3, Uuid::new_v4(), component, project, &assemblies)
            .unwrap_err();
        assert!(matches!(err, ApiError::ReferentialIntegrity(_)));
    }
}
