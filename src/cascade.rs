use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::ApiError,
    hierarchy::EntityKind,
    middleware::CurrentUser,
    models::WorkflowAction,
};

/// Cascade soft delete.
///
/// One generation timestamp is minted per invocation (or taken from the
/// caller) and stamped on the root and every active descendant reached
/// through the hierarchy. Descendants that are already inactive keep
/// their earlier `deleted_at`, so independent deletions stay separate
/// generations. Re-deleting an already-deleted root simply re-stamps it.
///
/// Runs entirely inside the caller's transaction: a failure anywhere
/// rolls back the whole cascade, audit rows included.
pub async fn soft_delete(
    tx: &mut Transaction<'_, Postgres>,
    kind: EntityKind,
    guid: Uuid,
    deleted_at: Option<DateTime<Utc>>,
    actor: &CurrentUser,
) -> Result<(), ApiError> {
    let generation = deleted_at.unwrap_or_else(Utc::now);

    let root_company: Option<Uuid> = sqlx::query_scalar(&format!(
        "UPDATE {} SET is_active = false, deleted_at = $1, updated_at = now() \
         WHERE guid = $2 RETURNING company_guid",
        kind.table()
    ))
    .bind(generation)
    .bind(guid)
    .fetch_optional(&mut **tx)
    .await?;

    // Rows outside the caller's tenant are invisible here, so a
    // cross-tenant guid is indistinguishable from a missing one.
    let Some(company_guid) = root_company else {
        return Err(ApiError::NotFound(format!("{kind} {guid} not found")));
    };

    let company_name = company_display_name(tx, company_guid).await?;
    record_action(
        tx,
        company_guid,
        &company_name,
        actor,
        WorkflowAction::SoftDelete,
        kind,
        guid,
    )
    .await?;

    let mut worklist: Vec<(EntityKind, Uuid)> = vec![(kind, guid)];
    while let Some((parent_kind, parent_guid)) = worklist.pop() {
        for edge in parent_kind.children() {
            let children: Vec<Uuid> = sqlx::query_scalar(&format!(
                "UPDATE {} SET is_active = false, deleted_at = $1, updated_at = now() \
                 WHERE {} = $2 AND is_active = true RETURNING guid",
                edge.kind.table(),
                edge.fk_column
            ))
            .bind(generation)
            .bind(parent_guid)
            .fetch_all(&mut **tx)
            .await?;

            for child_guid in &children {
                record_action(
                    tx,
                    company_guid,
                    &company_name,
                    actor,
                    WorkflowAction::SoftDelete,
                    edge.kind,
                    *child_guid,
                )
                .await?;
            }
            worklist.extend(children.into_iter().map(|g| (edge.kind, g)));
        }
    }

    Ok(())
}

/// Selective restore.
///
/// Reactivates the named entity and exactly those descendants whose
/// `deleted_at` equals the root's generation at the time of the call.
/// Descendants deleted in an unrelated operation keep their own
/// `deleted_at` and stay inactive. Restoring an already-active entity
/// is a no-op.
///
/// Restoring an entity whose immediate parent is still inactive is
/// rejected with `Conflict`: an active child under an inactive parent
/// would break every listing that trusts the hierarchy.
pub async fn restore(
    tx: &mut Transaction<'_, Postgres>,
    kind: EntityKind,
    guid: Uuid,
    deleted_at: Option<DateTime<Utc>>,
    actor: &CurrentUser,
) -> Result<(), ApiError> {
    let row: Option<(Uuid, Option<DateTime<Utc>>)> = sqlx::query_as(&format!(
        "SELECT company_guid, deleted_at FROM {} WHERE guid = $1",
        kind.table()
    ))
    .bind(guid)
    .fetch_optional(&mut **tx)
    .await?;

    let Some((company_guid, current_deleted_at)) = row else {
        return Err(ApiError::NotFound(format!("{kind} {guid} not found")));
    };

    let generation = match deleted_at.or(current_deleted_at) {
        Some(generation) => generation,
        None => return Ok(()),
    };

    ensure_parent_active(tx, kind, guid).await?;

    sqlx::query(&format!(
        "UPDATE {} SET is_active = true, deleted_at = NULL, updated_at = now() WHERE guid = $1",
        kind.table()
    ))
    .bind(guid)
    .execute(&mut **tx)
    .await?;

    let company_name = company_display_name(tx, company_guid).await?;
    record_action(
        tx,
        company_guid,
        &company_name,
        actor,
        WorkflowAction::Restore,
        kind,
        guid,
    )
    .await?;

    let mut worklist: Vec<(EntityKind, Uuid)> = vec![(kind, guid)];
    while let Some((parent_kind, parent_guid)) = worklist.pop() {
        for edge in parent_kind.children() {
            let children: Vec<Uuid> = sqlx::query_scalar(&format!(
                "UPDATE {} SET is_active = true, deleted_at = NULL, updated_at = now() \
                 WHERE {} = $1 AND is_active = false AND deleted_at = $2 RETURNING guid",
                edge.kind.table(),
                edge.fk_column
            ))
            .bind(parent_guid)
            .bind(generation)
            .fetch_all(&mut **tx)
            .await?;

            for child_guid in &children {
                record_action(
                    tx,
                    company_guid,
                    &company_name,
                    actor,
                    WorkflowAction::Restore,
                    edge.kind,
                    *child_guid,
                )
                .await?;
            }
            worklist.extend(children.into_iter().map(|g| (edge.kind, g)));
        }
    }

    Ok(())
}

/// Check the nearest present parent of `guid` is active. A piece checks
/// its assembly when it has one, otherwise its component; projects have
/// nothing to check.
async fn ensure_parent_active(
    tx: &mut Transaction<'_, Postgres>,
    kind: EntityKind,
    guid: Uuid,
) -> Result<(), ApiError> {
    for (parent_kind, fk_column) in kind.parent_columns() {
        let parent_guid: Option<Option<Uuid>> = sqlx::query_scalar(&format!(
            "SELECT {} FROM {} WHERE guid = $1",
            fk_column,
            kind.table()
        ))
        .bind(guid)
        .fetch_optional(&mut **tx)
        .await?;

        let Some(parent_guid) = parent_guid.flatten() else {
            continue;
        };

        let parent_active: Option<bool> = sqlx::query_scalar(&format!(
            "SELECT is_active FROM {} WHERE guid = $1",
            parent_kind.table()
        ))
        .bind(parent_guid)
        .fetch_optional(&mut **tx)
        .await?;

        if parent_active != Some(true) {
            return Err(ApiError::Conflict(format!(
                "cannot restore {kind} {guid}: its parent {parent_kind} {parent_guid} is inactive"
            )));
        }
        return Ok(());
    }
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

/// Append one audit row. Runs in the cascade's transaction: if the
/// audit write fails, the whole operation fails with it.
async fn record_action(
    tx: &mut Transaction<'_, Postgres>,
    company_guid: Uuid,
    company_name: &str,
    actor: &CurrentUser,
    action: WorkflowAction,
    kind: EntityKind,
    guid: Uuid,
) -> Result<(), ApiError> {
    sqlx::query(
        "INSERT INTO workflow (company_guid, company_name, user_guid, user_name, action_type, action_value) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(company_guid)
    .bind(company_name)
    .bind(actor.guid)
    .bind(&actor.email)
    .bind(action.as_str())
    .bind(format!("{kind}:{guid}"))
    .execute(&mut **tx)
    .await?;
    Ok(())
}
