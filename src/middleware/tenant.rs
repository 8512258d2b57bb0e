use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{database::Database, error::ApiError, models::Role};

use super::CurrentUser;

/// The acting tenant for one unit of work. SystemAdmin gets `bypass`;
/// every other role is pinned to its own company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: Option<Uuid>,
    pub bypass: bool,
}

impl TenantContext {
    pub fn from_user(user: &CurrentUser) -> Self {
        if user.role == Role::SystemAdmin {
            Self {
                tenant_id: None,
                bypass: true,
            }
        } else {
            Self {
                tenant_id: Some(user.company_guid),
                bypass: false,
            }
        }
    }

    /// Context for internal units of work that must see all tenants,
    /// e.g. credential verification before a tenant is known.
    pub fn system() -> Self {
        Self {
            tenant_id: None,
            bypass: true,
        }
    }
}

/// Open the transaction for one unit of work and mirror the tenant
/// context into transaction-local Postgres settings consumed by the
/// row-level security policies.
///
/// Both settings are cleared first so a pooled connection can never
/// leak a previous request's tenant; `is_local = true` additionally
/// scopes the values to this transaction.
pub async fn begin_tenant_tx(
    db: &Database,
    ctx: &TenantContext,
) -> Result<Transaction<'static, Postgres>, ApiError> {
    let mut tx = db.begin().await?;

    sqlx::query("SELECT set_config('app.tenant', '', true), set_config('app.bypass_rls', '', true)")
        .execute(&mut *tx)
        .await?;

    if ctx.bypass {
        sqlx::query("SELECT set_config('app.bypass_rls', 'true', true)")
            .execute(&mut *tx)
            .await?;
    } else if let Some(tenant_id) = ctx.tenant_id {
        sqlx::query("SELECT set_config('app.tenant', $1, true)")
            .bind(tenant_id.to_string())
            .execute(&mut *tx)
            .await?;
    } else {
        // A unit of work with neither tenant nor bypass is a defect in
        // the caller; RLS fails closed and returns zero rows.
        log::warn!("tenant context not set for scoped unit of work");
    }

    Ok(tx)
}

/// Application-level tenant filter, the second line of defense beyond
/// RLS. Returns the company to constrain queries to, or `None` when the
/// caller bypasses tenant filtering.
pub fn tenant_scope(ctx: &TenantContext) -> Option<Uuid> {
    if ctx.bypass {
        None
    } else {
        ctx.tenant_id
    }
}

/// Validate an explicitly requested company against the caller's tenant.
/// Cross-tenant requests fail with `Forbidden`, never silently narrow.
pub fn verify_company_access(
    resource_company_guid: Uuid,
    user: &CurrentUser,
) -> Result<(), ApiError> {
    if user.role == Role::SystemAdmin || resource_company_guid == user.company_guid {
        Ok(())
    } else {
        log::warn!(
            "cross-tenant access attempt: user {} (company {}) requested company {}",
            user.guid,
            user.company_guid,
            resource_company_guid
        );
        Err(ApiError::Forbidden(
            "you don't have permission to access resources from another company".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, company: Uuid) -> CurrentUser {
        CurrentUser {
            guid: Uuid::new_v4(),
            company_guid: company,
            role,
            email: "user@example.com".to_string(),
        }
    }

    #[test]
    fn system_admin_gets_bypass() {
        let ctx = TenantContext::from_user(&user(Role::SystemAdmin, Uuid::new_v4()));
        assert!(ctx.bypass);
        assert_eq!(ctx.tenant_id, None);
        assert_eq!(tenant_scope(&ctx), None);
    }

    #[test]
    fn other_roles_are_pinned_to_their_company() {
        let company = Uuid::new_v4();
        for role in [
            Role::CompanyAdmin,
            Role::ProjectManager,
            Role::Operator,
            Role::Integration,
        ] {
            let ctx = TenantContext::from_user(&user(role, company));
            assert!(!ctx.bypass);
            assert_eq!(ctx.tenant_id, Some(company));
            assert_eq!(tenant_scope(&ctx), Some(company));
        }
    }

    #[test]
    fn company_access_allows_own_company() {
        let company = Uuid::new_v4();
        let caller = user(Role::Operator, company);
        assert!(verify_company_access(company, &caller).is_ok());
    }

    #[test]
    fn company_access_rejects_other_company() {
        let caller = user(Role::CompanyAdmin, Uuid::new_v4());
        let err = verify_company_access(Uuid::new_v4(), &caller).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn company_access_allows_admin_everywhere() {
        let caller = user(Role::SystemAdmin, Uuid::new_v4());
        assert!(verify_company_access(Uuid::new_v4(), &caller).is_ok());
    }
}
