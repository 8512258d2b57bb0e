pub mod permission;
pub mod tenant;

pub use permission::{authenticate, require_roles, CurrentUser};
pub use tenant::{begin_tenant_tx, tenant_scope, verify_company_access, TenantContext};
