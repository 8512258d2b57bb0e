use sqlx::{PgPool, Pool, Postgres};

pub type Database = Pool<Postgres>;

/// Every table carrying `company_guid`; each one gets a row-level
/// security policy in [`apply_rls_policies`].
const SCOPED_TABLES: [&str; 7] = [
    "users",
    "projects",
    "components",
    "assemblies",
    "pieces",
    "articles",
    "workflow",
];

pub async fn create_database_pool(database_url: &str) -> Result<Database, sqlx::Error> {
    let pool = PgPool::connect(database_url).await?;

    // Test the connection
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    Ok(pool)
}

/// Idempotent schema bootstrap: tables, indexes, then RLS policies.
pub async fn init_schema(db: &Database) -> Result<(), sqlx::Error> {
    for ddl in SCHEMA_DDL {
        sqlx::query(ddl).execute(db).await?;
    }
    apply_rls_policies(db).await?;
    Ok(())
}

/// Enable and force row-level security on every scoped table and
/// (re-)create the tenant isolation policy. The predicate is evaluated
/// by the engine on every statement, independent of application code:
/// with neither `app.tenant` nor `app.bypass_rls` set, scoped queries
/// return zero rows.
pub async fn apply_rls_policies(db: &Database) -> Result<(), sqlx::Error> {
    for table in SCOPED_TABLES {
        sqlx::query(&format!(
            "ALTER TABLE {table} ENABLE ROW LEVEL SECURITY"
        ))
        .execute(db)
        .await?;
        // FORCE so the policy binds even for the table owner.
        sqlx::query(&format!("ALTER TABLE {table} FORCE ROW LEVEL SECURITY"))
            .execute(db)
            .await?;
        sqlx::query(&format!(
            "DROP POLICY IF EXISTS tenant_isolation ON {table}"
        ))
        .execute(db)
        .await?;
        sqlx::query(&format!(
            "CREATE POLICY tenant_isolation ON {table} FOR ALL \
             USING ({TENANT_PREDICATE}) WITH CHECK ({TENANT_PREDICATE})"
        ))
        .execute(db)
        .await?;
        log::info!("tenant isolation policy applied on {table}");
    }
    Ok(())
}

const TENANT_PREDICATE: &str = "company_guid = NULLIF(current_setting('app.tenant', true), '')::uuid \
     OR COALESCE(NULLIF(current_setting('app.bypass_rls', true), ''), 'false')::boolean";

const SCHEMA_DDL: [&str; 16] = [
    "CREATE TABLE IF NOT EXISTS companies (
        guid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        short_name TEXT,
        is_active BOOLEAN NOT NULL DEFAULT true,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS users (
        guid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        company_guid UUID NOT NULL REFERENCES companies(guid),
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        role TEXT NOT NULL DEFAULT 'Operator',
        is_active BOOLEAN NOT NULL DEFAULT true,
        deleted_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS projects (
        guid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        company_guid UUID NOT NULL REFERENCES companies(guid),
        code TEXT NOT NULL,
        due_date TIMESTAMPTZ,
        in_production BOOLEAN NOT NULL DEFAULT false,
        company_name TEXT,
        is_active BOOLEAN NOT NULL DEFAULT true,
        deleted_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS components (
        guid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        company_guid UUID NOT NULL REFERENCES companies(guid),
        project_guid UUID NOT NULL REFERENCES projects(guid),
        code TEXT NOT NULL,
        designation TEXT,
        quantity INTEGER NOT NULL DEFAULT 1,
        is_active BOOLEAN NOT NULL DEFAULT true,
        deleted_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS assemblies (
        guid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        company_guid UUID NOT NULL REFERENCES companies(guid),
        project_guid UUID NOT NULL REFERENCES projects(guid),
        component_guid UUID NOT NULL REFERENCES components(guid),
        trolley TEXT,
        cell_number INTEGER,
        is_active BOOLEAN NOT NULL DEFAULT true,
        deleted_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS pieces (
        guid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        company_guid UUID NOT NULL REFERENCES companies(guid),
        project_guid UUID NOT NULL REFERENCES projects(guid),
        component_guid UUID NOT NULL REFERENCES components(guid),
        assembly_guid UUID REFERENCES assemblies(guid),
        piece_code TEXT NOT NULL,
        barcode TEXT,
        outer_length INTEGER,
        orientation TEXT,
        is_active BOOLEAN NOT NULL DEFAULT true,
        deleted_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS articles (
        guid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        company_guid UUID NOT NULL REFERENCES companies(guid),
        project_guid UUID NOT NULL REFERENCES projects(guid),
        component_guid UUID NOT NULL REFERENCES components(guid),
        code TEXT NOT NULL,
        designation TEXT,
        quantity DOUBLE PRECISION,
        unit TEXT,
        is_active BOOLEAN NOT NULL DEFAULT true,
        deleted_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS workflow (
        guid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        company_guid UUID NOT NULL REFERENCES companies(guid),
        company_name TEXT,
        user_guid UUID,
        user_name TEXT,
        action_type TEXT NOT NULL,
        action_value TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_users_company ON users(company_guid)",
    "CREATE INDEX IF NOT EXISTS idx_projects_company ON projects(company_guid)",
    "CREATE INDEX IF NOT EXISTS idx_components_project ON components(project_guid)",
    "CREATE INDEX IF NOT EXISTS idx_assemblies_component ON assemblies(component_guid)",
    "CREATE INDEX IF NOT EXISTS idx_pieces_component ON pieces(component_guid)",
    "CREATE INDEX IF NOT EXISTS idx_pieces_assembly ON pieces(assembly_guid)",
    "CREATE INDEX IF NOT EXISTS idx_articles_component ON articles(component_guid)",
    "CREATE INDEX IF NOT EXISTS idx_workflow_company ON workflow(company_guid)",
];
