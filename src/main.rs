use axum::{
    routing::{delete, get, post},
    Router,
};
use dotenvy::dotenv;
use std::env;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use fabrika::database::{self, create_database_pool, Database};
use fabrika::handlers;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // Fail fast if the signing key is missing rather than on the first login.
    env::var("JWT_SECRET").expect("JWT_SECRET must be set");

    let db = create_database_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    database::init_schema(&db)
        .await
        .expect("Failed to initialize schema and tenant policies");

    let app = create_router(db);

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    log::info!("fabrika server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn create_router(db: Database) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/login", post(handlers::auth::login))
        // Companies (tenant roots)
        .route("/companies", get(handlers::companies::list_companies))
        .route("/companies/:guid", get(handlers::companies::get_company))
        // Projects
        .route("/projects", get(handlers::projects::list_projects))
        .route("/projects/:guid", get(handlers::projects::get_project))
        .route("/projects/:guid", delete(handlers::projects::delete_project))
        .route("/projects/:guid/restore", post(handlers::projects::restore_project))
        // Components
        .route("/components", get(handlers::components::list_components))
        .route("/components/:guid", get(handlers::components::get_component))
        .route("/components/:guid", delete(handlers::components::delete_component))
        .route("/components/:guid/restore", post(handlers::components::restore_component))
        // Assemblies
        .route("/assemblies", get(handlers::assemblies::list_assemblies))
        .route("/assemblies/:guid", get(handlers::assemblies::get_assembly))
        .route("/assemblies/:guid", delete(handlers::assemblies::delete_assembly))
        .route("/assemblies/:guid/restore", post(handlers::assemblies::restore_assembly))
        // Pieces
        .route("/pieces", get(handlers::pieces::list_pieces))
        .route("/pieces/:guid", get(handlers::pieces::get_piece))
        .route("/pieces/:guid", delete(handlers::pieces::delete_piece))
        .route("/pieces/:guid/restore", post(handlers::pieces::restore_piece))
        // Articles
        .route("/articles", get(handlers::articles::list_articles))
        .route("/articles/:guid", get(handlers::articles::get_article))
        .route("/articles/:guid", delete(handlers::articles::delete_article))
        .route("/articles/:guid/restore", post(handlers::articles::restore_article))
        // Audit trail
        .route("/workflow", get(handlers::workflow::list_workflow))
        // Bulk reconciliation sync
        .route("/sync/projects", post(handlers::sync::sync_projects))
        .route("/sync/components", post(handlers::sync::sync_components))
        .route("/sync/assemblies", post(handlers::sync::sync_assemblies))
        .route("/sync/pieces", post(handlers::sync::sync_pieces))
        .route("/sync/articles", post(handlers::sync::sync_articles));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(db)
}
