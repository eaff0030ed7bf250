//! Lectern Server - Library Catalog
//!
//! A Rust REST API server for a library catalog with loan tracking.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("lectern_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lectern Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Catalog index
        .route("/catalog", get(api::catalog::index))
        // Books
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        // Authors
        .route("/authors", get(api::authors::list_authors))
        .route("/authors", post(api::authors::create_author))
        .route("/authors/:id", get(api::authors::get_author))
        .route("/authors/:id", put(api::authors::update_author))
        .route("/authors/:id", delete(api::authors::delete_author))
        // Loans
        .route("/loans/mine", get(api::loans::my_loans))
        .route("/loans/borrowed", get(api::loans::all_borrowed))
        .route("/instances/:id/renewal", get(api::loans::renewal_form))
        .route("/instances/:id/renewal", post(api::loans::renew_instance))
        // Admin: genres
        .route("/admin/genres", get(api::admin::list_genres))
        .route("/admin/genres", post(api::admin::create_genre))
        .route("/admin/genres/:id", put(api::admin::update_genre))
        .route("/admin/genres/:id", delete(api::admin::delete_genre))
        // Admin: languages
        .route("/admin/languages", get(api::admin::list_languages))
        .route("/admin/languages", post(api::admin::create_language))
        .route("/admin/languages/:id", put(api::admin::update_language))
        .route("/admin/languages/:id", delete(api::admin::delete_language))
        // Admin: authors
        .route("/admin/authors", post(api::admin::create_author))
        .route("/admin/authors/:id", put(api::admin::update_author))
        .route("/admin/authors/:id", delete(api::admin::delete_author))
        // Admin: books
        .route("/admin/books", post(api::admin::create_book))
        .route("/admin/books/:id", put(api::admin::update_book))
        .route("/admin/books/:id", delete(api::admin::delete_book))
        // Admin: book instances
        .route("/admin/instances", get(api::admin::list_instances))
        .route("/admin/instances", post(api::admin::create_instance))
        .route("/admin/instances/:id", get(api::admin::get_instance))
        .route("/admin/instances/:id", put(api::admin::update_instance))
        .route("/admin/instances/:id", delete(api::admin::delete_instance))
        // Admin: users
        .route("/admin/users", get(api::admin::list_users))
        .route("/admin/users", post(api::admin::create_user))
        .route("/admin/users/:id", delete(api::admin::delete_user))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
