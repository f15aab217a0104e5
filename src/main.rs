use std::sync::Arc;

use shop_staff_api::api::router::build_router;
use shop_staff_api::api::state::AppState;
use shop_staff_api::config::{AppConfig, StoreKind};
use shop_staff_api::domain::repositories::StaffRepository;
use shop_staff_api::infrastructure::database;
use shop_staff_api::infrastructure::repositories::{
    InMemoryStaffRepository, PostgresStaffRepository,
};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to the configured store
    let (staff, pool) = match config.store {
        StoreKind::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = database::connect(&config.database_url, config.max_connections)
                .await
                .expect("Failed to connect to database");

            database::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");

            tracing::info!("Database connected successfully");
            let repo: Arc<dyn StaffRepository> = Arc::new(PostgresStaffRepository::new(pool.clone()));
            (repo, Some(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory staff store, data is lost on shutdown");
            let repo: Arc<dyn StaffRepository> = Arc::new(InMemoryStaffRepository::new());
            (repo, None)
        }
    };

    if config.auth.is_enabled() {
        tracing::info!("Bearer authentication enabled on staff routes");
    } else {
        tracing::warn!("Authentication disabled on staff routes");
    }

    let state = AppState::new(staff, config.auth.clone(), config.bcrypt_cost);
    let app = build_router(state, &config.route_prefix);

    // Start server
    tracing::info!(
        "Server listening on {} (staff routes at '{}')",
        config.bind_addr,
        config.route_prefix
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database connection closed");
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
