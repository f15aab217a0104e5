use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Opens the PostgreSQL pool used by the staff repository
///
/// The pool lives for the whole process and is closed by `main` on shutdown.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Applies the migrations embedded from `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
