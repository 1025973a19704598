use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::storage::StorageService;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract `State<PgPool>` or
/// `State<Arc<StorageService>>` directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub storage: Arc<StorageService>,
}

impl AppState {
    pub fn new(pool: Pool<Postgres>, storage: StorageService) -> Self {
        Self {
            pool,
            storage: Arc::new(storage),
        }
    }
}

/// Pool created lazily: no connections are opened until the first query, so
/// the pool is not tied to the runtime that happened to build it.
static POOL: OnceLock<Pool<Postgres>> = OnceLock::new();
static MIGRATED: AtomicBool = AtomicBool::new(false);

/// Create a new database connection pool from environment variables.
pub fn create_pool() -> Pool<Postgres> {
    // Load .env file if present (ignored in production where env vars are set directly).
    let _ = dotenvy::dotenv();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    create_pool_for(&database_url)
}

/// Lazy pool for an explicit connection string.
pub fn create_pool_for(database_url: &str) -> Pool<Postgres> {
    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(database_url)
        .expect("Failed to create database pool")
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Get or initialize the database connection pool.
/// Migrations run once on the first call; subsequent calls return immediately.
///
/// Used by server functions, which share one long-lived runtime. REST
/// handlers use `State<PgPool>` from `AppState` instead.
pub async fn get_db() -> &'static Pool<Postgres> {
    let pool = POOL.get_or_init(create_pool);

    if !MIGRATED.swap(true, Ordering::SeqCst) {
        if let Err(e) = run_migrations(pool).await {
            tracing::error!(error = %e, "Database migrations failed");
            MIGRATED.store(false, Ordering::SeqCst);
        }
    }

    pool
}

/// Process-wide storage service used by server functions.
pub fn get_storage() -> &'static StorageService {
    static STORAGE: OnceLock<StorageService> = OnceLock::new();
    STORAGE.get_or_init(StorageService::from_config)
}
