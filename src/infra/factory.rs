use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::Clock;
use crate::infra::clock::SystemClock;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_agenda_repo::PostgresAgendaRepo, postgres_business_repo::PostgresBusinessRepo,
    postgres_reservation_repo::PostgresReservationRepo, postgres_service_repo::PostgresServiceRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_agenda_repo::SqliteAgendaRepo, sqlite_business_repo::SqliteBusinessRepo,
    sqlite_reservation_repo::SqliteReservationRepo, sqlite_service_repo::SqliteServiceRepo,
    sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    bootstrap_state_with_clock(config, Arc::new(SystemClock)).await
}

pub async fn bootstrap_state_with_clock(config: &Config, clock: Arc<dyn Clock>) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections.unwrap_or(10))
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_state(config, pool, clock)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections.unwrap_or(5))
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_state(config, pool, clock)
    }
}

pub fn sqlite_state(config: &Config, pool: SqlitePool, clock: Arc<dyn Clock>) -> AppState {
    AppState {
        config: config.clone(),
        business_repo: Arc::new(SqliteBusinessRepo::new(pool.clone())),
        user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
        service_repo: Arc::new(SqliteServiceRepo::new(pool.clone())),
        agenda_repo: Arc::new(SqliteAgendaRepo::new(pool.clone())),
        reservation_repo: Arc::new(SqliteReservationRepo::new(pool)),
        clock,
    }
}

pub fn postgres_state(config: &Config, pool: PgPool, clock: Arc<dyn Clock>) -> AppState {
    AppState {
        config: config.clone(),
        business_repo: Arc::new(PostgresBusinessRepo::new(pool.clone())),
        user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
        service_repo: Arc::new(PostgresServiceRepo::new(pool.clone())),
        agenda_repo: Arc::new(PostgresAgendaRepo::new(pool.clone())),
        reservation_repo: Arc::new(PostgresReservationRepo::new(pool)),
        clock,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
