use diesel::connection::{Instrumentation, InstrumentationEvent, SimpleConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Pool of SQLite connections shared by the repository.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Connection checked out of [`DbPool`].
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

const DEFAULT_POOL_SIZE: u32 = 8;
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Applied to every connection the pool opens.
#[derive(Debug, Clone, Copy)]
struct SqliteSetup {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqliteSetup {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL; PRAGMA busy_timeout = {};",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)?;
        conn.set_instrumentation(QueryLogger);
        Ok(())
    }
}

/// Logs every statement executed on a pooled connection.
#[derive(Debug, Default)]
pub struct QueryLogger;

impl Instrumentation for QueryLogger {
    fn on_connection_event(&mut self, event: InstrumentationEvent<'_>) {
        if let InstrumentationEvent::FinishQuery { query, error, .. } = event {
            match error {
                Some(err) => log::warn!("Query failed: {query}: {err}"),
                None => log::trace!("Query: {query}"),
            }
        }
    }
}

/// Open a pool with the default size.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    build_connection_pool(database_url, DEFAULT_POOL_SIZE)
}

/// Open a pool of at most `max_size` connections to `database_url`.
pub fn build_connection_pool(database_url: &str, max_size: u32) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size.max(1))
        .connection_customizer(Box::new(SqliteSetup {
            busy_timeout_ms: BUSY_TIMEOUT_MS,
        }))
        .build(manager)
}

/// Apply any migrations that have not run yet. Returns how many were applied.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in &applied {
        log::info!("Applied migration {version}");
    }
    Ok(applied.len())
}
