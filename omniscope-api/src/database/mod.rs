pub mod calendar_events;
pub mod companies;
pub mod contacts;
pub mod meetings;
pub mod migrations;
pub mod name_references;
pub mod tasks;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type DbConnection = Arc<Mutex<Connection>>;

#[derive(Clone)]
pub struct AsyncDbConnection {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl AsyncDbConnection {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn lock(&self) -> anyhow::Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| anyhow::anyhow!("Failed to get DB connection from pool: {}", e))
    }
}

/// A lookup by id found no row. Handlers map this to 404.
#[derive(Debug)]
pub struct RecordNotFound {
    pub kind: &'static str,
    pub id: i64,
}

impl std::fmt::Display for RecordNotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} not found", self.kind, self.id)
    }
}

impl std::error::Error for RecordNotFound {}

pub(crate) fn not_found(kind: &'static str, id: i64) -> anyhow::Error {
    RecordNotFound { kind, id }.into()
}

/// A write the current state of the records does not allow. Handlers map this to 400.
#[derive(Debug)]
pub struct InvalidOperation(pub String);

impl std::fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InvalidOperation {}

pub(crate) fn invalid_operation(message: String) -> anyhow::Error {
    InvalidOperation(message).into()
}

pub struct Database {
    pub connection: DbConnection,
    pub async_connection: AsyncDbConnection,
}

impl Database {
    /// Create a new database connection and run migrations
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        // Ensure directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Run migrations on the sync connection before the pool opens
        let sync_conn = Connection::open(db_path)?;
        migrations::run_migrations(&sync_conn)?;
        let sync_mutex = Arc::new(Mutex::new(sync_conn));

        // Pooled connections see the migrated schema
        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(8).build(manager)?;

        Ok(Database {
            connection: sync_mutex,
            async_connection: AsyncDbConnection::new(pool),
        })
    }

    /// Cheap round trip used by the health endpoint
    pub fn ping(&self) -> anyhow::Result<()> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| anyhow::anyhow!("Database connection lock poisoned"))?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_database() -> (tempfile::TempDir, Arc<Database>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db = Database::new(&dir.path().join("test.sqlite3")).expect("open test database");
    (dir, Arc::new(db))
}
