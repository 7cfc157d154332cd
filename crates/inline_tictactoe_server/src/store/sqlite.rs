//! SQLite-backed key-value store.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use super::models::NewKvEntry;
use super::schema::kv_entries;
use super::{KeyValueStore, StoreError, bump_counter, parse_counter};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Key-value store persisted in one SQLite table.
///
/// Each operation opens its own connection, so the store is cheap to clone
/// and can be shared across threads. Connections run in WAL mode and wait
/// up to [`BUSY_TIMEOUT_MS`] for a competing writer instead of failing with
/// `SQLITE_BUSY`. The path must name a file: `":memory:"` would give every
/// operation a fresh, empty database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the database at `db_path`, creating it and applying pending
    /// migrations if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn open(db_path: impl AsRef<str>) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.as_ref().to_string(),
        };

        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migrations failed: {}", e)))?;

        info!(path = %store.db_path, migrations = applied.len(), "SQLite store ready");
        Ok(store)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection that waits on locks.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;

        // busy_timeout first: switching to WAL needs the lock itself.
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
            BUSY_TIMEOUT_MS
        ))?;
        Ok(conn)
    }
}

/// Reads one value on an open connection.
fn read_value(conn: &mut SqliteConnection, key: &str) -> QueryResult<Option<String>> {
    kv_entries::table
        .find(key)
        .select(kv_entries::value)
        .first::<String>(conn)
        .optional()
}

/// Inserts or replaces one value on an open connection.
fn write_value(conn: &mut SqliteConnection, key: &str, value: &str) -> QueryResult<usize> {
    let now = chrono::Utc::now().naive_utc();
    diesel::insert_into(kv_entries::table)
        .values(&NewKvEntry::new(key, value, now))
        .on_conflict(kv_entries::key)
        .do_update()
        .set((kv_entries::value.eq(value), kv_entries::updated_at.eq(now)))
        .execute(conn)
}

impl KeyValueStore for SqliteStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection()?;
        let value = read_value(&mut conn, key)?;
        debug!(found = value.is_some(), "Key looked up");
        Ok(value)
    }

    #[instrument(skip(self, value))]
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        write_value(&mut conn, key, value)?;
        debug!("Key written");
        Ok(())
    }

    #[instrument(skip(self))]
    fn increment(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection()?;

        // BEGIN IMMEDIATE takes the write lock before reading the counter.
        let current = conn.immediate_transaction(|conn| {
            let current = match read_value(conn, key)? {
                Some(raw) => parse_counter(key, &raw)?,
                None => 1,
            };
            let next = bump_counter(key, current)?;
            write_value(conn, key, &next.to_string())?;
            Ok::<_, StoreError>(current)
        })?;

        debug!(value = current, "Counter incremented");
        Ok(current)
    }
}
