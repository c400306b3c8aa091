//! Connection ownership, schema creation and sample data.

use crate::error::StoreError;
use crate::functions;
use crate::queries::Queries;
use crate::session::Session;
use dvdrental_rs_config::DatabaseSettings;
use dvdrental_rs_schema::{Schema, dvdrental, sql};
use log::{debug, info};
use rusqlite::Connection;
use std::path::Path;

const SAMPLE_SQL: &str = include_str!("../fixtures/dvdrental_sample.sql");

/// A SQLite database holding the dvdrental schema.
///
/// Statements issued directly on the database autocommit. Use
/// [`Database::session`] to group work that is rolled back unless committed.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    schema: Schema,
    location: String,
}

impl Database {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        Self::configure(conn, path.display().to_string())
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn, ":memory:".to_string())
    }

    /// Open the configured database, create the schema and optionally seed
    /// the sample data.
    pub fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let mut database = if settings.is_in_memory() {
            Self::open_in_memory()?
        } else {
            Self::open(&settings.path)?
        };
        database.create_schema()?;
        if settings.seed_sample {
            database.seed_sample()?;
        }
        Ok(database)
    }

    fn configure(conn: Connection, location: String) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", true)?;
        functions::register(&conn)?;
        info!("opened database (location={location})");
        Ok(Self {
            conn,
            schema: dvdrental(),
            location,
        })
    }

    /// File path, or `:memory:`.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Create every table, index and view that does not exist yet.
    pub fn create_schema(&self) -> Result<(), StoreError> {
        let statements = sql::create_schema(&self.schema)?;
        for statement in &statements {
            self.conn.execute_batch(statement)?;
        }
        info!(
            "schema created (location={}, statements={})",
            self.location,
            statements.len()
        );
        Ok(())
    }

    /// Load the embedded sample dataset in one transaction.
    ///
    /// Returns `false` without writing when the database already has data.
    pub fn seed_sample(&mut self) -> Result<bool, StoreError> {
        let existing: i64 = self
            .conn
            .query_row("SELECT count(*) FROM language", [], |row| row.get(0))?;
        if existing > 0 {
            debug!("sample data already present (location={})", self.location);
            return Ok(false);
        }
        let tx = self.conn.transaction()?;
        tx.execute_batch(SAMPLE_SQL)?;
        tx.commit()?;
        info!("sample data loaded (location={})", self.location);
        Ok(true)
    }

    /// Start a transaction that rolls back unless [`Session::commit`] is
    /// called.
    pub fn session(&mut self) -> Result<Session<'_>, StoreError> {
        let tx = self.conn.transaction()?;
        debug!("session started (location={})", self.location);
        Ok(Session::new(tx, &self.schema))
    }
}

impl Queries for Database {
    fn connection(&self) -> &Connection {
        &self.conn
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}
