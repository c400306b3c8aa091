//! Unit of work over one transaction.

use crate::error::StoreError;
use crate::queries::Queries;
use dvdrental_rs_schema::Schema;
use log::debug;
use rusqlite::{Connection, Transaction};

/// Transaction-scoped view of a [`crate::Database`].
///
/// Dropping a session without calling [`Session::commit`] rolls back every
/// statement it ran.
#[derive(Debug)]
pub struct Session<'db> {
    tx: Transaction<'db>,
    schema: &'db Schema,
}

impl<'db> Session<'db> {
    pub(crate) fn new(tx: Transaction<'db>, schema: &'db Schema) -> Self {
        Self { tx, schema }
    }

    pub fn commit(self) -> Result<(), StoreError> {
        self.tx.commit()?;
        debug!("session committed");
        Ok(())
    }

    pub fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback()?;
        debug!("session rolled back");
        Ok(())
    }
}

impl Queries for Session<'_> {
    fn connection(&self) -> &Connection {
        &self.tx
    }

    fn schema(&self) -> &Schema {
        self.schema
    }
}
