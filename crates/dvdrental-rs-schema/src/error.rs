//! Error types for schema lookups and statement building.

use thiserror::Error;

/// Errors returned while resolving or rendering schema descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Table name is not part of the schema.
    #[error("unknown table: {0}")]
    UnknownTable(String),
    /// Column name is not part of the table.
    #[error("unknown column: {table}.{column}")]
    UnknownColumn { table: String, column: String },
    /// Relationship name is not declared on the table.
    #[error("unknown relationship: {table}.{relationship}")]
    UnknownRelationship { table: String, relationship: String },
    /// No foreign key links the two tables.
    #[error("no foreign key joins {from} to {to}")]
    NoJoinPath { from: String, to: String },
    /// More than one foreign key links the two tables.
    #[error("ambiguous join between {from} and {to}: {candidates} foreign keys")]
    AmbiguousJoin {
        from: String,
        to: String,
        candidates: usize,
    },
    /// Operation needs a single-column primary key.
    #[error("table {0} has no single-column primary key")]
    NoPrimaryKey(String),
    /// Foreign keys form a cycle, so no creation order exists.
    #[error("foreign key cycle involving: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),
}
