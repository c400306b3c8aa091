//! Schema descriptors for the dvdrental sample database.
//!
//! Descriptors are plain data: tables, columns, keys, relationships and views.
//! The [`sql`] module renders them into SQLite DDL and parameterized `SELECT`
//! statements for a driver to execute.

mod catalog;
mod error;
mod model;
pub mod sql;

pub use catalog::{MPAA_RATINGS, dvdrental};
pub use error::SchemaError;
pub use model::{
    Cardinality, Column, ColumnType, ForeignKey, Index, JoinCondition, LoadStrategy,
    ReferentialAction, Relationship, Schema, ServerDefault, Table, View,
};
