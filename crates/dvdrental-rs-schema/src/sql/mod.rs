//! SQL text rendered from schema descriptors.
//!
//! `expr` and `select` build parameterized `SELECT` statements with named
//! bind parameters; `ddl` renders `CREATE` statements for SQLite.

mod ddl;
mod expr;
mod select;

pub use ddl::{create_index, create_schema, create_table, create_view, quote_ident};
pub use expr::{ColumnRef, CompareOp, Compiled, Expr, SqlValue};
pub use select::{JoinKind, Order, Select, select_all};
