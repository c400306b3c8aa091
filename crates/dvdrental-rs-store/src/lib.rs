//! SQLite access to the dvdrental sample database.
//!
//! Statements are built from the descriptors in `dvdrental-rs-schema` and run
//! through `rusqlite`. An embedded sample dataset makes every query usable
//! without an external server.

pub mod database;
pub mod error;
pub mod functions;
pub mod model;
pub mod queries;
pub mod session;
pub mod views;

/// Database handle.
pub use database::Database;
/// Store error type.
pub use error::StoreError;
/// Pure stored-function equivalents.
pub use functions::{concat_pair, group_concat, last_day};
/// Row models.
pub use model::{
    Actor, Category, CategoryFilms, Film, FilmDetails, InvalidMoney, Language, Money, Rating,
    UnknownRating, parse_text_array,
};
/// Read operations shared by databases and sessions.
pub use queries::Queries;
/// Transaction scope.
pub use session::Session;
/// View row types.
pub use views::{CategorySales, CustomerListRow, FilmListRow, StaffListRow, StoreSales, ViewCount};
