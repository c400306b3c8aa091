use dvdrental_rs_store::Database;
use std::path::Path;

/// In-memory database with the schema and sample data loaded.
pub fn seeded_database() -> Database {
    let mut database = Database::open_in_memory().expect("open in-memory database");
    database.create_schema().expect("create schema");
    database.seed_sample().expect("seed sample data");
    database
}

/// File-backed database at `path` with the schema and sample data loaded.
pub fn seeded_database_at(path: &Path) -> Database {
    let mut database = Database::open(path).expect("open database file");
    database.create_schema().expect("create schema");
    database.seed_sample().expect("seed sample data");
    database
}
