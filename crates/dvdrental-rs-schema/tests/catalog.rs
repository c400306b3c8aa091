//! Checks on the bundled dvdrental catalog.

use dvdrental_rs_schema::sql::{Select, create_schema};
use dvdrental_rs_schema::{LoadStrategy, SchemaError, dvdrental};
use pretty_assertions::assert_eq;

#[test]
fn catalog_validates() {
    let schema = dvdrental();
    schema.validate().expect("valid catalog");
    assert_eq!(schema.tables.len(), 15);
    assert_eq!(schema.views.len(), 6);
}

/// Referenced tables are created before the tables pointing at them.
#[test]
fn creation_order_respects_foreign_keys() {
    let schema = dvdrental();
    let order: Vec<&str> = schema
        .creation_order()
        .expect("order")
        .into_iter()
        .map(|table| table.name.as_str())
        .collect();
    let position = |name: &str| order.iter().position(|table| *table == name).expect(name);
    assert!(position("language") < position("film"));
    assert!(position("country") < position("city"));
    assert!(position("city") < position("address"));
    assert!(position("staff") < position("store"));
    assert!(position("inventory") < position("rental"));
    assert!(position("rental") < position("payment"));
}

#[test]
fn join_condition_works_in_both_directions() {
    let schema = dvdrental();
    let forward = schema.join_condition("film", "language").expect("join");
    assert_eq!(forward.to_string(), "film.language_id = language.language_id");
    let backward = schema.join_condition("public.language", "film").expect("join");
    assert_eq!(backward.to_string(), "language.language_id = film.language_id");
    assert!(matches!(
        schema.join_condition("actor", "language"),
        Err(SchemaError::NoJoinPath { .. })
    ));
}

#[test]
fn film_relationships_match_mapping() {
    let schema = dvdrental();
    let film = schema.get_table("film").expect("film");
    let language = film.get_relationship("language").expect("language");
    assert_eq!(language.load, LoadStrategy::Eager);
    let actors = film.get_relationship("actors").expect("actors");
    assert_eq!(actors.secondary.as_deref(), Some("film_actor"));
    assert_eq!(actors.load, LoadStrategy::Lazy);
}

#[test]
fn create_schema_emits_tables_then_indexes_then_views() {
    let schema = dvdrental();
    let statements = create_schema(&schema).expect("ddl");
    let tables = statements
        .iter()
        .take_while(|sql| sql.starts_with("CREATE TABLE"))
        .count();
    assert_eq!(tables, 15);
    let views: Vec<&String> = statements
        .iter()
        .filter(|sql| sql.starts_with("CREATE VIEW"))
        .collect();
    assert_eq!(views.len(), 6);
    assert!(
        statements
            .last()
            .expect("statements")
            .starts_with("CREATE VIEW IF NOT EXISTS staff_list")
    );
    assert!(
        statements
            .iter()
            .any(|sql| sql == "CREATE INDEX IF NOT EXISTS idx_title ON film (title)")
    );
}

#[test]
fn association_relationships_filter_on_link_value() {
    let schema = dvdrental();
    for (table, relationship, target, column) in [
        ("film_actor", "actor", "actor", "actor_id"),
        ("film_actor", "film", "film", "film_id"),
        ("film_category", "category", "category", "category_id"),
        ("film_category", "film", "film", "film_id"),
    ] {
        let compiled = Select::related(&schema, table, relationship, 1)
            .expect("related")
            .compile();
        let filter = format!("\nWHERE {target}.{column} = :{column}_1");
        assert!(compiled.sql.ends_with(&filter), "{}", compiled.sql);
    }
}
