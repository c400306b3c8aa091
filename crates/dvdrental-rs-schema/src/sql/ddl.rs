//! `CREATE` statements for SQLite.
//!
//! Types without a SQLite counterpart are stored as `TEXT`: arrays use the
//! `{a,b}` literal form, full-text documents are plain text, and enums get a
//! `CHECK` constraint over their labels. Sequence defaults are dropped since
//! an `INTEGER PRIMARY KEY` already allocates row ids.

use crate::error::SchemaError;
use crate::model::{Column, ColumnType, ForeignKey, Index, Schema, ServerDefault, Table, View};
use log::debug;

/// Quote an identifier unless it is a plain lowercase name.
pub fn quote_ident(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|first| first.is_ascii_lowercase() || first == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn type_sql(ty: &ColumnType) -> String {
    match ty {
        ColumnType::Integer => "INTEGER".to_string(),
        ColumnType::SmallInteger => "SMALLINT".to_string(),
        ColumnType::Boolean => "BOOLEAN".to_string(),
        ColumnType::Date => "DATE".to_string(),
        ColumnType::Timestamp => "TIMESTAMP".to_string(),
        ColumnType::Binary => "BLOB".to_string(),
        ColumnType::Varchar { length } => format!("VARCHAR({length})"),
        ColumnType::Char { length } => format!("CHAR({length})"),
        ColumnType::Numeric {
            precision: Some(precision),
            scale: Some(scale),
        } => format!("NUMERIC({precision}, {scale})"),
        ColumnType::Numeric {
            precision: Some(precision),
            scale: None,
        } => format!("NUMERIC({precision})"),
        ColumnType::Numeric { .. } => "NUMERIC".to_string(),
        ColumnType::Text | ColumnType::TextArray | ColumnType::TsVector | ColumnType::Enum { .. } => {
            "TEXT".to_string()
        }
    }
}

fn column_sql(column: &Column, inline_primary_key: bool) -> String {
    let mut sql = format!("{} {}", quote_ident(&column.name), type_sql(&column.ty));
    if inline_primary_key {
        sql.push_str(" PRIMARY KEY");
    } else if !column.nullable {
        sql.push_str(" NOT NULL");
    }
    if column.unique {
        sql.push_str(" UNIQUE");
    }
    match &column.default {
        Some(ServerDefault::Now) => sql.push_str(" DEFAULT CURRENT_TIMESTAMP"),
        Some(ServerDefault::CurrentDate) => sql.push_str(" DEFAULT CURRENT_DATE"),
        Some(ServerDefault::Literal(expr)) => sql.push_str(&format!(" DEFAULT ({expr})")),
        Some(ServerDefault::Sequence(_)) | None => {}
    }
    if let ColumnType::Enum { labels, .. } = &column.ty {
        let labels = labels
            .iter()
            .map(|label| quote_literal(label))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(" CHECK ({} IN ({labels}))", quote_ident(&column.name)));
    }
    sql
}

fn foreign_key_sql(foreign_key: &ForeignKey) -> String {
    format!(
        "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
        quote_ident(&foreign_key.column),
        quote_ident(&foreign_key.references_table),
        quote_ident(&foreign_key.references_column),
        foreign_key.on_delete.as_sql(),
        foreign_key.on_update.as_sql(),
    )
}

/// `CREATE TABLE` for one table, with keys as constraints.
///
/// A single-column primary key is declared inline so an integer key aliases
/// the row id; composite keys become a table constraint.
pub fn create_table(table: &Table) -> String {
    let primary_key = table.primary_key();
    let inline = primary_key.len() == 1;

    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|column| column_sql(column, inline && column.primary_key))
        .collect();
    if primary_key.len() > 1 {
        let columns = primary_key
            .iter()
            .map(|column| quote_ident(&column.name))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("PRIMARY KEY ({columns})"));
    }
    lines.extend(table.foreign_keys.iter().map(foreign_key_sql));

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        quote_ident(&table.name),
        lines.join(",\n    ")
    )
}

pub fn create_index(table: &Table, index: &Index) -> String {
    let columns = index
        .columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE {}INDEX IF NOT EXISTS {} ON {} ({columns})",
        if index.unique { "UNIQUE " } else { "" },
        quote_ident(&index.name),
        quote_ident(&table.name),
    )
}

pub fn create_view(view: &View) -> String {
    format!(
        "CREATE VIEW IF NOT EXISTS {} AS\n{}",
        quote_ident(&view.name),
        view.definition
    )
}

/// Every statement needed to build `schema` in an empty database: tables in
/// dependency order, then indexes, then views.
pub fn create_schema(schema: &Schema) -> Result<Vec<String>, SchemaError> {
    schema.validate()?;
    let tables = schema.creation_order()?;

    let mut statements: Vec<String> = tables.iter().map(|table| create_table(table)).collect();
    for table in &tables {
        statements.extend(table.indexes.iter().map(|index| create_index(table, index)));
    }
    statements.extend(schema.views.iter().map(create_view));
    debug!("rendered schema ddl (statements={})", statements.len());
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReferentialAction, Relationship};
    use pretty_assertions::assert_eq;

    #[test]
    fn quotes_only_unusual_identifiers() {
        assert_eq!(quote_ident("film_actor"), "film_actor");
        assert_eq!(quote_ident("zip code"), "\"zip code\"");
        assert_eq!(quote_ident("Mixed"), "\"Mixed\"");
        assert_eq!(quote_ident("say\"what"), "\"say\"\"what\"");
        assert_eq!(quote_ident("1st"), "\"1st\"");
    }

    #[test]
    fn integer_key_is_inline() {
        let table = Table::new("language")
            .column(
                Column::new("language_id", ColumnType::Integer)
                    .primary_key()
                    .default_value(ServerDefault::Sequence("language_language_id_seq".into())),
            )
            .column(Column::new("name", ColumnType::Char { length: 20 }).not_null())
            .column(
                Column::new("last_update", ColumnType::Timestamp)
                    .not_null()
                    .default_value(ServerDefault::Now),
            );
        assert_eq!(
            create_table(&table),
            "CREATE TABLE IF NOT EXISTS language (\n    \
             language_id INTEGER PRIMARY KEY,\n    \
             name CHAR(20) NOT NULL,\n    \
             last_update TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\n)"
        );
    }

    #[test]
    fn composite_key_and_foreign_keys_are_constraints() {
        let table = Table::new("film_actor")
            .column(Column::new("actor_id", ColumnType::SmallInteger).primary_key())
            .column(Column::new("film_id", ColumnType::SmallInteger).primary_key())
            .foreign_key(ForeignKey::new("actor_id", "actor", "actor_id").restrict_cascade())
            .foreign_key(
                ForeignKey::new("film_id", "film", "film_id").on_delete(ReferentialAction::SetNull),
            )
            .relationship(Relationship::many_to_one("actor", "actor"));
        let sql = create_table(&table);
        assert!(sql.contains("actor_id SMALLINT NOT NULL,"));
        assert!(sql.contains("PRIMARY KEY (actor_id, film_id)"));
        assert!(sql.contains(
            "FOREIGN KEY (actor_id) REFERENCES actor (actor_id) ON DELETE RESTRICT ON UPDATE CASCADE"
        ));
        assert!(sql.contains("ON DELETE SET NULL ON UPDATE NO ACTION"));
    }

    #[test]
    fn enum_columns_get_check_constraint() {
        let column = Column::new(
            "rating",
            ColumnType::enumeration("mpaa_rating", &["G", "PG", "PG-13"]),
        )
        .default_value(ServerDefault::Literal("'G'".into()));
        assert_eq!(
            column_sql(&column, false),
            "rating TEXT DEFAULT ('G') CHECK (rating IN ('G', 'PG', 'PG-13'))"
        );
    }

    #[test]
    fn numeric_and_array_types() {
        assert_eq!(type_sql(&ColumnType::numeric(4, 2)), "NUMERIC(4, 2)");
        assert_eq!(type_sql(&ColumnType::TextArray), "TEXT");
        assert_eq!(type_sql(&ColumnType::varchar(50)), "VARCHAR(50)");
    }

    #[test]
    fn unique_index_statement() {
        let table = Table::new("rental");
        let index = Index::new("idx_unq", &["rental_date", "inventory_id"]).unique();
        assert_eq!(
            create_index(&table, &index),
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_unq ON rental (rental_date, inventory_id)"
        );
    }

    #[test]
    fn schema_statements_follow_dependencies() {
        let schema = Schema::new()
            .table(
                Table::new("city")
                    .column(Column::new("city_id", ColumnType::Integer).primary_key())
                    .column(Column::new("country_id", ColumnType::Integer).not_null())
                    .foreign_key(ForeignKey::new("country_id", "country", "country_id"))
                    .index(Index::new("idx_fk_country_id", &["country_id"])),
            )
            .table(
                Table::new("country")
                    .column(Column::new("country_id", ColumnType::Integer).primary_key()),
            )
            .view(View::new("cities", "  SELECT city_id FROM city\n"));
        let statements = create_schema(&schema).expect("ddl");
        assert_eq!(statements.len(), 4);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS country"));
        assert!(statements[1].starts_with("CREATE TABLE IF NOT EXISTS city"));
        assert!(statements[2].starts_with("CREATE INDEX IF NOT EXISTS idx_fk_country_id"));
        assert_eq!(
            statements[3],
            "CREATE VIEW IF NOT EXISTS cities AS\nSELECT city_id FROM city"
        );
    }
}
