//! Read operations shared by [`crate::Database`] and [`crate::Session`].

use crate::error::StoreError;
use crate::functions;
use crate::model::{Actor, Category, CategoryFilms, Film, FilmDetails, Language, Money};
use crate::views::{
    self, CategorySales, CustomerListRow, FilmListRow, StaffListRow, StoreSales, ViewCount,
};
use chrono::NaiveDateTime;
use dvdrental_rs_schema::Schema;
use dvdrental_rs_schema::sql::{Compiled, Order, Select, SqlValue, select_all};
use log::debug;
use rusqlite::types::{ToSql, Value};
use rusqlite::{Connection, Params, Row};

fn to_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(value) => Value::Integer(*value),
        SqlValue::Real(value) => Value::Real(*value),
        SqlValue::Text(value) => Value::Text(value.clone()),
        SqlValue::Bool(value) => Value::Integer(i64::from(*value)),
    }
}

/// Run a compiled statement, binding its named parameters.
pub(crate) fn query_compiled<T>(
    conn: &Connection,
    compiled: &Compiled,
    map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>, StoreError> {
    let names: Vec<String> = compiled
        .params
        .iter()
        .map(|(name, _)| format!(":{name}"))
        .collect();
    let values: Vec<Value> = compiled.params.iter().map(|(_, value)| to_value(value)).collect();
    let bound: Vec<(&str, &dyn ToSql)> = names
        .iter()
        .zip(values.iter())
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect();

    let mut stmt = conn.prepare(&compiled.sql)?;
    let rows = stmt
        .query_map(bound.as_slice(), map)?
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "query executed (params={}, rows={})",
        compiled.params.len(),
        rows.len()
    );
    Ok(rows)
}

/// Rows reachable from `table` row `key` through `relationship`, ordered by
/// the target's primary key.
fn related<T>(
    conn: &Connection,
    schema: &Schema,
    table: &str,
    relationship: &str,
    key: i64,
    map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>, StoreError> {
    let descriptor = schema.get_table(table)?.get_relationship(relationship)?;
    let target = schema.get_table(&descriptor.target)?;
    let order = target.col(&target.single_primary_key()?.name)?;
    debug!(
        "loading relationship (table={table}, name={relationship}, key={key}, load={:?})",
        descriptor.load
    );
    let compiled = Select::related(schema, table, relationship, key)?
        .order_by(order, Order::Asc)
        .compile();
    query_compiled(conn, &compiled, map)
}

/// Typed reads over a dvdrental connection.
///
/// Implementors supply the connection and schema; every query runs on that
/// connection, so inside a [`crate::Session`] reads see the session's own
/// uncommitted writes.
pub trait Queries {
    /// Connection the queries run on.
    fn connection(&self) -> &Connection;

    /// Schema descriptors used to build statements.
    fn schema(&self) -> &Schema;

    /// Run one statement and return the number of rows it changed.
    fn execute(&self, sql: &str, params: impl Params) -> Result<usize, StoreError> {
        let changed = self.connection().execute(sql, params)?;
        debug!("statement executed (changed={changed})");
        Ok(changed)
    }

    /// All languages ordered by id.
    fn languages(&self) -> Result<Vec<Language>, StoreError> {
        let table = self.schema().get_table("language")?;
        let compiled = select_all(table)
            .order_by(table.col("language_id")?, Order::Asc)
            .compile();
        query_compiled(self.connection(), &compiled, Language::from_row)
    }

    /// One film with its language and categories.
    fn film(&self, film_id: i64) -> Result<FilmDetails, StoreError> {
        let (conn, schema) = (self.connection(), self.schema());
        let table = schema.get_table("film")?;
        let compiled = select_all(table)
            .filter(table.col("film_id")?.eq(film_id))
            .compile();
        let film = query_compiled(conn, &compiled, Film::from_row)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("film {film_id}")))?;
        let language = related(conn, schema, "film", "language", film_id, Language::from_row)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("language of film {film_id}")))?;
        let categories = related(conn, schema, "film", "categories", film_id, Category::from_row)?;
        Ok(FilmDetails {
            film,
            language,
            categories,
        })
    }

    /// Cast of a film ordered by actor id.
    fn film_actors(&self, film_id: i64) -> Result<Vec<Actor>, StoreError> {
        related(
            self.connection(),
            self.schema(),
            "film",
            "actors",
            film_id,
            Actor::from_row,
        )
    }

    /// Category by exact name, with its films.
    fn category_by_name(&self, name: &str) -> Result<CategoryFilms, StoreError> {
        let (conn, schema) = (self.connection(), self.schema());
        let table = schema.get_table("category")?;
        let compiled = select_all(table)
            .filter(table.col("name")?.eq(name))
            .compile();
        let category = query_compiled(conn, &compiled, Category::from_row)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("category {name}")))?;
        let films = related(
            conn,
            schema,
            "category",
            "films",
            category.category_id,
            Film::from_row,
        )?;
        Ok(CategoryFilms { category, films })
    }

    /// Films an actor appears in, ordered by film id.
    fn films_for_actor(&self, actor_id: i64) -> Result<Vec<Film>, StoreError> {
        related(
            self.connection(),
            self.schema(),
            "actor",
            "films",
            actor_id,
            Film::from_row,
        )
    }

    fn customer_list(&self) -> Result<Vec<CustomerListRow>, StoreError> {
        views::customer_list(self.connection())
    }

    fn film_list(&self) -> Result<Vec<FilmListRow>, StoreError> {
        views::film_list(self.connection())
    }

    fn nicer_but_slower_film_list(&self) -> Result<Vec<FilmListRow>, StoreError> {
        views::nicer_but_slower_film_list(self.connection())
    }

    fn sales_by_film_category(&self) -> Result<Vec<CategorySales>, StoreError> {
        views::sales_by_film_category(self.connection())
    }

    fn sales_by_store(&self) -> Result<Vec<StoreSales>, StoreError> {
        views::sales_by_store(self.connection())
    }

    fn staff_list(&self) -> Result<Vec<StaffListRow>, StoreError> {
        views::staff_list(self.connection())
    }

    /// Row count of every view in the schema.
    fn view_counts(&self) -> Result<Vec<ViewCount>, StoreError> {
        let names = self.schema().views.iter().map(|view| view.name.as_str());
        views::view_counts(self.connection(), names)
    }

    /// Inventory ids of a film at a store that are not rented out.
    fn film_in_stock(&self, film_id: i64, store_id: i64) -> Result<Vec<i64>, StoreError> {
        functions::film_in_stock(self.connection(), film_id, store_id)
    }

    /// Inventory ids of a film at a store that are rented out.
    fn film_not_in_stock(&self, film_id: i64, store_id: i64) -> Result<Vec<i64>, StoreError> {
        functions::film_not_in_stock(self.connection(), film_id, store_id)
    }

    fn inventory_in_stock(&self, inventory_id: i64) -> Result<bool, StoreError> {
        functions::inventory_in_stock(self.connection(), inventory_id)
    }

    /// Customer currently renting the item, if any.
    fn inventory_held_by_customer(&self, inventory_id: i64) -> Result<Option<i64>, StoreError> {
        functions::inventory_held_by_customer(self.connection(), inventory_id)
    }

    fn get_customer_balance(
        &self,
        customer_id: i64,
        at: NaiveDateTime,
    ) -> Result<Money, StoreError> {
        functions::get_customer_balance(self.connection(), customer_id, at)
    }
}
