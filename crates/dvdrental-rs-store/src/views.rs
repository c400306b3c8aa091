//! Row types and readers for the reporting views.

use crate::error::StoreError;
use crate::model::{Money, Rating};
use log::debug;
use rusqlite::{Connection, Row};
use serde::Serialize;

/// `customer_list` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerListRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub zip_code: Option<String>,
    pub phone: String,
    pub city: String,
    pub country: String,
    /// `active` for active customers, empty otherwise.
    pub notes: String,
    pub sid: i64,
}

/// `film_list` and `nicer_but_slower_film_list` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilmListRow {
    pub fid: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Money,
    pub length: Option<i64>,
    pub rating: Option<Rating>,
    /// Cast names joined with `", "` in actor id order.
    pub actors: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySales {
    pub category: String,
    pub total_sales: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSales {
    /// `city,country` of the store address.
    pub store: String,
    pub manager: String,
    pub total_sales: Money,
}

/// `staff_list` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffListRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub zip_code: Option<String>,
    pub phone: String,
    pub city: String,
    pub country: String,
    pub sid: i64,
}

/// Row counts per view, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewCount {
    pub view: String,
    pub rows: i64,
}

fn read_all<T>(
    conn: &Connection,
    sql: &str,
    map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>, StoreError> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?;
    debug!("read view rows (sql={}, rows={})", sql, rows.len());
    Ok(rows)
}

pub(crate) fn customer_list(conn: &Connection) -> Result<Vec<CustomerListRow>, StoreError> {
    read_all(conn, "SELECT * FROM customer_list ORDER BY id", |row| {
        Ok(CustomerListRow {
            id: row.get("id")?,
            name: row.get("name")?,
            address: row.get("address")?,
            zip_code: row.get("zip code")?,
            phone: row.get("phone")?,
            city: row.get("city")?,
            country: row.get("country")?,
            notes: row.get("notes")?,
            sid: row.get("sid")?,
        })
    })
}

fn film_list_row(row: &Row<'_>) -> rusqlite::Result<FilmListRow> {
    Ok(FilmListRow {
        fid: row.get("fid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        category: row.get("category")?,
        price: row.get("price")?,
        length: row.get("length")?,
        rating: row.get("rating")?,
        actors: row.get("actors")?,
    })
}

pub(crate) fn film_list(conn: &Connection) -> Result<Vec<FilmListRow>, StoreError> {
    read_all(conn, "SELECT * FROM film_list ORDER BY fid", film_list_row)
}

pub(crate) fn nicer_but_slower_film_list(
    conn: &Connection,
) -> Result<Vec<FilmListRow>, StoreError> {
    read_all(
        conn,
        "SELECT * FROM nicer_but_slower_film_list ORDER BY fid",
        film_list_row,
    )
}

pub(crate) fn sales_by_film_category(conn: &Connection) -> Result<Vec<CategorySales>, StoreError> {
    read_all(
        conn,
        "SELECT * FROM sales_by_film_category ORDER BY total_sales DESC",
        |row| {
            Ok(CategorySales {
                category: row.get("category")?,
                total_sales: row.get("total_sales")?,
            })
        },
    )
}

pub(crate) fn sales_by_store(conn: &Connection) -> Result<Vec<StoreSales>, StoreError> {
    read_all(conn, "SELECT * FROM sales_by_store", |row| {
        Ok(StoreSales {
            store: row.get("store")?,
            manager: row.get("manager")?,
            total_sales: row.get("total_sales")?,
        })
    })
}

pub(crate) fn staff_list(conn: &Connection) -> Result<Vec<StaffListRow>, StoreError> {
    read_all(conn, "SELECT * FROM staff_list ORDER BY id", |row| {
        Ok(StaffListRow {
            id: row.get("id")?,
            name: row.get("name")?,
            address: row.get("address")?,
            zip_code: row.get("zip code")?,
            phone: row.get("phone")?,
            city: row.get("city")?,
            country: row.get("country")?,
            sid: row.get("sid")?,
        })
    })
}

pub(crate) fn view_counts<'a>(
    conn: &Connection,
    views: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<ViewCount>, StoreError> {
    let mut counts = Vec::new();
    for view in views {
        let sql = format!(
            "SELECT count(*) FROM {}",
            dvdrental_rs_schema::sql::quote_ident(view)
        );
        let rows: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        counts.push(ViewCount {
            view: view.to_string(),
            rows,
        });
    }
    Ok(counts)
}
