//! Stored-function equivalents.
//!
//! `last_day` and `_group_concat` are pure and also registered on every
//! connection as SQL scalar functions. The inventory and balance helpers read
//! the rental tables and are exposed through [`crate::Queries`].

use crate::error::StoreError;
use crate::model::Money;
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use log::debug;
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OptionalExtension, params};

/// Last day of the month containing `date`.
pub fn last_day(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Join two optional strings with `", "`, skipping a missing side.
pub fn concat_pair(left: Option<&str>, right: Option<&str>) -> Option<String> {
    match (left, right) {
        (Some(left), Some(right)) => Some(format!("{left}, {right}")),
        (Some(value), None) | (None, Some(value)) => Some(value.to_string()),
        (None, None) => None,
    }
}

/// Fold values into one `", "`-separated string; `None` when empty.
pub fn group_concat<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .fold(None, |acc: Option<String>, value| {
            concat_pair(acc.as_deref(), Some(value.as_ref()))
        })
}

fn parse_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
}

/// Register the SQL scalar functions on `conn`.
pub(crate) fn register(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;
    conn.create_scalar_function("last_day", 1, flags, |ctx| {
        let Some(text) = ctx.get::<Option<String>>(0)? else {
            return Ok(None);
        };
        let date =
            parse_date(&text).map_err(|err| rusqlite::Error::UserFunctionError(Box::new(err)))?;
        Ok(last_day(date).map(|day| day.format("%Y-%m-%d").to_string()))
    })?;
    conn.create_scalar_function("_group_concat", 2, flags, |ctx| {
        let left = ctx.get::<Option<String>>(0)?;
        let right = ctx.get::<Option<String>>(1)?;
        Ok(concat_pair(left.as_deref(), right.as_deref()))
    })?;
    debug!("registered sql functions (names=last_day,_group_concat)");
    Ok(())
}

const STOCK_SQL: &str = "
SELECT i.inventory_id
FROM inventory i
WHERE i.film_id = ?1
    AND i.store_id = ?2
    AND EXISTS (
        SELECT 1 FROM rental r
        WHERE r.inventory_id = i.inventory_id AND r.return_date IS NULL
    ) = ?3
ORDER BY i.inventory_id";

fn stock(
    conn: &Connection,
    film_id: i64,
    store_id: i64,
    rented: bool,
) -> Result<Vec<i64>, StoreError> {
    let mut stmt = conn.prepare_cached(STOCK_SQL)?;
    let ids = stmt
        .query_map(params![film_id, store_id, rented], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    debug!(
        "stock lookup (film_id={film_id}, store_id={store_id}, rented={rented}, count={})",
        ids.len()
    );
    Ok(ids)
}

pub(crate) fn film_in_stock(
    conn: &Connection,
    film_id: i64,
    store_id: i64,
) -> Result<Vec<i64>, StoreError> {
    stock(conn, film_id, store_id, false)
}

pub(crate) fn film_not_in_stock(
    conn: &Connection,
    film_id: i64,
    store_id: i64,
) -> Result<Vec<i64>, StoreError> {
    stock(conn, film_id, store_id, true)
}

/// An item is in stock unless one of its rentals has no return date.
pub(crate) fn inventory_in_stock(conn: &Connection, inventory_id: i64) -> Result<bool, StoreError> {
    let open: i64 = conn.query_row(
        "SELECT count(*) FROM rental WHERE inventory_id = ?1 AND return_date IS NULL",
        [inventory_id],
        |row| row.get(0),
    )?;
    Ok(open == 0)
}

pub(crate) fn inventory_held_by_customer(
    conn: &Connection,
    inventory_id: i64,
) -> Result<Option<i64>, StoreError> {
    let customer = conn
        .query_row(
            "SELECT customer_id FROM rental WHERE inventory_id = ?1 AND return_date IS NULL",
            [inventory_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(customer)
}

/// Balance owed by a customer as of `at`: rental fees plus one dollar per
/// whole day overdue, minus payments made. Negative means credit.
pub(crate) fn get_customer_balance(
    conn: &Connection,
    customer_id: i64,
    at: NaiveDateTime,
) -> Result<Money, StoreError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM customer WHERE customer_id = ?1)",
        [customer_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(StoreError::NotFound(format!("customer {customer_id}")));
    }

    let mut stmt = conn.prepare_cached(
        "SELECT f.rental_rate, f.rental_duration, r.rental_date, r.return_date
         FROM rental r
             JOIN inventory i ON r.inventory_id = i.inventory_id
             JOIN film f ON i.film_id = f.film_id
         WHERE r.customer_id = ?1 AND r.rental_date <= ?2",
    )?;
    let rentals = stmt
        .query_map(params![customer_id, at], |row| {
            Ok((
                row.get::<_, Money>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, NaiveDateTime>(2)?,
                row.get::<_, Option<NaiveDateTime>>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut rent_fees = Money::ZERO;
    let mut overdue_fees = Money::ZERO;
    for (rate, duration, rented, returned) in rentals {
        rent_fees = rent_fees + rate;
        if let Some(returned) = returned {
            let overdue = (returned - rented).num_days() - duration;
            if overdue > 0 {
                overdue_fees = overdue_fees + Money::from_dollars(overdue);
            }
        }
    }

    let payments: Money = conn.query_row(
        "SELECT coalesce(sum(amount), 0) FROM payment WHERE customer_id = ?1 AND payment_date <= ?2",
        params![customer_id, at],
        |row| row.get(0),
    )?;

    let balance = rent_fees + overdue_fees - payments;
    debug!(
        "customer balance (customer_id={customer_id}, rent={rent_fees}, overdue={overdue_fees}, \
         payments={payments}, balance={balance})"
    );
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::{concat_pair, group_concat, last_day, parse_date};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(last_day(date(2020, 2, 1)), Some(date(2020, 2, 29)));
        assert_eq!(last_day(date(2021, 2, 14)), Some(date(2021, 2, 28)));
        assert_eq!(last_day(date(2020, 8, 1)), Some(date(2020, 8, 31)));
        assert_eq!(last_day(date(2020, 12, 31)), Some(date(2020, 12, 31)));
    }

    #[test]
    fn concat_pair_skips_missing_side() {
        assert_eq!(
            concat_pair(Some("first name"), Some("last name")).as_deref(),
            Some("first name, last name")
        );
        assert_eq!(concat_pair(None, Some("b")).as_deref(), Some("b"));
        assert_eq!(concat_pair(Some("a"), None).as_deref(), Some("a"));
        assert_eq!(concat_pair(None, None), None);
    }

    #[test]
    fn group_concat_folds_in_order() {
        assert_eq!(
            group_concat(["Rock Dukakis", "Mary Keitel", "Johnny Cage"]).as_deref(),
            Some("Rock Dukakis, Mary Keitel, Johnny Cage")
        );
        assert_eq!(group_concat(Vec::<String>::new()), None);
    }

    #[test]
    fn parse_date_accepts_timestamps() {
        assert_eq!(parse_date("2005-07-29 00:00:00").expect("date"), date(2005, 7, 29));
        assert!(parse_date("July").is_err());
    }
}
