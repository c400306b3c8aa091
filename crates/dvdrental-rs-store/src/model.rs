//! Row models for the dvdrental tables.

use chrono::NaiveDateTime;
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use serde::Serialize;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Exact currency amount in cents.
///
/// `NUMERIC` columns come back from SQLite as integers (whole dollars), reals
/// or text; all three convert to cents rounded half away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Money(i64);

/// Text that is not a decimal amount with at most two fractional digits.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid money amount: {0}")]
pub struct InvalidMoney(pub String);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole dollars.
    pub fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = InvalidMoney;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMoney(s.to_string());
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty())
            || frac.len() > 2
            || !is_digits(whole)
            || !is_digits(frac)
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(frac))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(dollars) => dollars
                .checked_mul(100)
                .map(Money)
                .ok_or(FromSqlError::OutOfRange(dollars)),
            ValueRef::Real(amount) => Ok(Money((amount * 100.0).round() as i64)),
            ValueRef::Text(text) => std::str::from_utf8(text)
                .map_err(|err| FromSqlError::Other(Box::new(err)))?
                .parse()
                .map_err(|err: InvalidMoney| FromSqlError::Other(Box::new(err))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(Value::Text(self.to_string())))
    }
}

/// MPAA film rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rating {
    G,
    #[serde(rename = "PG")]
    Pg,
    #[serde(rename = "PG-13")]
    Pg13,
    R,
    #[serde(rename = "NC-17")]
    Nc17,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown rating: {0}")]
pub struct UnknownRating(pub String);

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::G => "G",
            Self::Pg => "PG",
            Self::Pg13 => "PG-13",
            Self::R => "R",
            Self::Nc17 => "NC-17",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = UnknownRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "G" => Ok(Self::G),
            "PG" => Ok(Self::Pg),
            "PG-13" => Ok(Self::Pg13),
            "R" => Ok(Self::R),
            "NC-17" => Ok(Self::Nc17),
            other => Err(UnknownRating(other.to_string())),
        }
    }
}

impl FromSql for Rating {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err: UnknownRating| FromSqlError::Other(Box::new(err)))
    }
}

/// Split a `{a,"b, c"}` array literal into its elements.
pub fn parse_text_array(literal: &str) -> Vec<String> {
    let inner = literal
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(literal);
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => quoted = !quoted,
            '\\' if quoted => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ',' if !quoted => items.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    if !current.is_empty() || !items.is_empty() {
        items.push(current);
    }
    items
}

/// `language` row. Names are stored as `CHAR(20)` and returned trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub language_id: i64,
    pub name: String,
    pub last_update: NaiveDateTime,
}

impl Language {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let name: String = row.get("name")?;
        Ok(Self {
            language_id: row.get("language_id")?,
            name: name.trim_end().to_string(),
            last_update: row.get("last_update")?,
        })
    }
}

/// `category` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    pub last_update: NaiveDateTime,
}

impl Category {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            category_id: row.get("category_id")?,
            name: row.get("name")?,
            last_update: row.get("last_update")?,
        })
    }
}

/// `actor` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub actor_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub last_update: NaiveDateTime,
}

impl Actor {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            actor_id: row.get("actor_id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            last_update: row.get("last_update")?,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// `film` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Film {
    pub film_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub language_id: i64,
    pub rental_duration: i64,
    pub rental_rate: Money,
    pub length: Option<i64>,
    pub replacement_cost: Money,
    pub rating: Option<Rating>,
    pub last_update: NaiveDateTime,
    pub special_features: Vec<String>,
    pub fulltext: String,
}

impl Film {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let special_features: Option<String> = row.get("special_features")?;
        Ok(Self {
            film_id: row.get("film_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            release_year: row.get("release_year")?,
            language_id: row.get("language_id")?,
            rental_duration: row.get("rental_duration")?,
            rental_rate: row.get("rental_rate")?,
            length: row.get("length")?,
            replacement_cost: row.get("replacement_cost")?,
            rating: row.get("rating")?,
            last_update: row.get("last_update")?,
            special_features: special_features
                .as_deref()
                .map(parse_text_array)
                .unwrap_or_default(),
            fulltext: row.get("fulltext")?,
        })
    }
}

/// A film with its eagerly loaded language and its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilmDetails {
    pub film: Film,
    pub language: Language,
    pub categories: Vec<Category>,
}

/// A category with the films filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFilms {
    pub category: Category,
    pub films: Vec<Film>,
}
