//! Filter expressions and bind parameter collection.

use super::ddl::quote_ident;
use std::collections::HashMap;
use std::fmt;

/// `table.column` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: &str, column: &str) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    /// `column = value`, or `column IS NULL` for a null value.
    pub fn eq(&self, value: impl Into<SqlValue>) -> Expr {
        match value.into() {
            SqlValue::Null => Expr::IsNull(self.clone()),
            value => self.compare(CompareOp::Eq, value),
        }
    }

    /// `column != value`, or `column IS NOT NULL` for a null value.
    pub fn ne(&self, value: impl Into<SqlValue>) -> Expr {
        match value.into() {
            SqlValue::Null => Expr::IsNotNull(self.clone()),
            value => self.compare(CompareOp::Ne, value),
        }
    }

    pub fn lt(&self, value: impl Into<SqlValue>) -> Expr {
        self.compare(CompareOp::Lt, value.into())
    }

    pub fn le(&self, value: impl Into<SqlValue>) -> Expr {
        self.compare(CompareOp::Le, value.into())
    }

    pub fn gt(&self, value: impl Into<SqlValue>) -> Expr {
        self.compare(CompareOp::Gt, value.into())
    }

    pub fn ge(&self, value: impl Into<SqlValue>) -> Expr {
        self.compare(CompareOp::Ge, value.into())
    }

    /// Inclusive range check.
    pub fn between(&self, low: impl Into<SqlValue>, high: impl Into<SqlValue>) -> Expr {
        Expr::Between {
            column: self.clone(),
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn is_null(&self) -> Expr {
        Expr::IsNull(self.clone())
    }

    pub fn is_not_null(&self) -> Expr {
        Expr::IsNotNull(self.clone())
    }

    fn compare(&self, op: CompareOp, value: SqlValue) -> Expr {
        Expr::Compare {
            column: self.clone(),
            op,
            value,
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", quote_ident(&self.table), quote_ident(&self.column))
    }
}

/// Literal value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Boolean filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: SqlValue,
    },
    Between {
        column: ColumnRef,
        low: SqlValue,
        high: SqlValue,
    },
    IsNull(ColumnRef),
    IsNotNull(ColumnRef),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    /// Conjunction of all `exprs`.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self::And(exprs.into_iter().collect())
    }

    /// Disjunction of all `exprs`.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self::Or(exprs.into_iter().collect())
    }

    /// Combine with another expression under `AND`, flattening nested
    /// conjunctions.
    pub fn and_also(self, other: Expr) -> Self {
        match self {
            Self::And(mut exprs) => {
                exprs.push(other);
                Self::And(exprs)
            }
            expr => Self::And(vec![expr, other]),
        }
    }

    /// Render to SQL with named parameters and collect their values.
    pub fn compile(&self) -> Compiled {
        let mut binder = Binder::default();
        let sql = self.render(&mut binder);
        Compiled {
            sql,
            params: binder.params,
        }
    }

    pub(crate) fn render(&self, binder: &mut Binder) -> String {
        match self {
            Self::Compare { column, op, value } => {
                let param = binder.bind(&column.column, value.clone());
                format!("{column} {} :{param}", op.as_sql())
            }
            Self::Between { column, low, high } => {
                let low = binder.bind(&column.column, low.clone());
                let high = binder.bind(&column.column, high.clone());
                format!("{column} BETWEEN :{low} AND :{high}")
            }
            Self::IsNull(column) => format!("{column} IS NULL"),
            Self::IsNotNull(column) => format!("{column} IS NOT NULL"),
            Self::And(exprs) => render_compound(exprs, "AND", "1 = 1", binder),
            Self::Or(exprs) => render_compound(exprs, "OR", "1 = 0", binder),
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compile().sql)
    }
}

fn render_compound(exprs: &[Expr], keyword: &str, empty: &str, binder: &mut Binder) -> String {
    if exprs.is_empty() {
        return empty.to_string();
    }
    exprs
        .iter()
        .map(|expr| {
            let rendered = expr.render(binder);
            if expr.is_compound() && exprs.len() > 1 {
                format!("({rendered})")
            } else {
                rendered
            }
        })
        .collect::<Vec<_>>()
        .join(&format!(" {keyword} "))
}

/// SQL text plus the named parameter values it references.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compiled {
    pub sql: String,
    /// Parameter names without the leading `:`, in bind order.
    pub params: Vec<(String, SqlValue)>,
}

impl Compiled {
    /// Parameter value by name.
    pub fn param(&self, name: &str) -> Option<&SqlValue> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }
}

/// Allocates `<column>_<n>` parameter names, numbering per column.
///
/// Characters outside `[A-Za-z0-9_]` become `_` so names stay valid after `:`.
#[derive(Debug, Default)]
pub(crate) struct Binder {
    counters: HashMap<String, usize>,
    params: Vec<(String, SqlValue)>,
}

impl Binder {
    pub(crate) fn bind(&mut self, column: &str, value: SqlValue) -> String {
        let stem: String = column
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        let counter = self.counters.entry(stem.clone()).or_insert(0);
        *counter += 1;
        let name = format!("{stem}_{counter}");
        self.params.push((name.clone(), value));
        name
    }

    pub(crate) fn into_params(self) -> Vec<(String, SqlValue)> {
        self.params
    }
}
