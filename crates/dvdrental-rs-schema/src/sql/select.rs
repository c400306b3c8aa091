//! `SELECT` statement builder.

use super::ddl::quote_ident;
use super::expr::{Binder, ColumnRef, Compiled, Expr, SqlValue};
use crate::error::SchemaError;
use crate::model::{Schema, Table};
use log::debug;
use std::fmt;

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
struct Join {
    kind: JoinKind,
    table: String,
    on: String,
}

/// Builder for a single `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    columns: Vec<String>,
    from: String,
    joins: Vec<Join>,
    filter: Option<Expr>,
    group_by: Vec<String>,
    order_by: Vec<(String, Order)>,
    limit: Option<u64>,
}

/// `SELECT` of every column of `table`, qualified by the table name.
pub fn select_all(table: &Table) -> Select {
    let mut select = Select::new(&table.name);
    for column in &table.columns {
        select = select.column(ColumnRef::new(&table.name, &column.name));
    }
    select
}

impl Select {
    /// Statement over `from` with no output columns yet.
    pub fn new(from: &str) -> Self {
        Self {
            columns: Vec::new(),
            from: from.to_string(),
            joins: Vec::new(),
            filter: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Add an output column or expression.
    pub fn column(mut self, expr: impl fmt::Display) -> Self {
        self.columns.push(expr.to_string());
        self
    }

    /// Add an output column or expression under an alias.
    pub fn column_as(mut self, expr: impl fmt::Display, alias: &str) -> Self {
        self.columns.push(format!("{expr} AS {alias}"));
        self
    }

    /// Inner join `table`, resolving the `ON` clause from foreign keys.
    ///
    /// Tables already in the statement are searched from the most recently
    /// joined back to `FROM`; the first one with exactly one foreign key
    /// to or from `table` supplies the condition.
    pub fn join(self, schema: &Schema, table: &str) -> Result<Self, SchemaError> {
        self.join_resolved(schema, table, JoinKind::Inner)
    }

    /// Left outer join `table`, resolving the `ON` clause from foreign keys.
    pub fn left_join(self, schema: &Schema, table: &str) -> Result<Self, SchemaError> {
        self.join_resolved(schema, table, JoinKind::Left)
    }

    /// Inner join `table` with an explicit `ON` clause.
    pub fn join_on(mut self, table: &str, on: impl fmt::Display) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Inner,
            table: table.to_string(),
            on: on.to_string(),
        });
        self
    }

    fn join_resolved(
        mut self,
        schema: &Schema,
        table: &str,
        kind: JoinKind,
    ) -> Result<Self, SchemaError> {
        let table = schema.get_table(table)?.name.as_str();
        let mut condition = None;
        for existing in self.tables().into_iter().rev() {
            match schema.join_condition(existing, table) {
                Ok(found) => {
                    condition = Some(found);
                    break;
                }
                Err(SchemaError::NoJoinPath { .. }) => continue,
                Err(err) => return Err(err),
            }
        }
        let condition = condition.ok_or_else(|| SchemaError::NoJoinPath {
            from: self.from.clone(),
            to: table.to_string(),
        })?;
        debug!("resolved join (table={table}, on={condition})");
        self.joins.push(Join {
            kind,
            table: table.to_string(),
            on: condition.to_string(),
        });
        Ok(self)
    }

    /// Add a filter, combined with any existing filter under `AND`.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and_also(expr),
            None => expr,
        });
        self
    }

    pub fn group_by(mut self, expr: impl fmt::Display) -> Self {
        self.group_by.push(expr.to_string());
        self
    }

    pub fn order_by(mut self, expr: impl fmt::Display, order: Order) -> Self {
        self.order_by.push((expr.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Tables referenced by `FROM` and the joins, in statement order.
    pub fn tables(&self) -> Vec<&str> {
        std::iter::once(self.from.as_str())
            .chain(self.joins.iter().map(|join| join.table.as_str()))
            .collect()
    }

    /// Render the statement and collect its bind parameters.
    pub fn compile(&self) -> Compiled {
        let mut binder = Binder::default();
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut from = quote_ident(&self.from);
        for join in &self.joins {
            let keyword = match join.kind {
                JoinKind::Inner => "JOIN",
                JoinKind::Left => "LEFT OUTER JOIN",
            };
            from.push_str(&format!(
                " {keyword} {} ON {}",
                quote_ident(&join.table),
                join.on
            ));
        }

        let mut clauses = vec![format!("SELECT {columns}"), format!("FROM {from}")];
        if let Some(filter) = &self.filter {
            clauses.push(format!("WHERE {}", filter.render(&mut binder)));
        }
        if !self.group_by.is_empty() {
            clauses.push(format!("GROUP BY {}", self.group_by.join(", ")));
        }
        if !self.order_by.is_empty() {
            let order = self
                .order_by
                .iter()
                .map(|(expr, order)| match order {
                    Order::Asc => expr.clone(),
                    Order::Desc => format!("{expr} DESC"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            clauses.push(format!("ORDER BY {order}"));
        }
        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {limit}"));
        }

        Compiled {
            sql: clauses.join(" \n"),
            params: binder.into_params(),
        }
    }

    /// Statement selecting the rows reachable from one row of `table`
    /// through `relationship`.
    ///
    /// The source row is identified by its single-column primary key. Direct
    /// relationships join the source table; many-to-many relationships join
    /// the association table and filter on its foreign key to the source.
    ///
    /// A source without a single-column primary key (an association table)
    /// can only follow scalar relationships. There `key` is the source's
    /// foreign-key value and the target is filtered on the referenced column.
    pub fn related(
        schema: &Schema,
        table: &str,
        relationship: &str,
        key: impl Into<SqlValue>,
    ) -> Result<Self, SchemaError> {
        let source = schema.get_table(table)?;
        let relationship = source.get_relationship(relationship)?;
        let target = schema.get_table(&relationship.target)?;
        let select = select_all(target);

        match &relationship.secondary {
            Some(secondary) => {
                let association = schema.get_table(secondary)?;
                let mut links = association.foreign_keys_to(&source.name);
                let link = match (links.next(), links.next()) {
                    (Some(link), None) => link,
                    (None, _) => {
                        return Err(SchemaError::NoJoinPath {
                            from: association.name.clone(),
                            to: source.name.clone(),
                        });
                    }
                    (Some(_), Some(_)) => {
                        return Err(SchemaError::AmbiguousJoin {
                            from: association.name.clone(),
                            to: source.name.clone(),
                            candidates: association.foreign_keys_to(&source.name).count(),
                        });
                    }
                };
                let filter_column = association.col(&link.column)?;
                Ok(select
                    .join(schema, &association.name)?
                    .filter(filter_column.eq(key)))
            }
            None if source.single_primary_key().is_err() && relationship.is_scalar() => {
                let mut links = source.foreign_keys_to(&target.name);
                let link = match (links.next(), links.next()) {
                    (Some(link), None) => link,
                    (None, _) => {
                        return Err(SchemaError::NoJoinPath {
                            from: source.name.clone(),
                            to: target.name.clone(),
                        });
                    }
                    (Some(_), Some(_)) => {
                        return Err(SchemaError::AmbiguousJoin {
                            from: source.name.clone(),
                            to: target.name.clone(),
                            candidates: source.foreign_keys_to(&target.name).count(),
                        });
                    }
                };
                let filter_column = target.col(&link.references_column)?;
                Ok(select.filter(filter_column.eq(key)))
            }
            None => {
                let source_key = source.single_primary_key()?;
                let filter_column = source.col(&source_key.name)?;
                Ok(select
                    .join(schema, &source.name)?
                    .filter(filter_column.eq(key)))
            }
        }
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compile().sql)
    }
}
