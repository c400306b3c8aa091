//! Schema descriptor types: tables, columns, keys, relationships and views.

use crate::error::SchemaError;
use crate::sql::ColumnRef;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Storage type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    SmallInteger,
    Boolean,
    Date,
    Timestamp,
    Text,
    Binary,
    Varchar { length: u32 },
    Char { length: u32 },
    Numeric { precision: Option<u8>, scale: Option<u8> },
    /// Array of text values.
    TextArray,
    /// Full-text search document.
    TsVector,
    /// Closed set of text labels.
    Enum { name: String, labels: Vec<String> },
}

impl ColumnType {
    /// Variable-length string with a maximum length.
    pub fn varchar(length: u32) -> Self {
        Self::Varchar { length }
    }

    /// Fixed-precision decimal.
    pub fn numeric(precision: u8, scale: u8) -> Self {
        Self::Numeric {
            precision: Some(precision),
            scale: Some(scale),
        }
    }

    /// Named enumeration over the given labels.
    pub fn enumeration(name: &str, labels: &[&str]) -> Self {
        Self::Enum {
            name: name.to_string(),
            labels: labels.iter().map(|label| label.to_string()).collect(),
        }
    }
}

/// Value the database fills in when an insert omits the column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerDefault {
    /// Next value of the named sequence.
    Sequence(String),
    /// Current timestamp.
    Now,
    /// Current date.
    CurrentDate,
    /// Literal SQL expression, rendered as written.
    Literal(String),
}

/// A single table or view column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub default: Option<ServerDefault>,
}

impl Column {
    /// Nullable column with no default.
    pub fn new(name: &str, ty: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            nullable: true,
            primary_key: false,
            unique: false,
            default: None,
        }
    }

    /// Mark the column `NOT NULL`.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark the column as (part of) the primary key. Implies `NOT NULL`.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Mark the column unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Attach a server-side default.
    pub fn default_value(mut self, default: ServerDefault) -> Self {
        self.default = Some(default);
        self
    }
}

/// Action taken on referencing rows when the referenced row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// SQL keyword form.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// Single-column foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

impl ForeignKey {
    /// Foreign key from `column` to `table.references`.
    pub fn new(column: &str, table: &str, references: &str) -> Self {
        Self {
            column: column.to_string(),
            references_table: table.to_string(),
            references_column: references.to_string(),
            on_delete: ReferentialAction::default(),
            on_update: ReferentialAction::default(),
        }
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = action;
        self
    }

    /// `ON DELETE RESTRICT ON UPDATE CASCADE`, the rule most dvdrental keys use.
    pub fn restrict_cascade(self) -> Self {
        self.on_delete(ReferentialAction::Restrict)
            .on_update(ReferentialAction::Cascade)
    }
}

/// Secondary index over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl Index {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// How many target rows a relationship yields per source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    ManyToOne,
    OneToOne,
    OneToMany,
    ManyToMany,
}

/// Loading hint for consumers that materialize relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    /// Load together with the owning row.
    Eager,
    /// Load on first access.
    #[default]
    Lazy,
}

/// Named association from one table to another, optionally through an
/// association table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub name: String,
    pub target: String,
    pub cardinality: Cardinality,
    /// Association table for many-to-many links.
    pub secondary: Option<String>,
    pub load: LoadStrategy,
}

impl Relationship {
    fn new(name: &str, target: &str, cardinality: Cardinality) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            cardinality,
            secondary: None,
            load: LoadStrategy::default(),
        }
    }

    pub fn many_to_one(name: &str, target: &str) -> Self {
        Self::new(name, target, Cardinality::ManyToOne)
    }

    pub fn one_to_one(name: &str, target: &str) -> Self {
        Self::new(name, target, Cardinality::OneToOne)
    }

    pub fn one_to_many(name: &str, target: &str) -> Self {
        Self::new(name, target, Cardinality::OneToMany)
    }

    pub fn many_to_many(name: &str, target: &str, secondary: &str) -> Self {
        let mut relationship = Self::new(name, target, Cardinality::ManyToMany);
        relationship.secondary = Some(secondary.to_string());
        relationship
    }

    pub fn eager(mut self) -> Self {
        self.load = LoadStrategy::Eager;
        self
    }

    /// Whether the relationship yields at most one row.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self.cardinality,
            Cardinality::ManyToOne | Cardinality::OneToOne
        )
    }
}

/// Table descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
    pub relationships: Vec<Relationship>,
}

impl Table {
    /// Empty table descriptor.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Column descriptor by name.
    pub fn get_column(&self, name: &str) -> Result<&Column, SchemaError> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .ok_or_else(|| SchemaError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Qualified reference to a column of this table.
    pub fn col(&self, name: &str) -> Result<ColumnRef, SchemaError> {
        let column = self.get_column(name)?;
        Ok(ColumnRef::new(&self.name, &column.name))
    }

    /// Relationship descriptor by name.
    pub fn get_relationship(&self, name: &str) -> Result<&Relationship, SchemaError> {
        self.relationships
            .iter()
            .find(|relationship| relationship.name == name)
            .ok_or_else(|| SchemaError::UnknownRelationship {
                table: self.name.clone(),
                relationship: name.to_string(),
            })
    }

    /// Primary key columns in declaration order.
    pub fn primary_key(&self) -> Vec<&Column> {
        self.columns.iter().filter(|column| column.primary_key).collect()
    }

    /// The primary key column when the key has exactly one column.
    pub fn single_primary_key(&self) -> Result<&Column, SchemaError> {
        match self.primary_key().as_slice() {
            [column] => Ok(*column),
            _ => Err(SchemaError::NoPrimaryKey(self.name.clone())),
        }
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// Foreign keys of this table that reference `table`.
    pub fn foreign_keys_to<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ForeignKey> {
        self.foreign_keys
            .iter()
            .filter(move |foreign_key| foreign_key.references_table == table)
    }
}

/// Read-only view descriptor with its defining query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub name: String,
    pub columns: Vec<Column>,
    /// `SELECT` statement the view is defined by.
    pub definition: String,
}

impl View {
    pub fn new(name: &str, definition: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            definition: definition.trim().to_string(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }
}

/// Equality condition linking two tables through one foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub left: ColumnRef,
    pub right: ColumnRef,
}

impl fmt::Display for JoinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.left, self.right)
    }
}

/// Collection of tables and views, optionally under a schema namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    /// Namespace such as `public`; table lookups accept `namespace.table`.
    pub namespace: Option<String>,
    pub tables: Vec<Table>,
    pub views: Vec<View>,
}

impl Schema {
    /// Empty schema without a namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty schema under `namespace`.
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..Self::default()
        }
    }

    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    /// Strip the namespace prefix when present.
    fn local_name<'a>(&self, name: &'a str) -> &'a str {
        match (&self.namespace, name.split_once('.')) {
            (Some(namespace), Some((prefix, rest))) if prefix == namespace => rest,
            _ => name,
        }
    }

    /// Table descriptor by plain or namespace-qualified name.
    pub fn get_table(&self, name: &str) -> Result<&Table, SchemaError> {
        let local = self.local_name(name);
        self.tables
            .iter()
            .find(|table| table.name == local)
            .ok_or_else(|| SchemaError::UnknownTable(name.to_string()))
    }

    /// View descriptor by plain or namespace-qualified name.
    pub fn get_view(&self, name: &str) -> Result<&View, SchemaError> {
        let local = self.local_name(name);
        self.views
            .iter()
            .find(|view| view.name == local)
            .ok_or_else(|| SchemaError::UnknownTable(name.to_string()))
    }

    /// `namespace.table`, or the bare name without a namespace.
    pub fn qualified_name(&self, table: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}.{table}"),
            None => table.to_string(),
        }
    }

    /// Resolve the single foreign key linking `left` and `right`, in either
    /// direction. The condition is oriented as `left.col = right.col`.
    pub fn join_condition(&self, left: &str, right: &str) -> Result<JoinCondition, SchemaError> {
        let left_table = self.get_table(left)?;
        let right_table = self.get_table(right)?;

        let mut candidates = Vec::new();
        for foreign_key in left_table.foreign_keys_to(&right_table.name) {
            candidates.push(JoinCondition {
                left: ColumnRef::new(&left_table.name, &foreign_key.column),
                right: ColumnRef::new(&right_table.name, &foreign_key.references_column),
            });
        }
        if left_table.name != right_table.name {
            for foreign_key in right_table.foreign_keys_to(&left_table.name) {
                candidates.push(JoinCondition {
                    left: ColumnRef::new(&left_table.name, &foreign_key.references_column),
                    right: ColumnRef::new(&right_table.name, &foreign_key.column),
                });
            }
        }

        match candidates.len() {
            0 => Err(SchemaError::NoJoinPath {
                from: left_table.name.clone(),
                to: right_table.name.clone(),
            }),
            1 => Ok(candidates.remove(0)),
            count => Err(SchemaError::AmbiguousJoin {
                from: left_table.name.clone(),
                to: right_table.name.clone(),
                candidates: count,
            }),
        }
    }

    /// Tables ordered so every table follows the tables it references.
    ///
    /// Self-references are ignored; declaration order breaks ties.
    pub fn creation_order(&self) -> Result<Vec<&Table>, SchemaError> {
        let mut remaining: BTreeMap<&str, BTreeSet<&str>> = self
            .tables
            .iter()
            .map(|table| {
                let deps = table
                    .foreign_keys
                    .iter()
                    .map(|foreign_key| foreign_key.references_table.as_str())
                    .filter(|target| *target != table.name)
                    .collect();
                (table.name.as_str(), deps)
            })
            .collect();

        let mut ordered = Vec::with_capacity(self.tables.len());
        while !remaining.is_empty() {
            let ready: Vec<&Table> = self
                .tables
                .iter()
                .filter(|table| {
                    remaining
                        .get(table.name.as_str())
                        .is_some_and(|deps| deps.iter().all(|dep| !remaining.contains_key(dep)))
                })
                .collect();
            if ready.is_empty() {
                let stuck = remaining.keys().map(|name| name.to_string()).collect();
                return Err(SchemaError::DependencyCycle(stuck));
            }
            for table in ready {
                remaining.remove(table.name.as_str());
                ordered.push(table);
            }
        }
        Ok(ordered)
    }

    /// Check that every key, index and relationship points at something that
    /// exists in this schema.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for table in &self.tables {
            for foreign_key in &table.foreign_keys {
                table.get_column(&foreign_key.column)?;
                self.get_table(&foreign_key.references_table)?
                    .get_column(&foreign_key.references_column)?;
            }
            for index in &table.indexes {
                for column in &index.columns {
                    table.get_column(column)?;
                }
            }
            for relationship in &table.relationships {
                self.get_table(&relationship.target)?;
                if let Some(secondary) = &relationship.secondary {
                    self.get_table(secondary)?;
                }
            }
        }
        debug!(
            "schema validated (tables={}, views={})",
            self.tables.len(),
            self.views.len()
        );
        Ok(())
    }
}
