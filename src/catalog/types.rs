//! Catalog snapshot types.
//!
//! These mirror what the schema-discovery collaborator hands over: table names
//! exactly as stored in the database, ordered columns with their statistics,
//! and key-candidate annotations.

use std::str::FromStr;

use inflector::Inflector;
use serde::{Deserialize, Serialize};

// =============================================================================
// Column Types
// =============================================================================

/// Declared type tag of a catalog column.
///
/// Raw database type names are folded into one of four tags when the catalog
/// is loaded (see [`ColumnType::from_str`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ColumnType {
    Numeric,
    Text,
    Datetime,
    Boolean,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    pub fn is_text(self) -> bool {
        matches!(self, ColumnType::Text)
    }
}

impl FromStr for ColumnType {
    type Err = String;

    /// Parse a type tag or a raw database type name.
    ///
    /// Size and precision suffixes are ignored: `varchar(50)` and
    /// `decimal(10, 2)` parse like `varchar` and `decimal`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let base = lower.split('(').next().unwrap_or_default().trim();

        match base {
            "numeric" | "number" | "int" | "integer" | "bigint" | "smallint" | "tinyint"
            | "decimal" | "float" | "real" | "double" | "double precision" | "money"
            | "smallmoney" => Ok(ColumnType::Numeric),
            "text" | "string" | "varchar" | "nvarchar" | "char" | "nchar" | "ntext"
            | "character varying" | "uniqueidentifier" | "uuid" => Ok(ColumnType::Text),
            "datetime" | "datetime2" | "smalldatetime" | "date" | "time" | "timestamp"
            | "timestamptz" | "datetimeoffset" => Ok(ColumnType::Datetime),
            "boolean" | "bool" | "bit" => Ok(ColumnType::Boolean),
            _ => Err(format!("Unknown column type: {}", s)),
        }
    }
}

impl TryFrom<String> for ColumnType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// =============================================================================
// Columns
// =============================================================================

/// A column of a catalog table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogColumn {
    /// Column name as stored.
    pub name: String,

    /// Declared type tag.
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    #[serde(default)]
    pub nullable: bool,

    /// Distinct values divided by non-null values (0.0 - 1.0).
    #[serde(default)]
    pub uniqueness_ratio: f64,

    /// Null values divided by total rows (0.0 - 1.0).
    #[serde(default)]
    pub null_ratio: f64,

    /// A few observed values, if the collaborator sampled the table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_values: Vec<String>,
}

impl CatalogColumn {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            uniqueness_ratio: 0.0,
            null_ratio: 0.0,
            sample_values: Vec::new(),
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_uniqueness(mut self, ratio: f64) -> Self {
        self.uniqueness_ratio = ratio;
        self
    }

    pub fn with_null_ratio(mut self, ratio: f64) -> Self {
        self.null_ratio = ratio;
        self
    }

    pub fn with_samples<I, S>(mut self, samples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sample_values = samples.into_iter().map(Into::into).collect();
        self
    }
}

// =============================================================================
// Tables
// =============================================================================

/// A table of the catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTable {
    /// Schema-qualified name exactly as stored (e.g. `dbo.Users`).
    pub name: String,

    pub columns: Vec<CatalogColumn>,

    #[serde(default)]
    pub row_count: u64,

    /// Metadata quality score (0.0 - 1.0).
    #[serde(default)]
    pub quality_score: f64,

    /// Columns that look like primary keys, in column order.
    #[serde(default)]
    pub primary_key_candidates: Vec<String>,

    /// Columns that look like foreign keys, in column order.
    #[serde(default)]
    pub foreign_key_candidates: Vec<String>,
}

impl CatalogTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            row_count: 0,
            quality_score: 0.0,
            primary_key_candidates: Vec::new(),
            foreign_key_candidates: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: CatalogColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_row_count(mut self, rows: u64) -> Self {
        self.row_count = rows;
        self
    }

    pub fn with_quality(mut self, score: f64) -> Self {
        self.quality_score = score;
        self
    }

    /// Mark a column as a primary-key candidate. Duplicates are ignored.
    pub fn with_primary_key(mut self, column: &str) -> Self {
        if !self.primary_key_candidates.iter().any(|c| c == column) {
            self.primary_key_candidates.push(column.into());
        }
        self
    }

    /// Mark a column as a foreign-key candidate. Duplicates are ignored.
    pub fn with_foreign_key(mut self, column: &str) -> Self {
        if !self.foreign_key_candidates.iter().any(|c| c == column) {
            self.foreign_key_candidates.push(column.into());
        }
        self
    }

    /// The unqualified part of the name: `dbo.Users` -> `Users`.
    pub fn simple_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(pos) => &self.name[pos + 1..],
            None => &self.name,
        }
    }

    /// Lowercase words of the unqualified name.
    ///
    /// Splits on underscores and camelCase boundaries:
    /// `dbo.OrderItems` -> `["order", "items"]`.
    pub fn name_words(&self) -> Vec<String> {
        name_words(self.simple_name())
    }

    pub fn column(&self, name: &str) -> Option<&CatalogColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// First primary-key candidate that is an actual column of the table.
    pub fn primary_key(&self) -> Option<&CatalogColumn> {
        self.primary_key_candidates
            .iter()
            .find_map(|name| self.column(name))
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &CatalogColumn> {
        self.columns.iter().filter(|c| c.column_type.is_numeric())
    }

    pub fn first_numeric_column(&self) -> Option<&CatalogColumn> {
        self.numeric_columns().next()
    }
}

/// Split an identifier into lowercase words.
///
/// Dots, underscores, spaces and camelCase boundaries all separate words.
pub fn name_words(name: &str) -> Vec<String> {
    name.split('.')
        .flat_map(|segment| {
            segment
                .to_snake_case()
                .split('_')
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
