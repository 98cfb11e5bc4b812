//! The structured form of a request: what the SQL builder consumes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::condition::Condition;

/// Aggregate function applied to the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunction {
    Count,
    Avg,
    Sum,
    Max,
    Min,
}

impl AggregateFunction {
    /// SQL function name.
    pub fn as_sql(self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Min => "MIN",
        }
    }

    /// AVG and SUM only make sense over numeric columns.
    pub fn requires_numeric(self) -> bool {
        matches!(self, AggregateFunction::Avg | AggregateFunction::Sum)
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Aggregation over a column, or over `*` when `column` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub function: AggregateFunction,
    pub column: Option<String>,
}

impl Aggregation {
    pub fn count_star() -> Self {
        Self {
            function: AggregateFunction::Count,
            column: None,
        }
    }

    pub fn over(function: AggregateFunction, column: &str) -> Self {
        Self {
            function,
            column: Some(column.into()),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDir,
}

impl OrderBy {
    pub fn new(column: &str, direction: SortDir) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// A request resolved against the catalog.
///
/// Plain data: every name is stored exactly as the catalog spells it, and
/// every condition column is bound. An empty `columns` list projects `*`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredQuery {
    pub target: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl StructuredQuery {
    pub fn from_table(table: &str) -> Self {
        Self {
            target: Some(table.into()),
            ..Default::default()
        }
    }

    pub fn column(mut self, column: &str) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn aggregate(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn order_by(mut self, column: &str, direction: SortDir) -> Self {
        self.order_by = Some(OrderBy::new(column, direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}
