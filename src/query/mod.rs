//! Query vocabulary shared by the understanding, planning and SQL layers.

mod condition;
mod intent;
mod structured;
mod warning;

pub use condition::{ColumnRef, Combinator, Comparator, Condition, Literal};
pub use intent::{Complexity, IntentLabel, QueryIntent, QueryType};
pub use structured::{AggregateFunction, Aggregation, OrderBy, SortDir, StructuredQuery};
pub use warning::ParseWarning;
