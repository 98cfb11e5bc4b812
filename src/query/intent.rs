//! Classification of what a request is asking for.

use serde::{Deserialize, Serialize};

use super::structured::AggregateFunction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Retrieval,
    Aggregation,
    FilteredRetrieval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    /// Grade a resolved request.
    ///
    /// `max_simple` is the number of conditions a request may carry and
    /// still count as simple (when it has no aggregation or ordering).
    pub fn grade(conditions: usize, aggregation: bool, ordering: bool, max_simple: usize) -> Self {
        if conditions <= max_simple && !aggregation && !ordering {
            Complexity::Simple
        } else if (aggregation && (conditions > max_simple || ordering))
            || conditions >= max_simple + 2
        {
            Complexity::Complex
        } else {
            Complexity::Moderate
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    ShowData,
    CountRecords,
    CalculateAverage,
    SumValues,
    FindMaximum,
    FindMinimum,
    SearchFiltered,
    TopN,
}

impl From<AggregateFunction> for IntentLabel {
    fn from(function: AggregateFunction) -> Self {
        match function {
            AggregateFunction::Count => IntentLabel::CountRecords,
            AggregateFunction::Avg => IntentLabel::CalculateAverage,
            AggregateFunction::Sum => IntentLabel::SumValues,
            AggregateFunction::Max => IntentLabel::FindMaximum,
            AggregateFunction::Min => IntentLabel::FindMinimum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryIntent {
    #[serde(rename = "type")]
    pub query_type: QueryType,
    pub complexity: Complexity,
    pub label: IntentLabel,
}
