use serde::{Deserialize, Serialize};

use crate::report::metric::Metric;

/// The user's selection for one evaluation: which symbol to scope to and
/// which metric to rank by.
///
/// The symbol should be one of [`ExecutionStats::symbols`](crate::data::execution_stats::ExecutionStats::symbols).
/// Any other value is rejected when the evaluation scopes the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankingRequest {
    /// Value of the `Core Symbol` column (e.g. `EURUSD`).
    pub symbol: String,

    /// Metric used for the best / worst pick and the ranking order.
    pub metric: Metric,
}

impl RankingRequest {
    pub fn new(symbol: impl Into<String>, metric: Metric) -> Self {
        Self {
            symbol: symbol.into(),
            metric,
        }
    }

    pub fn with_symbol(self, symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..self
        }
    }

    pub fn with_metric(self, metric: Metric) -> Self {
        Self { metric, ..self }
    }
}
