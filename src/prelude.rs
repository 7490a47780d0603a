// 1. Traits
pub use crate::report::io::{Report, ReportName, ToCsv, ToCsvString, ToJson, ToSchema};

// 2. Pipeline
pub use crate::config::RankingRequest;
pub use crate::pipeline::{Evaluation, evaluate, evaluate_stats};

// 3. Tables
pub use crate::data::execution_stats::{ExecutionStats, ExecutionStatsCol, StreamRow, SymbolScope};
pub use crate::data::raw::{RawCol, RawReport};
pub use crate::report::kpi::{Kpi, KpiPair};
pub use crate::report::metric::{Metric, OptimizationDirection};
pub use crate::report::ranking::{Ranking, RankingCol, RankingRow};

// 4. Input
pub use crate::io::InputFormat;
pub use crate::report::io::FileExtension;

// 5. Errors
pub use crate::error::{DataError, IoError, LpError, LpResult, SchemaError, SystemError};
