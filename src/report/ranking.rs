use std::sync::Arc;

use itertools::izip;
use polars::{
    frame::DataFrame,
    prelude::{
        DataType, Field, Float64Chunked, IntoLazy, PlSmallStr, Schema, SchemaRef,
        SortMultipleOptions, col,
    },
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    data::execution_stats::{ExecutionStatsCol, SymbolScope},
    error::{DataError, LpError, LpResult},
    report::{
        io::{Report, ReportName, ToSchema},
        metric::Metric,
        polars_ext::polars_to_lp_error,
    },
};

/// Columns of the exported ranking table, labelled for people rather than code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    PartialOrd,
    Ord,
    EnumIter,
    IntoStaticStr,
)]
pub enum RankingCol {
    #[strum(serialize = "LP Name")]
    LpName,
    #[strum(serialize = "% Filled Volume")]
    FilledVolumePct,
    #[strum(serialize = "Avg Fill Latency (ms)")]
    AvgFillLatencyMs,
    #[strum(serialize = "Total Filled Volume")]
    TotalFilledVolume,
}

impl From<RankingCol> for PlSmallStr {
    fn from(value: RankingCol) -> Self {
        value.as_str().into()
    }
}

impl RankingCol {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Normalized column this presentation column is projected from.
    pub fn source(&self) -> ExecutionStatsCol {
        match self {
            RankingCol::LpName => ExecutionStatsCol::StreamName,
            RankingCol::FilledVolumePct => ExecutionStatsCol::FilledPct,
            RankingCol::AvgFillLatencyMs => ExecutionStatsCol::AvgLatencyMs,
            RankingCol::TotalFilledVolume => ExecutionStatsCol::TotalFilledVolume,
        }
    }
}

/// One line of the ranking table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    #[serde(rename = "LP Name")]
    pub lp_name: String,
    #[serde(rename = "% Filled Volume")]
    pub filled_volume_pct: f64,
    #[serde(rename = "Avg Fill Latency (ms)")]
    pub avg_fill_latency_ms: f64,
    #[serde(rename = "Total Filled Volume")]
    pub total_filled_volume: f64,
}

/// Every stream of one symbol, best first under the selected metric.
///
/// # Columns
///
/// | LP Name | % Filled Volume | Avg Fill Latency (ms) | Total Filled Volume |
/// |---------|-----------------|-----------------------|---------------------|
/// | LP_B    | 92.1            | 95.0                  | 8500.5              |
/// | LP_A    | 87.3            | 120.0                 | 10000.0             |
///
/// Streams with equal metric values keep the order of the uploaded file.
#[derive(Debug, Clone)]
pub struct Ranking {
    metric: Metric,
    df: DataFrame,
}

impl ReportName for Ranking {
    fn base_name(&self) -> String {
        "LP_Performance_Ranking".to_string()
    }
}

impl Report for Ranking {
    fn as_df(&self) -> &DataFrame {
        &self.df
    }
}

impl ToSchema for Ranking {
    fn to_schema() -> SchemaRef {
        let fields: Vec<Field> = RankingCol::iter()
            .map(|col| {
                let dtype = match col {
                    RankingCol::LpName => DataType::String,
                    RankingCol::FilledVolumePct
                    | RankingCol::AvgFillLatencyMs
                    | RankingCol::TotalFilledVolume => DataType::Float64,
                };
                Field::new(col.into(), dtype)
            })
            .collect();

        Arc::new(Schema::from_iter(fields))
    }
}

impl Ranking {
    /// Projects, relabels and sorts the scoped rows.
    ///
    /// Descending for higher-is-better metrics, ascending otherwise. The sort is stable.
    pub fn build(scope: &SymbolScope, metric: Metric) -> LpResult<Self> {
        let projection = RankingCol::iter()
            .map(|c| col(c.source().as_str()).alias(c.as_str()))
            .collect::<Vec<_>>();

        let sort_opts = SortMultipleOptions::default()
            .with_order_descending(metric.higher_is_better())
            .with_maintain_order(true);

        let df = scope
            .as_df()
            .clone()
            .lazy()
            .select(projection)
            .sort([metric.ranking_column().as_str()], sort_opts)
            .collect()
            .map_err(|e| polars_to_lp_error("ranking", e))?;

        Ok(Self { metric, df })
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn rows(&self) -> LpResult<Vec<RankingRow>> {
        let name = self
            .df
            .column(RankingCol::LpName.as_str())
            .and_then(|c| c.str())
            .map_err(|e| DataError::DataFrame(e.to_string()))?;
        let filled = self.float_col(RankingCol::FilledVolumePct)?;
        let latency = self.float_col(RankingCol::AvgFillLatencyMs)?;
        let volume = self.float_col(RankingCol::TotalFilledVolume)?;

        izip!(name, filled, latency, volume)
            .enumerate()
            .map(|(i, cells)| match cells {
                (Some(lp_name), Some(filled), Some(latency), Some(volume)) => Ok(RankingRow {
                    lp_name: lp_name.to_string(),
                    filled_volume_pct: filled,
                    avg_fill_latency_ms: latency,
                    total_filled_volume: volume,
                }),
                _ => Err(LpError::from(DataError::DataFrame(format!(
                    "Ranking row {i} contains a null value"
                )))),
            })
            .collect()
    }

    fn float_col(&self, c: RankingCol) -> LpResult<&Float64Chunked> {
        self.df
            .column(c.as_str())
            .and_then(|s| s.f64())
            .map_err(|e| LpError::from(DataError::DataFrame(e.to_string())))
    }
}
