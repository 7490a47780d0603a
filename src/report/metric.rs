use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    data::execution_stats::ExecutionStatsCol,
    error::{DataError, LpResult},
    report::ranking::RankingCol,
};

pub enum OptimizationDirection {
    Maximize,
    Minimize,
}

/// Performance metric a stream is judged by.
///
/// The label is what the user picks from and what the ranking table
/// uses as a column header.
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
pub enum Metric {
    /// Share of the requested volume that was filled.
    #[strum(serialize = "% Filled Volume")]
    #[serde(rename = "% Filled Volume")]
    FilledPercent,
    /// Average time to fill in milliseconds.
    #[strum(serialize = "Avg Fill Latency (ms)")]
    #[serde(rename = "Avg Fill Latency (ms)")]
    AvgLatency,
    /// Filled notional volume.
    #[strum(serialize = "Total Filled Volume")]
    #[serde(rename = "Total Filled Volume")]
    TotalVolume,
}

impl Metric {
    /// Resolves a user-facing label. Only the three labels of [`Metric`] are accepted.
    pub fn from_label(label: &str) -> LpResult<Self> {
        label
            .parse()
            .map_err(|_| DataError::UnknownMetric(label.to_string()).into())
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn direction(&self) -> OptimizationDirection {
        use Metric::*;
        use OptimizationDirection::*;

        match self {
            FilledPercent => Maximize,
            AvgLatency => Minimize,
            TotalVolume => Maximize,
        }
    }

    /// Canonical column of the normalized table this metric reads.
    pub fn column(&self) -> ExecutionStatsCol {
        match self {
            Metric::FilledPercent => ExecutionStatsCol::FilledPct,
            Metric::AvgLatency => ExecutionStatsCol::AvgLatencyMs,
            Metric::TotalVolume => ExecutionStatsCol::TotalFilledVolume,
        }
    }

    /// Column of the ranking table holding this metric.
    pub fn ranking_column(&self) -> RankingCol {
        match self {
            Metric::FilledPercent => RankingCol::FilledVolumePct,
            Metric::AvgLatency => RankingCol::AvgFillLatencyMs,
            Metric::TotalVolume => RankingCol::TotalFilledVolume,
        }
    }

    pub fn higher_is_better(&self) -> bool {
        matches!(self.direction(), OptimizationDirection::Maximize)
    }

    /// Converts the raw metric value into a score where larger is always better.
    pub fn to_score(&self, raw_value: f64) -> f64 {
        match self.direction() {
            OptimizationDirection::Maximize => raw_value,
            OptimizationDirection::Minimize => -raw_value,
        }
    }
}
