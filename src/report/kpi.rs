use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{
    data::execution_stats::StreamRow,
    error::{LpResult, SystemError},
    report::metric::Metric,
};

/// A single headline figure: the stream and its value for the selected metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub stream_name: String,
    pub metric: Metric,
    pub value: f64,
}

impl Kpi {
    fn new(row: &StreamRow, metric: Metric) -> Self {
        Self {
            stream_name: row.stream_name.clone(),
            metric,
            value: metric_value(row, metric),
        }
    }

    /// Two decimals with `,` thousands separators, e.g. `10,000.00`.
    pub fn formatted_value(&self) -> String {
        format_grouped(self.value)
    }
}

/// Best and worst stream of a symbol-scoped subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiPair {
    pub best: Kpi,
    pub worst: Kpi,
}

/// Canonical value of `metric` on `row`.
pub fn metric_value(row: &StreamRow, metric: Metric) -> f64 {
    match metric {
        Metric::FilledPercent => row.filled_pct,
        Metric::AvgLatency => row.avg_latency_ms,
        Metric::TotalVolume => row.total_filled_volume,
    }
}

/// Picks the best and worst row under `metric`'s direction.
///
/// On ties the earliest row wins, for both picks.
pub fn select_extrema(rows: &[StreamRow], metric: Metric) -> LpResult<(&StreamRow, &StreamRow)> {
    let score = |row: &StreamRow| OrderedFloat(metric.to_score(metric_value(row, metric)));

    let (first, rest) = rows.split_first().ok_or(SystemError::EmptySubset)?;
    let (mut best, mut worst) = (first, first);

    for row in rest {
        if score(row) > score(best) {
            best = row;
        }
        if score(row) < score(worst) {
            worst = row;
        }
    }

    Ok((best, worst))
}

impl KpiPair {
    pub fn select(rows: &[StreamRow], metric: Metric) -> LpResult<Self> {
        let (best, worst) = select_extrema(rows, metric)?;
        Ok(Self {
            best: Kpi::new(best, metric),
            worst: Kpi::new(worst, metric),
        })
    }
}

fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed.bytes().any(|b| b != b'0' && b != b'.') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}
