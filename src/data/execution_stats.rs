use std::sync::Arc;

use itertools::{Itertools, izip};
use polars::{
    df,
    frame::DataFrame,
    prelude::{DataType, Field, IntoLazy, PlSmallStr, Schema, SchemaRef, col, lit},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::debug;

use crate::{
    data::{
        normalize::{label_column, normalize_column},
        raw::{RawCol, RawReport},
    },
    error::{DataError, LpError, LpResult},
    report::io::{Report, ToSchema},
};

/// Columns of the normalized execution statistics table.
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
#[strum(serialize_all = "snake_case")]
pub enum ExecutionStatsCol {
    /// The traded instrument (e.g., `EURUSD`).
    Symbol,
    /// The liquidity-provider stream being ranked.
    StreamName,
    /// Percentage of order volume filled. Not clamped to `0..=100`.
    FilledPct,
    /// Average fill latency in milliseconds.
    AvgLatencyMs,
    /// Filled notional volume in currency units.
    TotalFilledVolume,
}

impl From<ExecutionStatsCol> for PlSmallStr {
    fn from(value: ExecutionStatsCol) -> Self {
        value.as_str().into()
    }
}

impl ExecutionStatsCol {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// One stream's statistics for one symbol, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRow {
    pub symbol: String,
    pub stream_name: String,
    pub filled_pct: f64,
    pub avg_latency_ms: f64,
    pub total_filled_volume: f64,
}

/// The execution statistics report with every numeric field in canonical form.
///
/// Row order is the order of the uploaded file.
#[derive(Debug, Clone)]
pub struct ExecutionStats {
    df: DataFrame,
}

impl Report for ExecutionStats {
    fn as_df(&self) -> &DataFrame {
        &self.df
    }
}

impl ToSchema for ExecutionStats {
    fn to_schema() -> SchemaRef {
        let fields: Vec<Field> = ExecutionStatsCol::iter()
            .map(|col| {
                let dtype = match col {
                    ExecutionStatsCol::Symbol | ExecutionStatsCol::StreamName => DataType::String,

                    ExecutionStatsCol::FilledPct
                    | ExecutionStatsCol::AvgLatencyMs
                    | ExecutionStatsCol::TotalFilledVolume => DataType::Float64,
                };
                Field::new(col.into(), dtype)
            })
            .collect();

        Arc::new(Schema::from_iter(fields))
    }
}

impl TryFrom<&RawReport> for ExecutionStats {
    type Error = LpError;

    /// Validates the header row, then normalizes every cell.
    ///
    /// Either every row is normalized or the whole report is rejected.
    fn try_from(raw: &RawReport) -> LpResult<Self> {
        raw.validate()?;

        let src = raw.as_df();
        let symbol = label_column(src, RawCol::CoreSymbol)?;
        let stream_name = label_column(src, RawCol::MakerStreamName)?;
        let filled_pct = normalize_column(src, RawCol::FilledVolumePct)?;
        let avg_latency_ms = normalize_column(src, RawCol::AvgFillLatency)?;
        let total_filled_volume = normalize_column(src, RawCol::TotalFilledVolume)?;

        let df = df!(
            ExecutionStatsCol::Symbol.as_str() => symbol,
            ExecutionStatsCol::StreamName.as_str() => stream_name,
            ExecutionStatsCol::FilledPct.as_str() => filled_pct,
            ExecutionStatsCol::AvgLatencyMs.as_str() => avg_latency_ms,
            ExecutionStatsCol::TotalFilledVolume.as_str() => total_filled_volume,
        )
        .map_err(|e| DataError::DataFrame(e.to_string()))?;

        debug!(rows = df.height(), "Normalized execution statistics");
        Ok(Self { df })
    }
}

impl ExecutionStats {
    /// Distinct values of `Core Symbol`, sorted ascending.
    pub fn symbols(&self) -> LpResult<Vec<String>> {
        let ca = string_col(&self.df, ExecutionStatsCol::Symbol)?;
        Ok(ca
            .into_iter()
            .flatten()
            .unique()
            .sorted()
            .map(str::to_string)
            .collect())
    }

    /// Restricts the table to one symbol, keeping the original row order.
    ///
    /// # Errors
    /// `DataError::UnknownSymbol` if no row carries `symbol`.
    pub fn for_symbol(&self, symbol: &str) -> LpResult<SymbolScope> {
        let df = self
            .df
            .clone()
            .lazy()
            .filter(col(ExecutionStatsCol::Symbol.as_str()).eq(lit(symbol)))
            .collect()
            .map_err(|e| DataError::DataFrame(format!("Failed to scope to '{symbol}': {e}")))?;

        if df.height() == 0 {
            return Err(DataError::UnknownSymbol(symbol.to_string()).into());
        }

        Ok(SymbolScope {
            symbol: symbol.to_string(),
            df,
        })
    }

    pub fn rows(&self) -> LpResult<Vec<StreamRow>> {
        rows_of(&self.df)
    }
}

/// The rows of [`ExecutionStats`] belonging to one symbol. Never empty.
#[derive(Debug, Clone)]
pub struct SymbolScope {
    symbol: String,
    df: DataFrame,
}

impl Report for SymbolScope {
    fn as_df(&self) -> &DataFrame {
        &self.df
    }
}

impl SymbolScope {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn rows(&self) -> LpResult<Vec<StreamRow>> {
        rows_of(&self.df)
    }
}

fn rows_of(df: &DataFrame) -> LpResult<Vec<StreamRow>> {
    let symbol = string_col(df, ExecutionStatsCol::Symbol)?;
    let stream_name = string_col(df, ExecutionStatsCol::StreamName)?;
    let filled_pct = float_col(df, ExecutionStatsCol::FilledPct)?;
    let avg_latency_ms = float_col(df, ExecutionStatsCol::AvgLatencyMs)?;
    let total_filled_volume = float_col(df, ExecutionStatsCol::TotalFilledVolume)?;

    izip!(
        symbol,
        stream_name,
        filled_pct,
        avg_latency_ms,
        total_filled_volume
    )
    .enumerate()
    .map(|(i, (symbol, stream_name, filled, latency, volume))| {
        match (symbol, stream_name, filled, latency, volume) {
            (Some(symbol), Some(stream_name), Some(filled), Some(latency), Some(volume)) => {
                Ok(StreamRow {
                    symbol: symbol.to_string(),
                    stream_name: stream_name.to_string(),
                    filled_pct: filled,
                    avg_latency_ms: latency,
                    total_filled_volume: volume,
                })
            }
            _ => Err(LpError::from(DataError::DataFrame(format!(
                "Normalized row {i} contains a null value"
            )))),
        }
    })
    .collect()
}

fn string_col(
    df: &DataFrame,
    c: ExecutionStatsCol,
) -> LpResult<&polars::prelude::StringChunked> {
    df.column(c.as_str())
        .and_then(|s| s.str())
        .map_err(|e| DataError::DataFrame(e.to_string()).into())
}

fn float_col(
    df: &DataFrame,
    c: ExecutionStatsCol,
) -> LpResult<&polars::prelude::Float64Chunked> {
    df.column(c.as_str())
        .and_then(|s| s.f64())
        .map_err(|e| DataError::DataFrame(e.to_string()).into())
}
