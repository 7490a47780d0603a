//! Best / worst liquidity-provider analysis for execution statistics reports.
//!
//! The flow is: read the uploaded report ([`data::raw::RawReport`]), check its
//! header, normalize the display-formatted numbers
//! ([`data::execution_stats::ExecutionStats`]), scope to one symbol, then pick
//! the best and worst stream ([`report::kpi::KpiPair`]) and rank every stream
//! ([`report::ranking::Ranking`]) under the selected [`report::metric::Metric`].
//! [`pipeline::evaluate`] runs all of it in one call.

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod prelude;
pub mod report;
