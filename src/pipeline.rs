use tracing::{debug, info, warn};

use crate::{
    config::RankingRequest,
    data::{execution_stats::ExecutionStats, raw::RawReport},
    error::LpResult,
    report::{
        kpi::{Kpi, KpiPair},
        metric::Metric,
        ranking::Ranking,
    },
};

/// Result of one evaluation: the headline pair plus the full table.
#[derive(Debug, Clone)]
pub struct Evaluation {
    symbol: String,
    kpis: KpiPair,
    ranking: Ranking,
}

impl Evaluation {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn metric(&self) -> Metric {
        self.ranking.metric()
    }

    pub fn best(&self) -> &Kpi {
        &self.kpis.best
    }

    pub fn worst(&self) -> &Kpi {
        &self.kpis.worst
    }

    pub fn kpis(&self) -> &KpiPair {
        &self.kpis
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }
}

/// Validates and normalizes `raw`, then ranks the streams of `request.symbol`.
///
/// Nothing is returned unless every stage succeeds.
#[tracing::instrument(skip_all, fields(symbol = %request.symbol, metric = %request.metric))]
pub fn evaluate(raw: &RawReport, request: &RankingRequest) -> LpResult<Evaluation> {
    let stats = ExecutionStats::try_from(raw)
        .inspect_err(|e| warn!(error = %e, "Report rejected"))?;
    evaluate_stats(&stats, request)
}

/// Same as [`evaluate`] for a report that has already been normalized,
/// e.g. after listing its symbols.
pub fn evaluate_stats(stats: &ExecutionStats, request: &RankingRequest) -> LpResult<Evaluation> {
    let scope = stats.for_symbol(&request.symbol)?;
    debug!(streams = scope.len(), "Scoped to symbol");

    let rows = scope.rows()?;
    let kpis = KpiPair::select(&rows, request.metric)?;
    let ranking = Ranking::build(&scope, request.metric)?;

    info!(
        best = %kpis.best.stream_name,
        worst = %kpis.worst.stream_name,
        streams = ranking.len(),
        "Ranked liquidity providers"
    );

    Ok(Evaluation {
        symbol: request.symbol.clone(),
        kpis,
        ranking,
    })
}

#[cfg(test)]
mod tests {
    use polars::df;

    use super::*;
    use crate::{
        error::{DataError, LpError, SchemaError},
        report::io::ToCsvString,
    };

    fn raw() -> RawReport {
        RawReport::new(
            df![
                "Core Symbol" => &["EURUSD", "EURUSD", "GBPUSD"],
                "Maker Stream Name" => &["LP_A", "LP_B", "LP_C"],
                "% Filled Volume" => &["87.3%", "92.1%", "50%"],
                "Avg. Fill Latency" => &["120ms", "95ms", "10ms"],
                "Total Filled Volume" => &["$10,000.00", "$8,500.50", "$99,999.00"],
            ]
            .expect("Failed to create raw DF"),
        )
    }

    #[test]
    fn test_evaluate_filled_percent() {
        let req = RankingRequest::new("EURUSD", Metric::FilledPercent);
        let eval = evaluate(&raw(), &req).expect("evaluation");

        assert_eq!(eval.symbol(), "EURUSD");
        assert_eq!(eval.metric(), Metric::FilledPercent);
        assert_eq!(eval.best().stream_name, "LP_B");
        assert_eq!(eval.best().formatted_value(), "92.10");
        assert_eq!(eval.worst().stream_name, "LP_A");
        assert_eq!(eval.worst().formatted_value(), "87.30");
        assert_eq!(eval.ranking().len(), 2);
    }

    #[test]
    fn test_evaluate_latency_exports_ascending() {
        let req = RankingRequest::new("EURUSD", Metric::AvgLatency);
        let eval = evaluate(&raw(), &req).expect("evaluation");

        assert_eq!(eval.best().formatted_value(), "95.00");
        assert_eq!(eval.worst().formatted_value(), "120.00");

        let csv = eval.ranking().to_csv_string().expect("csv");
        let lp_names: Vec<_> = csv
            .lines()
            .skip(1)
            .filter_map(|l| l.split(',').next())
            .collect();
        assert_eq!(lp_names, vec!["LP_B", "LP_A"]);
    }

    #[test]
    fn test_evaluate_unknown_symbol() {
        let req = RankingRequest::new("USDJPY", Metric::TotalVolume);
        assert!(matches!(
            evaluate(&raw(), &req),
            Err(LpError::Data(DataError::UnknownSymbol(_)))
        ));
    }

    #[test]
    fn test_evaluate_stops_at_schema() {
        let raw = RawReport::new(
            df![
                "Core Symbol" => &["EURUSD"],
                "Maker Stream Name" => &["LP_A"],
            ]
            .expect("Failed to create raw DF"),
        );
        let req = RankingRequest::new("EURUSD", Metric::FilledPercent);

        match evaluate(&raw, &req) {
            Err(LpError::Schema(SchemaError::MissingColumns(names))) => assert_eq!(
                names,
                vec!["% Filled Volume", "Avg. Fill Latency", "Total Filled Volume"]
            ),
            other => panic!("expected SchemaError, got {other:?}"),
        }
    }
}
