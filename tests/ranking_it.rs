mod common;

use std::io::Cursor;

use lp_ranking::prelude::*;
use polars::prelude::{CsvReadOptions, SerReader};

use crate::common::{fixture_path, load_fixture};

fn eval(symbol: &str, metric: Metric) -> Evaluation {
    let raw = load_fixture("execution_stats.csv");
    evaluate(&raw, &RankingRequest::new(symbol, metric)).expect("evaluation")
}

fn lp_names(eval: &Evaluation) -> Vec<String> {
    eval.ranking()
        .rows()
        .expect("ranking rows")
        .into_iter()
        .map(|r| r.lp_name)
        .collect()
}

#[test]
fn test_symbols_offered_from_report() {
    let raw = load_fixture("execution_stats.csv");
    let stats = ExecutionStats::try_from(&raw).expect("valid report");
    assert_eq!(
        stats.symbols().expect("symbols"),
        vec!["EURUSD", "GBPUSD", "XAUUSD"]
    );
}

#[test]
fn test_eurusd_filled_percent() {
    let eval = eval("EURUSD", Metric::FilledPercent);

    assert_eq!(eval.best().stream_name, "LP_B");
    assert_eq!(eval.best().formatted_value(), "92.10");
    assert_eq!(eval.worst().stream_name, "LP_D");
    assert_eq!(eval.worst().formatted_value(), "64.00");
    assert_eq!(lp_names(&eval), vec!["LP_B", "LP_C", "LP_A", "LP_D"]);
}

#[test]
fn test_eurusd_latency() {
    let eval = eval("EURUSD", Metric::AvgLatency);

    assert_eq!(eval.best().stream_name, "LP_B");
    assert_eq!(eval.best().formatted_value(), "95.00");
    assert_eq!(eval.worst().stream_name, "LP_C");
    assert_eq!(eval.worst().formatted_value(), "140.00");
    assert_eq!(lp_names(&eval), vec!["LP_B", "LP_D", "LP_A", "LP_C"]);
}

#[test]
fn test_eurusd_volume() {
    let eval = eval("EURUSD", Metric::TotalVolume);

    assert_eq!(eval.best().stream_name, "LP_D");
    assert_eq!(eval.best().formatted_value(), "125,300.10");
    assert_eq!(eval.worst().stream_name, "LP_B");
    assert_eq!(eval.worst().formatted_value(), "8,500.50");
    assert_eq!(lp_names(&eval), vec!["LP_D", "LP_A", "LP_B", "LP_C"]);
}

#[test]
fn test_fill_ratio_above_hundred_passes_through() {
    let eval = eval("XAUUSD", Metric::FilledPercent);

    assert_eq!(eval.best().stream_name, "LP_D");
    assert_eq!(eval.best().value, 101.2);
    assert_eq!(eval.best().formatted_value(), "101.20");
}

#[test]
fn test_workbook_report_end_to_end() {
    let raw = load_fixture("execution_stats.xlsx");
    let stats = ExecutionStats::try_from(&raw).expect("valid workbook report");
    assert_eq!(stats.symbols().expect("symbols"), vec!["EURUSD", "GBPUSD"]);

    let eval = evaluate_stats(&stats, &RankingRequest::new("EURUSD", Metric::FilledPercent))
        .expect("evaluation");
    assert_eq!(eval.best().stream_name, "LP_B");
    assert_eq!(eval.best().formatted_value(), "92.10");
    assert_eq!(eval.worst().stream_name, "LP_A");
    assert_eq!(eval.worst().formatted_value(), "87.30");
    assert_eq!(lp_names(&eval), vec!["LP_B", "LP_A"]);

    let eval = evaluate_stats(&stats, &RankingRequest::new("EURUSD", Metric::AvgLatency))
        .expect("evaluation");
    assert_eq!(eval.best().formatted_value(), "95.00");
    assert_eq!(eval.worst().formatted_value(), "120.00");
}

#[test]
fn test_workbook_numeric_cells_normalize() {
    let raw = load_fixture("execution_stats.xlsx");
    let req = RankingRequest::new("GBPUSD", Metric::TotalVolume);
    let eval = evaluate(&raw, &req).expect("evaluation");

    assert_eq!(eval.best().stream_name, "LP_B");
    assert_eq!(eval.best().value, 45_100.5);
    assert_eq!(eval.best().formatted_value(), "45,100.50");
}

#[test]
fn test_exported_csv_round_trips() {
    let eval = eval("EURUSD", Metric::AvgLatency);
    let tmp = tempfile::tempdir().expect("temp dir");

    let path = eval.ranking().to_csv(tmp.path()).expect("write csv");
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("LP_Performance_Ranking.csv")
    );

    let bytes = std::fs::read(&path).expect("read back");
    let text = String::from_utf8(bytes.clone()).expect("utf-8");
    assert_eq!(
        text.lines().next(),
        Some("LP Name,% Filled Volume,Avg Fill Latency (ms),Total Filled Volume")
    );

    let back = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .expect("re-parse csv");

    assert_eq!(back.height(), eval.ranking().len());
    let names: Vec<String> = back
        .column("LP Name")
        .expect("LP Name column")
        .str()
        .expect("text column")
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    assert_eq!(names, lp_names(&eval));
}

#[test]
fn test_malformed_cell_aborts_evaluation() {
    let raw = load_fixture("malformed_latency.csv");
    let req = RankingRequest::new("EURUSD", Metric::FilledPercent);

    match evaluate(&raw, &req) {
        Err(LpError::Data(DataError::Normalization { column, value, row })) => {
            assert_eq!(column, "Avg. Fill Latency");
            assert_eq!(value, "n/a");
            assert_eq!(row, 1);
        }
        other => panic!("expected Normalization error, got {other:?}"),
    }
}

#[test]
fn test_missing_column_aborts_evaluation() {
    let raw = load_fixture("missing_latency.csv");
    let req = RankingRequest::new("EURUSD", Metric::FilledPercent);

    match evaluate(&raw, &req) {
        Err(LpError::Schema(SchemaError::MissingColumns(names))) => {
            assert_eq!(names, vec!["Avg. Fill Latency"]);
        }
        other => panic!("expected SchemaError, got {other:?}"),
    }
}

#[test]
fn test_unsupported_extension() {
    let path = fixture_path("execution_stats.csv").with_extension("parquet");
    assert!(matches!(
        RawReport::from_path(path),
        Err(LpError::Io(IoError::UnsupportedFormat(_)))
    ));
}
