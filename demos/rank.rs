use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lp_ranking::prelude::*;
use time::macros::format_description;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Liquidity Provider Performance: best / worst LP analysis of a OneZero ARMS report.
#[derive(Debug, Parser)]
struct Args {
    /// ARMS execution statistics report (.csv or .xlsx).
    report: PathBuf,

    /// Core symbol to analyse. Lists the available symbols when omitted.
    #[arg(long)]
    symbol: Option<String>,

    /// One of "% Filled Volume", "Avg Fill Latency (ms)", "Total Filled Volume".
    #[arg(long, default_value = "% Filled Volume")]
    metric: String,

    /// Directory receiving LP_Performance_Ranking.csv / .json.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_tracing()?;

    let raw = RawReport::from_path(&args.report)
        .with_context(|| format!("Failed to load {}", args.report.display()))?;
    let stats = ExecutionStats::try_from(&raw)?;

    let Some(symbol) = args.symbol else {
        println!("Available core symbols:");
        for s in stats.symbols()? {
            println!("  {s}");
        }
        return Ok(());
    };

    let request = RankingRequest::new(symbol, Metric::from_label(&args.metric)?);
    let eval = evaluate_stats(&stats, &request)?;

    println!("\n--- Best vs Worst LP ({} / {}) ---", eval.symbol(), eval.metric());
    println!("Best LP:  {:<24} {}", eval.best().stream_name, eval.best().formatted_value());
    println!("Worst LP: {:<24} {}", eval.worst().stream_name, eval.worst().formatted_value());

    println!("\n--- LP Ranking Table ---");
    print!("{}", eval.ranking().to_csv_string()?);

    if let Some(dir) = args.out_dir {
        let csv_path = eval.ranking().to_csv(&dir)?;
        let json_path = dir.join(eval.ranking().filename(FileExtension::Json));
        fs::write(&json_path, serde_json_pretty(&eval.ranking().to_json()?)?)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        info!(csv = %csv_path.display(), json = %json_path.display(), "Ranking exported");
    }

    // The WorkerGuard ensures all buffered logs are flushed when dropped.
    drop(_guard);

    Ok(())
}

fn serde_json_pretty(value: &serde_json::Value) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to render ranking JSON")
}

// ================================================================================================
// Tracing Configuration
// ================================================================================================

fn init_tracing() -> Result<Option<WorkerGuard>> {
    let app_name = "lp-ranking";

    // Detect if running in container
    let in_container =
        env::var("CONTAINER").is_ok() || std::path::Path::new("/.dockerenv").exists();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if in_container {
        // Container mode: log to stdout
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_current_span(true)
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
            .init();

        info!("Logging to stdout (container mode)");
        Ok(None)
    } else {
        // Local mode: log to file
        let log_dir = dirs::state_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local/state")))
            .context("Failed to find a state or home directory")?
            .join(app_name)
            .join("logs");
        fs::create_dir_all(&log_dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&format_description!(
                "[year][month][day]-[hour][minute][second]"
            ))
            .context("Failed to format timestamp")?;
        let file_name = format!("{app_name}-{timestamp}.log");
        let file_path = log_dir.join(&file_name);

        let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(non_blocking)
            .with_current_span(true)
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
            .init();

        info!(log_file = %file_path.display(), "Logging to file (local mode)");
        Ok(Some(guard))
    }
}
