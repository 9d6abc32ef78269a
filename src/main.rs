// External crates
use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::env;
use std::path::PathBuf;

// Local modules
use horizon_forecast::constants::{BASELINE_WINDOW, LOOKBACK_HORIZONS, RUN_LOG_DIR};
use horizon_forecast::pipeline::{self, PipelineConfig};
use horizon_forecast::util::pre_processor::CsvProvider;

fn main() -> Result<()> {
    // Accept symbol and data directory as command-line arguments
    let args: Vec<String> = env::args().collect();
    let symbol = args.get(1).map(|s| s.as_str()).unwrap_or("SPY");
    let data_dir = args.get(2).map(|s| s.as_str()).unwrap_or(".");
    println!("Using symbol: {} | data dir: {}", symbol, data_dir);

    let provider = CsvProvider::new(PathBuf::from(data_dir));

    let mut config = PipelineConfig::new(
        symbol,
        parse_date("2014-01-01")?,
        parse_date("2015-01-01")?,
        parse_date("2021-12-31")?,
        parse_date("2022-01-01")?,
        parse_date("2025-06-01")?,
        LOOKBACK_HORIZONS.to_vec(),
    );
    config.run_log_dir = Some(PathBuf::from(RUN_LOG_DIR));

    let outcome = pipeline::run(&provider, &config).context("forecast pipeline failed")?;

    println!("\nEval Results:");
    for horizon in &outcome.horizons {
        println!(
            "{}-day -> MSE: {:.2}, RMSE: {:.2}, MAE: {:.2}",
            horizon.seq_len, horizon.metrics.mse, horizon.metrics.rmse, horizon.metrics.mae
        );
    }

    println!(
        "\nBaseline MA{} -> MSE: {:.2}, RMSE: {:.2}, MAE: {:.2}",
        BASELINE_WINDOW,
        outcome.baseline.metrics.mse,
        outcome.baseline.metrics.rmse,
        outcome.baseline.metrics.mae
    );

    println!("\nNext-Day Predictions:");
    for horizon in &outcome.horizons {
        println!("{}-day LSTM -> {:.2}", horizon.seq_len, horizon.next_session);
    }
    println!("Baseline MA{} -> {:.2}", BASELINE_WINDOW, outcome.baseline.latest);

    // The chart renderer is an external collaborator; hand it the aligned
    // series as CSV
    let mut comparison = outcome.comparison;
    let path = "forecast_comparison.csv";
    let mut file =
        std::fs::File::create(path).with_context(|| format!("failed to create {}", path))?;
    CsvWriter::new(&mut file)
        .finish(&mut comparison)
        .context("failed to write comparison csv")?;
    println!("\nComparison series written to {} for charting.", path);

    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    raw.parse::<NaiveDate>()
        .with_context(|| format!("invalid date: {}", raw))
}
