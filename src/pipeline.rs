// External crates
use burn::tensor::backend::Backend;
use chrono::NaiveDate;
use log::{info, warn};
use polars::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

// Internal modules
use crate::constants::{
    BASELINE_WINDOW, DENSE_SIZE, DROPOUT_RATE, FEATURE_COLUMNS, HIDDEN_SIZE, RUN_LOG_FILE,
    TARGET_COLUMN,
};
use crate::error::PipelineError;
use crate::evaluation::{self, BaselineForecast, RegressionMetrics};
use crate::lstm::step_1_sequence_preparation::{build_sequences, latest_window};
use crate::lstm::step_3_model_arch::{PriceLstmModel, PriceLstmModelConfig};
use crate::lstm::step_4_train_model::{train_model, TrainingBackend, TrainingConfig};
use crate::lstm::step_5_prediction::{predict_batch, predict_next};
use crate::util::feature_engineering::compute_indicator_frame;
use crate::util::pre_processor::{
    column_vector, date_vector, feature_matrix, split_by_date_range, MarketDataProvider,
};
use crate::util::report::HorizonRunRecord;
use crate::util::scaling::MinMaxScaler;

/// Run-level configuration: date boundaries, horizons and hyperparameters.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub symbol: String,
    /// Earliest session to fetch; indicator warm-up eats into this range
    /// before the train window begins.
    pub history_start: NaiveDate,
    pub train_start: NaiveDate,
    pub train_end: NaiveDate,
    pub test_start: NaiveDate,
    pub test_end: NaiveDate,
    pub horizons: Vec<usize>,
    pub hidden_size: usize,
    pub dense_size: usize,
    pub dropout_rate: f64,
    pub training: TrainingConfig,
    /// Directory for the JSONL run log; `None` disables logging.
    pub run_log_dir: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn new(
        symbol: &str,
        history_start: NaiveDate,
        train_start: NaiveDate,
        train_end: NaiveDate,
        test_start: NaiveDate,
        test_end: NaiveDate,
        horizons: Vec<usize>,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            history_start,
            train_start,
            train_end,
            test_start,
            test_end,
            horizons,
            hidden_size: HIDDEN_SIZE,
            dense_size: DENSE_SIZE,
            dropout_rate: DROPOUT_RATE,
            training: TrainingConfig::default(),
            run_log_dir: None,
        }
    }
}

/// Per-horizon outcome: the fitted model plus aligned evaluation series.
/// `dates`, `actual` and `predicted` line up index for index, offset by
/// `seq_len` from the test partition start.
pub struct HorizonForecast {
    pub label: String,
    pub seq_len: usize,
    pub model: PriceLstmModel<TrainingBackend>,
    pub metrics: RegressionMetrics,
    pub dates: Vec<NaiveDate>,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
    pub next_session: f64,
    pub epochs_run: usize,
    pub best_val_loss: Option<f64>,
}

pub struct BaselineOutcome {
    pub metrics: RegressionMetrics,
    pub latest: f64,
}

pub struct RunOutcome {
    pub horizons: Vec<HorizonForecast>,
    pub baseline: BaselineOutcome,
    /// Actuals, per-horizon predictions and the baseline over the shortest
    /// common trailing date range, ready for the external chart renderer.
    pub comparison: DataFrame,
}

/// Runs the full pipeline: fetch, enrich, split, scale, then train and
/// evaluate one model per lookback horizon, followed by the baseline and
/// the aligned comparison frame. Horizons run sequentially; the first
/// failing stage aborts the run with no partial report.
pub fn run(
    provider: &dyn MarketDataProvider,
    config: &PipelineConfig,
) -> Result<RunOutcome, PipelineError> {
    if config.horizons.is_empty() {
        return Err(PipelineError::Data("no lookback horizons configured".into()));
    }

    info!("fetching {} daily bars", config.symbol);
    let raw = provider.fetch_daily(&config.symbol, config.history_start, config.test_end)?;

    let enriched = compute_indicator_frame(&raw)?;
    let (train_df, test_df) = split_by_date_range(
        &enriched,
        config.train_start,
        config.train_end,
        config.test_start,
        config.test_end,
    )?;
    info!(
        "partitions: {} train rows, {} test rows",
        train_df.height(),
        test_df.height()
    );

    let x_train = feature_matrix(&train_df, &FEATURE_COLUMNS)?;
    let x_test = feature_matrix(&test_df, &FEATURE_COLUMNS)?;
    let y_train = column_vector(&train_df, TARGET_COLUMN)?;
    let y_test = column_vector(&test_df, TARGET_COLUMN)?;
    let test_dates = date_vector(&test_df)?;

    // Scaler parameters come from the train partition only; the same
    // parameters transform the test partition and invert predictions
    let mut feature_scaler = MinMaxScaler::new();
    feature_scaler.fit(x_train.view())?;
    let mut target_scaler = MinMaxScaler::new();
    target_scaler.fit_column(&y_train)?;

    let x_train_scaled = feature_scaler.transform(x_train.view())?;
    let x_test_scaled = feature_scaler.transform(x_test.view())?;
    let y_train_scaled = target_scaler.transform_column(&y_train)?;
    let y_test_scaled = target_scaler.transform_column(&y_test)?;

    let device = <TrainingBackend as Backend>::Device::default();
    let mut horizons = Vec::with_capacity(config.horizons.len());

    for &seq_len in &config.horizons {
        let label = format!("{}-day lookback", seq_len);
        info!("training {}", label);

        let train_batch = build_sequences(x_train_scaled.view(), &y_train_scaled, seq_len)?;
        let test_batch = build_sequences(x_test_scaled.view(), &y_test_scaled, seq_len)?;

        let model_config = PriceLstmModelConfig::new(x_train_scaled.ncols())
            .with_hidden_size(config.hidden_size)
            .with_dense_size(config.dense_size)
            .with_dropout_rate(config.dropout_rate);

        let (train_features, train_targets) = train_batch.to_tensors::<TrainingBackend>(&device);
        let started = Instant::now();
        let (model, report) = train_model(
            &model_config,
            &config.training,
            train_features,
            train_targets,
            &device,
        )?;
        let training_seconds = started.elapsed().as_secs_f64();

        let (test_features, _) = test_batch.to_tensors::<TrainingBackend>(&device);
        let predicted_scaled = predict_batch(&model, test_features)?;
        let predicted = target_scaler.inverse_transform_column(&predicted_scaled)?;
        // Invert the scaled labels rather than reusing the raw targets so
        // both series pass through the same algebra
        let actual = target_scaler.inverse_transform_column(&y_test_scaled[seq_len..])?;
        let metrics = evaluation::evaluate(&actual, &predicted)?;
        println!(
            "{} results -> MSE: {:.2}, RMSE: {:.2}, MAE: {:.2}",
            label, metrics.mse, metrics.rmse, metrics.mae
        );

        // Next-step forecast from the most recent test window; no further
        // history exists past the test partition
        let window = latest_window::<TrainingBackend>(x_test_scaled.view(), seq_len, &device)?;
        let next_scaled = predict_next(&model, window);
        let next_session = target_scaler.inverse_transform_column(&[next_scaled])?[0];

        if let Some(dir) = &config.run_log_dir {
            let mut record =
                HorizonRunRecord::new(&config.symbol, &label, seq_len, config.hidden_size);
            record.set_metrics(&metrics);
            record.set_training(report.epochs_run, report.best_val_loss, training_seconds);
            record.set_forecast(next_session);
            if let Err(err) = record.append(dir, RUN_LOG_FILE) {
                warn!("failed to append run record: {:#}", err);
            }
        }

        horizons.push(HorizonForecast {
            label,
            seq_len,
            model,
            metrics,
            dates: test_dates[seq_len..].to_vec(),
            actual,
            predicted,
            next_session,
            epochs_run: report.epochs_run,
            best_val_loss: report.best_val_loss,
        });
    }

    // The baseline reads the raw test closes; it never sees the scalers
    let closes = column_vector(&test_df, "adjusted_close")?;
    let baseline = evaluation::moving_average_baseline(&closes, BASELINE_WINDOW)?;
    let baseline_metrics = evaluation::evaluate(&y_test[BASELINE_WINDOW..], &baseline.predicted)?;

    let comparison = build_comparison_frame(&horizons, &baseline)?;

    Ok(RunOutcome {
        horizons,
        baseline: BaselineOutcome {
            metrics: baseline_metrics,
            latest: baseline.latest,
        },
        comparison,
    })
}

/// Aligns every horizon and the baseline to the shortest common trailing
/// date range and stacks them into one frame for joint reporting.
fn build_comparison_frame(
    horizons: &[HorizonForecast],
    baseline: &BaselineForecast,
) -> Result<DataFrame, PipelineError> {
    let first = horizons
        .first()
        .ok_or_else(|| PipelineError::Data("no lookback horizons configured".into()))?;

    let min_len = horizons
        .iter()
        .map(|h| h.predicted.len())
        .chain(std::iter::once(baseline.predicted.len()))
        .min()
        .unwrap_or(0);
    if min_len == 0 {
        return Err(PipelineError::Data(
            "no common trailing range across horizons".into(),
        ));
    }

    let tail = |series: &[f64]| series[series.len() - min_len..].to_vec();
    let dates: Vec<String> = first.dates[first.dates.len() - min_len..]
        .iter()
        .map(|d| d.to_string())
        .collect();

    let mut columns: Vec<Column> = vec![
        Series::new("date".into(), dates).into_column(),
        Series::new("actual".into(), tail(&first.actual)).into_column(),
    ];
    for horizon in horizons {
        columns.push(
            Series::new(
                format!("pred_{}", horizon.seq_len).into(),
                tail(&horizon.predicted),
            )
            .into_column(),
        );
    }
    columns.push(
        Series::new(
            format!("baseline_ma_{}", baseline.window).into(),
            tail(&baseline.predicted),
        )
        .into_column(),
    );

    Ok(DataFrame::new(columns)?)
}
