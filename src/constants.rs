// Feature columns fed to the forecast models, in input order
pub const FEATURE_COLUMNS: [&str; 8] = [
    "adjusted_close",
    "ma_10",
    "ma_30",
    "ma_90",
    "log_return",
    "volatility_20",
    "rsi_14",
    "volume",
];

// Prediction target: the next session's adjusted close
pub const TARGET_COLUMN: &str = "adjusted_close_next";

// Lookback horizons; one model is trained per entry
pub const LOOKBACK_HORIZONS: [usize; 3] = [90, 30, 10];

// Indicator windows
pub const MA_WINDOWS: [usize; 3] = [10, 30, 90];
pub const VOLATILITY_WINDOW: usize = 20;
pub const RSI_WINDOW: usize = 14;
pub const RSI_EPSILON: f64 = 1e-10;

// Rows without this many prior sessions are dropped as indicator warm-up
pub const LONGEST_INDICATOR_WINDOW: usize = 90;

// Model hyperparameters
pub const HIDDEN_SIZE: usize = 128;
pub const DENSE_SIZE: usize = 64;
pub const DROPOUT_RATE: f64 = 0.2;

// Training
pub const MAX_EPOCHS: usize = 50;
pub const BATCH_SIZE: usize = 32;
pub const VALIDATION_SPLIT_RATIO: f64 = 0.1;
pub const EARLY_STOP_PATIENCE: usize = 15;

// Moving-average baseline window over the test partition
pub const BASELINE_WINDOW: usize = 10;

// Run log location
pub const RUN_LOG_DIR: &str = "runs";
pub const RUN_LOG_FILE: &str = "forecast_runs.jsonl";
