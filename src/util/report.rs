// External crates
use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

// Internal modules
use crate::evaluation::RegressionMetrics;

/// One record per trained lookback horizon, appended to the JSONL run log.
#[derive(Serialize, Deserialize)]
pub struct HorizonRunRecord {
    pub timestamp: String,
    pub symbol: String,
    pub label: String,
    pub seq_len: usize,
    pub hidden_size: usize,
    pub epochs_run: usize,
    pub best_val_loss: Option<f64>,
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub training_seconds: f64,
    pub next_session_forecast: f64,
}

impl HorizonRunRecord {
    pub fn new(symbol: &str, label: &str, seq_len: usize, hidden_size: usize) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            symbol: symbol.to_string(),
            label: label.to_string(),
            seq_len,
            hidden_size,
            epochs_run: 0,
            best_val_loss: None,
            mse: 0.0,
            rmse: 0.0,
            mae: 0.0,
            training_seconds: 0.0,
            next_session_forecast: 0.0,
        }
    }

    pub fn set_metrics(&mut self, metrics: &RegressionMetrics) {
        self.mse = metrics.mse;
        self.rmse = metrics.rmse;
        self.mae = metrics.mae;
    }

    pub fn set_training(&mut self, epochs_run: usize, best_val_loss: Option<f64>, seconds: f64) {
        self.epochs_run = epochs_run;
        self.best_val_loss = best_val_loss;
        self.training_seconds = seconds;
    }

    pub fn set_forecast(&mut self, price: f64) {
        self.next_session_forecast = price;
    }

    /// Appends this record as one JSON line, creating the log dir if needed.
    pub fn append(&self, log_dir: &Path, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(log_dir)?;
        let path = log_dir.join(file_name);

        let json = serde_json::to_string(&self)?;
        let mut file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", json)?;

        Ok(path)
    }
}
