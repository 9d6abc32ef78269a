// External crates
use chrono::NaiveDate;
use log::info;
use ndarray::Array2;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

// Internal modules
use crate::error::PipelineError;

/// Columns every provider row must carry after header standardization.
pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// Data-acquisition collaborator: returns raw daily OHLCV rows for one
/// symbol over an inclusive date range, cleaned and ordered by date.
pub trait MarketDataProvider {
    fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame, PipelineError>;
}

/// Provider backed by per-symbol CSV files in a local directory.
pub struct CsvProvider {
    data_dir: PathBuf,
}

impl CsvProvider {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}_daily_ohlcv.csv", symbol))
    }
}

impl MarketDataProvider for CsvProvider {
    fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame, PipelineError> {
        let df = load_ohlcv_csv(&self.csv_path(symbol))?;
        let filtered = filter_date_range(&df, start, end)?;
        if filtered.height() == 0 {
            return Err(PipelineError::Data(format!(
                "no rows for {} between {} and {}",
                symbol, start, end
            )));
        }
        Ok(filtered)
    }
}

/// Loads and cleans a raw OHLCV CSV
///
/// Standardizes header aliases, casts numeric columns to Float64, falls
/// back to `close` when no adjusted close is present, sorts by date and
/// drops rows with missing fields.
pub fn load_ohlcv_csv(path: &Path) -> Result<DataFrame, PipelineError> {
    info!("loading data from {}", path.display());

    if !path.exists() {
        return Err(PipelineError::Data(format!(
            "file not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)
        .map_err(|e| PipelineError::Data(format!("failed to open {}: {}", path.display(), e)))?;
    let mut df = CsvReader::new(file).finish()?;

    standardize_columns(&mut df)?;

    for &column in REQUIRED_COLUMNS.iter() {
        if !df.schema().contains(column) {
            return Err(PipelineError::Data(format!(
                "required column '{}' not found",
                column
            )));
        }
    }

    for column in ["open", "high", "low", "close", "volume", "adjusted_close"] {
        if df.schema().contains(column) {
            let cast = df.column(column)?.cast(&DataType::Float64)?;
            df.with_column(cast)?;
        }
    }

    if !df.schema().contains("adjusted_close") {
        let close = df.column("close")?.clone();
        df.with_column(close.with_name("adjusted_close".into()))?;
    }

    let df = df.sort(vec!["date"], SortMultipleOptions::default())?;
    let df = df.drop_nulls::<String>(None)?;
    Ok(df)
}

/// Maps common OHLCV header spellings onto the standard lowercase names.
fn standardize_columns(df: &mut DataFrame) -> PolarsResult<()> {
    let mut renames = Vec::new();

    for name in df.get_column_names() {
        let lower = name.to_lowercase();
        let standard = match lower.as_str() {
            "open" | "o" | "open_price" => "open",
            "high" | "h" | "high_price" => "high",
            "low" | "l" | "low_price" => "low",
            "close" | "c" | "close_price" => "close",
            "volume" | "vol" | "v" => "volume",
            "date" | "time" | "timestamp" | "datetime" | "day" => "date",
            "adj close" | "adj_close" | "adjclose" | "adjusted close" | "adjusted_close" => {
                "adjusted_close"
            }
            _ => continue,
        };

        if name.as_str() != standard {
            renames.push((name.to_string(), standard));
        }
    }

    for (old, new) in renames {
        df.rename(&old, new.into())?;
    }
    Ok(())
}

/// Parses the `date` column into chrono dates, erroring on malformed rows.
pub fn date_vector(df: &DataFrame) -> Result<Vec<NaiveDate>, PipelineError> {
    let column = df.column("date")?.str()?;
    let mut dates = Vec::with_capacity(column.len());

    for value in column.into_iter() {
        let raw = value.ok_or_else(|| PipelineError::Data("null date value".into()))?;
        // Timestamps keep their date part; plain dates pass through unchanged
        let head = raw.get(..10).unwrap_or(raw);
        let parsed = NaiveDate::parse_from_str(head, "%Y-%m-%d")
            .map_err(|e| PipelineError::Data(format!("unparseable date '{}': {}", raw, e)))?;
        dates.push(parsed);
    }
    Ok(dates)
}

/// Keeps rows whose date falls inside the inclusive `[start, end]` range.
pub fn filter_date_range(
    df: &DataFrame,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DataFrame, PipelineError> {
    let dates = date_vector(df)?;
    let mask: Vec<bool> = dates.iter().map(|d| *d >= start && *d <= end).collect();
    let mask = BooleanChunked::from_slice("mask".into(), &mask);
    Ok(df.filter(&mask)?)
}

/// Splits the indicator-enriched frame into chronological train and test
/// partitions with no shared dates.
pub fn split_by_date_range(
    df: &DataFrame,
    train_start: NaiveDate,
    train_end: NaiveDate,
    test_start: NaiveDate,
    test_end: NaiveDate,
) -> Result<(DataFrame, DataFrame), PipelineError> {
    if train_end >= test_start {
        return Err(PipelineError::Data(format!(
            "train end {} must precede test start {}",
            train_end, test_start
        )));
    }

    let train = filter_date_range(df, train_start, train_end)?;
    if train.height() == 0 {
        return Err(PipelineError::EmptyPartition(format!(
            "no train rows between {} and {}",
            train_start, train_end
        )));
    }

    let test = filter_date_range(df, test_start, test_end)?;
    if test.height() == 0 {
        return Err(PipelineError::EmptyPartition(format!(
            "no test rows between {} and {}",
            test_start, test_end
        )));
    }

    Ok((train, test))
}

/// Extracts the named columns as a row-major matrix, one row per session.
pub fn feature_matrix(df: &DataFrame, columns: &[&str]) -> Result<Array2<f64>, PipelineError> {
    let rows = df.height();
    let mut chunked = Vec::with_capacity(columns.len());

    for &column in columns {
        if !df.schema().contains(column) {
            return Err(PipelineError::Data(format!(
                "column '{}' not found",
                column
            )));
        }
        chunked.push(df.column(column)?.f64()?.clone());
    }

    let mut data = Vec::with_capacity(rows * columns.len());
    for i in 0..rows {
        for (values, &name) in chunked.iter().zip(columns) {
            let value = values.get(i).ok_or_else(|| {
                PipelineError::Data(format!("null value in column '{}' at row {}", name, i))
            })?;
            data.push(value);
        }
    }

    Array2::from_shape_vec((rows, columns.len()), data)
        .map_err(|e| PipelineError::Data(e.to_string()))
}

/// Extracts one Float64 column as a dense vector, erroring on nulls.
pub fn column_vector(df: &DataFrame, column: &str) -> Result<Vec<f64>, PipelineError> {
    let chunked = df.column(column)?.f64()?;
    let mut values = Vec::with_capacity(chunked.len());

    for (i, value) in chunked.into_iter().enumerate() {
        values.push(value.ok_or_else(|| {
            PipelineError::Data(format!("null value in column '{}' at row {}", column, i))
        })?);
    }
    Ok(values)
}
