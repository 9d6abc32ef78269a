// External crates
use polars::prelude::*;

// Internal modules
use crate::constants::{
    LONGEST_INDICATOR_WINDOW, MA_WINDOWS, RSI_EPSILON, RSI_WINDOW, VOLATILITY_WINDOW,
};
use crate::error::PipelineError;

fn fixed_window(window: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size: window,
        min_periods: window,
        center: false,
        weights: None,
        fn_params: None,
    }
}

/// Calculates a trailing Simple Moving Average over the given column.
/// Values are null until the window fills; nothing is interpolated.
pub fn calculate_sma(df: &DataFrame, column: &str, window: usize) -> PolarsResult<Series> {
    let series = df.column(column)?.f64()?.clone().into_series();

    if series.len() < window {
        return Err(PolarsError::ComputeError(
            format!(
                "Not enough data points ({}) for SMA window ({})",
                series.len(),
                window
            )
            .into(),
        ));
    }

    series.rolling_mean(fixed_window(window))
}

/// Calculates the log return ln(p_t / p_{t-1}) of the given column.
pub fn calculate_log_return(df: &DataFrame, column: &str) -> PolarsResult<Series> {
    let series = df.column(column)?.f64()?;
    let shifted = series.clone().shift(1);

    let values: Vec<Option<f64>> = shifted
        .into_iter()
        .zip(series.into_iter())
        .map(|(prev, curr)| match (prev, curr) {
            (Some(p), Some(c)) if p > 0.0 && c > 0.0 => Some((c / p).ln()),
            _ => None,
        })
        .collect();

    Ok(Series::new("log_return".into(), values))
}

/// Calculates a trailing standard deviation over an already-derived series
/// (used for the rolling volatility of log returns).
pub fn calculate_volatility(series: &Series, window: usize) -> PolarsResult<Series> {
    series.rolling_std(fixed_window(window))
}

/// Calculates the Relative Strength Index from averaged gains and losses.
///
/// The loss average carries a small epsilon in the denominator, so flat or
/// gain-only windows map close to 100 instead of dividing by zero.
pub fn calculate_rsi(df: &DataFrame, column: &str, window: usize) -> PolarsResult<Series> {
    let closes = df.column(column)?.f64()?;

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());

    // No delta exists for the first session
    gains.push(0.0);
    losses.push(0.0);

    for i in 1..closes.len() {
        let curr = closes.get(i).unwrap_or(0.0);
        let prev = closes.get(i - 1).unwrap_or(0.0);
        let change = curr - prev;

        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let avg_gain = Series::new("gain".into(), gains).rolling_mean(fixed_window(window))?;
    let avg_loss = Series::new("loss".into(), losses).rolling_mean(fixed_window(window))?;

    let mut rsi = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        let value = match (avg_gain.f64()?.get(i), avg_loss.f64()?.get(i)) {
            (Some(gain), Some(loss)) => {
                let rs = gain / (loss + RSI_EPSILON);
                Some(100.0 - 100.0 / (1.0 + rs))
            }
            _ => None,
        };
        rsi.push(value);
    }

    Ok(Series::new("rsi".into(), rsi))
}

/// Derives all indicator columns plus the next-session target from a clean
/// OHLCV frame, then trims warm-up and tail rows.
///
/// The first `LONGEST_INDICATOR_WINDOW` rows lack full history for the
/// 90-session moving average and the final row has no next-day target, so
/// the output is exactly `input − (LONGEST_INDICATOR_WINDOW + 1)` rows with
/// every derived field defined.
pub fn compute_indicator_frame(df: &DataFrame) -> Result<DataFrame, PipelineError> {
    let height = df.height();
    let needed = LONGEST_INDICATOR_WINDOW + 2;
    if height < needed {
        return Err(PipelineError::InsufficientHistory { needed, got: height });
    }

    let [short, medium, long] = MA_WINDOWS;
    let ma_short = calculate_sma(df, "adjusted_close", short)?;
    let ma_medium = calculate_sma(df, "adjusted_close", medium)?;
    let ma_long = calculate_sma(df, "adjusted_close", long)?;

    let log_return = calculate_log_return(df, "adjusted_close")?;
    let volatility = calculate_volatility(&log_return, VOLATILITY_WINDOW)?;
    let rsi = calculate_rsi(df, "adjusted_close", RSI_WINDOW)?;

    let target = df
        .column("adjusted_close")?
        .as_materialized_series()
        .clone()
        .shift(-1)
        .with_name("adjusted_close_next".into());

    let columns: Vec<Column> = vec![
        ma_short.with_name(format!("ma_{}", short).into()).into_column(),
        ma_medium.with_name(format!("ma_{}", medium).into()).into_column(),
        ma_long.with_name(format!("ma_{}", long).into()).into_column(),
        log_return.with_name("log_return".into()).into_column(),
        volatility
            .with_name(format!("volatility_{}", VOLATILITY_WINDOW).into())
            .into_column(),
        rsi.with_name(format!("rsi_{}", RSI_WINDOW).into()).into_column(),
        target.into_column(),
    ];

    let enriched = df.hstack(&columns)?;

    // Warm-up rows at the head, missing target at the tail
    let trimmed = enriched.slice(
        LONGEST_INDICATOR_WINDOW as i64,
        enriched.height() - LONGEST_INDICATOR_WINDOW - 1,
    );

    Ok(trimmed.drop_nulls::<String>(None)?)
}
