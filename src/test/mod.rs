pub mod feature_tests;
pub mod scaling_tests;
pub mod sequence_tests;
pub mod split_tests;

use chrono::NaiveDate;
use polars::prelude::*;

/// Builds a clean daily OHLCV frame: a gentle upward ramp with a sine
/// wobble so gains and losses both occur.
pub fn synthetic_ohlcv(len: usize) -> DataFrame {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

    let mut dates = Vec::with_capacity(len);
    let mut opens = Vec::with_capacity(len);
    let mut highs = Vec::with_capacity(len);
    let mut lows = Vec::with_capacity(len);
    let mut closes = Vec::with_capacity(len);
    let mut adjusted = Vec::with_capacity(len);
    let mut volumes = Vec::with_capacity(len);

    for i in 0..len {
        let day = start + chrono::Duration::days(i as i64);
        let price = 100.0 + 0.5 * i as f64 + 3.0 * (i as f64 * 0.37).sin();

        dates.push(day.to_string());
        opens.push(price - 0.5);
        highs.push(price + 1.0);
        lows.push(price - 1.0);
        closes.push(price);
        adjusted.push(price);
        volumes.push(1_000_000.0 + 1_000.0 * i as f64);
    }

    DataFrame::new(vec![
        Series::new("date".into(), dates).into_column(),
        Series::new("open".into(), opens).into_column(),
        Series::new("high".into(), highs).into_column(),
        Series::new("low".into(), lows).into_column(),
        Series::new("close".into(), closes).into_column(),
        Series::new("adjusted_close".into(), adjusted).into_column(),
        Series::new("volume".into(), volumes).into_column(),
    ])
    .unwrap()
}
