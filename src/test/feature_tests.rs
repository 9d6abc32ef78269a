use super::synthetic_ohlcv;
use crate::constants::{FEATURE_COLUMNS, LONGEST_INDICATOR_WINDOW, TARGET_COLUMN};
use crate::error::PipelineError;
use crate::util::feature_engineering::compute_indicator_frame;

#[test]
fn warmup_and_final_row_are_dropped() {
    let df = synthetic_ohlcv(200);
    let enriched = compute_indicator_frame(&df).unwrap();
    assert_eq!(enriched.height(), 200 - LONGEST_INDICATOR_WINDOW - 1);
}

#[test]
fn derived_fields_are_finite_and_rsi_bounded() {
    let df = synthetic_ohlcv(150);
    let enriched = compute_indicator_frame(&df).unwrap();

    for &column in FEATURE_COLUMNS.iter().chain([TARGET_COLUMN].iter()) {
        let values = enriched.column(column).unwrap().f64().unwrap();
        assert_eq!(values.null_count(), 0, "column '{}' has nulls", column);
        for value in values.into_iter().flatten() {
            assert!(value.is_finite(), "column '{}' produced {}", column, value);
        }
    }

    let rsi = enriched.column("rsi_14").unwrap().f64().unwrap();
    for value in rsi.into_iter().flatten() {
        assert!((0.0..=100.0).contains(&value), "rsi out of range: {}", value);
    }
}

#[test]
fn target_is_next_session_close() {
    let df = synthetic_ohlcv(120);
    let enriched = compute_indicator_frame(&df).unwrap();
    let close = enriched.column("adjusted_close").unwrap().f64().unwrap();
    let next = enriched.column(TARGET_COLUMN).unwrap().f64().unwrap();

    // Retained rows are contiguous, so each target equals the following
    // row's adjusted close
    for i in 0..enriched.height() - 1 {
        let expected = close.get(i + 1).unwrap();
        let actual = next.get(i).unwrap();
        assert!((actual - expected).abs() < 1e-12);
    }
}

#[test]
fn rejects_insufficient_history() {
    let df = synthetic_ohlcv(LONGEST_INDICATOR_WINDOW + 1);
    match compute_indicator_frame(&df) {
        Err(PipelineError::InsufficientHistory { .. }) => {}
        Ok(frame) => panic!(
            "expected InsufficientHistory, got a frame with {} rows",
            frame.height()
        ),
        Err(other) => panic!("expected InsufficientHistory, got {:?}", other),
    }
}
