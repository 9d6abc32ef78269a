use ndarray::array;

use crate::error::PipelineError;
use crate::util::scaling::MinMaxScaler;

#[test]
fn train_partition_scales_into_unit_range() {
    let train = array![[1.0, 10.0], [2.0, 20.0], [3.0, 40.0], [4.0, 25.0]];
    let mut scaler = MinMaxScaler::new();
    scaler.fit(train.view()).unwrap();

    let scaled = scaler.transform(train.view()).unwrap();
    for &value in scaled.iter() {
        assert!((-1e-12..=1.0 + 1e-12).contains(&value));
    }
    // Each column touches both bounds on the data it was fit on
    assert!(scaled.column(0)[0].abs() < 1e-12);
    assert!((scaled.column(0)[3] - 1.0).abs() < 1e-12);
    assert!(scaled.column(1)[0].abs() < 1e-12);
    assert!((scaled.column(1)[2] - 1.0).abs() < 1e-12);
}

#[test]
fn round_trip_recovers_values() {
    let train = array![[5.0, -3.0], [9.0, 0.5], [7.5, 2.0]];
    let mut scaler = MinMaxScaler::new();
    scaler.fit(train.view()).unwrap();

    let scaled = scaler.transform(train.view()).unwrap();
    let recovered = scaler.inverse_transform(scaled.view()).unwrap();
    for (original, recovered) in train.iter().zip(recovered.iter()) {
        assert!((original - recovered).abs() < 1e-9);
    }
}

#[test]
fn transform_before_fit_fails() {
    let scaler = MinMaxScaler::new();
    let data = array![[1.0], [2.0]];
    assert!(matches!(
        scaler.transform(data.view()),
        Err(PipelineError::NotFitted)
    ));
    assert!(matches!(
        scaler.inverse_transform(data.view()),
        Err(PipelineError::NotFitted)
    ));
}

#[test]
fn refit_is_rejected() {
    let data = array![[1.0], [2.0]];
    let mut scaler = MinMaxScaler::new();
    assert!(!scaler.is_fitted());
    scaler.fit(data.view()).unwrap();
    assert!(scaler.is_fitted());
    assert!(matches!(scaler.fit(data.view()), Err(PipelineError::Data(_))));
}

#[test]
fn degenerate_column_round_trips() {
    let data = array![[7.0], [7.0], [7.0]];
    let mut scaler = MinMaxScaler::new();
    scaler.fit(data.view()).unwrap();

    let scaled = scaler.transform(data.view()).unwrap();
    for &value in scaled.iter() {
        assert!(value.abs() < 1e-12);
    }
    let recovered = scaler.inverse_transform(scaled.view()).unwrap();
    for &value in recovered.iter() {
        assert!((value - 7.0).abs() < 1e-12);
    }
}

#[test]
fn values_beyond_train_bounds_leave_unit_range() {
    let train = array![[0.0], [10.0]];
    let mut scaler = MinMaxScaler::new();
    scaler.fit(train.view()).unwrap();

    // Out-of-range test values are passed through, not clamped
    let scaled = scaler.transform_column(&[15.0, -5.0]).unwrap();
    assert!((scaled[0] - 1.5).abs() < 1e-12);
    assert!((scaled[1] + 0.5).abs() < 1e-12);
}
