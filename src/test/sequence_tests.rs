use burn_ndarray::{NdArray, NdArrayDevice};
use ndarray::Array2;

use crate::error::PipelineError;
use crate::lstm::step_1_sequence_preparation::{build_sequences, latest_window};

fn ramp(rows: usize, cols: usize) -> (Array2<f64>, Vec<f64>) {
    let features = Array2::from_shape_fn((rows, cols), |(i, j)| (i * cols + j) as f64);
    let targets = (0..rows).map(|i| 1000.0 + i as f64).collect();
    (features, targets)
}

#[test]
fn sequence_count_matches_length_minus_lookback() {
    let (features, targets) = ramp(25, 3);
    let batch = build_sequences(features.view(), &targets, 10).unwrap();
    assert_eq!(batch.len(), 15);
    assert_eq!(batch.seq_len(), 10);
    assert_eq!(batch.num_features(), 3);
}

#[test]
fn labels_align_one_step_past_each_window() {
    let (features, targets) = ramp(20, 2);
    let batch = build_sequences(features.view(), &targets, 5).unwrap();

    for i in 0..batch.len() {
        assert_eq!(batch.label(i) as f64, targets[5 + i]);
    }

    // Window i spans feature rows [i, i + seq_len)
    let window = batch.window(0);
    assert_eq!(window[0] as f64, features[[0, 0]]);
    assert_eq!(window[window.len() - 1] as f64, features[[4, 1]]);
    let window = batch.window(3);
    assert_eq!(window[0] as f64, features[[3, 0]]);
}

#[test]
fn lookback_must_be_shorter_than_series() {
    let (features, targets) = ramp(8, 2);
    assert!(matches!(
        build_sequences(features.view(), &targets, 8),
        Err(PipelineError::SequenceLength { .. })
    ));
    assert!(matches!(
        build_sequences(features.view(), &targets, 20),
        Err(PipelineError::SequenceLength { .. })
    ));
}

#[test]
fn tensors_take_window_shape() {
    let device = NdArrayDevice::default();
    let (features, targets) = ramp(30, 4);
    let batch = build_sequences(features.view(), &targets, 6).unwrap();

    let (inputs, labels) = batch.to_tensors::<NdArray>(&device);
    assert_eq!(inputs.dims(), [24, 6, 4]);
    assert_eq!(labels.dims(), [24, 1]);
}

#[test]
fn latest_window_uses_trailing_rows() {
    let device = NdArrayDevice::default();
    let (features, _) = ramp(12, 2);

    let window = latest_window::<NdArray>(features.view(), 4, &device).unwrap();
    assert_eq!(window.dims(), [1, 4, 2]);

    let data = window.into_data().convert::<f32>().to_vec::<f32>().unwrap();
    assert_eq!(data[0] as f64, features[[8, 0]]);
    assert_eq!(data[data.len() - 1] as f64, features[[11, 1]]);
}
