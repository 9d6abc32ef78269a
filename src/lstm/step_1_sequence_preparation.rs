// External crates
use burn::tensor::{backend::Backend, Tensor};
use ndarray::ArrayView2;

// Internal modules
use crate::error::PipelineError;

/// Sliding windows over a scaled feature matrix, flattened row-major and
/// paired with the scaled target one step past each window.
#[derive(Debug, Clone)]
pub struct SequenceBatch {
    inputs: Vec<f32>,
    labels: Vec<f32>,
    len: usize,
    seq_len: usize,
    num_features: usize,
}

impl SequenceBatch {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Scaled label of the `i`-th sequence.
    pub fn label(&self, i: usize) -> f32 {
        self.labels[i]
    }

    /// Flattened `(seq_len * num_features)` window of the `i`-th sequence.
    pub fn window(&self, i: usize) -> &[f32] {
        let stride = self.seq_len * self.num_features;
        &self.inputs[i * stride..(i + 1) * stride]
    }

    /// Materializes the batch as `[len, seq_len, features]` inputs and
    /// `[len, 1]` targets on the given device.
    pub fn to_tensors<B: Backend>(&self, device: &B::Device) -> (Tensor<B, 3>, Tensor<B, 2>) {
        let features = Tensor::<B, 1>::from_data(self.inputs.as_slice(), device).reshape([
            self.len,
            self.seq_len,
            self.num_features,
        ]);
        let targets =
            Tensor::<B, 1>::from_data(self.labels.as_slice(), device).reshape([self.len, 1]);
        (features, targets)
    }
}

/// Builds `rows − seq_len` sequences: window `[i-seq_len, i)` labeled with
/// `targets[i]`. Train and test partitions are windowed independently, so
/// no test sequence ever draws rows from the train partition.
pub fn build_sequences(
    features: ArrayView2<f64>,
    targets: &[f64],
    seq_len: usize,
) -> Result<SequenceBatch, PipelineError> {
    let rows = features.nrows();

    if targets.len() != rows {
        return Err(PipelineError::Data(format!(
            "feature rows ({}) and target length ({}) differ",
            rows,
            targets.len()
        )));
    }
    if seq_len == 0 {
        return Err(PipelineError::Data("sequence length must be at least 1".into()));
    }
    if seq_len >= rows {
        return Err(PipelineError::SequenceLength { seq_len, rows });
    }

    let num_features = features.ncols();
    let len = rows - seq_len;
    let mut inputs = Vec::with_capacity(len * seq_len * num_features);
    let mut labels = Vec::with_capacity(len);

    for i in seq_len..rows {
        for t in (i - seq_len)..i {
            for f in 0..num_features {
                inputs.push(features[[t, f]] as f32);
            }
        }
        labels.push(targets[i] as f32);
    }

    Ok(SequenceBatch {
        inputs,
        labels,
        len,
        seq_len,
        num_features,
    })
}

/// Extracts the final `seq_len` rows as a single `[1, seq_len, features]`
/// inference window for next-step forecasting.
pub fn latest_window<B: Backend>(
    features: ArrayView2<f64>,
    seq_len: usize,
    device: &B::Device,
) -> Result<Tensor<B, 3>, PipelineError> {
    let rows = features.nrows();
    if seq_len == 0 || seq_len > rows {
        return Err(PipelineError::SequenceLength { seq_len, rows });
    }

    let num_features = features.ncols();
    let mut data = Vec::with_capacity(seq_len * num_features);
    for t in (rows - seq_len)..rows {
        for f in 0..num_features {
            data.push(features[[t, f]] as f32);
        }
    }

    Ok(Tensor::<B, 1>::from_data(data.as_slice(), device).reshape([1, seq_len, num_features]))
}
