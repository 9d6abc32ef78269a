// External imports
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::tensor::{activation, backend::Backend, Tensor};

// Internal imports
use super::step_2_lstm_cell::LstmLayer;
use crate::constants::{DENSE_SIZE, DROPOUT_RATE, HIDDEN_SIZE};

/// Stacked LSTM regressor mapping one lookback window to one scalar.
///
/// The first recurrent layer feeds its full sequence into the second,
/// whose final hidden state is kept. Dropout follows each recurrent layer,
/// then a ReLU dense layer and a linear head. The output is
/// intentionally unclamped: targets are scaled against train-partition
/// bounds, so test-period windows may legitimately map outside [0, 1].
#[derive(Module, Debug)]
pub struct PriceLstmModel<B: Backend> {
    hidden_size: usize,
    lstm_bottom: LstmLayer<B>,
    dropout_bottom: Dropout,
    lstm_top: LstmLayer<B>,
    dropout_top: Dropout,
    dense: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> PriceLstmModel<B> {
    /// Forward pass over `[batch, seq_len, features]` windows, producing
    /// `[batch, 1]` predictions. Dropout only applies while training.
    pub fn forward(&self, x: Tensor<B, 3>, is_training: bool) -> Tensor<B, 2> {
        let [batch_size, seq_len, _] = x.dims();

        let bottom = self.lstm_bottom.forward(x);
        let bottom = if is_training {
            self.dropout_bottom.forward(bottom)
        } else {
            bottom
        };

        let top = self.lstm_top.forward(bottom);
        let last = top
            .narrow(1, seq_len - 1, 1)
            .reshape([batch_size, self.hidden_size]);
        let last = if is_training {
            self.dropout_top.forward(last)
        } else {
            last
        };

        let dense = activation::relu(self.dense.forward(last));
        self.output.forward(dense)
    }

    /// Inference wrapper around `forward`.
    pub fn predict(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        self.forward(x, false)
    }
}

/// Construction parameters for [`PriceLstmModel`].
#[derive(Debug, Clone)]
pub struct PriceLstmModelConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub dense_size: usize,
    pub dropout_rate: f64,
}

impl PriceLstmModelConfig {
    pub fn new(input_size: usize) -> Self {
        Self {
            input_size,
            hidden_size: HIDDEN_SIZE,
            dense_size: DENSE_SIZE,
            dropout_rate: DROPOUT_RATE,
        }
    }

    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    pub fn with_dense_size(mut self, dense_size: usize) -> Self {
        self.dense_size = dense_size;
        self
    }

    pub fn with_dropout_rate(mut self, dropout_rate: f64) -> Self {
        self.dropout_rate = dropout_rate;
        self
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> PriceLstmModel<B> {
        let dropout = DropoutConfig::new(self.dropout_rate);

        PriceLstmModel {
            hidden_size: self.hidden_size,
            lstm_bottom: LstmLayer::new(self.input_size, self.hidden_size, device),
            dropout_bottom: dropout.init(),
            lstm_top: LstmLayer::new(self.hidden_size, self.hidden_size, device),
            dropout_top: dropout.init(),
            dense: LinearConfig::new(self.hidden_size, self.dense_size).init(device),
            output: LinearConfig::new(self.dense_size, 1).init(device),
        }
    }
}
