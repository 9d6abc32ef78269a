// External imports
use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::{activation, backend::Backend, Tensor};

/// One LSTM layer built from gate-level linear projections.
///
/// Input, forget, cell and output gates each combine a projection of the
/// current input with a projection of the previous hidden state.
#[derive(Module, Debug)]
pub struct LstmLayer<B: Backend> {
    input_size: usize,
    hidden_size: usize,

    input_gate: Linear<B>,
    forget_gate: Linear<B>,
    cell_gate: Linear<B>,
    output_gate: Linear<B>,

    input_recurrent: Linear<B>,
    forget_recurrent: Linear<B>,
    cell_recurrent: Linear<B>,
    output_recurrent: Linear<B>,
}

impl<B: Backend> LstmLayer<B> {
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        let project = |from: usize, to: usize| LinearConfig::new(from, to).init(device);

        Self {
            input_size,
            hidden_size,
            input_gate: project(input_size, hidden_size),
            forget_gate: project(input_size, hidden_size),
            cell_gate: project(input_size, hidden_size),
            output_gate: project(input_size, hidden_size),
            input_recurrent: project(hidden_size, hidden_size),
            forget_recurrent: project(hidden_size, hidden_size),
            cell_recurrent: project(hidden_size, hidden_size),
            output_recurrent: project(hidden_size, hidden_size),
        }
    }

    /// Runs the full sequence, returning the hidden state at every step:
    /// `[batch, seq_len, hidden]`.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let device = x.device();
        let [batch_size, seq_len, _] = x.dims();

        let mut h = Tensor::zeros([batch_size, self.hidden_size], &device);
        let mut c = Tensor::zeros([batch_size, self.hidden_size], &device);
        let mut steps = Vec::with_capacity(seq_len);

        for t in 0..seq_len {
            let x_t = x
                .clone()
                .narrow(1, t, 1)
                .reshape([batch_size, self.input_size]);

            let i_t = activation::sigmoid(
                self.input_gate.forward(x_t.clone()) + self.input_recurrent.forward(h.clone()),
            );
            let f_t = activation::sigmoid(
                self.forget_gate.forward(x_t.clone()) + self.forget_recurrent.forward(h.clone()),
            );
            let g_t = activation::tanh(
                self.cell_gate.forward(x_t.clone()) + self.cell_recurrent.forward(h.clone()),
            );
            let o_t = activation::sigmoid(
                self.output_gate.forward(x_t) + self.output_recurrent.forward(h),
            );

            c = f_t * c + i_t * g_t;
            h = o_t * activation::tanh(c.clone());

            steps.push(h.clone().reshape([batch_size, 1, self.hidden_size]));
        }

        Tensor::cat(steps, 1)
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }
}
