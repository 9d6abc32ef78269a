// External imports
use burn::tensor::cast::ToElement;
use burn::tensor::{backend::Backend, Tensor};

// Internal imports
use super::step_3_model_arch::PriceLstmModel;
use crate::error::PipelineError;

/// Batch prediction over test sequences; one scaled scalar per window.
pub fn predict_batch<B: Backend>(
    model: &PriceLstmModel<B>,
    features: Tensor<B, 3>,
) -> Result<Vec<f64>, PipelineError> {
    let predictions = model.predict(features);
    let values = predictions
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| PipelineError::Training(format!("failed to read predictions: {:?}", e)))?;
    Ok(values.into_iter().map(f64::from).collect())
}

/// Single next-step forecast from one `[1, seq_len, features]` window.
pub fn predict_next<B: Backend>(model: &PriceLstmModel<B>, window: Tensor<B, 3>) -> f64 {
    model.predict(window).into_scalar().to_f64()
}
