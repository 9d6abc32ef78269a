// External imports
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};
use burn_autodiff::Autodiff;
use burn_ndarray::NdArray;
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

// Internal imports
use super::step_3_model_arch::{PriceLstmModel, PriceLstmModelConfig};
use crate::constants::{BATCH_SIZE, EARLY_STOP_PATIENCE, MAX_EPOCHS, VALIDATION_SPLIT_RATIO};
use crate::error::PipelineError;

/// Backend used for model fitting; inference reuses the same backend.
pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// Configuration for fitting one forecast model.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epochs: usize,
    /// Trailing fraction of training sequences held out for validation.
    pub validation_split: f64,
    /// Epochs without validation improvement before stopping early.
    pub patience: usize,
    /// Minimum validation-loss drop that counts as an improvement.
    pub min_delta: f64,
    /// Seeds the backend and the shuffler; unseeded runs are
    /// nondeterministic in both wall-clock time and final metrics.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            batch_size: BATCH_SIZE,
            epochs: MAX_EPOCHS,
            validation_split: VALIDATION_SPLIT_RATIO,
            patience: EARLY_STOP_PATIENCE,
            min_delta: 0.0,
            seed: None,
        }
    }
}

/// Loss history and early-stopping outcome for one fitted model.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub epochs_run: usize,
    pub best_val_loss: Option<f64>,
    pub history: Vec<EpochLoss>,
}

#[derive(Debug, Clone, Copy)]
pub struct EpochLoss {
    pub train: f64,
    pub validation: Option<f64>,
}

/// Fits a [`PriceLstmModel`] on training sequences with Adam and MSE loss.
///
/// The trailing `validation_split` fraction of sequences is held out and
/// monitored for early stopping: after `patience` epochs without
/// improvement training stops, and the best-observed weights are restored
/// at the end of the loop whether or not the stop fired. This is the one
/// long-running, nondeterministic stage of the pipeline; failures are
/// fatal and never retried.
pub fn train_model(
    model_config: &PriceLstmModelConfig,
    config: &TrainingConfig,
    features: Tensor<TrainingBackend, 3>,
    targets: Tensor<TrainingBackend, 2>,
    device: &<TrainingBackend as Backend>::Device,
) -> Result<(PriceLstmModel<TrainingBackend>, TrainingReport), PipelineError> {
    let num_samples = features.dims()[0];
    if num_samples == 0 {
        return Err(PipelineError::Training("no training sequences".into()));
    }

    if let Some(seed) = config.seed {
        TrainingBackend::seed(seed);
    }
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // Trailing split, so validation windows are the most recent ones and
    // never get shuffled into the fit set
    let val_size = (num_samples as f64 * config.validation_split).round() as usize;
    let fit_size = num_samples - val_size;
    if fit_size == 0 {
        return Err(PipelineError::Training(format!(
            "validation split {} leaves no sequences to fit on",
            config.validation_split
        )));
    }

    let fit_features = features.clone().narrow(0, 0, fit_size);
    let fit_targets = targets.clone().narrow(0, 0, fit_size);
    let validation = if val_size > 0 {
        Some((
            features.narrow(0, fit_size, val_size),
            targets.narrow(0, fit_size, val_size),
        ))
    } else {
        None
    };

    let mut model = model_config.init::<TrainingBackend>(device);
    let mut optimizer = AdamConfig::new().init();

    let mut best_model = model.clone();
    let mut best_val_loss = f64::INFINITY;
    let mut epochs_no_improve = 0usize;
    let mut history = Vec::with_capacity(config.epochs);
    let mut epochs_run = 0usize;

    let mut order: Vec<i32> = (0..fit_size as i32).collect();

    for epoch in 1..=config.epochs {
        epochs_run = epoch;

        order.shuffle(&mut rng);
        let index = Tensor::<TrainingBackend, 1, Int>::from_ints(order.as_slice(), device);
        let shuffled_features = fit_features.clone().select(0, index.clone());
        let shuffled_targets = fit_targets.clone().select(0, index);

        let mut epoch_loss = 0.0;
        let mut batches = 0usize;
        let mut start = 0usize;
        while start < fit_size {
            let end = usize::min(start + config.batch_size, fit_size);
            let batch_features = shuffled_features.clone().narrow(0, start, end - start);
            let batch_targets = shuffled_targets.clone().narrow(0, start, end - start);

            let predictions = model.forward(batch_features, true);
            let diff = predictions - batch_targets;
            let loss = (diff.clone() * diff).mean();
            epoch_loss += loss.clone().into_scalar() as f64;
            batches += 1;

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optimizer.step(config.learning_rate, model, grads);

            start = end;
        }
        let train_loss = epoch_loss / batches as f64;

        let val_loss = validation.as_ref().map(|(val_features, val_targets)| {
            let predictions = model.forward(val_features.clone(), false);
            let diff = predictions - val_targets.clone();
            (diff.clone() * diff).mean().into_scalar() as f64
        });
        history.push(EpochLoss {
            train: train_loss,
            validation: val_loss,
        });

        match val_loss {
            Some(val_loss) => {
                info!(
                    "epoch {}/{}: train loss {:.6}, validation loss {:.6}",
                    epoch, config.epochs, train_loss, val_loss
                );

                if best_val_loss - val_loss > config.min_delta {
                    best_val_loss = val_loss;
                    best_model = model.clone();
                    epochs_no_improve = 0;
                } else {
                    epochs_no_improve += 1;
                    if epochs_no_improve >= config.patience {
                        info!(
                            "early stopping at epoch {} (best validation loss {:.6})",
                            epoch, best_val_loss
                        );
                        break;
                    }
                }
            }
            None => info!(
                "epoch {}/{}: train loss {:.6}",
                epoch, config.epochs, train_loss
            ),
        }
    }

    // Best-observed weights win whether or not the stop fired
    let (model, best_val_loss) = if best_val_loss.is_finite() {
        (best_model, Some(best_val_loss))
    } else {
        (model, None)
    };

    Ok((
        model,
        TrainingReport {
            epochs_run,
            best_val_loss,
            history,
        },
    ))
}
