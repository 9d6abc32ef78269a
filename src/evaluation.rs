// Internal modules
use crate::error::PipelineError;

/// Scalar error metrics in original price units.
#[derive(Debug, Clone, Copy)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
}

/// MSE, RMSE and MAE between aligned actual/predicted slices.
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<RegressionMetrics, PipelineError> {
    if actual.is_empty() {
        return Err(PipelineError::Data("cannot evaluate an empty sample".into()));
    }
    if actual.len() != predicted.len() {
        return Err(PipelineError::Data(format!(
            "actual ({}) and predicted ({}) lengths differ",
            actual.len(),
            predicted.len()
        )));
    }

    let n = actual.len() as f64;
    let mut squared = 0.0;
    let mut absolute = 0.0;
    for (&a, &p) in actual.iter().zip(predicted) {
        let err = a - p;
        squared += err * err;
        absolute += err.abs();
    }

    let mse = squared / n;
    Ok(RegressionMetrics {
        mse,
        rmse: mse.sqrt(),
        mae: absolute / n,
    })
}

/// Trailing moving-average forecast over the raw test-partition closes.
///
/// Runs entirely on the test partition's own history, independent of the
/// scaler/model pipeline. `predicted[k]` is the mean of the `window`
/// sessions ending at test row `window + k`, forecasting that row's
/// next-session close.
#[derive(Debug, Clone)]
pub struct BaselineForecast {
    pub window: usize,
    pub predicted: Vec<f64>,
    /// Mean over the final `window` sessions: the baseline's own
    /// next-session forecast.
    pub latest: f64,
}

pub fn moving_average_baseline(
    closes: &[f64],
    window: usize,
) -> Result<BaselineForecast, PipelineError> {
    if closes.len() <= window {
        return Err(PipelineError::Data(format!(
            "test partition has {} rows, too few for a {}-session moving average baseline",
            closes.len(),
            window
        )));
    }

    let mut predicted = Vec::with_capacity(closes.len() - window);
    for i in window..closes.len() {
        let sum: f64 = closes[i + 1 - window..=i].iter().sum();
        predicted.push(sum / window as f64);
    }

    let latest = closes[closes.len() - window..].iter().sum::<f64>() / window as f64;

    Ok(BaselineForecast {
        window,
        predicted,
        latest,
    })
}
