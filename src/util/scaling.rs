// External crates
use ndarray::{Array2, ArrayView2};

// Internal modules
use crate::error::PipelineError;

#[derive(Debug, Clone)]
struct ScalingParams {
    mins: Vec<f64>,
    maxs: Vec<f64>,
}

/// Per-column min-max scaler fit on training data only.
///
/// Parameters are immutable once fit; applying the scaler to test data
/// never refits. Test values outside the train-observed bounds map outside
/// [0, 1]; this is expected behavior and deliberately not clamped.
#[derive(Debug, Default)]
pub struct MinMaxScaler {
    params: Option<ScalingParams>,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self { params: None }
    }

    /// Learns per-column min/max. Must be called exactly once.
    pub fn fit(&mut self, matrix: ArrayView2<f64>) -> Result<(), PipelineError> {
        if self.params.is_some() {
            return Err(PipelineError::Data(
                "scaler parameters are immutable once fit".into(),
            ));
        }
        if matrix.nrows() == 0 {
            return Err(PipelineError::Data(
                "cannot fit scaler on an empty matrix".into(),
            ));
        }

        let mut mins = Vec::with_capacity(matrix.ncols());
        let mut maxs = Vec::with_capacity(matrix.ncols());

        for column in matrix.columns() {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for &value in column.iter() {
                if value < min {
                    min = value;
                }
                if value > max {
                    max = value;
                }
            }
            mins.push(min);
            maxs.push(max);
        }

        self.params = Some(ScalingParams { mins, maxs });
        Ok(())
    }

    /// Maps each value to `(v - min) / (max - min)` using the fitted bounds.
    pub fn transform(&self, matrix: ArrayView2<f64>) -> Result<Array2<f64>, PipelineError> {
        let params = self.fitted_params(matrix.ncols())?;
        let mut out = matrix.to_owned();

        for (j, mut column) in out.columns_mut().into_iter().enumerate() {
            let min = params.mins[j];
            let range = Self::column_range(params, j);
            column.mapv_inplace(|v| (v - min) / range);
        }
        Ok(out)
    }

    /// Exact algebraic inverse of `transform`.
    pub fn inverse_transform(&self, matrix: ArrayView2<f64>) -> Result<Array2<f64>, PipelineError> {
        let params = self.fitted_params(matrix.ncols())?;
        let mut out = matrix.to_owned();

        for (j, mut column) in out.columns_mut().into_iter().enumerate() {
            let min = params.mins[j];
            let range = Self::column_range(params, j);
            column.mapv_inplace(|v| v * range + min);
        }
        Ok(out)
    }

    /// Fits a single-column scaler over a target vector.
    pub fn fit_column(&mut self, values: &[f64]) -> Result<(), PipelineError> {
        let matrix = column_matrix(values)?;
        self.fit(matrix.view())
    }

    pub fn transform_column(&self, values: &[f64]) -> Result<Vec<f64>, PipelineError> {
        let matrix = column_matrix(values)?;
        let scaled = self.transform(matrix.view())?;
        Ok(scaled.column(0).to_vec())
    }

    pub fn inverse_transform_column(&self, values: &[f64]) -> Result<Vec<f64>, PipelineError> {
        let matrix = column_matrix(values)?;
        let unscaled = self.inverse_transform(matrix.view())?;
        Ok(unscaled.column(0).to_vec())
    }

    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    fn fitted_params(&self, ncols: usize) -> Result<&ScalingParams, PipelineError> {
        let params = self.params.as_ref().ok_or(PipelineError::NotFitted)?;
        if ncols != params.mins.len() {
            return Err(PipelineError::Data(format!(
                "scaler fit on {} columns, applied to {}",
                params.mins.len(),
                ncols
            )));
        }
        Ok(params)
    }

    // Degenerate columns (max == min) scale with denominator 1.0
    fn column_range(params: &ScalingParams, j: usize) -> f64 {
        let range = params.maxs[j] - params.mins[j];
        if range.abs() < f64::EPSILON {
            1.0
        } else {
            range
        }
    }
}

/// Views a flat vector as an (n, 1) matrix for single-column scaling.
pub fn column_matrix(values: &[f64]) -> Result<Array2<f64>, PipelineError> {
    Array2::from_shape_vec((values.len(), 1), values.to_vec())
        .map_err(|e| PipelineError::Data(e.to_string()))
}
