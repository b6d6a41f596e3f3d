//! Regression Pipeline
//!
//! Column transformer (one-hot + standard scaling + passthrough) followed by
//! a closed-form ridge regressor. Fitted once by the trainer and then only
//! used for prediction.

use crate::InferenceError;
use feature_engine::{ColumnRole, FeatureRow, FeatureSchema};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default ridge regularisation strength
pub const DEFAULT_ALPHA: f64 = 1.0;

/// One-hot encoder over the categorical columns of a schema.
///
/// Values not seen during fit encode as all zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub(crate) columns: Vec<usize>,
    pub(crate) categories: Vec<Vec<f64>>,
}

impl OneHotEncoder {
    pub fn fit(x: &Array2<f64>, columns: Vec<usize>) -> Self {
        let categories = columns
            .iter()
            .map(|&col| {
                let mut values: Vec<f64> = x.column(col).to_vec();
                values.sort_by(f64::total_cmp);
                values.dedup();
                values
            })
            .collect();
        Self { columns, categories }
    }

    /// Sorted categories learned for each encoded column
    pub fn categories(&self) -> &[Vec<f64>] {
        &self.categories
    }

    pub fn output_width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    fn encode_into(&self, row: &[f64], out: &mut Vec<f64>) {
        for (&col, categories) in self.columns.iter().zip(&self.categories) {
            let value = row[col];
            out.extend(categories.iter().map(|c| if *c == value { 1.0 } else { 0.0 }));
        }
    }
}

/// Zero-mean unit-variance scaling with population standard deviation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub(crate) columns: Vec<usize>,
    pub(crate) means: Vec<f64>,
    pub(crate) scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &Array2<f64>, columns: Vec<usize>) -> Self {
        let mut means = Vec::with_capacity(columns.len());
        let mut scales = Vec::with_capacity(columns.len());
        for &col in &columns {
            let values = x.column(col);
            let mean = values.mean().unwrap_or(0.0);
            let std = values.std(0.0);
            means.push(mean);
            // Constant columns are centred but not rescaled
            scales.push(if std > 0.0 { std } else { 1.0 });
        }
        Self {
            columns,
            means,
            scales,
        }
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    fn scale_into(&self, row: &[f64], out: &mut Vec<f64>) {
        for ((&col, mean), scale) in self.columns.iter().zip(&self.means).zip(&self.scales) {
            out.push((row[col] - mean) / scale);
        }
    }
}

/// Solve the symmetric positive-definite system `a * x = b` by Cholesky.
///
/// Returns `None` when `a` is not positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * y[j]).sum();
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Gauss-Jordan elimination with partial pivoting, fallback for `cholesky_solve`
fn gauss_jordan_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut aug = Array2::<f64>::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = a[[i, j]];
        }
        aug[[i, n]] = b[i];
    }

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&r1, &r2| aug[[r1, col]].abs().total_cmp(&aug[[r2, col]].abs()))?;
        if aug[[pivot_row, col]].abs() < 1e-12 {
            return None;
        }
        if pivot_row != col {
            for j in 0..=n {
                aug.swap([col, j], [pivot_row, j]);
            }
        }

        let pivot = aug[[col, col]];
        for j in 0..=n {
            aug[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                if factor != 0.0 {
                    for j in 0..=n {
                        aug[[row, j]] -= factor * aug[[col, j]];
                    }
                }
            }
        }
    }

    Some(aug.column(n).to_owned())
}

/// Closed-form ridge regression with an unpenalised intercept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeRegressor {
    pub(crate) alpha: f64,
    pub(crate) coefficients: Vec<f64>,
    pub(crate) intercept: f64,
}

impl RidgeRegressor {
    /// Fit on centred data: `(XcᵀXc + αI) w = Xcᵀyc`, `b = ȳ − w·x̄`
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<Self, InferenceError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples == 0 {
            return Err(InferenceError::EmptyTrainingSet);
        }
        if y.len() != n_samples {
            return Err(InferenceError::ShapeMismatch {
                expected: n_samples,
                actual: y.len(),
            });
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or(InferenceError::EmptyTrainingSet)?;
        let y_mean = y.mean().ok_or(InferenceError::EmptyTrainingSet)?;
        let x_c = x - &x_mean.view().insert_axis(Axis(0));
        let y_c = y - y_mean;

        let mut xtx = x_c.t().dot(&x_c);
        for i in 0..n_features {
            xtx[[i, i]] += alpha;
        }
        let xty = x_c.t().dot(&y_c);

        let weights = match cholesky_solve(&xtx, &xty) {
            Some(w) => w,
            None => {
                debug!("Cholesky failed, falling back to Gauss-Jordan");
                gauss_jordan_solve(&xtx, &xty).ok_or(InferenceError::SingularSystem)?
            }
        };

        let intercept = y_mean - weights.dot(&x_mean);
        Ok(Self {
            alpha,
            coefficients: weights.to_vec(),
            intercept,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn predict_one(&self, x: &[f64]) -> Result<f64, InferenceError> {
        if x.len() != self.coefficients.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: x.len(),
            });
        }
        let dot: f64 = x.iter().zip(&self.coefficients).map(|(a, w)| a * w).sum();
        Ok(dot + self.intercept)
    }
}

/// Fitted column transformer plus ridge regressor for one feature schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionPipeline {
    pub(crate) schema: FeatureSchema,
    pub(crate) encoder: OneHotEncoder,
    pub(crate) scaler: StandardScaler,
    pub(crate) passthrough: Vec<usize>,
    pub(crate) regressor: RidgeRegressor,
}

impl RegressionPipeline {
    /// Fit the transformer and the regressor on training rows.
    ///
    /// All rows must share one schema; `targets` are log-durations.
    pub fn fit(rows: &[FeatureRow], targets: &[f64], alpha: f64) -> Result<Self, InferenceError> {
        let first = rows.first().ok_or(InferenceError::EmptyTrainingSet)?;
        let schema = first.schema();
        if targets.len() != rows.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: rows.len(),
                actual: targets.len(),
            });
        }

        let width = schema.width();
        let mut raw = Array2::<f64>::zeros((rows.len(), width));
        for (i, row) in rows.iter().enumerate() {
            check_schema(schema, row)?;
            for (j, value) in row.values().iter().enumerate() {
                raw[[i, j]] = *value;
            }
        }

        let encoder = OneHotEncoder::fit(&raw, schema.indices_with_role(ColumnRole::Categorical));
        let scaler = StandardScaler::fit(&raw, schema.indices_with_role(ColumnRole::Scaled));
        let passthrough = schema.indices_with_role(ColumnRole::Passthrough);

        let mut pipeline = Self {
            schema,
            encoder,
            scaler,
            passthrough,
            regressor: RidgeRegressor {
                alpha,
                coefficients: Vec::new(),
                intercept: 0.0,
            },
        };

        let out_width = pipeline.output_width();
        let mut design = Array2::<f64>::zeros((rows.len(), out_width));
        let mut buffer = Vec::with_capacity(out_width);
        for (i, row) in rows.iter().enumerate() {
            buffer.clear();
            pipeline.transform_into(row.values(), &mut buffer);
            for (j, value) in buffer.iter().enumerate() {
                design[[i, j]] = *value;
            }
        }

        let y = Array1::from(targets.to_vec());
        pipeline.regressor = RidgeRegressor::fit(&design, &y, alpha)?;

        debug!(
            "Fitted pipeline on {} rows: {} raw columns -> {} model inputs",
            rows.len(),
            width,
            out_width
        );

        Ok(pipeline)
    }

    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn regressor(&self) -> &RidgeRegressor {
        &self.regressor
    }

    /// Number of model inputs after transformation
    pub fn output_width(&self) -> usize {
        self.encoder.output_width() + self.scaler.columns.len() + self.passthrough.len()
    }

    /// Check that every stored index and length agrees with the schema.
    ///
    /// A decoded pipeline that fails this would index out of bounds on
    /// predict, so loaders must reject it.
    pub fn check_consistency(&self) -> Result<(), String> {
        let width = self.schema.width();
        let indices = self
            .encoder
            .columns
            .iter()
            .chain(&self.scaler.columns)
            .chain(&self.passthrough);
        if let Some(col) = indices.copied().find(|&col| col >= width) {
            return Err(format!(
                "column index {} outside schema {} of width {}",
                col, self.schema, width
            ));
        }
        if self.encoder.categories.len() != self.encoder.columns.len() {
            return Err(format!(
                "encoder has {} category lists for {} columns",
                self.encoder.categories.len(),
                self.encoder.columns.len()
            ));
        }
        let scaled = self.scaler.columns.len();
        if self.scaler.means.len() != scaled || self.scaler.scales.len() != scaled {
            return Err(format!(
                "scaler has {} means and {} scales for {} columns",
                self.scaler.means.len(),
                self.scaler.scales.len(),
                scaled
            ));
        }
        if self.scaler.scales.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err("scaler holds a zero or non-finite scale".to_string());
        }
        let inputs = self.output_width();
        if self.regressor.coefficients.len() != inputs {
            return Err(format!(
                "regressor has {} coefficients for {} model inputs",
                self.regressor.coefficients.len(),
                inputs
            ));
        }
        Ok(())
    }

    fn transform_into(&self, row: &[f64], out: &mut Vec<f64>) {
        self.encoder.encode_into(row, out);
        self.scaler.scale_into(row, out);
        out.extend(self.passthrough.iter().map(|&col| row[col]));
    }

    /// One-hot blocks, then scaled columns, then passthrough columns
    pub fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, InferenceError> {
        check_schema(self.schema, row)?;
        let mut out = Vec::with_capacity(self.output_width());
        self.transform_into(row.values(), &mut out);
        Ok(out)
    }

    /// Raw model output (log-duration) for one row
    pub fn predict(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let inputs = self.transform(row)?;
        self.regressor.predict_one(&inputs)
    }

    pub fn predict_batch(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, InferenceError> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

fn check_schema(expected: FeatureSchema, row: &FeatureRow) -> Result<(), InferenceError> {
    if row.schema() != expected {
        return Err(InferenceError::SchemaMismatch {
            expected,
            actual: row.schema(),
        });
    }
    Ok(())
}
