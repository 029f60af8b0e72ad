//! Linear regression model and prediction records for the ML lesson.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of input features every model expects.
pub const FEATURE_COUNT: usize = 10;

/// `prediction = dot(weights, features) + bias`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub name: String,
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Raised when an input vector has the wrong length.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Expected {expected} features, got {actual}")]
pub struct FeatureMismatch {
    pub expected: usize,
    pub actual: usize,
}

impl LinearModel {
    pub fn new(name: impl Into<String>, weights: Vec<f64>, bias: f64) -> Self {
        Self {
            name: name.into(),
            weights,
            bias,
        }
    }

    /// Creates a model with weights and bias drawn uniformly from `[-1, 1)`.
    pub fn random(name: impl Into<String>) -> Self {
        let mut rng = rand::rng();
        let weights = (0..FEATURE_COUNT)
            .map(|_| rng.random_range(-1.0..1.0))
            .collect();
        let bias = rng.random_range(-1.0..1.0);
        Self::new(name, weights, bias)
    }

    pub fn kind(&self) -> &'static str {
        "LinearRegression"
    }

    pub fn feature_count(&self) -> usize {
        self.weights.len()
    }

    pub fn predict(&self, features: &[f64]) -> Result<f64, FeatureMismatch> {
        if features.len() != self.weights.len() {
            return Err(FeatureMismatch {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }

        let dot: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();

        Ok(dot + self.bias)
    }
}

/// One logged prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub model_name: String,
    pub feature_count: usize,
    pub prediction: f64,
    pub inference_time_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_is_dot_plus_bias() {
        let model = LinearModel::new("m", vec![1.0, 2.0, 3.0], 0.5);
        assert_eq!(model.predict(&[1.0, 1.0, 1.0]).unwrap(), 6.5);
    }

    #[test]
    fn test_predict_rejects_wrong_length() {
        let model = LinearModel::new("m", vec![1.0, 2.0], 0.0);
        let err = model.predict(&[1.0]).unwrap_err();
        assert_eq!(err.to_string(), "Expected 2 features, got 1");
    }

    #[test]
    fn test_random_model_has_expected_shape() {
        let model = LinearModel::random("r");
        assert_eq!(model.feature_count(), FEATURE_COUNT);
        assert!(model.weights.iter().all(|w| (-1.0..1.0).contains(w)));
    }
}
