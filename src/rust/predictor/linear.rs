use std::io::Read;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::{Label, Predictor, PredictorError};
use crate::row::{FeatureRow, Value};

/// Preprocessing applied to one input column before the linear head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnTransform {
    /// `(x - mean) / scale`
    Standardize { mean: f64, scale: f64 },
    /// The numeric value as-is
    Passthrough,
    /// One indicator per known category
    OneHot {
        categories: Vec<String>,
        #[serde(default)]
        handle_unknown: UnknownCategory,
    },
}

impl ColumnTransform {
    /// Number of encoded features this column contributes.
    pub fn width(&self) -> usize {
        match self {
            Self::Standardize { .. } | Self::Passthrough => 1,
            Self::OneHot { categories, .. } => categories.len(),
        }
    }
}

/// What to do with a category that was never seen during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategory {
    #[default]
    Error,
    /// Encode as all zeros
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub transform: ColumnTransform,
}

/// A trained pipeline stored as JSON: per-column preprocessing followed by a
/// logistic-regression head.
///
/// ```json
/// {
///   "columns": [
///     { "name": "IQ", "transform": { "type": "standardize", "mean": 100.0, "scale": 15.0 } },
///     { "name": "Internship_Experience",
///       "transform": { "type": "one_hot", "categories": ["No", "Yes"] } }
///   ],
///   "coefficients": [0.8, -0.4, 0.4],
///   "intercept": -1.5,
///   "classes": [0, 1],
///   "supports_probability": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPipeline {
    pub columns: Vec<ColumnSpec>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_classes")]
    pub classes: [i64; 2],
    #[serde(default = "default_supports_probability")]
    pub supports_probability: bool,
}

fn default_classes() -> [i64; 2] {
    [0, 1]
}

fn default_supports_probability() -> bool {
    true
}

impl LinearPipeline {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Total width of the encoded feature vector.
    pub fn encoded_width(&self) -> usize {
        self.columns.iter().map(|c| c.transform.width()).sum()
    }

    /// Checks that the artifact is internally consistent.
    ///
    /// This says nothing about whether a given row fits; that only shows up when
    /// the pipeline is called.
    pub fn validate(&self) -> Result<(), String> {
        if self.columns.is_empty() {
            return Err("Pipeline must declare at least one column".to_string());
        }
        for spec in &self.columns {
            match &spec.transform {
                ColumnTransform::Standardize { mean, scale } => {
                    if !mean.is_finite() || !scale.is_finite() || *scale == 0.0 {
                        return Err(format!(
                            "Column '{}' has an unusable scaler (mean {}, scale {})",
                            spec.name, mean, scale
                        ));
                    }
                }
                ColumnTransform::OneHot { categories, .. } => {
                    if categories.is_empty() {
                        return Err(format!("Column '{}' has no categories", spec.name));
                    }
                }
                ColumnTransform::Passthrough => {}
            }
        }
        let width = self.encoded_width();
        if self.coefficients.len() != width {
            return Err(format!(
                "Expected {} coefficients for the encoded features, found {}",
                width,
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("Coefficients and intercept must be finite".to_string());
        }
        Ok(())
    }

    fn check_schema(&self, row: &FeatureRow) -> Result<(), PredictorError> {
        let expected: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let actual: Vec<&str> = row.columns().iter().map(String::as_str).collect();
        if expected != actual {
            return Err(PredictorError::SchemaMismatch(format!(
                "The feature names should match those that were passed during fit. Expected {:?}, got {:?}",
                expected, actual
            )));
        }
        Ok(())
    }

    fn encode(&self, row: &FeatureRow) -> Result<Array1<f64>, PredictorError> {
        self.check_schema(row)?;

        let mut features = Array1::zeros(self.encoded_width());
        let mut offset = 0;
        for (spec, value) in self.columns.iter().zip(row.values()) {
            match &spec.transform {
                ColumnTransform::Standardize { mean, scale } => {
                    features[offset] = (numeric(&spec.name, value)? - mean) / scale;
                }
                ColumnTransform::Passthrough => {
                    features[offset] = numeric(&spec.name, value)?;
                }
                ColumnTransform::OneHot { categories, handle_unknown } => {
                    let category = value.to_string();
                    match categories.iter().position(|c| *c == category) {
                        Some(idx) => features[offset + idx] = 1.0,
                        None if *handle_unknown == UnknownCategory::Ignore => {}
                        None => {
                            return Err(PredictorError::InvalidValue {
                                column: spec.name.clone(),
                                reason: format!(
                                    "Found unknown category '{}' (known: {:?})",
                                    category, categories
                                ),
                            });
                        }
                    }
                }
            }
            offset += spec.transform.width();
        }
        Ok(features)
    }

    fn decision_function(&self, row: &FeatureRow) -> Result<f64, PredictorError> {
        let features = self.encode(row)?;
        let weights = Array1::from(self.coefficients.clone());
        let score = features.dot(&weights) + self.intercept;
        if !score.is_finite() {
            return Err(PredictorError::Output(format!("Decision score is not finite: {}", score)));
        }
        Ok(score)
    }
}

fn numeric(column: &str, value: &Value) -> Result<f64, PredictorError> {
    value.as_f64().ok_or_else(|| PredictorError::InvalidValue {
        column: column.to_string(),
        reason: format!("expected a number, got {} '{}'", value.type_name(), value),
    })
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Predictor for LinearPipeline {
    fn classify(&self, row: &FeatureRow) -> Result<Label, PredictorError> {
        let score = self.decision_function(row)?;
        let idx = if score > 0.0 { 1 } else { 0 };
        Ok(Label(self.classes[idx]))
    }

    fn estimate_probability(&self, row: &FeatureRow) -> Result<Option<f64>, PredictorError> {
        if !self.supports_probability {
            return Ok(None);
        }
        let score = self.decision_function(row)?;
        Ok(Some(sigmoid(score)))
    }

    fn describe(&self) -> String {
        format!(
            "linear pipeline ({} columns, {} encoded features)",
            self.columns.len(),
            self.encoded_width()
        )
    }
}
