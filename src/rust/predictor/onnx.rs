//! ONNX Runtime backend for pipelines exported with one graph input per column.
//!
//! The graph is expected to look like what skl2onnx produces for a classifier
//! with `zipmap=False`:
//! - one input per column, shape `[N, 1]`, typed int64, float or string
//! - output 0: the label, int64 `[N]`
//! - output 1 (optional): probabilities, float32 `[N, n_classes]`
//!
//! Graph inputs are matched to row cells by column name, not by position. A row
//! with reordered or extra columns is accepted as long as every graph input finds
//! its column; only a missing column is a schema mismatch. The linear backend is
//! stricter and requires the exact column order.
//!
//! One session run produces both the label and the probabilities. The result of
//! the last run is kept together with its row, so `classify` followed by
//! `estimate_probability` on the same row runs the graph once.

use std::path::Path;
use std::sync::Mutex;

use log::{debug, info};
use ort::session::Session;
use ort::value::{DynValue, Tensor, TensorElementType, ValueType};

use super::{Label, Predictor, PredictorError};
use crate::row::{FeatureRow, Value};
use crate::runtime::{create_session_builder, RuntimeConfig};

#[derive(Debug, Clone)]
struct InputSpec {
    name: String,
    ty: Option<TensorElementType>,
}

/// Outputs of one session run. A failed probability extraction is kept as its
/// message so it can be reported again for the same row.
#[derive(Debug, Clone, PartialEq)]
struct RunResult {
    label: i64,
    probability: Result<Option<f64>, String>,
}

impl RunResult {
    fn probability(&self) -> Result<Option<f64>, PredictorError> {
        self.probability.clone().map_err(PredictorError::Output)
    }
}

/// The most recent `(row, result)` pair.
#[derive(Debug, Default)]
struct LastRun {
    entry: Option<(FeatureRow, RunResult)>,
}

impl LastRun {
    fn lookup(&self, row: &FeatureRow) -> Option<&RunResult> {
        match &self.entry {
            Some((cached, result)) if cached == row => Some(result),
            _ => None,
        }
    }

    fn store(&mut self, row: &FeatureRow, result: RunResult) {
        self.entry = Some((row.clone(), result));
    }
}

struct SessionState {
    session: Session,
    last: LastRun,
}

pub struct OnnxPipeline {
    state: Mutex<SessionState>,
    inputs: Vec<InputSpec>,
    output_count: usize,
}

impl OnnxPipeline {
    /// Opens an `.onnx` artifact. Input names and types are read from the graph but
    /// not checked against any row until the pipeline is called.
    pub fn load(path: &Path, config: &RuntimeConfig) -> Result<Self, String> {
        let session = create_session_builder(config)?
            .commit_from_file(path)
            .map_err(|e| e.to_string())?;

        let inputs: Vec<InputSpec> = session
            .inputs()
            .iter()
            .map(|input| InputSpec {
                name: input.name().to_string(),
                ty: match input.dtype() {
                    ValueType::Tensor { ty, .. } => Some(*ty),
                    _ => None,
                },
            })
            .collect();
        let output_count = session.outputs().len();
        if output_count == 0 {
            return Err("Model must have at least 1 output for the label".to_string());
        }

        info!(
            "Opened ONNX pipeline {:?} ({} inputs, {} outputs)",
            path,
            inputs.len(),
            output_count
        );
        Ok(Self {
            state: Mutex::new(SessionState {
                session,
                last: LastRun::default(),
            }),
            inputs,
            output_count,
        })
    }

    fn build_inputs(&self, row: &FeatureRow) -> Result<Vec<(String, DynValue)>, PredictorError> {
        let mut tensors = Vec::with_capacity(self.inputs.len());
        for spec in &self.inputs {
            let value = row.get(&spec.name).ok_or_else(|| {
                PredictorError::SchemaMismatch(format!(
                    "Model input '{}' has no matching column in {:?}",
                    spec.name,
                    row.columns()
                ))
            })?;
            tensors.push((spec.name.clone(), make_tensor(&spec.name, spec.ty, value)?));
        }
        Ok(tensors)
    }

    fn run(&self, row: &FeatureRow) -> Result<RunResult, PredictorError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| PredictorError::Model("ONNX session lock poisoned".to_string()))?;
        if let Some(result) = state.last.lookup(row) {
            debug!("Reusing ONNX outputs for the same row");
            return Ok(result.clone());
        }

        let inputs = self.build_inputs(row)?;
        let result = {
            let outputs = state.session.run(inputs).map_err(runtime_error)?;

            let (_, labels) = outputs[0].try_extract_tensor::<i64>().map_err(|e| {
                PredictorError::Output(format!("Failed to extract label tensor: {}", e))
            })?;
            let label = extract_label(labels)?;

            let probability = if self.output_count < 2 {
                Ok(None)
            } else {
                match outputs[1].try_extract_tensor::<f32>() {
                    Ok((shape, probabilities)) => {
                        let dims: &[i64] = shape;
                        extract_positive_probability(dims, probabilities)
                            .map(Some)
                            .map_err(|e| e.to_string())
                    }
                    Err(e) => Err(format!("Failed to extract probability tensor: {}", e)),
                }
            };
            RunResult { label, probability }
        };

        state.last.store(row, result.clone());
        Ok(result)
    }
}

/// First (only) element of the label output.
fn extract_label(labels: &[i64]) -> Result<i64, PredictorError> {
    labels
        .first()
        .copied()
        .ok_or_else(|| PredictorError::Output("Label tensor is empty".to_string()))
}

/// Index 1 of the first row of a `[N, n_classes]` probability output.
fn extract_positive_probability(dims: &[i64], probabilities: &[f32]) -> Result<f64, PredictorError> {
    let classes = match dims {
        [rows, classes] if *rows >= 1 && *classes >= 2 => *classes as usize,
        _ => {
            return Err(PredictorError::Output(format!(
                "Unexpected probability shape {:?}, expected [N, 2+]",
                dims
            )))
        }
    };
    if probabilities.len() < classes {
        return Err(PredictorError::Output(format!(
            "Probability tensor holds {} values for shape {:?}",
            probabilities.len(),
            dims
        )));
    }
    Ok(f64::from(probabilities[1]))
}

fn make_tensor(
    column: &str,
    ty: Option<TensorElementType>,
    value: &Value,
) -> Result<DynValue, PredictorError> {
    let shape = [1i64, 1];
    let invalid = |reason: String| PredictorError::InvalidValue {
        column: column.to_string(),
        reason,
    };

    let tensor = match (ty, value) {
        (Some(TensorElementType::String), value) => {
            Tensor::from_string_array((shape, vec![value.to_string()].into_boxed_slice()))
                .map(|t| t.into_dyn())
        }
        (Some(TensorElementType::Int64), Value::Int(v)) => {
            Tensor::from_array((shape, vec![*v].into_boxed_slice())).map(|t| t.into_dyn())
        }
        (Some(TensorElementType::Float64), value) => {
            let v = value
                .as_f64()
                .ok_or_else(|| invalid(format!("expected a number, got '{}'", value)))?;
            Tensor::from_array((shape, vec![v].into_boxed_slice())).map(|t| t.into_dyn())
        }
        (Some(TensorElementType::Float32) | None, value) => {
            let v = value
                .as_f64()
                .ok_or_else(|| invalid(format!("expected a number, got '{}'", value)))?;
            Tensor::from_array((shape, vec![v as f32].into_boxed_slice())).map(|t| t.into_dyn())
        }
        (Some(other), value) => {
            return Err(invalid(format!(
                "cannot feed {} '{}' into a {:?} input",
                value.type_name(),
                value,
                other
            )));
        }
    };
    tensor.map_err(|e| invalid(format!("Failed to create tensor: {}", e)))
}

/// Maps a session failure to a predictor error.
///
/// ONNX Runtime reports allocation failures only through the message text, so
/// `ResourceExhausted` is recognised by the phrases it uses ("Failed to
/// allocate", "bad_alloc"). Anything else is a plain model error.
fn runtime_error(err: impl std::fmt::Display) -> PredictorError {
    let message = err.to_string();
    if message.contains("Failed to allocate") || message.contains("bad_alloc") {
        PredictorError::ResourceExhausted(message)
    } else {
        PredictorError::Model(format!("Failed to run model: {}", message))
    }
}

impl Predictor for OnnxPipeline {
    fn classify(&self, row: &FeatureRow) -> Result<Label, PredictorError> {
        Ok(Label(self.run(row)?.label))
    }

    fn estimate_probability(&self, row: &FeatureRow) -> Result<Option<f64>, PredictorError> {
        if self.output_count < 2 {
            debug!("ONNX pipeline has no probability output");
            return Ok(None);
        }
        self.run(row)?.probability()
    }

    fn describe(&self) -> String {
        format!(
            "onnx pipeline ({} inputs, {} outputs)",
            self.inputs.len(),
            self.output_count
        )
    }
}
