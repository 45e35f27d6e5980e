//! Predicts whether a college student gets placed, using a classification pipeline
//! trained elsewhere and shipped as a file.
//!
//! The flow is deliberately short: load the artifact once, turn the eight form
//! fields into a single-row table, ask the predictor for a label and (when it can)
//! a probability, and format the answer.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use placement_predictor::{AppConfig, PlacementService, PredictionRequest};
//!
//! let service = PlacementService::open(&AppConfig::default())?;
//! let submission = service.submit(&PredictionRequest::default());
//! match &submission.result {
//!     Ok(outcome) => println!("{}", outcome.message),
//!     Err(report) => eprintln!("{}\n{}", report.message, report.detail),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Custom predictors
//!
//! Anything implementing [`Predictor`] can stand in for a trained artifact:
//!
//! ```rust
//! use placement_predictor::{
//!     assemble, run_prediction, FeatureRow, Label, PredictionRequest, Predictor, PredictorError,
//! };
//!
//! struct AlwaysPlaced;
//!
//! impl Predictor for AlwaysPlaced {
//!     fn classify(&self, _row: &FeatureRow) -> Result<Label, PredictorError> {
//!         Ok(Label::PLACED)
//!     }
//!
//!     fn estimate_probability(&self, _row: &FeatureRow) -> Result<Option<f64>, PredictorError> {
//!         Ok(None)
//!     }
//! }
//!
//! let row = assemble(&PredictionRequest::default());
//! let prediction = run_prediction(&AlwaysPlaced, &row).unwrap();
//! assert!(prediction.label.is_placed());
//! assert!(prediction.probability.is_none());
//! ```

pub mod artifact;
pub mod config;
pub mod inference;
pub mod predictor;
pub mod report;
pub mod request;
pub mod row;
#[cfg(feature = "onnx")]
mod runtime;
pub mod service;
#[cfg(feature = "gui")]
pub mod ui;

pub use artifact::{load_predictor, ArtifactCache, ArtifactError, ArtifactFormat};
pub use config::AppConfig;
pub use inference::{run_prediction, Prediction};
pub use predictor::{Label, LinearPipeline, Predictor, PredictorError};
pub use report::{format_placement_result, format_probability, Banner, FailureReport, Outcome};
pub use request::{InternshipExperience, PredictionRequest};
pub use row::{assemble, FeatureRow, Value, FEATURE_COLUMNS};
#[cfg(feature = "onnx")]
pub use runtime::RuntimeConfig;
pub use service::{PlacementService, Submission};

pub fn init_logger() {
    env_logger::init();
}
