//! The predictor capability: whatever the trained artifact is, the rest of the
//! crate only ever sees [`Predictor`].

mod error;
pub mod linear;
#[cfg(feature = "onnx")]
pub mod onnx;

use std::fmt;

use crate::row::FeatureRow;

pub use error::PredictorError;
pub use linear::LinearPipeline;
#[cfg(feature = "onnx")]
pub use onnx::OnnxPipeline;

/// The binary classification output. `1` means placed; anything else is treated as
/// not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub i64);

impl Label {
    pub const PLACED: Label = Label(1);
    pub const NOT_PLACED: Label = Label(0);

    pub fn is_placed(&self) -> bool {
        self.0 == 1
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A loaded, read-only classifier.
///
/// Implementations must be shareable across threads: the loader hands out one
/// `Arc<dyn Predictor>` for the lifetime of the process.
pub trait Predictor: Send + Sync {
    /// Predicts the label for a single row.
    fn classify(&self, row: &FeatureRow) -> Result<Label, PredictorError>;

    /// Positive-class probability for a single row.
    ///
    /// Returns `Ok(None)` when the artifact cannot estimate probabilities at all.
    fn estimate_probability(&self, row: &FeatureRow) -> Result<Option<f64>, PredictorError>;

    /// Short human-readable description used in logs.
    fn describe(&self) -> String {
        "predictor".to_string()
    }
}

impl fmt::Debug for dyn Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync + ?Sized>() {}
    fn verify_thread_safety() {
        assert_send_sync::<dyn Predictor>();
        assert_send_sync::<LinearPipeline>();
    }
};
