use log::{debug, info};

use crate::predictor::{Label, Predictor, PredictorError};
use crate::row::FeatureRow;

/// Result of one successful inference call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    /// Positive-class probability, absent when the artifact cannot provide one
    pub probability: Option<f64>,
}

/// Runs the predictor on a single row.
///
/// Errors from `classify` propagate untouched. A failed probability estimate is
/// dropped unless the error is unrecoverable (see [`PredictorError::is_recoverable`]).
pub fn run_prediction(predictor: &dyn Predictor, row: &FeatureRow) -> Result<Prediction, PredictorError> {
    let label = predictor.classify(row)?;

    let probability = match predictor.estimate_probability(row) {
        Ok(probability) => probability,
        Err(e) if e.is_recoverable() => {
            debug!("Probability estimate unavailable: {}", e);
            None
        }
        Err(e) => return Err(e),
    };

    info!("Predicted label {} (probability: {:?})", label, probability);
    Ok(Prediction { label, probability })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::PredictionRequest;
    use crate::row::assemble;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum ProbaBehavior {
        Value(f64),
        Unsupported,
        Fails,
        OutOfMemory,
    }

    struct StubPredictor {
        label: Result<i64, String>,
        proba: ProbaBehavior,
        proba_calls: AtomicUsize,
    }

    impl StubPredictor {
        fn new(label: Result<i64, String>, proba: ProbaBehavior) -> Self {
            Self {
                label,
                proba,
                proba_calls: AtomicUsize::new(0),
            }
        }
    }

    impl Predictor for StubPredictor {
        fn classify(&self, _row: &FeatureRow) -> Result<Label, PredictorError> {
            self.label
                .clone()
                .map(Label)
                .map_err(PredictorError::Model)
        }

        fn estimate_probability(&self, _row: &FeatureRow) -> Result<Option<f64>, PredictorError> {
            self.proba_calls.fetch_add(1, Ordering::SeqCst);
            match self.proba {
                ProbaBehavior::Value(p) => Ok(Some(p)),
                ProbaBehavior::Unsupported => Ok(None),
                ProbaBehavior::Fails => Err(PredictorError::Output("no predict_proba".into())),
                ProbaBehavior::OutOfMemory => Err(PredictorError::ResourceExhausted("oom".into())),
            }
        }
    }

    fn row() -> FeatureRow {
        assemble(&PredictionRequest::default())
    }

    #[test]
    fn test_label_and_probability() {
        let stub = StubPredictor::new(Ok(1), ProbaBehavior::Value(0.8));
        let prediction = run_prediction(&stub, &row()).unwrap();
        assert_eq!(prediction.label, Label(1));
        assert_eq!(prediction.probability, Some(0.8));
    }

    #[test]
    fn test_unsupported_probability_is_skipped() {
        let stub = StubPredictor::new(Ok(0), ProbaBehavior::Unsupported);
        let prediction = run_prediction(&stub, &row()).unwrap();
        assert_eq!(prediction.label, Label(0));
        assert_eq!(prediction.probability, None);
    }

    #[test]
    fn test_failing_probability_is_swallowed() {
        let stub = StubPredictor::new(Ok(1), ProbaBehavior::Fails);
        let prediction = run_prediction(&stub, &row()).unwrap();
        assert_eq!(prediction.label, Label(1));
        assert_eq!(prediction.probability, None);
    }

    #[test]
    fn test_resource_exhaustion_propagates() {
        let stub = StubPredictor::new(Ok(1), ProbaBehavior::OutOfMemory);
        assert!(matches!(
            run_prediction(&stub, &row()),
            Err(PredictorError::ResourceExhausted(_))
        ));
    }

    #[test]
    fn test_classify_error_propagates_before_probability() {
        let stub = StubPredictor::new(Err("bad input".into()), ProbaBehavior::Value(0.5));
        assert!(matches!(run_prediction(&stub, &row()), Err(PredictorError::Model(_))));
        assert_eq!(stub.proba_calls.load(Ordering::SeqCst), 0);
    }
}
