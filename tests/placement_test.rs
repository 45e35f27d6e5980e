use std::sync::atomic::{AtomicUsize, Ordering};

use env_logger::{Builder, Env};
use placement_predictor::report::{NOT_PLACED_MESSAGE, PLACED_MESSAGE, PREDICTION_FAILED};
use placement_predictor::{
    assemble, run_prediction, FailureReport, FeatureRow, InternshipExperience, Label, Outcome,
    PredictionRequest, Predictor, PredictorError, Value, FEATURE_COLUMNS,
};

fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn")).try_init();
}

/// Stands in for a trained artifact: fixed label, fixed probabilities, and a record
/// of the rows it was called with.
struct StubArtifact {
    label: i64,
    proba: Option<[f64; 2]>,
    proba_error: bool,
    classify_error: bool,
    calls: AtomicUsize,
}

impl StubArtifact {
    fn new(label: i64, proba: Option<[f64; 2]>) -> Self {
        Self {
            label,
            proba,
            proba_error: false,
            classify_error: false,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Predictor for StubArtifact {
    fn classify(&self, row: &FeatureRow) -> Result<Label, PredictorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.classify_error {
            return Err(PredictorError::SchemaMismatch(format!(
                "unexpected columns {:?}",
                row.columns()
            )));
        }
        Ok(Label(self.label))
    }

    fn estimate_probability(&self, _row: &FeatureRow) -> Result<Option<f64>, PredictorError> {
        if self.proba_error {
            return Err(PredictorError::Model("predict_proba is not available".into()));
        }
        Ok(self.proba.map(|p| p[1]))
    }
}

fn example_request() -> PredictionRequest {
    PredictionRequest {
        iq: 110,
        prev_sem_result: 8.0,
        cgpa: 8.5,
        academic_performance: 8,
        internship_experience: InternshipExperience::Yes,
        extra_curricular_score: 7,
        communication_skills: 8,
        projects_completed: 4,
    }
}

fn render(predictor: &dyn Predictor, row: &FeatureRow) -> Result<Outcome, FailureReport> {
    run_prediction(predictor, row)
        .map(|prediction| Outcome::from_prediction(&prediction))
        .map_err(|e| FailureReport::from_error(&e))
}

#[test]
fn test_end_to_end_positive_with_probability() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let row = assemble(&example_request());

    let expected = vec![
        ("IQ", Value::Int(110)),
        ("Prev_Sem_Result", Value::Float(8.0)),
        ("CGPA", Value::Float(8.5)),
        ("Academic_Performance", Value::Int(8)),
        ("Internship_Experience", Value::Text("Yes".into())),
        ("Extra_Curricular_Score", Value::Int(7)),
        ("Communication_Skills", Value::Int(8)),
        ("Projects_Completed", Value::Int(4)),
    ];
    let actual: Vec<(&str, Value)> = row.iter().map(|(c, v)| (c, v.clone())).collect();
    assert_eq!(actual, expected);

    let artifact = StubArtifact::new(1, Some([0.2, 0.8]));
    let outcome = render(&artifact, &row).map_err(|r| r.detail)?;
    assert_eq!(outcome.message, PLACED_MESSAGE);
    assert!(outcome.probability_line.as_deref().unwrap().ends_with("80.00%"));
    Ok(())
}

#[test]
fn test_every_in_range_request_has_eight_columns() {
    let requests = [
        PredictionRequest::default(),
        example_request(),
        PredictionRequest {
            iq: 40,
            prev_sem_result: 5.0,
            cgpa: 5.0,
            academic_performance: 1,
            internship_experience: InternshipExperience::No,
            extra_curricular_score: 1,
            communication_skills: 1,
            projects_completed: 0,
        },
        PredictionRequest {
            iq: 158,
            prev_sem_result: 10.0,
            cgpa: 10.0,
            academic_performance: 10,
            internship_experience: InternshipExperience::Yes,
            extra_curricular_score: 10,
            communication_skills: 10,
            projects_completed: 10,
        },
    ];
    for request in &requests {
        let row = assemble(request);
        assert_eq!(row.len(), 8);
        let columns: Vec<&str> = row.columns().iter().map(String::as_str).collect();
        assert_eq!(columns, FEATURE_COLUMNS);
        assert!(matches!(row.get("Prev_Sem_Result"), Some(Value::Float(_))));
        assert!(matches!(row.get("Internship_Experience"), Some(Value::Text(_))));
        assert!(matches!(row.get("Projects_Completed"), Some(Value::Int(_))));
    }
}

#[test]
fn test_negative_label_formats_negative_message() {
    let row = assemble(&PredictionRequest::default());
    for label in [0, 2, -1] {
        let artifact = StubArtifact::new(label, Some([0.9, 0.1]));
        let outcome = render(&artifact, &row).unwrap();
        assert_eq!(outcome.message, NOT_PLACED_MESSAGE);
    }
}

#[test]
fn test_classify_failure_never_shows_a_message() {
    init();
    let row = assemble(&example_request());
    let mut artifact = StubArtifact::new(1, Some([0.2, 0.8]));
    artifact.classify_error = true;

    let report = render(&artifact, &row).unwrap_err();
    assert_eq!(report.message, PREDICTION_FAILED);
    assert!(report.detail.contains("Schema mismatch"));
    assert!(!report.detail.contains(PLACED_MESSAGE));

    // The form stays usable: the next call goes through again.
    artifact.classify_error = false;
    assert!(render(&artifact, &row).is_ok());
    assert_eq!(artifact.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_probability_failure_or_absence_keeps_message() {
    let row = assemble(&example_request());

    let mut failing = StubArtifact::new(1, Some([0.2, 0.8]));
    failing.proba_error = true;
    let outcome = render(&failing, &row).unwrap();
    assert_eq!(outcome.message, PLACED_MESSAGE);
    assert!(outcome.probability_line.is_none());

    let absent = StubArtifact::new(0, None);
    let outcome = render(&absent, &row).unwrap();
    assert_eq!(outcome.message, NOT_PLACED_MESSAGE);
    assert!(outcome.probability_line.is_none());
}
