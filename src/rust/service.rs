use log::error;

use crate::artifact::{ArtifactCache, ArtifactError};
use crate::config::AppConfig;
use crate::inference::run_prediction;
use crate::report::{FailureReport, Outcome};
use crate::request::PredictionRequest;
use crate::row::{assemble, FeatureRow};

/// The result of one form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// The row that was sent to the predictor, for the input summary
    pub row: FeatureRow,
    pub result: Result<Outcome, FailureReport>,
}

/// Load-check → assemble → infer → format, around a single cached artifact.
#[derive(Debug)]
pub struct PlacementService {
    cache: ArtifactCache,
}

impl PlacementService {
    /// Opens the service, loading the artifact up front.
    ///
    /// A missing or unreadable artifact is fatal: nothing below the error should be
    /// shown, so callers stop here.
    pub fn open(config: &AppConfig) -> Result<Self, ArtifactError> {
        let cache = ArtifactCache::new(&config.model_path);
        cache.ensure_present()?;
        cache.get_or_load()?;
        Ok(Self { cache })
    }

    /// Runs one submission. Never fails: inference errors come back as a
    /// [`FailureReport`] so the form can be retried.
    pub fn submit(&self, request: &PredictionRequest) -> Submission {
        let row = assemble(&request.clamped());

        let result = match self.cache.get_or_load() {
            Ok(predictor) => run_prediction(predictor.as_ref(), &row)
                .map(|prediction| Outcome::from_prediction(&prediction))
                .map_err(|e| {
                    error!("Prediction failed: {}", e);
                    FailureReport::from_error(&e)
                }),
            Err(e) => {
                error!("Pipeline {:?} unavailable: {}", self.cache.path(), e);
                Err(FailureReport::from_error(&e))
            }
        };

        Submission { row, result }
    }
}

/// The blocking message shown when the artifact is missing.
pub fn missing_artifact_message(err: &ArtifactError) -> String {
    match err {
        ArtifactError::NotFound(path) => format!(
            "Pipeline dosyası bulunamadı: {}",
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        ),
        other => format!("Pipeline yüklenemedi: {}", other),
    }
}
