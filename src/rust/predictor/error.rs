/// Represents the different ways a call into a loaded predictor can fail.
#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    /// The row's columns do not line up with what the artifact was trained on
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
    /// A cell has a type or value the artifact cannot encode
    #[error("Invalid value for column '{column}': {reason}")]
    InvalidValue { column: String, reason: String },
    /// The underlying model failed while running
    #[error("Model error: {0}")]
    Model(String),
    /// The model ran but produced something other than the expected shape
    #[error("Unexpected model output: {0}")]
    Output(String),
    /// The runtime could not get the memory or threads it needed
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),
}

impl PredictorError {
    /// Whether a failed probability estimate may be dropped silently.
    /// Everything except resource exhaustion is.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ResourceExhausted(_))
    }
}

