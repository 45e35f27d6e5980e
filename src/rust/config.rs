use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the artifact location.
pub const MODEL_PATH_ENV: &str = "PLACEMENT_MODEL";

/// Where the trained pipeline lives when nothing else is configured.
pub const DEFAULT_MODEL_PATH: &str = "model/pipe.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
}

impl AppConfig {
    /// Resolves the configuration: an explicit path wins, then the environment,
    /// then [`DEFAULT_MODEL_PATH`].
    pub fn resolve(model_path: Option<&Path>) -> Self {
        let model_path = model_path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_model_path);
        Self { model_path }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}

pub fn default_model_path() -> PathBuf {
    match env::var(MODEL_PATH_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_MODEL_PATH),
    }
}
