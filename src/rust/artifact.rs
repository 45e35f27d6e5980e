use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use log::info;

use crate::predictor::{LinearPipeline, Predictor};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Pipeline file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse pipeline: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unsupported pipeline format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid pipeline: {0}")]
    Invalid(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Serialization formats an artifact can come in, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// `.json`: a [`LinearPipeline`]
    LinearJson,
    /// `.onnx`: an ONNX graph, only with the `onnx` feature
    Onnx,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::LinearJson),
            Some("onnx") => Ok(Self::Onnx),
            Some(other) => Err(ArtifactError::UnsupportedFormat(format!(
                "'.{}' (expected .json or .onnx)",
                other
            ))),
            None => Err(ArtifactError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
        }
    }
}

/// Reads and deserializes the predictor stored at `path`.
///
/// Only the artifact's own consistency is checked here. Whether it accepts the
/// form's columns is discovered on the first call.
pub fn load_predictor(path: &Path) -> Result<Arc<dyn Predictor>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }

    let format = ArtifactFormat::from_path(path)?;
    let start = Instant::now();
    let predictor: Arc<dyn Predictor> = match format {
        ArtifactFormat::LinearJson => {
            let reader = BufReader::new(File::open(path)?);
            let pipeline = LinearPipeline::from_reader(reader)?;
            pipeline.validate().map_err(ArtifactError::Invalid)?;
            Arc::new(pipeline)
        }
        ArtifactFormat::Onnx => load_onnx(path)?,
    };

    info!(
        "Loaded {} from {:?} in {:.2?}",
        predictor.describe(),
        path,
        start.elapsed()
    );
    Ok(predictor)
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path) -> Result<Arc<dyn Predictor>, ArtifactError> {
    let config = crate::runtime::RuntimeConfig::default();
    let pipeline = crate::predictor::OnnxPipeline::load(path, &config).map_err(ArtifactError::Runtime)?;
    Ok(Arc::new(pipeline))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_path: &Path) -> Result<Arc<dyn Predictor>, ArtifactError> {
    Err(ArtifactError::UnsupportedFormat(
        "'.onnx' artifacts need the `onnx` feature".to_string(),
    ))
}

/// Process-wide holder for the loaded predictor.
///
/// The first successful [`ArtifactCache::get_or_load`] reads the file; every later
/// call returns the same `Arc` without touching the filesystem. A failed load
/// leaves the cache empty so the next call tries again.
#[derive(Debug)]
pub struct ArtifactCache {
    path: PathBuf,
    predictor: OnceLock<Arc<dyn Predictor>>,
}

impl ArtifactCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            predictor: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.get().is_some()
    }

    /// Fails with [`ArtifactError::NotFound`] unless the artifact is already loaded
    /// or present on disk.
    pub fn ensure_present(&self) -> Result<(), ArtifactError> {
        if self.is_loaded() || self.path.exists() {
            Ok(())
        } else {
            Err(ArtifactError::NotFound(self.path.clone()))
        }
    }

    pub fn get_or_load(&self) -> Result<Arc<dyn Predictor>, ArtifactError> {
        if let Some(predictor) = self.predictor.get() {
            return Ok(Arc::clone(predictor));
        }
        let loaded = load_predictor(&self.path)?;
        // Two racing loads of the same file are equivalent; whichever lands first wins.
        Ok(Arc::clone(self.predictor.get_or_init(|| loaded)))
    }
}
