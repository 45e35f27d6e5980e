use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;

/// ONNX Runtime settings used when opening an `.onnx` artifact.
#[derive(Debug)]
pub struct RuntimeConfig {
    pub inter_threads: usize,
    pub intra_threads: usize,
    pub optimization_level: GraphOptimizationLevel,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inter_threads: 0, // Let ONNX Runtime decide
            intra_threads: 1, // One row per call
            optimization_level: GraphOptimizationLevel::Level3,
        }
    }
}

impl Clone for RuntimeConfig {
    fn clone(&self) -> Self {
        Self {
            inter_threads: self.inter_threads,
            intra_threads: self.intra_threads,
            optimization_level: copy_level(&self.optimization_level),
        }
    }
}

fn copy_level(level: &GraphOptimizationLevel) -> GraphOptimizationLevel {
    match level {
        GraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
        GraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
        GraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
        GraphOptimizationLevel::Disable => GraphOptimizationLevel::Disable,
    }
}

pub fn create_session_builder(config: &RuntimeConfig) -> Result<SessionBuilder, String> {
    let mut builder = Session::builder().map_err(|e| e.to_string())?;

    if config.inter_threads > 0 {
        builder = builder
            .with_inter_threads(config.inter_threads)
            .map_err(|e| e.to_string())?;
    }
    if config.intra_threads > 0 {
        builder = builder
            .with_intra_threads(config.intra_threads)
            .map_err(|e| e.to_string())?;
    }

    builder = builder
        .with_optimization_level(copy_level(&config.optimization_level))
        .map_err(|e| e.to_string())?;

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_builder_config() {
        let config = RuntimeConfig {
            inter_threads: 2,
            intra_threads: 2,
            optimization_level: GraphOptimizationLevel::Level1,
        };
        assert!(create_session_builder(&config).is_ok());
    }

    #[test]
    fn test_clone_keeps_level() {
        let config = RuntimeConfig::default();
        let cloned = config.clone();
        assert_eq!(cloned.intra_threads, 1);
        assert!(matches!(cloned.optimization_level, GraphOptimizationLevel::Level3));
    }
}
