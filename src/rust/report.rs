use std::error::Error;

use crate::inference::Prediction;
use crate::predictor::Label;

pub const PLACED_MESSAGE: &str = "✅ Yerleştirildi (Placed)";
pub const NOT_PLACED_MESSAGE: &str = "❌ Yerleştirilmedi (Not Placed)";
pub const PREDICTION_SUCCEEDED: &str = "Tahmin Başarılı";
pub const PREDICTION_FAILED: &str = "Tahmin sırasında bir hata oluştu. Ayrıntı için aşağıya bakın.";
pub const PROBABILITY_PREFIX: &str = "Yerleştirilme Olasılığı";

/// Bilingual message for a label. Only `1` counts as placed.
pub fn format_placement_result(label: Label) -> &'static str {
    if label.is_placed() {
        PLACED_MESSAGE
    } else {
        NOT_PLACED_MESSAGE
    }
}

/// Formats a probability in `[0, 1]` as a percentage with two decimals.
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Success,
    Warning,
}

/// Everything the results area shows after a successful prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub banner: Banner,
    pub message: &'static str,
    pub probability_line: Option<String>,
}

impl Outcome {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let banner = if prediction.label.is_placed() {
            Banner::Success
        } else {
            Banner::Warning
        };
        Self {
            banner,
            message: format_placement_result(prediction.label),
            probability_line: prediction
                .probability
                .map(|p| format!("{}: {}", PROBABILITY_PREFIX, format_probability(p))),
        }
    }

    /// Banner text with the decoration the form puts in front of it.
    pub fn banner_text(&self) -> String {
        match self.banner {
            Banner::Success => format!("🎉 {}", self.message),
            Banner::Warning => format!("⚠️ {}", self.message),
        }
    }
}

/// What the results area shows when inference fails: a generic line plus the
/// full error detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub message: &'static str,
    pub detail: String,
}

impl FailureReport {
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut detail = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            detail.push_str(&format!("\n  caused by: {}", cause));
            source = cause.source();
        }
        Self {
            message: PREDICTION_FAILED,
            detail,
        }
    }
}
