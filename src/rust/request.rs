use std::fmt;
use std::str::FromStr;

/// Whether the student completed an internship.
///
/// The pipeline was trained on the literal strings `"No"` and `"Yes"`, so this is
/// what ends up in the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InternshipExperience {
    #[default]
    No,
    Yes,
}

impl InternshipExperience {
    pub const ALL: [InternshipExperience; 2] = [InternshipExperience::No, InternshipExperience::Yes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::No => "No",
            Self::Yes => "Yes",
        }
    }
}

impl fmt::Display for InternshipExperience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InternshipExperience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "No" | "no" => Ok(Self::No),
            "Yes" | "yes" => Ok(Self::Yes),
            other => Err(format!("expected \"No\" or \"Yes\", got \"{}\"", other)),
        }
    }
}

/// Bounds and step for one numeric input widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange<T> {
    pub min: T,
    pub max: T,
    pub step: T,
}

pub const IQ_RANGE: FieldRange<i64> = FieldRange { min: 40, max: 158, step: 1 };
pub const PREV_SEM_RESULT_RANGE: FieldRange<f64> = FieldRange { min: 5.0, max: 10.0, step: 0.1 };
pub const CGPA_RANGE: FieldRange<f64> = FieldRange { min: 5.0, max: 10.0, step: 0.1 };
pub const ACADEMIC_PERFORMANCE_RANGE: FieldRange<i64> = FieldRange { min: 1, max: 10, step: 1 };
pub const EXTRA_CURRICULAR_SCORE_RANGE: FieldRange<i64> = FieldRange { min: 1, max: 10, step: 1 };
pub const COMMUNICATION_SKILLS_RANGE: FieldRange<i64> = FieldRange { min: 1, max: 10, step: 1 };
pub const PROJECTS_COMPLETED_RANGE: FieldRange<i64> = FieldRange { min: 0, max: 10, step: 1 };

/// One form submission.
///
/// Created fresh per submission and dropped once the result is rendered. The only
/// validation it ever gets is [`PredictionRequest::clamped`], mirroring what the
/// input widgets enforce.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub iq: i64,
    pub prev_sem_result: f64,
    pub cgpa: f64,
    pub academic_performance: i64,
    pub internship_experience: InternshipExperience,
    pub extra_curricular_score: i64,
    pub communication_skills: i64,
    pub projects_completed: i64,
}

impl Default for PredictionRequest {
    fn default() -> Self {
        Self {
            iq: 100,
            prev_sem_result: 7.0,
            cgpa: 7.0,
            academic_performance: 7,
            internship_experience: InternshipExperience::No,
            extra_curricular_score: 5,
            communication_skills: 7,
            projects_completed: 2,
        }
    }
}

impl PredictionRequest {
    /// Returns a copy with every numeric field clamped into its widget range.
    pub fn clamped(&self) -> Self {
        Self {
            iq: self.iq.clamp(IQ_RANGE.min, IQ_RANGE.max),
            prev_sem_result: clamp_float(self.prev_sem_result, PREV_SEM_RESULT_RANGE),
            cgpa: clamp_float(self.cgpa, CGPA_RANGE),
            academic_performance: self
                .academic_performance
                .clamp(ACADEMIC_PERFORMANCE_RANGE.min, ACADEMIC_PERFORMANCE_RANGE.max),
            internship_experience: self.internship_experience,
            extra_curricular_score: self
                .extra_curricular_score
                .clamp(EXTRA_CURRICULAR_SCORE_RANGE.min, EXTRA_CURRICULAR_SCORE_RANGE.max),
            communication_skills: self
                .communication_skills
                .clamp(COMMUNICATION_SKILLS_RANGE.min, COMMUNICATION_SKILLS_RANGE.max),
            projects_completed: self
                .projects_completed
                .clamp(PROJECTS_COMPLETED_RANGE.min, PROJECTS_COMPLETED_RANGE.max),
        }
    }
}

// NaN falls back to the lower bound, same as a widget that never accepted the input.
fn clamp_float(value: f64, range: FieldRange<f64>) -> f64 {
    if value.is_nan() {
        return range.min;
    }
    value.clamp(range.min, range.max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form() {
        let request = PredictionRequest::default();
        assert_eq!(request.iq, 100);
        assert_eq!(request.prev_sem_result, 7.0);
        assert_eq!(request.cgpa, 7.0);
        assert_eq!(request.academic_performance, 7);
        assert_eq!(request.internship_experience, InternshipExperience::No);
        assert_eq!(request.extra_curricular_score, 5);
        assert_eq!(request.communication_skills, 7);
        assert_eq!(request.projects_completed, 2);
    }

    #[test]
    fn test_clamped_pulls_values_into_range() {
        let request = PredictionRequest {
            iq: 200,
            prev_sem_result: 4.0,
            cgpa: f64::NAN,
            academic_performance: 0,
            internship_experience: InternshipExperience::Yes,
            extra_curricular_score: 11,
            communication_skills: -3,
            projects_completed: 42,
        }
        .clamped();

        assert_eq!(request.iq, 158);
        assert_eq!(request.prev_sem_result, 5.0);
        assert_eq!(request.cgpa, 5.0);
        assert_eq!(request.academic_performance, 1);
        assert_eq!(request.internship_experience, InternshipExperience::Yes);
        assert_eq!(request.extra_curricular_score, 10);
        assert_eq!(request.communication_skills, 1);
        assert_eq!(request.projects_completed, 10);
    }

    #[test]
    fn test_clamped_keeps_in_range_values() {
        let request = PredictionRequest::default();
        assert_eq!(request.clamped(), request);
    }

    #[test]
    fn test_internship_parsing() {
        assert_eq!("Yes".parse::<InternshipExperience>(), Ok(InternshipExperience::Yes));
        assert_eq!("no".parse::<InternshipExperience>(), Ok(InternshipExperience::No));
        assert!("maybe".parse::<InternshipExperience>().is_err());
        assert_eq!(InternshipExperience::Yes.to_string(), "Yes");
    }
}
