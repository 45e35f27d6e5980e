use std::fmt;

use crate::request::PredictionRequest;

/// Column names in the exact order the trained pipeline expects them.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "IQ",
    "Prev_Sem_Result",
    "CGPA",
    "Academic_Performance",
    "Internship_Experience",
    "Extra_Curricular_Score",
    "Communication_Skills",
    "Projects_Completed",
];

/// A single typed cell of a [`FeatureRow`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the cell, `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int64",
            Self::Float(_) => "float64",
            Self::Text(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            // Debug keeps the trailing ".0" so floats still read as floats.
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The single-record table handed to the predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl FeatureRow {
    /// Builds a row from arbitrary `(column, value)` pairs.
    ///
    /// Mostly useful for tests and for feeding a predictor something other than
    /// the form schema; form submissions go through [`assemble`].
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let (columns, values) = cells
            .into_iter()
            .map(|(column, value)| (column.into(), value))
            .unzip();
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    /// One `(column, rendered value)` pair per cell, i.e. the row turned on its side
    /// for the input summary table.
    pub fn transposed(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect()
    }
}

/// Turns a form submission into the row the pipeline consumes.
///
/// Every field is coerced to its declared type; nothing is validated.
pub fn assemble(request: &PredictionRequest) -> FeatureRow {
    let values = vec![
        Value::Int(request.iq),
        Value::Float(request.prev_sem_result),
        Value::Float(request.cgpa),
        Value::Int(request.academic_performance),
        Value::Text(request.internship_experience.as_str().to_string()),
        Value::Int(request.extra_curricular_score),
        Value::Int(request.communication_skills),
        Value::Int(request.projects_completed),
    ];
    FeatureRow::from_cells(FEATURE_COLUMNS.iter().copied().zip(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::InternshipExperience;

    fn sample_request() -> PredictionRequest {
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

    #[test]
    fn test_assemble_fixed_columns() {
        let row = assemble(&sample_request());
        assert_eq!(row.len(), 8);
        let columns: Vec<&str> = row.columns().iter().map(String::as_str).collect();
        assert_eq!(columns, FEATURE_COLUMNS);
    }

    #[test]
    fn test_assemble_types_and_values() {
        let row = assemble(&sample_request());
        assert_eq!(
            row.values(),
            &[
                Value::Int(110),
                Value::Float(8.0),
                Value::Float(8.5),
                Value::Int(8),
                Value::Text("Yes".into()),
                Value::Int(7),
                Value::Int(8),
                Value::Int(4),
            ]
        );
    }

    #[test]
    fn test_get_by_column() {
        let row = assemble(&PredictionRequest::default());
        assert_eq!(row.get("IQ"), Some(&Value::Int(100)));
        assert_eq!(row.get("Internship_Experience"), Some(&Value::Text("No".into())));
        assert!(row.get("Salary").is_none());
    }

    #[test]
    fn test_transposed_renders_values() {
        let row = assemble(&sample_request());
        let table = row.transposed();
        assert_eq!(table[0], ("IQ".to_string(), "110".to_string()));
        assert_eq!(table[1], ("Prev_Sem_Result".to_string(), "8.0".to_string()));
        assert_eq!(table[2], ("CGPA".to_string(), "8.5".to_string()));
        assert_eq!(table[4], ("Internship_Experience".to_string(), "Yes".to_string()));
    }

    #[test]
    fn test_value_views() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Text("No".into()).as_f64(), None);
        assert_eq!(Value::Text("No".into()).as_str(), Some("No"));
        assert_eq!(Value::Float(1.5).type_name(), "float64");
    }
}
