use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::grade::{Bracket, GradeScale};

/// Report settings, stored as a JSON object on disk:
/// ```json
/// {
///   "course": "CE 317",
///   "signature": "JH",
///   "meeting_threshold": 66.0,
///   "grade_scale": [
///     { "letter": "Pass", "low": 60, "high": 100 }
///   ]
/// }
/// ```
/// Every field is optional; `grade_scale` replaces the default brackets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub course: String,
    pub signature: String,
    /// Latest projections below this get a meeting offer when requested.
    pub meeting_threshold: f64,
    pub grade_scale: Option<Vec<Bracket>>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            course: "the course".to_string(),
            signature: "Your instructor".to_string(),
            meeting_threshold: 66.0,
            grade_scale: None,
        }
    }
}

impl ReportConfig {
    /// Loads the config from a JSON file at `path`, rejecting invalid scales.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.grade_scale()?;
        debug!(path, course = %config.course, "Report config loaded");
        Ok(config)
    }

    /// Loads from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Configured grade scale, or the default brackets.
    pub fn grade_scale(&self) -> Result<GradeScale> {
        match &self.grade_scale {
            Some(brackets) => Ok(GradeScale::new(brackets.clone())?),
            None => Ok(GradeScale::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let file = write_config(r#"{ "course": "CE 317" }"#);
        let config = ReportConfig::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.course, "CE 317");
        assert_eq!(config.meeting_threshold, 66.0);
        assert_eq!(config.grade_scale().unwrap(), GradeScale::default());
    }

    #[test]
    fn test_custom_scale() {
        let file = write_config(
            r#"{ "grade_scale": [
                { "letter": "Pass", "low": 60, "high": 100 }
            ] }"#,
        );
        let config = ReportConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.grade_scale().unwrap().letter_grade(75.0), "Pass");
    }

    #[test]
    fn test_overlapping_scale_rejected_at_load() {
        let file = write_config(
            r#"{ "grade_scale": [
                { "letter": "A", "low": 80, "high": 100 },
                { "letter": "B", "low": 70, "high": 85 }
            ] }"#,
        );
        let err = ReportConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::InvalidGradeScale(_))
        ));
    }

    #[test]
    fn test_no_path_means_defaults() {
        assert_eq!(
            ReportConfig::load_or_default(None).unwrap(),
            ReportConfig::default()
        );
    }
}
