//! Fixture data every screen is seeded from.
//!
//! The built-in defaults reproduce the mock data the screens ship with. A JSON
//! file can replace any section; omitted sections keep their defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calc::{ClassRecord, ReportStudent};
use crate::roster::Student;

/// Env var naming a fixture file to load at startup.
pub const FIXTURES_ENV: &str = "ATTENDANCED_FIXTURES";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read fixture file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("fixture validation failed: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendFixture {
    pub labels: Vec<String>,
    pub overall: Vec<f64>,
    pub per_class: Vec<f64>,
}

impl Default for TrendFixture {
    fn default() -> Self {
        Self {
            labels: ["Jan", "Feb", "Mar", "Apr", "May", "Jun"]
                .into_iter()
                .map(String::from)
                .collect(),
            overall: vec![80.0, 83.0, 86.0, 84.0, 88.0, 86.0],
            per_class: vec![78.0, 82.0, 85.0, 83.0, 87.0, 85.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionFixture {
    pub ranges: Vec<String>,
    pub colors: Vec<String>,
    pub overall: Vec<u32>,
    pub per_class: Vec<u32>,
}

impl Default for DistributionFixture {
    fn default() -> Self {
        Self {
            ranges: ["0-50%", "51-65%", "66-75%", "76-85%", "86-95%", "96-100%"]
                .into_iter()
                .map(String::from)
                .collect(),
            colors: ["#FF6B6B", "#FF8E53", "#FF9F43", "#FEA47F", "#26DE81", "#4834D4"]
                .into_iter()
                .map(String::from)
                .collect(),
            overall: vec![5, 12, 18, 30, 25, 10],
            per_class: vec![2, 8, 15, 25, 35, 15],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub action: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixtures {
    /// Class chips offered by the roster and marking screens.
    pub classes: Vec<String>,
    pub roster: Vec<Student>,
    /// Per-class attendance history the reports screen aggregates.
    pub class_book: Vec<ClassRecord>,
    pub trend: TrendFixture,
    pub distribution: DistributionFixture,
    pub recent_activity: Vec<ActivityItem>,
}

fn student(id: u32, name: &str, roll_no: &str, class_name: &str, pct: u32) -> Student {
    Student {
        id,
        name: name.to_string(),
        roll_no: roll_no.to_string(),
        class_name: class_name.to_string(),
        attendance_percent: pct,
    }
}

fn history(id: u32, name: &str, attendance: u32, total: u32, present: u32) -> ReportStudent {
    ReportStudent {
        id,
        name: name.to_string(),
        attendance,
        total_classes: total,
        present_classes: present,
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            classes: ["10A", "10B", "9A", "9B", "8A", "8B"]
                .into_iter()
                .map(String::from)
                .collect(),
            roster: vec![
                student(1, "John Doe", "001", "10A", 92),
                student(2, "Jane Smith", "002", "10A", 88),
                student(3, "Mike Johnson", "003", "10B", 76),
                student(4, "Sarah Wilson", "004", "9A", 94),
                student(5, "David Brown", "005", "9B", 68),
                student(6, "Emily Davis", "006", "10A", 85),
            ],
            class_book: vec![
                ClassRecord {
                    name: "Class 10A".to_string(),
                    subject: "Mathematics".to_string(),
                    students: vec![
                        history(1, "John Doe", 85, 100, 85),
                        history(2, "Jane Smith", 92, 100, 92),
                        history(3, "Mike Johnson", 68, 100, 68),
                        history(4, "Sarah Wilson", 78, 100, 78),
                        history(5, "David Brown", 95, 100, 95),
                    ],
                },
                ClassRecord {
                    name: "Class 10B".to_string(),
                    subject: "Science".to_string(),
                    students: vec![
                        history(6, "Emily Davis", 88, 95, 84),
                        history(7, "Tom Wilson", 72, 95, 68),
                        history(8, "Lisa Anderson", 91, 95, 86),
                        history(9, "Chris Taylor", 65, 95, 62),
                        history(10, "Anna Martinez", 89, 95, 85),
                    ],
                },
                ClassRecord {
                    name: "Class 9A".to_string(),
                    subject: "English".to_string(),
                    students: vec![
                        history(11, "Ryan Clark", 76, 90, 68),
                        history(12, "Maya Patel", 94, 90, 85),
                        history(13, "Alex Kim", 82, 90, 74),
                        history(14, "Sophie Lee", 87, 90, 78),
                        history(15, "Jake Miller", 69, 90, 62),
                    ],
                },
            ],
            trend: TrendFixture::default(),
            distribution: DistributionFixture::default(),
            recent_activity: vec![
                ActivityItem {
                    action: "Marked attendance for Class 10A".to_string(),
                    time: "10:30 AM".to_string(),
                },
                ActivityItem {
                    action: "Added new student - John Doe".to_string(),
                    time: "09:15 AM".to_string(),
                },
                ActivityItem {
                    action: "Generated monthly report".to_string(),
                    time: "08:45 AM".to_string(),
                },
                ActivityItem {
                    action: "Updated Class 9B attendance".to_string(),
                    time: "08:20 AM".to_string(),
                },
            ],
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        message: message.into(),
    }
}

impl Fixtures {
    /// Reads and validates a fixture file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let fixtures: Fixtures =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        fixtures.validate()?;
        Ok(fixtures)
    }

    /// Loads the file named by `ATTENDANCED_FIXTURES`, or the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(FIXTURES_ENV) {
            Some(p) if !p.is_empty() => Self::load(Path::new(&p)),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.classes.is_empty() {
            return Err(invalid("at least one class must be listed"));
        }

        let mut seen = HashSet::new();
        for s in &self.roster {
            if !seen.insert(s.id) {
                return Err(invalid(format!("duplicate roster id {}", s.id)));
            }
            if s.attendance_percent > 100 {
                return Err(invalid(format!(
                    "roster student {} has attendance {} above 100",
                    s.id, s.attendance_percent
                )));
            }
        }

        let mut class_names = HashSet::new();
        for class in &self.class_book {
            if !class_names.insert(class.name.as_str()) {
                return Err(invalid(format!("duplicate class '{}'", class.name)));
            }
            for s in &class.students {
                if s.attendance > 100 {
                    return Err(invalid(format!(
                        "student {} in '{}' has attendance {} above 100",
                        s.id, class.name, s.attendance
                    )));
                }
                if s.present_classes > s.total_classes {
                    return Err(invalid(format!(
                        "student {} in '{}' has more present than total classes",
                        s.id, class.name
                    )));
                }
            }
        }

        let t = &self.trend;
        if t.overall.len() != t.labels.len() || t.per_class.len() != t.labels.len() {
            return Err(invalid("trend series must have one value per label"));
        }

        let d = &self.distribution;
        if d.colors.len() != d.ranges.len()
            || d.overall.len() != d.ranges.len()
            || d.per_class.len() != d.ranges.len()
        {
            return Err(invalid("distribution colors and counts must align with ranges"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        Fixtures::default().validate().expect("defaults validate");
    }

    #[test]
    fn partial_file_keeps_default_sections() {
        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        let body = serde_json::json!({
            "classes": ["Class A", "Class B"],
            "roster": [
                {
                    "id": 9,
                    "name": "Zoe",
                    "rollNo": "009",
                    "class": "Class A",
                    "attendancePercent": 71
                }
            ]
        });
        write!(f, "{}", body).expect("write");
        let fx = Fixtures::load(f.path()).expect("load");
        assert_eq!(fx.classes, vec!["Class A", "Class B"]);
        assert_eq!(fx.roster.len(), 1);
        assert_eq!(fx.roster[0].class_name, "Class A");
        assert_eq!(fx.class_book, Fixtures::default().class_book);
    }

    #[test]
    fn misaligned_trend_is_rejected() {
        let mut fx = Fixtures::default();
        fx.trend.overall.pop();
        assert!(matches!(
            fx.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn present_above_total_is_rejected() {
        let mut fx = Fixtures::default();
        fx.class_book[0].students[0].present_classes = 101;
        assert!(fx.validate().is_err());
    }

    #[test]
    fn unreadable_and_malformed_files_report_their_path() {
        let missing = Path::new("/definitely/not/here.json");
        assert!(matches!(
            Fixtures::load(missing),
            Err(ConfigError::ReadError { .. })
        ));

        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        write!(f, "{{ not json").expect("write");
        let e = Fixtures::load(f.path()).unwrap_err();
        assert!(e.to_string().contains(&f.path().display().to_string()));
    }
}
