use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{DistributionFixture, TrendFixture};
use crate::roster::StudentId;

/// Students strictly below this percentage raise a low-attendance alert.
pub const LOW_ATTENDANCE_THRESHOLD: f64 = 75.0;

/// A student must attend 3 of every 4 held classes.
const REQUIRED_PARTS: i128 = 3;
const PARTS: i128 = 4;

/// Half-up rounding to one decimal: `Int(10*x + 0.5) / 10`.
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("class not found: {0}")]
    UnknownClass(String),

    #[error("totalClasses must not be negative")]
    NegativeTotal,

    #[error("presentClasses must be between 0 and totalClasses")]
    PresentOutOfRange,
}

impl CalcError {
    pub fn code(&self) -> &'static str {
        match self {
            CalcError::UnknownClass(_) => "not_found",
            CalcError::NegativeTotal | CalcError::PresentOutOfRange => "bad_params",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStudent {
    pub id: StudentId,
    pub name: String,
    pub attendance: u32,
    pub total_classes: u32,
    pub present_classes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub name: String,
    pub subject: String,
    pub students: Vec<ReportStudent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportScope {
    All,
    Class(String),
}

impl ReportScope {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => ReportScope::All,
            Some(s) if s.is_empty() || s.eq_ignore_ascii_case("all") => ReportScope::All,
            Some(s) => ReportScope::Class(s.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ReportScope::All => "all",
            ReportScope::Class(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Excellent,
    Good,
    Poor,
}

impl Band {
    pub fn label(self) -> &'static str {
        match self {
            Band::Excellent => "Excellent",
            Band::Good => "Good",
            Band::Poor => "Poor",
        }
    }

    pub fn color_token(self) -> &'static str {
        match self {
            Band::Excellent => "green",
            Band::Good => "amber",
            Band::Poor => "red",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            Band::Excellent => "#10b981",
            Band::Good => "#f59e0b",
            Band::Poor => "#ef4444",
        }
    }
}

pub fn attendance_band(percent: f64) -> Band {
    if percent >= 90.0 {
        Band::Excellent
    } else if percent >= LOW_ATTENDANCE_THRESHOLD {
        Band::Good
    } else {
        Band::Poor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandView {
    pub label: &'static str,
    pub color: &'static str,
    pub hex: &'static str,
}

impl From<Band> for BandView {
    fn from(b: Band) -> Self {
        Self {
            label: b.label(),
            color: b.color_token(),
            hex: b.hex(),
        }
    }
}

/// Status column of the exported sheet.
pub fn export_status(percent: f64) -> &'static str {
    if percent >= LOW_ATTENDANCE_THRESHOLD {
        "Good"
    } else {
        "Low"
    }
}

pub fn is_low_attendance(percent: f64) -> bool {
    percent < LOW_ATTENDANCE_THRESHOLD
}

/// Classes a student still has to attend to reach 75%. Clamped at zero.
///
/// Integer arithmetic throughout, so any `i64` input gets an exact answer.
pub fn classes_needed(total_classes: i64, present_classes: i64) -> Result<u64, CalcError> {
    if total_classes < 0 {
        return Err(CalcError::NegativeTotal);
    }
    if present_classes < 0 || present_classes > total_classes {
        return Err(CalcError::PresentOutOfRange);
    }
    // ceil(total * 3/4 - present) == ceil((3 * total - 4 * present) / 4)
    let shortfall = REQUIRED_PARTS * total_classes as i128 - PARTS * present_classes as i128;
    if shortfall <= 0 {
        return Ok(0);
    }
    let needed = (shortfall + PARTS - 1) / PARTS;
    // At most 3/4 of i64::MAX.
    Ok(needed as u64)
}

pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAggregate {
    pub class_name: String,
    pub subject: String,
    /// Rounded for display.
    pub average_attendance: f64,
    pub student_count: usize,
    pub below_threshold: bool,
    pub band: BandView,
    /// Finer five-step colour the reports screen paints class averages with.
    pub average_color: &'static str,
    pub icon: &'static str,
}

pub fn average_color(percent: f64) -> &'static str {
    if percent >= 90.0 {
        "#26DE81"
    } else if percent >= 80.0 {
        "#FEA47F"
    } else if percent >= LOW_ATTENDANCE_THRESHOLD {
        "#FF9F43"
    } else if percent >= 65.0 {
        "#FF8E53"
    } else {
        "#FF6B6B"
    }
}

pub fn average_icon(percent: f64) -> &'static str {
    if percent >= 90.0 {
        "📈"
    } else if percent >= 80.0 {
        "📊"
    } else {
        "📉"
    }
}

pub fn class_aggregate(class: &ClassRecord) -> ClassAggregate {
    let raw = mean(class.students.iter().map(|s| s.attendance as f64));
    ClassAggregate {
        class_name: class.name.clone(),
        subject: class.subject.clone(),
        average_attendance: round_off_1_decimal(raw),
        student_count: class.students.len(),
        below_threshold: is_low_attendance(raw),
        band: attendance_band(raw).into(),
        average_color: average_color(raw),
        icon: average_icon(raw),
    }
}

pub fn class_averages(classes: &[ClassRecord]) -> Vec<ClassAggregate> {
    classes.iter().map(class_aggregate).collect()
}

pub fn find_class<'a>(
    classes: &'a [ClassRecord],
    name: &str,
) -> Result<&'a ClassRecord, CalcError> {
    classes
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| CalcError::UnknownClass(name.to_string()))
}

/// Classes the scope covers, in class-book order.
pub fn scoped_classes<'a>(
    classes: &'a [ClassRecord],
    scope: &ReportScope,
) -> Result<Vec<&'a ClassRecord>, CalcError> {
    match scope {
        ReportScope::All => Ok(classes.iter().collect()),
        ReportScope::Class(name) => Ok(vec![find_class(classes, name)?]),
    }
}

/// Entries strictly below `threshold`, in input order.
pub fn low_attendance(students: &[ReportStudent], threshold: f64) -> Vec<&ReportStudent> {
    students
        .iter()
        .filter(|s| (s.attendance as f64) < threshold)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowAttendanceAlert {
    pub id: StudentId,
    pub name: String,
    pub attendance: u32,
    #[serde(rename = "class")]
    pub class_name: String,
    pub subject: String,
}

pub fn low_attendance_alerts(
    classes: &[ClassRecord],
    scope: &ReportScope,
) -> Result<Vec<LowAttendanceAlert>, CalcError> {
    let mut alerts = Vec::new();
    for class in scoped_classes(classes, scope)? {
        for s in low_attendance(&class.students, LOW_ATTENDANCE_THRESHOLD) {
            alerts.push(LowAttendanceAlert {
                id: s.id,
                name: s.name.clone(),
                attendance: s.attendance,
                class_name: class.name.clone(),
                subject: class.subject.clone(),
            });
        }
    }
    Ok(alerts)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

pub fn monthly_trend(fixture: &TrendFixture, scope: &ReportScope) -> TrendSeries {
    let data = match scope {
        ReportScope::All => fixture.overall.clone(),
        ReportScope::Class(_) => fixture.per_class.clone(),
    };
    TrendSeries {
        labels: fixture.labels.clone(),
        data,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBucket {
    pub name: String,
    pub count: u32,
    pub color: String,
}

pub fn attendance_distribution(
    fixture: &DistributionFixture,
    scope: &ReportScope,
) -> Vec<DistributionBucket> {
    let counts = match scope {
        ReportScope::All => &fixture.overall,
        ReportScope::Class(_) => &fixture.per_class,
    };
    fixture
        .ranges
        .iter()
        .zip(fixture.colors.iter())
        .zip(counts.iter())
        .map(|((name, color), count)| DistributionBucket {
            name: name.clone(),
            count: *count,
            color: color.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassReport {
    pub class_name: String,
    pub subject: String,
    pub average: f64,
    pub students: Vec<ReportStudent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope")]
pub enum ReportModel {
    #[serde(rename = "all", rename_all = "camelCase")]
    Overall {
        class_averages: Vec<ClassAggregate>,
        low_attendance_students: Vec<LowAttendanceAlert>,
        monthly_trend: TrendSeries,
        attendance_distribution: Vec<DistributionBucket>,
    },
    #[serde(rename = "class", rename_all = "camelCase")]
    Class {
        class_data: ClassReport,
        low_attendance_students: Vec<LowAttendanceAlert>,
        monthly_trend: TrendSeries,
        attendance_distribution: Vec<DistributionBucket>,
    },
}

pub fn build_report(
    classes: &[ClassRecord],
    trend: &TrendFixture,
    distribution: &DistributionFixture,
    scope: &ReportScope,
) -> Result<ReportModel, CalcError> {
    let low = low_attendance_alerts(classes, scope)?;
    let monthly_trend = monthly_trend(trend, scope);
    let attendance_distribution = attendance_distribution(distribution, scope);
    match scope {
        ReportScope::All => Ok(ReportModel::Overall {
            class_averages: class_averages(classes),
            low_attendance_students: low,
            monthly_trend,
            attendance_distribution,
        }),
        ReportScope::Class(name) => {
            let class = find_class(classes, name)?;
            let agg = class_aggregate(class);
            Ok(ReportModel::Class {
                class_data: ClassReport {
                    class_name: class.name.clone(),
                    subject: class.subject.clone(),
                    average: agg.average_attendance,
                    students: class.students.clone(),
                },
                low_attendance_students: low,
                monthly_trend,
                attendance_distribution,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummaryRow {
    pub id: StudentId,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub subject: String,
    pub attendance: u32,
    pub present_classes: u32,
    pub total_classes: u32,
    pub band: BandView,
    pub status: &'static str,
    pub classes_needed: u64,
}

pub fn student_summary(
    classes: &[ClassRecord],
    scope: &ReportScope,
) -> Result<Vec<StudentSummaryRow>, CalcError> {
    let mut rows = Vec::new();
    for class in scoped_classes(classes, scope)? {
        for s in &class.students {
            let pct = s.attendance as f64;
            // Fixture rows are validated present <= total, so this cannot fail.
            let needed = classes_needed(s.total_classes as i64, s.present_classes as i64)?;
            rows.push(StudentSummaryRow {
                id: s.id,
                name: s.name.clone(),
                class_name: class.name.clone(),
                subject: class.subject.clone(),
                attendance: s.attendance,
                present_classes: s.present_classes,
                total_classes: s.total_classes,
                band: attendance_band(pct).into(),
                status: export_status(pct),
                classes_needed: needed,
            });
        }
    }
    Ok(rows)
}
