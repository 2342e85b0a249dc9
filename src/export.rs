use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::calc::{export_status, scoped_classes, CalcError, ClassRecord, ReportScope};

pub const EXPORT_HEADER: &str =
    "Student Name,Class,Subject,Attendance %,Present Classes,Total Classes,Status";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    #[error("share target rejected the payload: {0}")]
    Rejected(String),

    #[error("share target unavailable")]
    Unavailable,
}

/// Platform share capability the export hands its text to.
pub trait ShareText {
    fn share_text(&mut self, content: &str, title: &str) -> Result<(), ShareError>;
}

/// Default capability: the host process performs the platform share with the
/// payload returned in the response, so accepting here never blocks.
#[derive(Debug, Default)]
pub struct HostShare;

impl ShareText for HostShare {
    fn share_text(&mut self, _content: &str, title: &str) -> Result<(), ShareError> {
        tracing::debug!(title, "payload handed to host share");
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error("Failed to export report")]
    Share(#[source] ShareError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub title: String,
    pub content: String,
    pub rows: usize,
}

pub fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Header plus one row per student, class-then-roster order.
pub fn build_csv(
    classes: &[ClassRecord],
    scope: &ReportScope,
) -> Result<(String, usize), CalcError> {
    let mut csv = String::from(EXPORT_HEADER);
    csv.push('\n');
    let mut rows = 0usize;
    for class in scoped_classes(classes, scope)? {
        for s in &class.students {
            csv.push_str(&format!(
                "{},{},{},{}%,{},{},{}\n",
                csv_quote(&s.name),
                csv_quote(&class.name),
                csv_quote(&class.subject),
                s.attendance,
                s.present_classes,
                s.total_classes,
                export_status(s.attendance as f64)
            ));
            rows += 1;
        }
    }
    Ok((csv, rows))
}

pub fn export_title(scope: &ReportScope, date: NaiveDate) -> String {
    format!(
        "Attendance Report - {} - {}",
        scope.label(),
        date.format("%Y-%m-%d")
    )
}

/// Builds the sheet and hands it to `sink`. Share failures are not retried.
pub fn share_report(
    sink: &mut dyn ShareText,
    classes: &[ClassRecord],
    scope: &ReportScope,
    date: NaiveDate,
) -> Result<ExportPayload, ExportError> {
    let (content, rows) = build_csv(classes, scope)?;
    let title = export_title(scope, date);
    sink.share_text(&content, &title).map_err(ExportError::Share)?;
    Ok(ExportPayload {
        title,
        content,
        rows,
    })
}
