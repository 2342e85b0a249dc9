use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::roster::{is_all_classes, Student, StudentId, ALL_CLASSES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkStatus {
    Unmarked,
    Present,
    Absent,
}

impl MarkStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unmarked" => Some(MarkStatus::Unmarked),
            "present" => Some(MarkStatus::Present),
            "absent" => Some(MarkStatus::Absent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MarkStatus::Unmarked => "unmarked",
            MarkStatus::Present => "present",
            MarkStatus::Absent => "absent",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("status must be present or absent")]
    UnmarkedNotSettable,

    #[error("date must not be empty")]
    EmptyDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRow {
    pub student_id: StudentId,
    pub name: String,
    pub roll_no: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub status: MarkStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkCounts {
    pub present: usize,
    pub absent: usize,
    pub unmarked: usize,
}

impl MarkCounts {
    fn tally<'a>(rows: impl Iterator<Item = &'a SessionRow>) -> Self {
        let mut counts = MarkCounts::default();
        for row in rows {
            match row.status {
                MarkStatus::Present => counts.present += 1,
                MarkStatus::Absent => counts.absent += 1,
                MarkStatus::Unmarked => counts.unmarked += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounts {
    pub visible: MarkCounts,
    pub total: MarkCounts,
}

/// Marks for one calendar date. Rows are a snapshot of the roster taken when
/// the session starts; the roster's long-term percentages are never touched.
#[derive(Debug, Clone)]
pub struct AttendanceSession {
    id: Uuid,
    date: String,
    class_filter: String,
    rows: Vec<SessionRow>,
}

impl AttendanceSession {
    pub fn start(roster: &[Student], date: impl Into<String>) -> Self {
        let rows = roster
            .iter()
            .map(|s| SessionRow {
                student_id: s.id,
                name: s.name.clone(),
                roll_no: s.roll_no.clone(),
                class_name: s.class_name.clone(),
                status: MarkStatus::Unmarked,
            })
            .collect();
        Self {
            id: Uuid::new_v4(),
            date: date.into(),
            class_filter: ALL_CLASSES.to_string(),
            rows,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn class_filter(&self) -> &str {
        &self.class_filter
    }

    /// Moving to another date starts that day's marks from scratch.
    pub fn set_date(&mut self, date: &str) -> Result<(), SessionError> {
        let t = date.trim();
        if t.is_empty() {
            return Err(SessionError::EmptyDate);
        }
        if t != self.date {
            self.date = t.to_string();
            for row in &mut self.rows {
                row.status = MarkStatus::Unmarked;
            }
        }
        Ok(())
    }

    pub fn set_class_filter(&mut self, class_filter: &str) {
        self.class_filter = if is_all_classes(class_filter) {
            ALL_CLASSES.to_string()
        } else {
            class_filter.trim().to_string()
        };
    }

    fn is_visible(&self, row: &SessionRow) -> bool {
        is_all_classes(&self.class_filter) || row.class_name == self.class_filter
    }

    pub fn visible(&self) -> impl Iterator<Item = &SessionRow> {
        self.rows.iter().filter(move |r| self.is_visible(r))
    }

    pub fn status_of(&self, id: StudentId) -> Option<MarkStatus> {
        self.rows.iter().find(|r| r.student_id == id).map(|r| r.status)
    }

    /// Returns `Ok(false)` and leaves every mark alone when `id` is not in
    /// the session.
    pub fn set_status(&mut self, id: StudentId, status: MarkStatus) -> Result<bool, SessionError> {
        if status == MarkStatus::Unmarked {
            return Err(SessionError::UnmarkedNotSettable);
        }
        match self.rows.iter_mut().find(|r| r.student_id == id) {
            Some(row) => {
                row.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Overwrites every visible row, including rows already marked. With no
    /// class filter that is the whole session.
    pub fn mark_all(&mut self, status: MarkStatus) -> Result<usize, SessionError> {
        if status == MarkStatus::Unmarked {
            return Err(SessionError::UnmarkedNotSettable);
        }
        let all = is_all_classes(&self.class_filter);
        let mut marked = 0usize;
        for row in &mut self.rows {
            if all || row.class_name == self.class_filter {
                row.status = status;
                marked += 1;
            }
        }
        Ok(marked)
    }

    pub fn counts(&self) -> SessionCounts {
        SessionCounts {
            visible: MarkCounts::tally(self.visible()),
            total: MarkCounts::tally(self.rows.iter()),
        }
    }
}
