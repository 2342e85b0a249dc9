use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type StudentId = u32;

/// Class-chip label that disables class filtering.
pub const ALL_CLASSES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub roll_no: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub attendance_percent: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("student {0} not found")]
    NotFound(StudentId),

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("attendance percent must be between 0 and 100, got {0}")]
    PercentOutOfRange(u32),

    #[error("no student id left above {0}")]
    IdSpaceExhausted(StudentId),
}

#[derive(Debug, Clone, Default)]
pub struct NewStudent {
    pub name: String,
    pub roll_no: String,
    pub class_name: String,
    pub attendance_percent: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub roll_no: Option<String>,
    pub class_name: Option<String>,
    pub attendance_percent: Option<u32>,
}

/// `All`, `All Classes` and the empty string all mean "no class filter".
pub fn is_all_classes(filter: &str) -> bool {
    let t = filter.trim();
    t.is_empty() || t.eq_ignore_ascii_case("all") || t.eq_ignore_ascii_case("all classes")
}

fn matches_query(student: &Student, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    student.name.to_lowercase().contains(&query.to_lowercase()) || student.roll_no.contains(query)
}

/// Stable filter: the result keeps roster order.
pub fn filter<'a>(students: &'a [Student], query: &str, class_filter: &str) -> Vec<&'a Student> {
    let all = is_all_classes(class_filter);
    let class_filter = class_filter.trim();
    students
        .iter()
        .filter(|s| matches_query(s, query))
        .filter(|s| all || s.class_name == class_filter)
        .collect()
}

fn non_empty(value: &str, field: &'static str) -> Result<String, RosterError> {
    let t = value.trim();
    if t.is_empty() {
        return Err(RosterError::EmptyField { field });
    }
    Ok(t.to_string())
}

fn check_percent(p: u32) -> Result<u32, RosterError> {
    if p > 100 {
        return Err(RosterError::PercentOutOfRange(p));
    }
    Ok(p)
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn new(students: Vec<Student>) -> Self {
        Self { students }
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn filter(&self, query: &str, class_filter: &str) -> Vec<&Student> {
        filter(&self.students, query, class_filter)
    }

    fn next_id(&self) -> Result<StudentId, RosterError> {
        let max = self.students.iter().map(|s| s.id).max().unwrap_or(0);
        max.checked_add(1).ok_or(RosterError::IdSpaceExhausted(max))
    }

    /// Appends a student; ids are never reused since deletion is unsupported.
    pub fn add(&mut self, new: NewStudent) -> Result<&Student, RosterError> {
        let student = Student {
            id: self.next_id()?,
            name: non_empty(&new.name, "name")?,
            roll_no: new.roll_no.trim().to_string(),
            class_name: non_empty(&new.class_name, "class")?,
            attendance_percent: check_percent(new.attendance_percent.unwrap_or(0))?,
        };
        self.students.push(student);
        let idx = self.students.len() - 1;
        Ok(&self.students[idx])
    }

    /// Replaces the record with a patched copy, keeping its position.
    pub fn update(&mut self, id: StudentId, patch: StudentPatch) -> Result<&Student, RosterError> {
        let idx = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or(RosterError::NotFound(id))?;
        let current = &self.students[idx];
        let updated = Student {
            id,
            name: match patch.name {
                Some(n) => non_empty(&n, "name")?,
                None => current.name.clone(),
            },
            roll_no: patch
                .roll_no
                .map(|r| r.trim().to_string())
                .unwrap_or_else(|| current.roll_no.clone()),
            class_name: match patch.class_name {
                Some(c) => non_empty(&c, "class")?,
                None => current.class_name.clone(),
            },
            attendance_percent: match patch.attendance_percent {
                Some(p) => check_percent(p)?,
                None => current.attendance_percent,
            },
        };
        self.students[idx] = updated;
        Ok(&self.students[idx])
    }
}
