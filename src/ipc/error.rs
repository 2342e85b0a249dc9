use serde_json::json;

use crate::calc::CalcError;
use crate::export::ExportError;
use crate::roster::RosterError;
use crate::session::SessionError;
use crate::shell::NavError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<RosterError> for HandlerErr {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::NotFound(id) => HandlerErr::new("not_found", e.to_string())
                .with_details(json!({ "studentId": id })),
            RosterError::EmptyField { .. }
            | RosterError::PercentOutOfRange(_)
            | RosterError::IdSpaceExhausted(_) => HandlerErr::bad_params(e.to_string()),
        }
    }
}

impl From<SessionError> for HandlerErr {
    fn from(e: SessionError) -> Self {
        HandlerErr::bad_params(e.to_string())
    }
}

impl From<CalcError> for HandlerErr {
    fn from(e: CalcError) -> Self {
        let details = match &e {
            CalcError::UnknownClass(name) => Some(json!({ "scope": name })),
            _ => None,
        };
        HandlerErr {
            code: e.code(),
            message: e.to_string(),
            details,
        }
    }
}

impl From<NavError> for HandlerErr {
    fn from(e: NavError) -> Self {
        HandlerErr::new(e.code(), e.to_string())
    }
}

impl From<ExportError> for HandlerErr {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::Calc(c) => c.into(),
            share @ ExportError::Share(_) => HandlerErr::new("export_failed", share.to_string()),
        }
    }
}
