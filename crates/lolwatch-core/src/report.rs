// Session report parsing and section rendering.
//
// The server replies to the identity line with a JSON object carrying up to
// five named sections. No schema is enforced: each section is kept as raw
// JSON and rendered as-is. A key present with `null` is kept as `null`; an
// absent key renders as `undefined`.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::display::Region;

/// Text rendered for a section the report does not contain.
pub const UNDEFINED_TEXT: &str = "undefined";

/// Prefix the server puts on plain-text error replies.
pub const SERVER_ERROR_PREFIX: &str = "Error:";

/// Largest float that still maps to an exact integer (2^53 - 1).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("server reported an error: {0}")]
    Server(String),

    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("payload is JSON but not an object (found {0})")]
    NotAnObject(&'static str),
}

/// One inbound report. Sections are stored in [`Region::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionReport {
    sections: [Option<Value>; 5],
}

impl SessionReport {
    /// Parse a raw text frame into a report.
    pub fn parse(raw: &str) -> Result<Self, ReportError> {
        if let Some(detail) = raw.strip_prefix(SERVER_ERROR_PREFIX) {
            return Err(ReportError::Server(detail.trim().to_string()));
        }

        let value: Value = serde_json::from_str(raw)?;
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(ReportError::NotAnObject(json_kind(&other))),
        }
    }

    fn from_map(mut map: Map<String, Value>) -> Self {
        let sections = Region::ALL.map(|region| map.remove(region.key()));
        SessionReport { sections }
    }

    /// The raw section for `region`, `None` when the key was absent.
    pub fn section(&self, region: Region) -> Option<&Value> {
        self.sections[region.index()].as_ref()
    }

    /// Number of sections present in the report.
    pub fn present_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_some()).count()
    }

    /// Rendered text for `region`.
    pub fn render(&self, region: Region) -> String {
        render_section(self.section(region))
    }
}

/// Pretty-print a section with a 2-space indent, or `undefined` when absent.
pub fn render_section(section: Option<&Value>) -> String {
    match section {
        Some(value) => {
            let mut value = value.clone();
            integralize_floats(&mut value);
            // Serializing a `Value` cannot fail: keys are always strings.
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        None => UNDEFINED_TEXT.to_string(),
    }
}

/// Rewrite whole-number floats as integers so `7.0` prints as `7`, matching
/// how the report reads in a browser.
fn integralize_floats(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            let f = n.as_f64().unwrap_or(f64::NAN);
            if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER {
                *n = Number::from(f as i64);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integralize_floats),
        Value::Object(map) => map.values_mut().for_each(integralize_floats),
        _ => {}
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
