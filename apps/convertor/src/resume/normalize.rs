//! Schema Normalizer: maps the model's JSON onto a `ResumeRecord`.
//!
//! Each canonical key is looked up exactly once through `FIELD_TABLE`. A key
//! that is absent or null leaves the field at its `Default` value.

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ConvertError;
use crate::resume::keys;
use crate::resume::ResumeRecord;

type Apply = fn(&mut ResumeRecord, &Value);

/// (source key, setter) pairs evaluated in order.
const FIELD_TABLE: [(&str, Apply); 14] = [
    (keys::FULL_NAME, |r, v| r.full_name = as_text(v)),
    (keys::TITLE, |r, v| r.title = as_text(v)),
    (keys::EMAIL, |r, v| r.email = as_text(v)),
    (keys::PHONE_NUMBER, |r, v| r.phone_number = as_text(v)),
    (keys::LINKEDIN, |r, v| r.linkedin = as_text(v)),
    (keys::LOCATION, |r, v| r.location = as_text(v)),
    (keys::STRENGTHS, |r, v| r.strengths = as_text(v)),
    (keys::SKILL_MATRIX, |r, v| r.skill_matrix = as_records(v)),
    (keys::KEY_ACHIEVEMENTS, |r, v| r.key_achievements = as_strings(v)),
    (keys::EDUCATION, |r, v| r.education = as_records(v)),
    (keys::PROJECTS, |r, v| r.projects = as_records(v)),
    (keys::CERTIFICATIONS, |r, v| r.certifications = as_strings(v)),
    (keys::SOFTWARE_TRAINING, |r, v| r.software_training = as_text(v)),
    (keys::REFERENCES, |r, v| r.references = as_records(v)),
];

/// Turns sanitized model output into records. Holds the branding image, which
/// is loaded once and attached to every record.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    logo_base64: String,
}

impl Normalizer {
    pub fn new(logo_base64: String) -> Self {
        Self { logo_base64 }
    }

    /// Parses `json` and maps it. Fails only when the text is not a JSON object.
    pub fn normalize_str(&self, json: &str) -> Result<ResumeRecord, ConvertError> {
        let tree: Value = serde_json::from_str(json)?;
        match tree {
            Value::Object(map) => Ok(self.normalize(&map)),
            other => Err(ConvertError::MalformedJson(format!(
                "expected a JSON object at the top level, found {}",
                kind(&other)
            ))),
        }
    }

    pub fn normalize(&self, tree: &Map<String, Value>) -> ResumeRecord {
        let mut record = ResumeRecord {
            logo_base64: self.logo_base64.clone(),
            ..Default::default()
        };
        for (key, apply) in FIELD_TABLE {
            if let Some(value) = tree.get(key).filter(|v| !v.is_null()) {
                apply(&mut record, value);
            }
        }

        let ignored: Vec<&str> = tree
            .keys()
            .map(String::as_str)
            .filter(|k| !keys::CANONICAL_KEYS.contains(k))
            .collect();
        if !ignored.is_empty() {
            debug!("Ignoring non-canonical keys: {}", ignored.join(", "));
        }
        record
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn as_records(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

fn as_strings(value: &Value) -> Vec<String> {
    as_records(value).iter().map(as_text).collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
