//! Template Renderer: binds a `ResumeRecord` into the HTML template.
//!
//! Bound values are HTML-escaped. Templates opt a field out of escaping with
//! `{{ raw(field) }}`, which wraps the value as a safe string.

use std::fmt::Write as _;

use minijinja::value::Value;
use minijinja::{escape_formatter, AutoEscape, Environment, Error, ErrorKind, Output, State};

use crate::resume::ResumeRecord;

/// Template bundled with the binary, used when no template file is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/resume.html");

/// The `.html` suffix turns on HTML auto-escaping.
const TEMPLATE_NAME: &str = "resume.html";

/// Compiled template, built once and shared by every render in a batch.
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Compiles `source`; syntax errors surface here rather than per record.
    pub fn new(source: impl Into<String>) -> Result<Self, Error> {
        let mut env = Environment::new();
        env.set_formatter(html_formatter);
        env.add_function("raw", raw);
        env.add_template_owned(TEMPLATE_NAME, source.into())?;
        Ok(Self { env })
    }

    pub fn render(&self, record: &ResumeRecord) -> Result<String, Error> {
        self.env.get_template(TEMPLATE_NAME)?.render(record)
    }
}

/// Marks a value as markup to be emitted verbatim.
fn raw(value: Option<Value>) -> Value {
    match value {
        Some(v) if !v.is_none() && !v.is_undefined() => Value::from_safe_string(v.to_string()),
        _ => Value::from_safe_string(String::new()),
    }
}

/// Escapes unsafe values in HTML mode and prints `none` as nothing.
fn html_formatter(out: &mut Output, state: &State, value: &Value) -> Result<(), Error> {
    if value.is_none() || value.is_undefined() {
        return Ok(());
    }
    if matches!(state.auto_escape(), AutoEscape::Html) && !value.is_safe() {
        return out
            .write_str(&escape_html(&value.to_string()))
            .map_err(|_| Error::new(ErrorKind::WriteFailure, "failed to write rendered output"));
    }
    escape_formatter(out, state, value)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
