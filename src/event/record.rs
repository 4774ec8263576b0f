//! Immutable log event records and message-template rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::event::Severity;

/// A single log event.
///
/// Produced once at emit time and shared read-only with every backend the
/// dispatch engine forwards it to. The timestamp is assigned by the sink's
/// clock, never by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub source_context: String,
    pub template: String,
    pub fields: BTreeMap<String, Value>,
}

impl LogEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        severity: Severity,
        source_context: impl Into<String>,
        template: impl Into<String>,
        fields: &[(&str, Value)],
    ) -> Self {
        let mut map = BTreeMap::new();
        // Last write wins on duplicate keys; callers are expected to keep
        // keys unique per event.
        for (key, value) in fields {
            map.insert((*key).to_string(), value.clone());
        }
        Self {
            timestamp,
            severity,
            source_context: source_context.into(),
            template: template.into(),
            fields: map,
        }
    }

    /// Substitute `{name}` placeholders in the template from the fields.
    ///
    /// `{{` and `}}` render as literal braces. Placeholders without a
    /// matching field are kept verbatim so the gap is visible in the output.
    pub fn render_message(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut chars = self.template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    match self.fields.get(&name) {
                        Some(value) if closed => append_value(&mut out, value),
                        _ => {
                            out.push('{');
                            out.push_str(&name);
                            if closed {
                                out.push('}');
                            }
                        }
                    }
                }
                other => out.push(other),
            }
        }
        out
    }

    /// One-line human-readable form used by the console and file backends.
    pub fn render_line(&self) -> String {
        let mut line = String::new();
        let _ = write!(
            line,
            "{} [{}] {}: {}",
            self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            self.severity.code(),
            self.source_context,
            self.render_message()
        );
        line
    }
}

fn append_value(out: &mut String, value: &Value) {
    match value {
        // Strings render bare, without JSON quoting.
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(template: &str, fields: &[(&str, Value)]) -> LogEvent {
        LogEvent::new(Utc::now(), Severity::Information, "test", template, fields)
    }

    #[test]
    fn renders_placeholders_from_fields() {
        let e = event(
            "user {name} logged in from {ip}",
            &[("name", json!("ana")), ("ip", json!("10.0.0.7"))],
        );
        assert_eq!(e.render_message(), "user ana logged in from 10.0.0.7");
    }

    #[test]
    fn unknown_placeholder_is_kept_verbatim() {
        let e = event("missing {thing} here", &[]);
        assert_eq!(e.render_message(), "missing {thing} here");
    }

    #[test]
    fn doubled_braces_are_literals() {
        let e = event("set {{x}} to {v}", &[("v", json!(3))]);
        assert_eq!(e.render_message(), "set {x} to 3");
    }

    #[test]
    fn duplicate_field_keys_keep_last_value() {
        let e = event("{k}", &[("k", json!(1)), ("k", json!(2))]);
        assert_eq!(e.render_message(), "2");
    }

    #[test]
    fn rendered_line_contains_severity_code_and_context() {
        let e = event("hello", &[]);
        let line = e.render_line();
        assert!(line.contains("[INF]"));
        assert!(line.contains("test: hello"));
    }
}
