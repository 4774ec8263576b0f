//! Named logger views over a sink.

use serde_json::Value;

use crate::event::Severity;
use crate::sink::Sink;

/// A lightweight view of a [`Sink`] that pre-fills the source context.
///
/// Obtained from [`Sink::for_context`]; shares the parent's backends,
/// thresholds and clock. Cheap to clone and to create per request.
#[derive(Clone)]
pub struct Logger {
    sink: Sink,
    context: String,
}

impl Logger {
    pub(crate) fn new(sink: Sink, context: String) -> Self {
        Self { sink, context }
    }

    /// The source context this view stamps on every event.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn emit(&self, severity: Severity, template: &str, fields: &[(&str, Value)]) {
        self.sink.emit(severity, &self.context, template, fields);
    }

    pub fn trace(&self, template: &str, fields: &[(&str, Value)]) {
        self.emit(Severity::Trace, template, fields);
    }

    pub fn debug(&self, template: &str, fields: &[(&str, Value)]) {
        self.emit(Severity::Debug, template, fields);
    }

    pub fn info(&self, template: &str, fields: &[(&str, Value)]) {
        self.emit(Severity::Information, template, fields);
    }

    pub fn warn(&self, template: &str, fields: &[(&str, Value)]) {
        self.emit(Severity::Warning, template, fields);
    }

    pub fn error(&self, template: &str, fields: &[(&str, Value)]) {
        self.emit(Severity::Error, template, fields);
    }

    pub fn fatal(&self, template: &str, fields: &[(&str, Value)]) {
        self.emit(Severity::Fatal, template, fields);
    }
}
