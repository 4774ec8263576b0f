//! Console backend.
//!
//! Warning and above go to stderr, everything else to stdout. Writes are
//! best-effort: a broken pipe on stdout must not count as a dispatch
//! failure, so write errors are swallowed.

use std::io::Write;
use std::time::Duration;

use crate::backend::{Backend, BackendError};
use crate::event::{LogEvent, Severity};

pub struct ConsoleBackend;

impl ConsoleBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for ConsoleBackend {
    fn name(&self) -> &'static str {
        "console"
    }

    fn accept(&self, event: &LogEvent) -> Result<(), BackendError> {
        let line = event.render_line();
        if event.severity >= Severity::Warning {
            let stderr = std::io::stderr();
            let mut handle = stderr.lock();
            let _ = writeln!(handle, "{}", line);
        } else {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            let _ = writeln!(handle, "{}", line);
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), BackendError> {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        Ok(())
    }

    fn close(&self, _grace: Duration) -> Result<(), BackendError> {
        self.flush()
    }

    fn dropped(&self) -> u64 {
        0
    }
}
