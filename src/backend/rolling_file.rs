//! Rolling-file backend.
//!
//! # States
//! - Closed: no file open; first accepted event opens one
//! - Open(path, bucket): appending to the file for one interval bucket
//!
//! # State Transitions
//! ```text
//! Closed → Open: first accepted event
//! Open(a) → Open(b): event lands in a later bucket; flush + close a, open b
//! Open → Closed: sink shutdown (flush + release handle)
//! ```
//!
//! # Design Decisions
//! - Appends go through a BufWriter; `flush` also fsyncs so durability is
//!   guaranteed before it returns
//! - Rolling only moves forward: an event whose timestamp rounds to an
//!   older bucket appends to the current file instead of reopening the old
//!   one (bucket labels sort lexicographically)
//! - On a write error the handle is discarded and the open+append is
//!   retried once before the event is dropped and counted

use chrono::{DateTime, Utc};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::backend::{Backend, BackendError};
use crate::config::RollInterval;
use crate::event::LogEvent;

/// Label for the interval bucket containing `ts`.
///
/// Labels are zero-padded so later buckets compare greater as strings.
pub fn bucket_label(interval: RollInterval, ts: DateTime<Utc>) -> String {
    let format = match interval {
        RollInterval::Minutely => "%Y-%m-%d_%H-%M",
        RollInterval::Hourly => "%Y-%m-%d_%H",
        RollInterval::Daily => "%Y-%m-%d",
    };
    ts.format(format).to_string()
}

struct OpenFile {
    path: PathBuf,
    bucket: String,
    writer: BufWriter<File>,
}

pub struct RollingFileBackend {
    path_template: String,
    interval: RollInterval,
    state: Mutex<Option<OpenFile>>,
    dropped: AtomicU64,
}

impl RollingFileBackend {
    pub fn new(path_template: impl Into<String>, interval: RollInterval) -> Self {
        Self {
            path_template: path_template.into(),
            interval,
            state: Mutex::new(None),
            dropped: AtomicU64::new(0),
        }
    }

    fn path_for(&self, bucket: &str) -> PathBuf {
        PathBuf::from(self.path_template.replace("{date}", bucket))
    }

    fn open_file(&self, bucket: String) -> std::io::Result<OpenFile> {
        let path = self.path_for(&bucket);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(OpenFile {
            path,
            bucket,
            writer: BufWriter::new(file),
        })
    }

    /// Append one rendered line, rolling the file first if the event's
    /// bucket is later than the current one.
    fn append(&self, state: &mut Option<OpenFile>, event: &LogEvent) -> std::io::Result<()> {
        let bucket = bucket_label(self.interval, event.timestamp);

        let needs_roll = match state.as_ref() {
            None => true,
            Some(open) => bucket > open.bucket,
        };
        if needs_roll {
            if let Some(mut open) = state.take() {
                open.writer.flush()?;
                open.writer.get_ref().sync_all()?;
            }
            *state = Some(self.open_file(bucket)?);
        }

        let open = state.as_mut().unwrap();
        writeln!(open.writer, "{}", event.render_line())
    }
}

impl Backend for RollingFileBackend {
    fn name(&self) -> &'static str {
        "rolling_file"
    }

    fn accept(&self, event: &LogEvent) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match self.append(&mut state, event) {
            Ok(()) => Ok(()),
            Err(first) => {
                // Discard the (possibly broken) handle and retry the whole
                // open+append once.
                *state = None;
                match self.append(&mut state, event) {
                    Ok(()) => Ok(()),
                    Err(_) => {
                        *state = None;
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        Err(BackendError::Transient(first.to_string()))
                    }
                }
            }
        }
    }

    fn flush(&self) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(open) = state.as_mut() {
            open.writer
                .flush()
                .and_then(|_| open.writer.get_ref().sync_all())
                .map_err(|e| BackendError::Transient(e.to_string()))?;
        }
        Ok(())
    }

    fn close(&self, _grace: Duration) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(mut open) = state.take() {
            open.writer
                .flush()
                .and_then(|_| open.writer.get_ref().sync_all())
                .map_err(|e| BackendError::Transient(e.to_string()))?;
        }
        Ok(())
    }

    fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
