use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::trace::trace::ScanTraceEvent;

/// Appends one JSON line per scan to a trace file.
///
/// A trace that cannot be opened or written never fails the scan: the
/// problem is reported through `tracing` with the file and scan number, and
/// that scan's line is dropped.
pub struct TraceLogger {
    sink: Option<TraceSink>,
}

struct TraceSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                debug!(path = %path.display(), "scan trace enabled");
                Self {
                    sink: Some(TraceSink {
                        path: path.to_path_buf(),
                        file: Mutex::new(file),
                    }),
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "scan trace disabled: file could not be opened");
                Self::disabled()
            }
        }
    }

    /// Logger that discards everything.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|s| s.path.as_path())
    }

    pub fn log(&self, event: &ScanTraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };
        let path = sink.path.display();

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(%path, scan = event.scan, error = %e, "scan trace line dropped: not serializable");
                return;
            }
        };

        // A writer that panicked mid-line leaves at most one torn line.
        let mut file = match sink.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = writeln!(file, "{line}") {
            warn!(%path, scan = event.scan, error = %e, "scan trace line dropped: write failed");
        }
    }
}
