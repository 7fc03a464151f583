//! Disk-activity staleness check.
//!
//! The last seen `readBytes ++ writeBytes` string of a cluster is kept in
//! `<state_dir>/cluster-<host>.txt`. Each run reads it, replaces it with the
//! current value and compares the two. The comparison assumes every run is
//! one polling period: counters that did not move between two runs are
//! reported as a stalled cluster even when the cluster was merely idle.
//! Runs against the same host must not overlap; the file is not locked.

use crate::error::ProbeError;
use crate::severity::{Severity, Signal};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Counters of a cluster that has never done any I/O.
const IDLE_COUNTERS: &str = "00";

#[derive(Debug, Clone)]
pub struct ActivityTracker {
    path: PathBuf,
}

impl ActivityTracker {
    pub fn new(state_dir: &Path, host: &str) -> Self {
        Self {
            path: state_dir.join(format!("cluster-{host}.txt")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn check(&self, counters: &str) -> Result<Signal, ProbeError> {
        let previous = match fs::read_to_string(&self.path) {
            Ok(previous) => Some(previous),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(source) => return Err(self.fs_error(source)),
        };

        fs::write(&self.path, counters).map_err(|source| self.fs_error(source))?;

        let Some(previous) = previous else {
            debug!(path = %self.path.display(), "created disk activity record");
            return Ok(Signal::new("n/a", Severity::Unknown));
        };
        debug!(
            path = %self.path.display(),
            previous = %previous,
            current = %counters,
            "compared disk activity record"
        );

        let signal = if counters == IDLE_COUNTERS {
            Signal::new("No", Severity::Critical)
        } else if previous == counters {
            Signal::new("No", Severity::Warning)
        } else {
            Signal::ok("Yes")
        };
        Ok(signal)
    }

    fn fs_error(&self, source: std::io::Error) -> ProbeError {
        ProbeError::Filesystem {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_path_is_per_host() {
        let tracker = ActivityTracker::new(Path::new("/tmp"), "10.0.0.5");
        assert_eq!(tracker.path(), Path::new("/tmp/cluster-10.0.0.5.txt"));
    }

    #[test]
    fn first_run_creates_record_and_is_unknown() {
        let dir = tempfile::tempdir().expect("temp dir");
        let tracker = ActivityTracker::new(dir.path(), "sf-cluster");

        let signal = tracker.check("1020").expect("first check");
        assert_eq!(signal, Signal::new("n/a", Severity::Unknown));
        assert_eq!(fs::read_to_string(tracker.path()).unwrap(), "1020");
    }

    #[test]
    fn unchanged_counters_warn() {
        let dir = tempfile::tempdir().expect("temp dir");
        let tracker = ActivityTracker::new(dir.path(), "sf-cluster");

        tracker.check("1020").expect("first check");
        let signal = tracker.check("1020").expect("second check");
        assert_eq!(signal, Signal::new("No", Severity::Warning));
    }

    #[test]
    fn zero_counters_are_critical_once_a_record_exists() {
        let dir = tempfile::tempdir().expect("temp dir");
        let tracker = ActivityTracker::new(dir.path(), "sf-cluster");

        tracker.check("1020").expect("first check");
        let signal = tracker.check("00").expect("second check");
        assert_eq!(signal, Signal::new("No", Severity::Critical));

        let signal = tracker.check("00").expect("third check");
        assert_eq!(signal.severity, Severity::Critical);
    }

    #[test]
    fn changed_counters_are_ok_and_replace_record() {
        let dir = tempfile::tempdir().expect("temp dir");
        let tracker = ActivityTracker::new(dir.path(), "sf-cluster");

        tracker.check("1020").expect("first check");
        let signal = tracker.check("1530").expect("second check");
        assert_eq!(signal, Signal::ok("Yes"));
        assert_eq!(fs::read_to_string(tracker.path()).unwrap(), "1530");
    }

    #[test]
    fn unwritable_state_dir_is_a_filesystem_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("missing");
        let tracker = ActivityTracker::new(&missing, "sf-cluster");

        let err = tracker.check("1020").expect_err("missing dir must fail");
        assert!(matches!(err, ProbeError::Filesystem { .. }));
    }
}
