//! Per-timestamp extraction results.
//!
//! Failures for individual timestamps are not errors of the run; they are
//! recorded here as [`FrameStatus::Failed`] so the caller can report them
//! and move on.

use std::path::{Path, PathBuf};

/// What happened to one requested timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStatus {
    /// The frame was decoded and written.
    Saved {
        /// Where the image was written.
        path: PathBuf,
    },
    /// Seeking, decoding, or writing failed; no image exists for this
    /// timestamp.
    Failed {
        /// Human-readable cause.
        reason: String,
    },
}

/// Result for one entry of the timestamp list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOutcome {
    /// The requested second, as given.
    pub seconds: u64,
    /// Frame index the second was mapped to.
    pub frame_index: u64,
    pub status: FrameStatus,
}

impl FrameOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.status, FrameStatus::Saved { .. })
    }

    /// Output path, if the frame was saved.
    pub fn path(&self) -> Option<&Path> {
        match &self.status {
            FrameStatus::Saved { path } => Some(path),
            FrameStatus::Failed { .. } => None,
        }
    }
}

/// Outcome of a whole run, in request order.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ExtractionReport {
    /// Frame rate used to map seconds to frame indices.
    pub frames_per_second: f64,
    /// One entry per requested timestamp, in request order.
    pub outcomes: Vec<FrameOutcome>,
}

impl ExtractionReport {
    pub(crate) fn new(frames_per_second: f64) -> Self {
        Self {
            frames_per_second,
            outcomes: Vec::new(),
        }
    }

    pub fn saved(&self) -> impl Iterator<Item = &FrameOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_saved())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FrameOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_saved())
    }

    pub fn saved_count(&self) -> usize {
        self.saved().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    /// Paths of all written images, in request order. A timestamp
    /// requested twice appears twice.
    pub fn saved_paths(&self) -> Vec<&Path> {
        self.outcomes.iter().filter_map(FrameOutcome::path).collect()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(seconds: u64) -> FrameOutcome {
        FrameOutcome {
            seconds,
            frame_index: seconds * 30,
            status: FrameStatus::Saved {
                path: PathBuf::from(format!("out/frame_{seconds}s.png")),
            },
        }
    }

    fn failed(seconds: u64) -> FrameOutcome {
        FrameOutcome {
            seconds,
            frame_index: seconds * 30,
            status: FrameStatus::Failed {
                reason: "end of stream".to_string(),
            },
        }
    }

    #[test]
    fn counts_split_by_status() {
        let mut report = ExtractionReport::new(30.0);
        report.outcomes = vec![saved(0), saved(2), saved(4), failed(6), failed(8)];

        assert_eq!(report.len(), 5);
        assert_eq!(report.saved_count(), 3);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(
            report.failed().map(|outcome| outcome.seconds).collect::<Vec<_>>(),
            vec![6, 8],
        );
        assert_eq!(
            report.saved_paths(),
            vec![
                Path::new("out/frame_0s.png"),
                Path::new("out/frame_2s.png"),
                Path::new("out/frame_4s.png"),
            ],
        );
    }

    #[test]
    fn empty_report() {
        let report = ExtractionReport::new(25.0);
        assert!(report.is_empty());
        assert_eq!(report.saved_count(), 0);
        assert!(report.saved_paths().is_empty());
    }

    #[test]
    fn path_only_for_saved() {
        assert!(saved(1).path().is_some());
        assert!(failed(1).path().is_none());
    }
}
