//! Extraction configuration.
//!
//! [`ExtractOptions`] bundles the three inputs of a run: which video to
//! read, where to write images, and which seconds to grab.
//!
//! # Example
//!
//! ```
//! use framesnap::ExtractOptions;
//!
//! let options = ExtractOptions::new("input.mp4")
//!     .with_output_directory("stills")
//!     .with_timestamps([1, 5, 9]);
//! assert_eq!(options.timestamps(), &[1, 5, 9]);
//! ```

use std::path::{Path, PathBuf};

/// Output directory used when none is given.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "temp_frames";

/// Seconds sampled when no timestamps are given.
pub const DEFAULT_TIMESTAMPS: [u64; 8] = [0, 2, 4, 6, 8, 10, 15, 20];

/// Inputs for a single extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    video_path: PathBuf,
    output_directory: PathBuf,
    timestamps: Vec<u64>,
}

impl ExtractOptions {
    /// Options for `video_path` with the default output directory and
    /// timestamps.
    pub fn new<P: AsRef<Path>>(video_path: P) -> Self {
        Self {
            video_path: video_path.as_ref().to_path_buf(),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            timestamps: DEFAULT_TIMESTAMPS.to_vec(),
        }
    }

    /// Write images into `directory`. It is created if missing.
    #[must_use]
    pub fn with_output_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.output_directory = directory.as_ref().to_path_buf();
        self
    }

    /// Grab frames at these seconds, in this order. Duplicates are kept.
    #[must_use]
    pub fn with_timestamps<I: IntoIterator<Item = u64>>(mut self, timestamps: I) -> Self {
        self.timestamps = timestamps.into_iter().collect();
        self
    }

    pub fn video_path(&self) -> &Path {
        &self.video_path
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }
}
