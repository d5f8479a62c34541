//! Timestamp-driven frame extraction.
//!
//! [`FrameExtractor`] owns a [`VideoSource`] and an output directory and
//! runs seek → read → save once per requested second. A failing timestamp
//! is recorded in the [`ExtractionReport`] and never stops the ones after
//! it; only creating the directory and opening the video are fatal.
//!
//! # Example
//!
//! ```no_run
//! use framesnap::FrameExtractor;
//!
//! let mut extractor = FrameExtractor::open("input.mp4", "temp_frames")?;
//! let report = extractor.extract(&[0, 2, 4]);
//! extractor.finish();
//! println!("{} saved, {} failed", report.saved_count(), report.failed_count());
//! # Ok::<(), framesnap::FrameSnapError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::ImageFormat;

use crate::{
    configuration::ExtractOptions,
    conversion,
    error::FrameSnapError,
    report::{ExtractionReport, FrameOutcome, FrameStatus},
    source::VideoSource,
};

/// File name for the still taken at `seconds`: `frame_<seconds>s.png`.
pub fn frame_file_name(seconds: u64) -> String {
    format!("frame_{seconds}s.png")
}

/// Create `directory` and any missing parents. Succeeds if it already
/// exists.
pub fn ensure_output_directory(directory: &Path) -> Result<(), FrameSnapError> {
    fs::create_dir_all(directory).map_err(|source| FrameSnapError::OutputDirectory {
        path: directory.to_path_buf(),
        source,
    })
}

/// Grabs still frames from one video into one directory.
#[derive(Debug)]
pub struct FrameExtractor {
    source: VideoSource,
    output_directory: PathBuf,
}

impl FrameExtractor {
    /// Ensure `output_directory` exists, then open `video_path`.
    ///
    /// The directory is created even if the video then fails to open.
    ///
    /// # Errors
    ///
    /// [`FrameSnapError::OutputDirectory`] or any error from
    /// [`VideoSource::open`].
    pub fn open<V, D>(video_path: V, output_directory: D) -> Result<Self, FrameSnapError>
    where
        V: AsRef<Path>,
        D: AsRef<Path>,
    {
        let output_directory = output_directory.as_ref().to_path_buf();
        ensure_output_directory(&output_directory)?;
        let source = VideoSource::open(video_path)?;

        Ok(Self {
            source,
            output_directory,
        })
    }

    /// [`open`](FrameExtractor::open) with the paths from `options`.
    pub fn from_options(options: &ExtractOptions) -> Result<Self, FrameSnapError> {
        Self::open(options.video_path(), options.output_directory())
    }

    pub fn frames_per_second(&self) -> f64 {
        self.source.frames_per_second()
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Where the still for `seconds` is written.
    pub fn output_path(&self, seconds: u64) -> PathBuf {
        self.output_directory.join(frame_file_name(seconds))
    }

    /// Frame index `seconds` maps to with this video's frame rate.
    pub fn frame_index(&self, seconds: u64) -> u64 {
        conversion::timestamp_to_frame_number(seconds, self.frames_per_second())
    }

    /// Seek, decode, and save the frame at `seconds`.
    ///
    /// An existing file of the same name is overwritten.
    pub fn extract_frame(&mut self, seconds: u64) -> Result<PathBuf, FrameSnapError> {
        let frame_index = self.frame_index(seconds);
        self.source.seek(frame_index)?;
        let frame = self.source.read()?;

        let path = self.output_path(seconds);
        frame.save_with_format(&path, ImageFormat::Png)?;
        Ok(path)
    }

    /// Extract every timestamp in order and collect the outcomes.
    pub fn extract(&mut self, timestamps: &[u64]) -> ExtractionReport {
        self.extract_with(timestamps, |_| {})
    }

    /// Like [`extract`](FrameExtractor::extract), calling `on_outcome`
    /// right after each timestamp is processed.
    pub fn extract_with<F>(&mut self, timestamps: &[u64], mut on_outcome: F) -> ExtractionReport
    where
        F: FnMut(&FrameOutcome),
    {
        let mut report = ExtractionReport::new(self.frames_per_second());

        for &seconds in timestamps {
            let frame_index = self.frame_index(seconds);
            let status = match self.extract_frame(seconds) {
                Ok(path) => {
                    log::debug!("Saved frame {frame_index} ({seconds}s) to {}", path.display());
                    FrameStatus::Saved { path }
                }
                Err(error) => {
                    log::warn!("No frame at {seconds}s (index {frame_index}): {error}");
                    FrameStatus::Failed {
                        reason: error.to_string(),
                    }
                }
            };

            let outcome = FrameOutcome {
                seconds,
                frame_index,
                status,
            };
            on_outcome(&outcome);
            report.outcomes.push(outcome);
        }

        log::info!(
            "Extraction finished: {} saved, {} failed",
            report.saved_count(),
            report.failed_count(),
        );
        report
    }

    /// Release the video source.
    pub fn finish(self) {
        self.source.release();
    }
}

/// Open, extract every timestamp in `options`, and release.
///
/// `on_open` receives the extractor once the video is open, before any
/// frame is processed; `on_outcome` is called after each timestamp.
///
/// # Errors
///
/// Only the fatal tier: the output directory cannot be created or the video
/// cannot be opened. Per-timestamp failures are in the report.
pub fn run<O, F>(
    options: &ExtractOptions,
    on_open: O,
    on_outcome: F,
) -> Result<ExtractionReport, FrameSnapError>
where
    O: FnOnce(&FrameExtractor),
    F: FnMut(&FrameOutcome),
{
    let mut extractor = FrameExtractor::from_options(options)?;
    on_open(&extractor);
    let report = extractor.extract_with(options.timestamps(), on_outcome);
    extractor.finish();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_literal_seconds() {
        assert_eq!(frame_file_name(0), "frame_0s.png");
        assert_eq!(frame_file_name(15), "frame_15s.png");
        assert_eq!(frame_file_name(3600), "frame_3600s.png");
    }

    #[test]
    fn output_directory_creation_is_idempotent() {
        let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
        let nested = temporary_directory.path().join("a").join("b");

        ensure_output_directory(&nested).expect("first create");
        ensure_output_directory(&nested).expect("second create");
        assert!(nested.is_dir());
    }

    #[test]
    fn output_directory_over_file_fails() {
        let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
        let file_path = temporary_directory.path().join("occupied");
        fs::write(&file_path, b"x").expect("Failed to write file");

        let error = ensure_output_directory(&file_path).unwrap_err();
        assert!(matches!(error, FrameSnapError::OutputDirectory { .. }), "{error}");
    }

    #[test]
    fn directory_is_created_before_open_fails() {
        let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
        let output = temporary_directory.path().join("frames");
        let missing_video = temporary_directory.path().join("missing.mp4");

        let error = FrameExtractor::open(&missing_video, &output).unwrap_err();
        assert!(matches!(error, FrameSnapError::FileOpen { .. }), "{error}");
        assert!(output.is_dir());
        assert_eq!(fs::read_dir(&output).expect("read_dir").count(), 0);
    }
}
