//! # framesnap
//!
//! Grab still frames from a video file at fixed timestamps and save each as
//! a PNG image.
//!
//! A run opens one video, reads its frame rate once, and for every requested
//! second seeks to frame `floor(fps * seconds)`, decodes one frame, and
//! writes `frame_<seconds>s.png` into the output directory. A timestamp that
//! cannot be read (past the end of the stream, decode failure) is reported
//! and skipped; only an unopenable video or an uncreatable output directory
//! stops the run.
//!
//! ## Quick start
//!
//! ```no_run
//! use framesnap::{ExtractOptions, FrameStatus};
//!
//! let options = ExtractOptions::new("input.mp4").with_timestamps([0, 5, 10]);
//! let report = framesnap::run(
//!     &options,
//!     |extractor| println!("FPS: {}", extractor.frames_per_second()),
//!     |outcome| match &outcome.status {
//!         FrameStatus::Saved { path } => println!("Saved {}", path.display()),
//!         FrameStatus::Failed { .. } => println!("Could not read frame at {}s", outcome.seconds),
//!     },
//! )?;
//! assert!(report.saved_count() <= 3);
//! # Ok::<(), framesnap::FrameSnapError>(())
//! ```
//!
//! ## Frame index accuracy
//!
//! Seconds are mapped to frame indices with the stream's average frame
//! rate. For variable-frame-rate files, or containers with inaccurate rate
//! metadata, the decoded frame may be a neighbour of the one actually shown
//! at that instant.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on the build machine
//! (`ffmpeg-next` links against them).

pub mod configuration;
mod conversion;
pub mod error;
pub mod extractor;
pub mod ffmpeg;
pub mod metadata;
pub mod report;
pub mod source;

pub use configuration::{DEFAULT_OUTPUT_DIRECTORY, DEFAULT_TIMESTAMPS, ExtractOptions};
pub use conversion::timestamp_to_frame_number;
pub use error::FrameSnapError;
pub use extractor::{FrameExtractor, ensure_output_directory, frame_file_name, run};
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use metadata::VideoMetadata;
pub use report::{ExtractionReport, FrameOutcome, FrameStatus};
pub use source::VideoSource;
