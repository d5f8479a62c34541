//! Error types for the `framesnap` crate.
//!
//! [`FrameSnapError`] is returned by every fallible operation. Some variants
//! are fatal for a whole run (the video cannot be opened, the output
//! directory cannot be created); the rest describe why a single timestamp
//! produced no image.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framesnap` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrameSnapError {
    /// The video file could not be opened.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The stream reports no usable frame rate, so timestamps cannot be
    /// mapped to frame indices.
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// The requested frame index is past the known frame count.
    #[error("Frame {frame_number} is out of range (video has {total_frames} frames)")]
    FrameOutOfRange {
        /// The frame index that was requested.
        frame_number: u64,
        /// The total number of frames in the video.
        total_frames: u64,
    },

    /// The stream ended before a frame at or after the seek target was
    /// decoded.
    #[error("Reached end of stream before frame {frame_number}")]
    EndOfStream {
        /// The frame index the decoder was looking for.
        frame_number: u64,
    },

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The output directory could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    OutputDirectory {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: IoError,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An error from the `image` crate while encoding a frame.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for FrameSnapError {
    fn from(error: FfmpegError) -> Self {
        FrameSnapError::FfmpegError(error.to_string())
    }
}
