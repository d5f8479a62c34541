//! Video stream metadata.
//!
//! [`VideoMetadata`] is read once when a [`VideoSource`](crate::VideoSource)
//! is opened and cached for the lifetime of the handle.

use std::time::Duration;

/// Metadata for the video stream frames are extracted from.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Total number of frames as recorded by the container (e.g. MP4
    /// `stsz`). Zero when the container does not record it (Matroska,
    /// WebM); no estimate from duration is made.
    pub frame_count: u64,
    /// Container-level duration.
    pub duration: Duration,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
    /// Index of the stream inside the container.
    pub stream_index: usize,
}

impl VideoMetadata {
    /// Whether `frame_number` lies within the known frame count.
    ///
    /// Always `true` when the frame count is unknown; the decoder then
    /// decides by running out of packets.
    pub fn contains_frame(&self, frame_number: u64) -> bool {
        self.frame_count == 0 || frame_number < self.frame_count
    }
}
