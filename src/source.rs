//! The video decoding handle.
//!
//! [`VideoSource`] wraps an FFmpeg demuxer, a decoder for the best video
//! stream, and a pixel-format converter. It exposes the two primitives the
//! extractor loops over: [`seek`](VideoSource::seek) to a frame index and
//! [`read`](VideoSource::read) the next decoded frame from there.
//!
//! # Example
//!
//! ```no_run
//! use framesnap::VideoSource;
//!
//! let mut source = VideoSource::open("input.mp4")?;
//! println!("FPS: {}", source.frames_per_second());
//! source.seek(120)?;
//! let frame = source.read()?;
//! frame.save("frame_120.png")?;
//! source.release();
//! # Ok::<(), framesnap::FrameSnapError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{conversion, error::FrameSnapError, metadata::VideoMetadata};

/// FFmpeg's `AV_NOPTS_VALUE`.
const NO_PTS: i64 = i64::MIN;

/// An open video file, positioned for frame-by-frame reading.
///
/// Opening succeeds only if the file can be demuxed, has a video stream,
/// and reports a positive frame rate. The FFmpeg contexts are released when
/// the handle is dropped or [`release`](VideoSource::release)d.
pub struct VideoSource {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: Option<ScalingContext>,
    metadata: VideoMetadata,
    time_base: Rational,
    /// Stream start time in `time_base` units; subtracted from frame PTS.
    start_pts: i64,
    /// Frame index the next [`read`](VideoSource::read) must reach.
    next_frame_number: u64,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    eof_sent: bool,
    path: PathBuf,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .field("next_frame_number", &self.next_frame_number)
            .field("eof_sent", &self.eof_sent)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open a video file and read its stream metadata.
    ///
    /// # Errors
    ///
    /// - [`FrameSnapError::FileOpen`] if FFmpeg cannot open or probe the
    ///   file.
    /// - [`FrameSnapError::NoVideoStream`] if the file has no video.
    /// - [`FrameSnapError::InvalidFrameRate`] if the stream reports no
    ///   positive frame rate.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameSnapError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening video file: {}", path.display());

        ffmpeg_next::init().map_err(|error| FrameSnapError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| FrameSnapError::FileOpen {
                path: path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(FrameSnapError::NoVideoStream)?;
        let stream_index = stream.index();
        let time_base = stream.time_base();

        let frames_per_second = rational_to_positive_f64(stream.avg_frame_rate())
            .or_else(|| rational_to_positive_f64(stream.rate()))
            .ok_or(FrameSnapError::InvalidFrameRate(0.0))?;
        if !frames_per_second.is_finite() {
            return Err(FrameSnapError::InvalidFrameRate(frames_per_second));
        }

        let start_pts = match stream.start_time() {
            NO_PTS => 0,
            start => start,
        };

        let duration = match input_context.duration() {
            micros if micros > 0 => Duration::from_micros(micros as u64),
            _ if stream.duration() > 0 => Duration::from_secs_f64(conversion::pts_to_seconds(
                stream.duration(),
                time_base,
            )),
            _ => Duration::ZERO,
        };

        let frame_count = container_frame_count(stream.frames());

        let decoder_context = CodecContext::from_parameters(stream.parameters()).map_err(
            |error| FrameSnapError::FileOpen {
                path: path.clone(),
                reason: format!("Failed to read codec parameters for stream {stream_index}: {error}"),
            },
        )?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| FrameSnapError::FileOpen {
                path: path.clone(),
                reason: format!("Failed to create video decoder for stream {stream_index}: {error}"),
            })?;

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            frame_count,
            duration,
            codec,
            stream_index,
        };

        log::info!(
            "Opened video file: {} ({}x{}, {:.3} fps, {} frames, {:.2}s, codec={})",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.duration.as_secs_f64(),
            metadata.codec,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler: None,
            metadata,
            time_base,
            start_pts,
            next_frame_number: 0,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            eof_sent: false,
            path,
        })
    }

    /// Frames per second, as discovered at open time.
    pub fn frames_per_second(&self) -> f64 {
        self.metadata.frames_per_second
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Position the demuxer so the next [`read`](VideoSource::read) returns
    /// `frame_number` (or the first frame after it).
    ///
    /// Seeks to the nearest keyframe at or before the target and resets the
    /// decoder; the frames in between are decoded and discarded by `read`.
    ///
    /// # Errors
    ///
    /// [`FrameSnapError::FrameOutOfRange`] if the frame count is known and
    /// `frame_number` is not below it, or an FFmpeg seek error.
    pub fn seek(&mut self, frame_number: u64) -> Result<(), FrameSnapError> {
        if !self.metadata.contains_frame(frame_number) {
            return Err(FrameSnapError::FrameOutOfRange {
                frame_number,
                total_frames: self.metadata.frame_count,
            });
        }

        let start_offset = conversion::pts_to_seconds(self.start_pts, self.time_base);
        let target_timestamp = conversion::frame_number_to_seek_timestamp(
            frame_number,
            self.frames_per_second(),
            (start_offset * 1_000_000.0) as i64,
        );

        log::debug!("Seeking to frame {frame_number} (ts={target_timestamp}us)");
        self.input_context
            .seek(target_timestamp, ..target_timestamp)?;
        self.decoder.flush();
        self.eof_sent = false;
        self.next_frame_number = frame_number;
        Ok(())
    }

    /// Decode forward until a frame at or after the current target index
    /// appears and return it as RGB8.
    ///
    /// After a successful read the target advances past the returned frame,
    /// so repeated calls walk the stream sequentially.
    ///
    /// # Errors
    ///
    /// - [`FrameSnapError::EndOfStream`] if the stream ends first.
    /// - [`FrameSnapError::FfmpegError`] if demuxing or decoding fails.
    pub fn read(&mut self) -> Result<DynamicImage, FrameSnapError> {
        let target = self.next_frame_number;
        let video_stream_index = self.metadata.stream_index;

        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                let pts = self
                    .decoded_frame
                    .timestamp()
                    .or_else(|| self.decoded_frame.pts())
                    .unwrap_or(self.start_pts);
                let current_frame = conversion::pts_to_frame_number(
                    pts - self.start_pts,
                    self.time_base,
                    self.frames_per_second(),
                );

                if current_frame < target {
                    continue;
                }

                log::debug!("Decoded frame {current_frame} for target {target}");
                self.next_frame_number = current_frame + 1;
                return self.convert_current_frame();
            }

            if self.eof_sent {
                return Err(FrameSnapError::EndOfStream {
                    frame_number: target,
                });
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() == video_stream_index {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(FfmpegError::Eof) => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Close the file. Dropping the handle has the same effect.
    pub fn release(self) {
        log::debug!("Releasing video source: {}", self.path.display());
    }

    fn convert_current_frame(&mut self) -> Result<DynamicImage, FrameSnapError> {
        let format = self.decoded_frame.format();
        let width = self.decoded_frame.width();
        let height = self.decoded_frame.height();

        let reusable = self.scaler.as_ref().is_some_and(|scaler| {
            let input = scaler.input();
            input.format == format && input.width == width && input.height == height
        });
        if !reusable {
            self.scaler = Some(ScalingContext::get(
                format,
                width,
                height,
                Pixel::RGB24,
                width,
                height,
                ScalingFlags::BILINEAR,
            )?);
        }

        let scaler = self
            .scaler
            .as_mut()
            .ok_or_else(|| FrameSnapError::VideoDecodeError("No scaler available".to_string()))?;
        scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;

        let buffer = conversion::frame_to_buffer(&self.rgb_frame, width, height, 3);
        let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            FrameSnapError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })?;
        Ok(DynamicImage::ImageRgb8(image))
    }
}

/// Frame count recorded by the container, or 0 when it records none.
///
/// No estimate from duration is made: rounding in container durations puts
/// such estimates one frame short often enough to reject real frames.
fn container_frame_count(stream_frames: i64) -> u64 {
    u64::try_from(stream_frames).unwrap_or(0)
}

fn rational_to_positive_f64(rational: Rational) -> Option<f64> {
    if rational.denominator() == 0 || rational.numerator() <= 0 {
        return None;
    }
    Some(f64::from(rational.numerator()) / f64::from(rational.denominator()))
}
