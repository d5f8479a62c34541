//! Timestamp and pixel-buffer conversions.
//!
//! Pure helpers shared by [`VideoSource`](crate::VideoSource) and
//! [`FrameExtractor`](crate::FrameExtractor).

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// FFmpeg's internal time base (`AV_TIME_BASE`), in ticks per second.
const AV_TIME_BASE: f64 = 1_000_000.0;

/// Map a whole-second timestamp to a frame index: `floor(fps * seconds)`.
///
/// This is an approximation. Variable-frame-rate streams or inaccurate
/// container metadata can put the real frame at that instant on a
/// neighbouring index.
pub fn timestamp_to_frame_number(seconds: u64, frames_per_second: f64) -> u64 {
    (frames_per_second * seconds as f64).floor() as u64
}

/// Convert a frame index to a container seek timestamp in `AV_TIME_BASE`
/// units, shifted by the stream's start offset (also in microseconds).
///
/// `Input::seek` (`avformat_seek_file` with no stream selected) expects
/// microseconds, not the stream's own time base. Indices far past any real
/// stream saturate at `i64::MAX`.
pub fn frame_number_to_seek_timestamp(
    frame_number: u64,
    frames_per_second: f64,
    start_offset_micros: i64,
) -> i64 {
    let seconds = frame_number as f64 / frames_per_second;
    ((seconds * AV_TIME_BASE) as i64).saturating_add(start_offset_micros)
}

/// Rescale a PTS value from the stream time base to seconds.
pub fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * f64::from(time_base.numerator()) / f64::from(time_base.denominator())
}

/// Rescale a PTS value to a frame index. Negative timestamps (pre-roll)
/// clamp to frame 0.
pub fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts_to_seconds(pts, time_base);
    (seconds * frames_per_second).round().max(0.0) as u64
}

/// Copy one plane of a packed video frame into a tightly packed buffer.
///
/// FFmpeg rows frequently carry padding (`stride > width * bytes_per_pixel`);
/// [`image::RgbImage::from_raw`] wants none.
pub fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_length = width as usize * bytes_per_pixel;
    let rows = height as usize;
    let data = video_frame.data(0);

    if stride == row_length {
        return data[..row_length * rows].to_vec();
    }

    let mut buffer = Vec::with_capacity(row_length * rows);
    for row in data.chunks(stride).take(rows) {
        buffer.extend_from_slice(&row[..row_length]);
    }
    buffer
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::format::Pixel;

    use super::*;

    #[test]
    fn frame_index_is_floor_of_fps_times_seconds() {
        assert_eq!(timestamp_to_frame_number(0, 30.0), 0);
        assert_eq!(timestamp_to_frame_number(2, 30.0), 60);
        assert_eq!(timestamp_to_frame_number(20, 30.0), 600);
        // 29.97 * 10 = 299.7
        assert_eq!(timestamp_to_frame_number(10, 29.97), 299);
        assert_eq!(timestamp_to_frame_number(3, 23.976), 71);
    }

    #[test]
    fn seek_timestamp_is_in_microseconds() {
        assert_eq!(frame_number_to_seek_timestamp(0, 30.0, 0), 0);
        assert_eq!(frame_number_to_seek_timestamp(60, 30.0, 0), 2_000_000);
        assert_eq!(frame_number_to_seek_timestamp(25, 25.0, 0), 1_000_000);
        assert_eq!(frame_number_to_seek_timestamp(30, 30.0, 1_400_000), 2_400_000);
    }

    #[test]
    fn huge_seconds_saturate_instead_of_overflowing() {
        let frame_number = timestamp_to_frame_number(u64::MAX, 30.0);
        assert_eq!(frame_number, u64::MAX);
        assert_eq!(
            frame_number_to_seek_timestamp(frame_number, 30.0, 1_400_000),
            i64::MAX,
        );
    }

    #[test]
    fn pts_round_trips_through_time_base() {
        let time_base = Rational::new(1, 15_360);
        // 2 seconds at 30 fps.
        assert_eq!(pts_to_frame_number(30_720, time_base, 30.0), 60);
        assert_eq!(pts_to_frame_number(-512, time_base, 30.0), 0);
        assert!((pts_to_seconds(7_680, time_base) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn frame_to_buffer_strips_padding() {
        let width = 5;
        let height = 3;
        let mut frame = VideoFrame::new(Pixel::RGB24, width, height);
        let stride = frame.stride(0);
        for (index, byte) in frame.data_mut(0).iter_mut().enumerate() {
            *byte = (index % stride) as u8;
        }

        let buffer = frame_to_buffer(&frame, width, height, 3);
        assert_eq!(buffer.len(), (width * height * 3) as usize);
        for row in buffer.chunks(15) {
            let expected: Vec<u8> = (0..15).collect();
            assert_eq!(row, expected.as_slice());
        }
    }
}
