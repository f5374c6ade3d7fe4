use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

type DynError = Box<dyn std::error::Error>;

/// Fallback frame rate when the source reports none.
const DEFAULT_FPS: i32 = 30;

/// Encodes RGB frames as MPEG-4 Part 2 (`mp4v`) via ffmpeg-next.
///
/// Stylized clips are truncated to the device frame cap, so no audio is
/// carried over from the source.
pub struct FfmpegWriter {
    state: Option<EncoderState>,
}

struct EncoderState {
    octx: ffmpeg_next::format::context::Output,
    encoder: ffmpeg_next::codec::encoder::video::Encoder,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    fps: i32,
    frame_count: usize,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Number of frames encoded since `open`.
    pub fn frame_count(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.frame_count)
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn rounded_fps(fps: f64) -> i32 {
    let fps = fps.round() as i32;
    if fps <= 0 {
        DEFAULT_FPS
    } else {
        fps
    }
}

impl VideoWriter for FfmpegWriter {
    fn open(&mut self, path: &Path, metadata: &VideoMetadata) -> Result<(), DynError> {
        ffmpeg_next::init()?;

        if metadata.width % 2 != 0 || metadata.height % 2 != 0 {
            return Err(format!(
                "YUV420 output needs even dimensions, got {}x{}",
                metadata.width, metadata.height
            )
            .into());
        }

        let mut octx = ffmpeg_next::format::output(path)?;
        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder not found")?;
        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        let fps = rounded_fps(metadata.fps);
        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));
        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);
        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUV420P,
            metadata.width,
            metadata.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        self.state = Some(EncoderState {
            octx,
            encoder,
            scaler,
            width: metadata.width,
            height: metadata.height,
            fps,
            frame_count: 0,
        });
        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), DynError> {
        let state = self.state.as_mut().ok_or("FfmpegWriter: not opened")?;
        if frame.width() != state.width || frame.height() != state.height {
            return Err(format!(
                "frame is {}x{}, writer expects {}x{}",
                frame.width(),
                frame.height(),
                state.width,
                state.height
            )
            .into());
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            state.width,
            state.height,
        );
        let stride = rgb_frame.stride(0);
        let row_len = state.width as usize * 3;
        let dst = rgb_frame.data_mut(0);
        for (row, src_row) in frame.data().chunks_exact(row_len).enumerate() {
            let start = row * stride;
            dst[start..start + row_len].copy_from_slice(src_row);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        state.scaler.run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(state.frame_count as i64));

        state.encoder.send_frame(&yuv_frame)?;
        state.drain()?;
        state.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), DynError> {
        if let Some(mut state) = self.state.take() {
            state.encoder.send_eof()?;
            state.drain()?;
            state.octx.write_trailer()?;
        }
        Ok(())
    }
}

impl EncoderState {
    fn drain(&mut self) -> Result<(), DynError> {
        let ost_time_base = self
            .octx
            .stream(0)
            .ok_or("output stream missing")?
            .time_base();
        let mut encoded = ffmpeg_next::Packet::empty();
        while self.encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(ffmpeg_next::Rational(1, self.fps), ost_time_base);
            encoded.write_interleaved(&mut self.octx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::domain::video_reader::VideoReader;
    use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;

    fn metadata(w: u32, h: u32, fps: f64) -> VideoMetadata {
        VideoMetadata {
            width: w,
            height: h,
            fps,
            total_frames: 0,
            codec: String::new(),
            source_path: None,
        }
    }

    #[test]
    fn test_rounded_fps_falls_back_for_zero() {
        assert_eq!(rounded_fps(0.0), DEFAULT_FPS);
        assert_eq!(rounded_fps(29.97), 30);
        assert_eq!(rounded_fps(-5.0), DEFAULT_FPS);
    }

    #[test]
    fn test_write_without_open_is_error() {
        let mut writer = FfmpegWriter::new();
        assert!(writer.write(&Frame::black(16, 16)).is_err());
    }

    #[test]
    fn test_close_without_open_is_ok() {
        let mut writer = FfmpegWriter::new();
        assert!(writer.close().is_ok());
    }

    #[test]
    fn test_odd_dimensions_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FfmpegWriter::new();
        let result = writer.open(&dir.path().join("out.mp4"), &metadata(15, 16, 25.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_write_and_read_back_frame_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(64, 48, 25.0)).unwrap();
        for i in 0..5 {
            writer.write(&Frame::black(64, 48).with_index(i)).unwrap();
        }
        assert_eq!(writer.frame_count(), 5);
        writer.close().unwrap();

        let mut reader = FfmpegReader::new();
        let meta = reader.open(&path).unwrap();
        assert_eq!((meta.width, meta.height), (64, 48));
        let decoded = reader.frames().filter(|f| f.is_ok()).count();
        assert_eq!(decoded, 5);
    }

    #[test]
    fn test_mismatched_frame_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FfmpegWriter::new();
        writer
            .open(&dir.path().join("out.mp4"), &metadata(32, 32, 25.0))
            .unwrap();
        assert!(writer.write(&Frame::black(16, 16)).is_err());
    }
}
