use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

use super::ffmpeg_reader::{extract_rgb_pixels, rgb_decoder};

type DynError = Box<dyn std::error::Error>;

/// Presents a still image as a one-frame video (`fps=0`, `total_frames=1`)
/// so alignment treats uploaded photos and video first frames alike.
///
/// Decodes through ffmpeg, which handles large JPEGs much faster than the
/// pure-Rust `image` decoder.
pub struct ImageFileReader {
    frame: Option<Frame>,
}

impl ImageFileReader {
    pub fn new() -> Self {
        Self { frame: None }
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_single_frame(path: &Path) -> Result<Frame, DynError> {
    ffmpeg_next::init()?;

    let mut ictx = ffmpeg_next::format::input(path)?;
    let index = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or("No image data found")?
        .index();
    let (mut decoder, mut scaler) = rgb_decoder(&ictx, index)?;

    let mut receive = |decoder: &mut ffmpeg_next::decoder::Video| -> Result<Option<Frame>, DynError> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }
        let mut rgb = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&decoded, &mut rgb)?;
        let (w, h) = (decoder.width(), decoder.height());
        Ok(Some(Frame::new(extract_rgb_pixels(&rgb, w, h), w, h, 3, 0)))
    };

    for (stream, packet) in ictx.packets() {
        if stream.index() != index {
            continue;
        }
        decoder.send_packet(&packet)?;
        if let Some(frame) = receive(&mut decoder)? {
            return Ok(frame);
        }
    }

    // Some formats only release the frame on flush
    let _ = decoder.send_eof();
    receive(&mut decoder)?.ok_or_else(|| "Failed to decode image".into())
}

impl VideoReader for ImageFileReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, DynError> {
        let frame = decode_single_frame(path)?;
        let metadata = VideoMetadata {
            width: frame.width(),
            height: frame.height(),
            fps: 0.0,
            total_frames: 1,
            codec: String::new(),
            source_path: Some(path.to_path_buf()),
        };
        self.frame = Some(frame);
        Ok(metadata)
    }

    fn frames(&mut self) -> Box<dyn Iterator<Item = Result<Frame, DynError>> + '_> {
        match self.frame.take() {
            Some(frame) => Box::new(std::iter::once(Ok(frame))),
            None => Box::new(std::iter::once(Err("ImageFileReader: not opened".into()))),
        }
    }

    fn close(&mut self) {
        self.frame = None;
    }
}
