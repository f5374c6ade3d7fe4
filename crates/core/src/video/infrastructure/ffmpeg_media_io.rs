use crate::video::domain::media_io::MediaIo;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::ffmpeg_reader::FfmpegReader;
use super::ffmpeg_writer::FfmpegWriter;
use super::image_file_reader::ImageFileReader;

#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegMediaIo;

impl MediaIo for FfmpegMediaIo {
    fn image_reader(&self) -> Box<dyn VideoReader> {
        Box::new(ImageFileReader::new())
    }

    fn video_reader(&self) -> Box<dyn VideoReader> {
        Box::new(FfmpegReader::new())
    }

    fn video_writer(&self) -> Box<dyn VideoWriter> {
        Box::new(FfmpegWriter::new())
    }
}
