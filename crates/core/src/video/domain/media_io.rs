use super::video_reader::VideoReader;
use super::video_writer::VideoWriter;

/// Hands out fresh readers and writers for each adapter request.
pub trait MediaIo: Send {
    fn image_reader(&self) -> Box<dyn VideoReader>;
    fn video_reader(&self) -> Box<dyn VideoReader>;
    fn video_writer(&self) -> Box<dyn VideoWriter>;
}
