use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads RGB frames from a video or image source.
pub trait VideoReader: Send {
    /// Opens the source and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the reader.
    fn close(&mut self);

    /// Decodes only the first frame. Errors if the source yields none.
    fn first_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        self.frames().next().ok_or("source contains no frames")?
    }
}
