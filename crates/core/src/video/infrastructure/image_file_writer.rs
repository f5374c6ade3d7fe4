use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Saves frames with the `image` crate, creating parent directories as needed.
#[derive(Default)]
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let img = frame
            .to_rgb_image()
            .ok_or("frame is not a packed RGB buffer")?;
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_write_creates_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("out.png");
        ImageFileWriter::new()
            .write(&path, &solid(16, 8, [1, 2, 3]))
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_png_round_trip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageFileWriter::new()
            .write(&path, &solid(20, 10, [50, 100, 200]))
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (20, 10));
        assert_eq!(img.get_pixel(19, 9).0, [50, 100, 200]);
    }

    #[test]
    fn test_non_rgb_frame_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let frame = Frame::new(vec![0; 4 * 4 * 4], 4, 4, 4, 0);
        let result = ImageFileWriter::new().write(&dir.path().join("out.png"), &frame);
        assert!(result.is_err());
    }
}
