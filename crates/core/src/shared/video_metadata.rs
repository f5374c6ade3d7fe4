use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Metadata for an output stream derived from this source at a new size.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            source_path: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip() -> VideoMetadata {
        VideoMetadata {
            width: 1280,
            height: 720,
            fps: 25.0,
            total_frames: 250,
            codec: "h264".to_string(),
            source_path: Some(PathBuf::from("./vtoonify/data/651.mp4")),
        }
    }

    #[test]
    fn test_resized_keeps_timing_and_drops_source() {
        let aligned = clip().resized(400, 320);
        assert_eq!((aligned.width, aligned.height), (400, 320));
        assert_eq!(aligned.fps, 25.0);
        assert_eq!(aligned.total_frames, 250);
        assert_eq!(aligned.codec, "h264");
        assert_eq!(aligned.source_path, None);
    }

    #[test]
    fn test_stylized_output_is_four_times_aligned() {
        let aligned = clip().resized(400, 320);
        let stylized = aligned.resized(aligned.width * 4, aligned.height * 4);
        assert_eq!((stylized.width, stylized.height), (1600, 1280));
        assert_eq!(stylized.fps, aligned.fps);
    }
}
