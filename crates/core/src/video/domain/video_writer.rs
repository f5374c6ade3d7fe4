use std::io::ErrorKind;
use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Encodes frames into a video file.
///
/// `metadata.width`/`height` describe the frames that will be written,
/// which for stylized output differ from the source dimensions.
pub trait VideoWriter: Send {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes the encoder and finalizes the container.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Abandons a partly written output: closes the encoder and deletes
    /// `path`.
    fn discard(&mut self, path: &Path) {
        if let Err(e) = self.close() {
            log::warn!("Failed to close {}: {e}", path.display());
        }
        match std::fs::remove_file(path) {
            Ok(()) => log::info!("Removed partial output {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ClosingWriter {
        closed: bool,
    }

    impl VideoWriter for ClosingWriter {
        fn open(&mut self, _: &Path, _: &VideoMetadata) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn write(&mut self, _: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.closed = true;
            Err("encoder already gone".into())
        }
    }

    #[test]
    fn test_discard_closes_and_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_1.mp4");
        std::fs::write(&path, b"partial").unwrap();

        let mut writer = ClosingWriter::default();
        writer.discard(&path);
        assert!(writer.closed);
        assert!(!path.exists());
    }

    #[test]
    fn test_discard_without_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ClosingWriter::default();
        writer.discard(&dir.path().join("never_written.mp4"));
        assert!(writer.closed);
    }
}
