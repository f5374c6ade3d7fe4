use std::path::Path;
use std::time::Instant;

use crate::alignment::domain::padding::Padding;
use crate::detection::domain::face_detector::FaceDetector;
use crate::stylization::domain::style_encoder::StyleEncoder;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::align_frame_use_case::{apply_crop, AlignFrameUseCase, AlignedFace};
use super::pipeline_logger::{elapsed_ms, PipelineLogger};

type DynError = Box<dyn std::error::Error>;

#[derive(Debug)]
pub enum AlignVideoOutcome {
    /// The source could not be opened or has no frames.
    Unreadable(String),
    NoFace,
    Aligned {
        first: AlignedFace,
        frames_written: usize,
    },
}

/// Aligns the first frame of a clip, then crops up to `frame_limit` frames
/// with the same parameters into a new video.
pub struct AlignVideoUseCase<'a> {
    reader: Box<dyn VideoReader>,
    writer: Box<dyn VideoWriter>,
    detector: &'a mut dyn FaceDetector,
    encoder: &'a mut dyn StyleEncoder,
    logger: &'a mut dyn PipelineLogger,
    frame_limit: usize,
}

impl<'a> AlignVideoUseCase<'a> {
    pub fn new(
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        detector: &'a mut dyn FaceDetector,
        encoder: &'a mut dyn StyleEncoder,
        logger: &'a mut dyn PipelineLogger,
        frame_limit: usize,
    ) -> Self {
        Self {
            reader,
            writer,
            detector,
            encoder,
            logger,
            frame_limit: frame_limit.max(1),
        }
    }

    pub fn execute(
        mut self,
        input: &Path,
        output: &Path,
        padding: &Padding,
    ) -> Result<AlignVideoOutcome, DynError> {
        let metadata = match self.reader.open(input) {
            Ok(m) => m,
            Err(e) => return Ok(AlignVideoOutcome::Unreadable(e.to_string())),
        };
        let total = match metadata.total_frames {
            0 => self.frame_limit,
            n => n.min(self.frame_limit),
        };

        let mut frames = self.reader.frames();
        let first_frame = match frames.next() {
            Some(Ok(frame)) => frame,
            Some(Err(e)) => return Ok(AlignVideoOutcome::Unreadable(e.to_string())),
            None => return Ok(AlignVideoOutcome::Unreadable("video has no frames".into())),
        };

        let Some(first) = AlignFrameUseCase::new(&mut *self.detector, &mut *self.encoder)
            .execute(&first_frame, padding)?
        else {
            return Ok(AlignVideoOutcome::NoFace);
        };

        let out_meta = metadata.resized(first.crop.width(), first.crop.height());
        let frame_limit = self.frame_limit;
        let write_clip = || -> Result<usize, DynError> {
            self.writer.open(output, &out_meta)?;
            self.writer.write(&first.face)?;
            let mut written = 1;
            self.logger.progress(written, total);

            for frame in frames.take(frame_limit - 1) {
                let frame = frame?;
                let start = Instant::now();
                let cropped = apply_crop(&frame, &first.crop)?;
                self.logger.timing("crop", elapsed_ms(start));
                self.writer.write(&cropped)?;
                written += 1;
                self.logger.progress(written, total);
            }
            self.writer.close()?;
            Ok(written)
        };
        let written = match write_clip() {
            Ok(n) => n,
            Err(e) => {
                self.writer.discard(output);
                return Err(e);
            }
        };

        self.reader.close();
        self.logger.info(&format!(
            "Aligned {written} frames to {}x{}",
            first.crop.width(),
            first.crop.height()
        ));

        Ok(AlignVideoOutcome::Aligned {
            first,
            frames_written: written,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::shared::frame::Frame;
    use crate::shared::video_metadata::VideoMetadata;

    pub struct VecReader {
        pub frames: Vec<Frame>,
        pub fail_open: bool,
    }

    impl VideoReader for VecReader {
        fn open(&mut self, path: &Path) -> Result<VideoMetadata, DynError> {
            if self.fail_open {
                return Err("cannot open".into());
            }
            let (w, h) = self
                .frames
                .first()
                .map_or((0, 0), |f| (f.width(), f.height()));
            Ok(VideoMetadata {
                width: w,
                height: h,
                fps: 25.0,
                total_frames: self.frames.len(),
                codec: "h264".into(),
                source_path: Some(path.to_path_buf()),
            })
        }

        fn frames(&mut self) -> Box<dyn Iterator<Item = Result<Frame, DynError>> + '_> {
            Box::new(std::mem::take(&mut self.frames).into_iter().map(Ok))
        }

        fn close(&mut self) {}
    }

    /// Records written frames in shared storage so tests can inspect them
    /// after the use case consumes the writer.
    #[derive(Clone, Default)]
    pub struct RecordingWriter {
        pub opened: Arc<Mutex<Option<VideoMetadata>>>,
        pub frames: Arc<Mutex<Vec<Frame>>>,
        pub closed: Arc<Mutex<bool>>,
        /// Writes fail once this many frames have been recorded.
        pub fail_after: Option<usize>,
    }

    impl VideoWriter for RecordingWriter {
        fn open(&mut self, _path: &Path, metadata: &VideoMetadata) -> Result<(), DynError> {
            *self.opened.lock().unwrap() = Some(metadata.clone());
            Ok(())
        }

        fn write(&mut self, frame: &Frame) -> Result<(), DynError> {
            let mut frames = self.frames.lock().unwrap();
            if self.fail_after.is_some_and(|n| frames.len() >= n) {
                return Err("disk full".into());
            }
            frames.push(frame.clone());
            Ok(())
        }

        fn close(&mut self) -> Result<(), DynError> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }
}
