use std::path::Path;
use std::time::Instant;

use crate::shared::constants::GENERATOR_UPSCALE;
use crate::shared::device::Device;
use crate::shared::frame::Frame;
use crate::stylization::domain::face_parser::FaceParser;
use crate::stylization::domain::style_code::{StyleCode, StyleInputCode};
use crate::stylization::domain::toonify_generator::ToonifyGenerator;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::pipeline_logger::{elapsed_ms, PipelineLogger};

type DynError = Box<dyn std::error::Error>;

/// Frames per generator call, sized so a batch fits in memory.
///
/// CPU: `max(1, 4·256·256 / (w·h))`. GPU: the same rule against 400×360,
/// capped at 4.
pub fn batch_size(device: Device, width: u32, height: u32) -> usize {
    let pixels = (width as usize * height as usize).max(1);
    match device {
        Device::Cpu => (4 * 256 * 256 / pixels).max(1),
        Device::Gpu(_) => (4 * 400 * 360 / pixels).clamp(1, 4),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ToonifyVideoOutcome {
    Unreadable(String),
    Done { frames: usize },
}

/// Stylizes an aligned clip batch by batch into a video at 4× resolution.
pub struct ToonifyVideoUseCase<'a> {
    reader: Box<dyn VideoReader>,
    writer: Box<dyn VideoWriter>,
    parser: &'a mut dyn FaceParser,
    generator: &'a mut dyn ToonifyGenerator,
    logger: &'a mut dyn PipelineLogger,
    device: Device,
}

impl<'a> ToonifyVideoUseCase<'a> {
    pub fn new(
        reader: Box<dyn VideoReader>,
        writer: Box<dyn VideoWriter>,
        parser: &'a mut dyn FaceParser,
        generator: &'a mut dyn ToonifyGenerator,
        logger: &'a mut dyn PipelineLogger,
        device: Device,
    ) -> Self {
        Self {
            reader,
            writer,
            parser,
            generator,
            logger,
            device,
        }
    }

    pub fn execute(
        mut self,
        input: &Path,
        output: &Path,
        style_input: &StyleInputCode,
        style_code: &StyleCode,
        degree: f32,
    ) -> Result<ToonifyVideoOutcome, DynError> {
        let metadata = match self.reader.open(input) {
            Ok(m) => m,
            Err(e) => return Ok(ToonifyVideoOutcome::Unreadable(e.to_string())),
        };
        let limit = self.device.video_frame_limit();
        let total = match metadata.total_frames {
            0 => limit,
            n => n.min(limit),
        };
        let batch = batch_size(self.device, metadata.width, metadata.height);
        self.logger.metric("batch_size", batch as f64);

        let style = style_code.mix_into(style_input);
        let out_meta = metadata.resized(
            metadata.width * GENERATOR_UPSCALE,
            metadata.height * GENERATOR_UPSCALE,
        );

        let mut frames = self.reader.frames().take(limit);
        let mut pending: Vec<Frame> = Vec::with_capacity(batch);
        let mut done = 0;
        let mut opened = false;

        let mut stylize = || -> Result<(), DynError> {
            loop {
                pending.clear();
                for frame in frames.by_ref().take(batch) {
                    pending.push(frame?);
                }
                if pending.is_empty() {
                    return Ok(());
                }

                let start = Instant::now();
                let parsing = self.parser.parse(&pending)?;
                self.logger.timing("parse", elapsed_ms(start));

                let start = Instant::now();
                let stylized = self.generator.generate(&pending, &parsing, &style, degree)?;
                self.logger.timing("generate", elapsed_ms(start));

                if !opened {
                    opened = true;
                    self.writer.open(output, &out_meta)?;
                }
                for frame in &stylized {
                    self.writer.write(frame)?;
                }
                done += stylized.len();
                self.logger.progress(done, total);
            }
        };
        if let Err(e) = stylize() {
            if opened {
                self.writer.discard(output);
            }
            return Err(e);
        }
        drop(frames);

        if !opened {
            return Ok(ToonifyVideoOutcome::Unreadable("video has no frames".into()));
        }
        if let Err(e) = self.writer.close() {
            self.writer.discard(output);
            return Err(e);
        }
        self.reader.close();
        self.logger.summary();

        Ok(ToonifyVideoOutcome::Done { frames: done })
    }
}
