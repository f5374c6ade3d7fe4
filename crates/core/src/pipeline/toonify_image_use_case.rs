use std::time::Instant;

use crate::shared::frame::Frame;
use crate::stylization::domain::face_parser::FaceParser;
use crate::stylization::domain::style_code::{StyleCode, StyleInputCode};
use crate::stylization::domain::toonify_generator::ToonifyGenerator;

use super::pipeline_logger::{elapsed_ms, PipelineLogger};

type DynError = Box<dyn std::error::Error>;

/// Stylizes one aligned face.
pub struct ToonifyImageUseCase<'a> {
    parser: &'a mut dyn FaceParser,
    generator: &'a mut dyn ToonifyGenerator,
    logger: &'a mut dyn PipelineLogger,
}

impl<'a> ToonifyImageUseCase<'a> {
    pub fn new(
        parser: &'a mut dyn FaceParser,
        generator: &'a mut dyn ToonifyGenerator,
        logger: &'a mut dyn PipelineLogger,
    ) -> Self {
        Self {
            parser,
            generator,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        face: &Frame,
        style_input: &StyleInputCode,
        style_code: &StyleCode,
        degree: f32,
    ) -> Result<Frame, DynError> {
        let batch = std::slice::from_ref(face);

        let start = Instant::now();
        let parsing = self.parser.parse(batch)?;
        self.logger.timing("parse", elapsed_ms(start));

        let start = Instant::now();
        let style = style_code.mix_into(style_input);
        let mut out = self.generator.generate(batch, &parsing, &style, degree)?;
        self.logger.timing("generate", elapsed_ms(start));

        out.pop().ok_or_else(|| "generator returned no image".into())
    }
}
