/// BiSeNet face parser exported to ONNX.
///
/// The network runs at twice the frame resolution on doubled input; its
/// first output is brought back to frame resolution and scaled by 1/16 so
/// it can sit next to the image channels in the generator input.
use std::path::Path;

use ndarray::Array4;

use crate::detection::infrastructure::execution_provider::build_session;
use crate::shared::device::Device;
use crate::shared::frame::Frame;
use crate::stylization::domain::face_parser::FaceParser;

use super::tensor::{downsample_nearest_2x, frames_to_tensor, upsample_bilinear_2x};

const INPUT_GAIN: f32 = 2.0;
const OUTPUT_SCALE: f32 = 1.0 / 16.0;

pub struct OnnxFaceParser {
    session: ort::session::Session,
}

impl OnnxFaceParser {
    pub fn new(model_path: &Path, device: Device) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            session: build_session(model_path, device)?,
        })
    }
}

impl FaceParser for OnnxFaceParser {
    fn parse(&mut self, frames: &[Frame]) -> Result<Array4<f32>, Box<dyn std::error::Error>> {
        let input = upsample_bilinear_2x(&frames_to_tensor(frames)?) * INPUT_GAIN;
        let input_value = ort::value::Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("face parser produced no outputs".into());
        }
        let parsing = outputs[0]
            .try_extract_array::<f32>()?
            .into_dimensionality::<ndarray::Ix4>()?
            .to_owned();
        Ok(downsample_nearest_2x(&parsing) * OUTPUT_SCALE)
    }
}
