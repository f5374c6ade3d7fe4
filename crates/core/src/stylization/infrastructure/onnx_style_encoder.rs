/// pSp style encoder exported to ONNX.
///
/// Input `[1, 3, 256, 256]` in `[-1, 1]`; output the `[1, 18, 512]` W+ code.
use std::path::Path;

use crate::detection::infrastructure::execution_provider::build_session;
use crate::shared::constants::ALIGNED_FACE_SIZE;
use crate::shared::device::Device;
use crate::shared::frame::Frame;
use crate::stylization::domain::style_code::StyleInputCode;
use crate::stylization::domain::style_encoder::StyleEncoder;

use super::tensor::frames_to_tensor;

pub struct OnnxStyleEncoder {
    session: ort::session::Session,
}

impl OnnxStyleEncoder {
    pub fn new(model_path: &Path, device: Device) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            session: build_session(model_path, device)?,
        })
    }
}

impl StyleEncoder for OnnxStyleEncoder {
    fn encode(&mut self, aligned_face: &Frame) -> Result<StyleInputCode, Box<dyn std::error::Error>> {
        if aligned_face.width() != ALIGNED_FACE_SIZE || aligned_face.height() != ALIGNED_FACE_SIZE {
            return Err(format!(
                "style encoder expects a {ALIGNED_FACE_SIZE}x{ALIGNED_FACE_SIZE} face, got {}x{}",
                aligned_face.width(),
                aligned_face.height()
            )
            .into());
        }

        let input = frames_to_tensor(std::slice::from_ref(aligned_face))?;
        let input_value = ort::value::Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("style encoder produced no outputs".into());
        }
        let code = outputs[0].try_extract_array::<f32>()?;
        Ok(StyleInputCode::from_vec(code.iter().copied().collect())?)
    }
}
