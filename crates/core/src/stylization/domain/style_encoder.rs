use crate::shared::frame::Frame;

use super::style_code::StyleInputCode;

/// Encodes an FFHQ-aligned 256×256 face into its W+ style code.
pub trait StyleEncoder: Send {
    fn encode(&mut self, aligned_face: &Frame) -> Result<StyleInputCode, Box<dyn std::error::Error>>;
}
