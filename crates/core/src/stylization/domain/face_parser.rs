use ndarray::Array4;

use crate::shared::frame::Frame;

/// Semantic face parsing used as extra generator input.
///
/// Returns a `[N, classes, H, W]` map at the resolution of the input
/// frames, already scaled for concatenation with the image channels.
pub trait FaceParser: Send {
    fn parse(&mut self, frames: &[Frame]) -> Result<Array4<f32>, Box<dyn std::error::Error>>;
}
