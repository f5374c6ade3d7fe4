use ndarray::{Array2, Array4};

use crate::shared::frame::Frame;

/// The style-transfer network.
///
/// Takes a batch of same-sized aligned frames, their parsing maps and the
/// mixed W+ code, and returns stylized frames at 4× resolution.
pub trait ToonifyGenerator: Send {
    fn generate(
        &mut self,
        frames: &[Frame],
        parsing: &Array4<f32>,
        style: &Array2<f32>,
        degree: f32,
    ) -> Result<Vec<Frame>, Box<dyn std::error::Error>>;
}
