/// VToonify generator exported to ONNX.
///
/// Inputs, in order: the frames concatenated with their parsing maps
/// `[N, 3 + classes, H, W]`, the mixed W+ code `[N, 18, 512]` and the style
/// degree `[1]`. Output `[N, 3, 4H, 4W]` in `[-1, 1]`.
use std::path::Path;

use ndarray::{concatenate, Array1, Array2, Array3, Array4, Axis};

use crate::detection::infrastructure::execution_provider::build_session;
use crate::shared::device::Device;
use crate::shared::frame::Frame;
use crate::stylization::domain::toonify_generator::ToonifyGenerator;

use super::tensor::{frames_to_tensor, tensor_to_frames};

pub struct OnnxToonifyGenerator {
    session: ort::session::Session,
}

impl OnnxToonifyGenerator {
    pub fn new(model_path: &Path, device: Device) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            session: build_session(model_path, device)?,
        })
    }
}

/// Repeat a `[18, 512]` code along a new batch axis.
fn batched_style(style: &Array2<f32>, batch: usize) -> Option<Array3<f32>> {
    let (layers, dim) = style.dim();
    style.broadcast((batch, layers, dim)).map(|v| v.to_owned())
}

impl ToonifyGenerator for OnnxToonifyGenerator {
    fn generate(
        &mut self,
        frames: &[Frame],
        parsing: &Array4<f32>,
        style: &Array2<f32>,
        degree: f32,
    ) -> Result<Vec<Frame>, Box<dyn std::error::Error>> {
        let image = frames_to_tensor(frames)?;
        let (n, _, h, w) = image.dim();
        let (pn, _, ph, pw) = parsing.dim();
        if (pn, ph, pw) != (n, h, w) {
            return Err(format!(
                "parsing map {:?} does not match frame batch {:?}",
                parsing.shape(),
                image.shape()
            )
            .into());
        }
        let x = concatenate(Axis(1), &[image.view(), parsing.view()])?;
        let s_w = batched_style(style, n).ok_or("style code cannot be batched")?;
        let d_s = Array1::from_elem(1, degree);

        let outputs = self.session.run(ort::inputs![
            ort::value::Tensor::from_array(x)?,
            ort::value::Tensor::from_array(s_w)?,
            ort::value::Tensor::from_array(d_s)?
        ])?;
        if outputs.len() == 0 {
            return Err("generator produced no outputs".into());
        }
        let y = outputs[0]
            .try_extract_array::<f32>()?
            .into_dimensionality::<ndarray::Ix4>()?;
        let first_index = frames.first().map_or(0, Frame::index);
        Ok(tensor_to_frames(y, first_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batched_style_repeats_code() {
        let style = Array2::from_shape_fn((18, 512), |(l, d)| (l * 1000 + d) as f32);
        let batched = batched_style(&style, 3).unwrap();
        assert_eq!(batched.shape(), &[3, 18, 512]);
        for b in 0..3 {
            assert_eq!(batched[[b, 5, 7]], 5007.0);
        }
    }

    #[test]
    fn test_missing_model_is_error() {
        assert!(OnnxToonifyGenerator::new(Path::new("/nonexistent/g.onnx"), Device::Cpu).is_err());
    }
}
