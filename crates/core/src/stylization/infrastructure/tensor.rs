//! Conversions between packed RGB frames and the `[-1, 1]` NCHW tensors
//! the stylization networks consume.

use ndarray::{s, Array4, ArrayView4};

use crate::shared::frame::Frame;

const HALF_RANGE: f32 = 127.5;

/// Stack same-sized RGB frames into an `[N, 3, H, W]` tensor with values
/// `x / 127.5 - 1`.
pub fn frames_to_tensor(frames: &[Frame]) -> Result<Array4<f32>, Box<dyn std::error::Error>> {
    let first = frames.first().ok_or("empty frame batch")?;
    let (w, h) = (first.width() as usize, first.height() as usize);
    if frames
        .iter()
        .any(|f| f.width() as usize != w || f.height() as usize != h || f.channels() != 3)
    {
        return Err("frame batch must be RGB frames of one size".into());
    }

    let mut tensor = Array4::<f32>::zeros((frames.len(), 3, h, w));
    for (n, frame) in frames.iter().enumerate() {
        let src = frame.as_ndarray();
        for y in 0..h {
            for x in 0..w {
                for c in 0..3 {
                    tensor[[n, c, y, x]] = src[[y, x, c]] as f32 / HALF_RANGE - 1.0;
                }
            }
        }
    }
    Ok(tensor)
}

/// Inverse of [`frames_to_tensor`]; values are clamped to `[-1, 1]` first.
/// Frames are numbered from `first_index`.
pub fn tensor_to_frames(tensor: ArrayView4<'_, f32>, first_index: usize) -> Vec<Frame> {
    let (n, c, h, w) = tensor.dim();
    (0..n)
        .map(|i| {
            let mut data = Vec::with_capacity(h * w * 3);
            for y in 0..h {
                for x in 0..w {
                    for ch in 0..3 {
                        let v = if ch < c { tensor[[i, ch, y, x]] } else { -1.0 };
                        let px = (v.clamp(-1.0, 1.0) + 1.0) * HALF_RANGE;
                        data.push(px.round() as u8);
                    }
                }
            }
            Frame::new(data, w as u32, h as u32, 3, first_index + i)
        })
        .collect()
}

/// 2× bilinear upsampling with half-pixel centres and edge clamping.
pub fn upsample_bilinear_2x(tensor: &Array4<f32>) -> Array4<f32> {
    let (n, c, h, w) = tensor.dim();
    let mut out = Array4::<f32>::zeros((n, c, h * 2, w * 2));

    let taps = |dst: usize, len: usize| -> (usize, usize, f32) {
        let src = ((dst as f32 + 0.5) / 2.0 - 0.5).max(0.0);
        let i0 = (src.floor() as usize).min(len - 1);
        let i1 = (i0 + 1).min(len - 1);
        (i0, i1, src - i0 as f32)
    };

    for oy in 0..h * 2 {
        let (y0, y1, fy) = taps(oy, h);
        for ox in 0..w * 2 {
            let (x0, x1, fx) = taps(ox, w);
            for b in 0..n {
                for ch in 0..c {
                    let top = tensor[[b, ch, y0, x0]] * (1.0 - fx) + tensor[[b, ch, y0, x1]] * fx;
                    let bottom =
                        tensor[[b, ch, y1, x0]] * (1.0 - fx) + tensor[[b, ch, y1, x1]] * fx;
                    out[[b, ch, oy, ox]] = top * (1.0 - fy) + bottom * fy;
                }
            }
        }
    }
    out
}

/// 2× nearest-neighbour downsampling: keeps even rows and columns.
pub fn downsample_nearest_2x(tensor: &Array4<f32>) -> Array4<f32> {
    tensor.slice(s![.., .., ..;2, ..;2]).to_owned()
}
