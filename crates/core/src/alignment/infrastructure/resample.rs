//! Pixel resampling for alignment: anti-alias smoothing, rescaling and
//! quad warping of packed RGB frames.

use image::imageops::FilterType;

use crate::alignment::domain::face_quad::FaceQuad;
use crate::shared::frame::Frame;

/// Separable `[1, 3, 3, 1] / 8` binomial kernel used before downscaling.
pub const SMOOTHING_KERNEL: [f32; 4] = [0.125, 0.375, 0.375, 0.125];

/// Apply a separable filter in place, reusing `temp` between calls.
///
/// Even-length kernels are anchored at `len / 2`, so a 4-tap kernel reads
/// offsets `-2..=1`. Borders replicate the edge pixel.
pub fn separable_filter(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) {
    let kernel_size = kernel.len();
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let half = kernel_size / 2;

    temp.resize(width * height * channels, 0.0);

    // Horizontal pass: data → temp
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = (x as isize + k as isize - half as isize).clamp(0, width as isize - 1)
                        as usize;
                    sum += data[(y * width + sx) * channels + c] as f32 * w;
                }
                temp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    // Vertical pass: temp → data
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sy = (y as isize + k as isize - half as isize).clamp(0, height as isize - 1)
                        as usize;
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Run `passes` rounds of [`SMOOTHING_KERNEL`] over `frame`.
pub fn smooth(frame: &mut Frame, passes: usize) {
    let (w, h, c) = (
        frame.width() as usize,
        frame.height() as usize,
        frame.channels() as usize,
    );
    let mut temp = Vec::new();
    for _ in 0..passes {
        separable_filter(frame.data_mut(), w, h, c, &SMOOTHING_KERNEL, &mut temp);
    }
}

/// Bilinear resize of an RGB frame.
pub fn resize(frame: &Frame, width: u32, height: u32) -> Result<Frame, Box<dyn std::error::Error>> {
    if frame.width() == width && frame.height() == height {
        return Ok(frame.clone());
    }
    if width == 0 || height == 0 {
        return Err(format!("cannot resize to {width}x{height}").into());
    }
    let img = frame.to_rgb_image().ok_or("resize expects an RGB frame")?;
    let resized = image::imageops::resize(&img, width, height, FilterType::Triangle);
    Ok(Frame::from_rgb_image(resized, frame.index()))
}

/// Sample an RGB frame at continuous pixel coordinates, pixel centres at
/// integer positions. Out-of-frame positions clamp to the nearest edge.
fn sample_bilinear(frame: &Frame, x: f64, y: f64) -> [f64; 3] {
    let w = frame.width() as usize;
    let h = frame.height() as usize;
    let data = frame.data();

    let x = x.clamp(0.0, (w - 1) as f64);
    let y = y.clamp(0.0, (h - 1) as f64);
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let px = |xx: usize, yy: usize, c: usize| data[(yy * w + xx) * 3 + c] as f64;
    let mut out = [0.0; 3];
    for (c, v) in out.iter_mut().enumerate() {
        let top = px(x0, y0, c) * (1.0 - fx) + px(x1, y0, c) * fx;
        let bottom = px(x0, y1, c) * (1.0 - fx) + px(x1, y1, c) * fx;
        *v = top * (1.0 - fy) + bottom * fy;
    }
    out
}

/// Warp the oriented square `quad` of `frame` onto a `size` × `size` image.
///
/// The aligned face has a fixed eye distance, so the quad is close to the
/// output size and no pre-shrink is needed.
pub fn warp_quad(frame: &Frame, quad: &FaceQuad, size: u32) -> Result<Frame, Box<dyn std::error::Error>> {
    if frame.channels() != 3 || frame.width() == 0 || frame.height() == 0 {
        return Err("warp_quad expects a non-empty RGB frame".into());
    }

    let n = size as usize;
    let mut out = Vec::with_capacity(n * n * 3);
    for v in 0..n {
        for u in 0..n {
            let (sx, sy) = quad.point_at((u as f64 + 0.5) / n as f64, (v as f64 + 0.5) / n as f64);
            let px = sample_bilinear(frame, sx - 0.5, sy - 0.5);
            out.extend(px.iter().map(|c| c.round().clamp(0.0, 255.0) as u8));
        }
    }
    Ok(Frame::new(out, size, size, 3, frame.index()))
}
