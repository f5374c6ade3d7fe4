/// YOLO-pose face detector using ONNX Runtime via `ort`.
///
/// Handles letterbox preprocessing, inference, NMS post-processing and maps
/// the five keypoints back to frame coordinates for alignment.
use std::path::Path;

use crate::detection::domain::face_detector::{FaceDetection, FaceDetector};
use crate::detection::domain::face_landmarks::FaceLandmarks;
use crate::shared::device::Device;
use crate::shared::frame::Frame;

use super::execution_provider::build_session;
use super::math::nms;

/// Fallback YOLO model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default confidence threshold for face detection.
pub const DEFAULT_CONFIDENCE: f64 = 0.25;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// Number of keypoints per detection (5 landmarks × 3 values each: x, y, conf).
const NUM_KEYPOINT_VALUES: usize = 15;

/// Minimum keypoint confidence to treat a landmark as visible.
const KEYPOINT_CONF_THRESH: f64 = 0.5;

/// YOLO face detector backed by an ONNX Runtime session.
pub struct OnnxYoloDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxYoloDetector {
    /// Load a YOLO ONNX model and prepare for inference.
    ///
    /// The input resolution is read from the model's input shape (expecting NCHW).
    /// Falls back to 640 if the shape is dynamic or unreadable.
    pub fn new(
        model_path: &Path,
        device: Device,
        confidence: f64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = build_session(model_path, device)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| match input.dtype() {
                ort::value::ValueType::Tensor { shape, .. } if shape.len() >= 4 && shape[2] > 0 => {
                    Some(shape[2] as u32)
                }
                _ => None,
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl FaceDetector for OnnxYoloDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        let (input_tensor, letterbox) = letterbox(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let raw = parse_detections(data, &shape, self.confidence, &letterbox)?;
        let boxes: Vec<([f64; 4], f64)> = raw.iter().map(|d| (d.bbox, d.score)).collect();
        let kept = nms(&boxes, NMS_IOU_THRESH);

        Ok(kept.into_iter().map(|i| raw[i].clone()).collect())
    }
}

/// Mapping from letterboxed model coordinates back to frame coordinates.
#[derive(Clone, Copy, Debug)]
struct Letterbox {
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

impl Letterbox {
    fn to_frame(self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.pad_x as f64) / self.scale,
            (y - self.pad_y as f64) / self.scale,
        )
    }
}

/// Decode the raw YOLO output.
///
/// Output shape is `[1, num_features, num_detections]` (transposed) or
/// `[1, num_detections, num_features]`; both are handled. Each row is
/// `[cx, cy, w, h, conf, kp0_x, kp0_y, kp0_conf, ...]`.
fn parse_detections(
    data: &[f32],
    shape: &[usize],
    confidence: f64,
    letterbox: &Letterbox,
) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>> {
    if shape.len() != 3 {
        return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
    }
    let transposed = shape[1] < shape[2];
    let (num_dets, num_feats) = if transposed {
        (shape[2], shape[1])
    } else {
        (shape[1], shape[2])
    };
    if data.len() < num_dets * num_feats {
        return Err("YOLO output shorter than its shape".into());
    }

    let value = |det: usize, feat: usize| -> f64 {
        if transposed {
            data[feat * num_dets + det] as f64
        } else {
            data[det * num_feats + feat] as f64
        }
    };

    let mut detections = Vec::new();
    if num_feats < 5 {
        return Ok(detections);
    }

    for i in 0..num_dets {
        let score = value(i, 4);
        if score < confidence {
            continue;
        }

        let (cx, cy, w, h) = (value(i, 0), value(i, 1), value(i, 2), value(i, 3));
        let (x1, y1) = letterbox.to_frame(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.to_frame(cx + w / 2.0, cy + h / 2.0);

        let landmarks = (num_feats >= 5 + NUM_KEYPOINT_VALUES).then(|| {
            let mut pts = [(0.0f64, 0.0f64); 5];
            for (k, pt) in pts.iter_mut().enumerate() {
                let base = 5 + k * 3;
                // Low-confidence points stay at (0, 0), which FaceLandmarks treats as invisible
                if value(i, base + 2) >= KEYPOINT_CONF_THRESH {
                    *pt = letterbox.to_frame(value(i, base), value(i, base + 1));
                }
            }
            FaceLandmarks::new(pts)
        });

        detections.push(FaceDetection {
            bbox: [x1, y1, x2, y2],
            score,
            landmarks,
        });
    }
    Ok(detections)
}

/// Letterbox-resize a frame to `target_size` × `target_size`.
///
/// Returns the NCHW float32 tensor and the coordinate mapping.
fn letterbox(frame: &Frame, target_size: u32) -> (ndarray::Array4<f32>, Letterbox) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    // Padded with 114/255 gray, YOLO convention
    let gray = 114.0f32 / 255.0;
    let mut tensor =
        ndarray::Array4::<f32>::from_elem((1, 3, target_size as usize, target_size as usize), gray);

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (
        tensor,
        Letterbox {
            scale,
            pad_x,
            pad_y,
        },
    )
}
