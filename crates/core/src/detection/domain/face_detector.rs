use crate::shared::frame::Frame;

use super::face_landmarks::FaceLandmarks;

/// A face found in a frame, in frame pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceDetection {
    /// `[x1, y1, x2, y2]`.
    pub bbox: [f64; 4],
    pub score: f64,
    pub landmarks: Option<FaceLandmarks>,
}

impl FaceDetection {
    pub fn area(&self) -> f64 {
        (self.bbox[2] - self.bbox[0]).max(0.0) * (self.bbox[3] - self.bbox[1]).max(0.0)
    }
}

/// Domain interface for face detection.
///
/// `&mut self` because ONNX sessions need exclusive access to run.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>>;
}

/// Picks the face alignment should use: the most confident detection whose
/// eyes and mouth corners are all visible.
pub fn primary_face(detections: &[FaceDetection]) -> Option<&FaceLandmarks> {
    detections
        .iter()
        .filter(|d| {
            d.landmarks
                .as_ref()
                .is_some_and(FaceLandmarks::has_alignment_points)
        })
        .max_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .and_then(|d| d.landmarks.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(score: f64, landmarks: Option<FaceLandmarks>) -> FaceDetection {
        FaceDetection {
            bbox: [10.0, 10.0, 110.0, 130.0],
            score,
            landmarks,
        }
    }

    fn visible_landmarks(offset: f64) -> FaceLandmarks {
        FaceLandmarks::new([
            (40.0 + offset, 50.0),
            (80.0 + offset, 50.0),
            (60.0 + offset, 70.0),
            (45.0 + offset, 95.0),
            (75.0 + offset, 95.0),
        ])
    }

    #[test]
    fn test_area() {
        assert_eq!(detection(0.9, None).area(), 100.0 * 120.0);
    }

    #[test]
    fn test_primary_face_prefers_highest_score() {
        let dets = vec![
            detection(0.6, Some(visible_landmarks(0.0))),
            detection(0.9, Some(visible_landmarks(100.0))),
        ];
        let lm = primary_face(&dets).unwrap();
        assert_eq!(lm.left_eye().0, 140.0);
    }

    #[test]
    fn test_primary_face_skips_faces_without_landmarks() {
        let mut hidden = [(0.0, 0.0); 5];
        hidden[2] = (60.0, 70.0);
        let dets = vec![
            detection(0.99, None),
            detection(0.95, Some(FaceLandmarks::new(hidden))),
            detection(0.5, Some(visible_landmarks(0.0))),
        ];
        let lm = primary_face(&dets).unwrap();
        assert_eq!(lm.left_eye().0, 40.0);
    }

    #[test]
    fn test_primary_face_empty() {
        assert!(primary_face(&[]).is_none());
    }
}
