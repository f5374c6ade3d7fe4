//! FFHQ-style oriented square around a face.
//!
//! The square is centred slightly below the eyes, rotated so the eye line
//! is horizontal, and sized from the larger of the eye span and the
//! eye-to-mouth distance. Warping it to a fixed-size image gives the
//! encoder the framing it was trained on.

use crate::detection::domain::face_landmarks::FaceLandmarks;

type Point = (f64, f64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceQuad {
    /// Top-left, bottom-left, bottom-right, top-right.
    pub corners: [Point; 4],
}

impl FaceQuad {
    pub fn from_landmarks(landmarks: &FaceLandmarks) -> Option<Self> {
        if !landmarks.has_alignment_points() {
            return None;
        }

        let eye_avg = landmarks.eye_center();
        let (le, re) = (landmarks.left_eye(), landmarks.right_eye());
        let eye_to_eye = (re.0 - le.0, re.1 - le.1);
        let mouth_avg = landmarks.mouth_center();
        let eye_to_mouth = (mouth_avg.0 - eye_avg.0, mouth_avg.1 - eye_avg.1);

        // Horizontal axis: eye line blended with the perpendicular of the
        // eye-mouth line
        let mut x = (
            eye_to_eye.0 + eye_to_mouth.1,
            eye_to_eye.1 - eye_to_mouth.0,
        );
        let len = x.0.hypot(x.1);
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        let half_size = (eye_to_eye.0.hypot(eye_to_eye.1) * 2.0)
            .max(eye_to_mouth.0.hypot(eye_to_mouth.1) * 1.8);
        x = (x.0 / len * half_size, x.1 / len * half_size);
        let y = (-x.1, x.0);

        let c = (eye_avg.0 + eye_to_mouth.0 * 0.1, eye_avg.1 + eye_to_mouth.1 * 0.1);
        Some(Self {
            corners: [
                (c.0 - x.0 - y.0, c.1 - x.1 - y.1),
                (c.0 - x.0 + y.0, c.1 - x.1 + y.1),
                (c.0 + x.0 + y.0, c.1 + x.1 + y.1),
                (c.0 + x.0 - y.0, c.1 + x.1 - y.1),
            ],
        })
    }

    /// Side length in source pixels.
    pub fn size(&self) -> f64 {
        let [tl, _, _, tr] = self.corners;
        (tr.0 - tl.0).hypot(tr.1 - tl.1)
    }

    /// Source position for normalised quad coordinates `(u, v)` in `[0, 1]`,
    /// `u` running along the top edge and `v` down the left edge.
    pub fn point_at(&self, u: f64, v: f64) -> Point {
        let [tl, bl, _, tr] = self.corners;
        (
            tl.0 + u * (tr.0 - tl.0) + v * (bl.0 - tl.0),
            tl.1 + u * (tr.1 - tl.1) + v * (bl.1 - tl.1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frontal() -> FaceLandmarks {
        FaceLandmarks::new([
            (100.0, 100.0),
            (164.0, 100.0),
            (132.0, 130.0),
            (110.0, 160.0),
            (154.0, 160.0),
        ])
    }

    #[test]
    fn test_frontal_quad_is_axis_aligned() {
        let quad = FaceQuad::from_landmarks(&frontal()).unwrap();
        // eye_to_eye = (64, 0), eye_to_mouth = (0, 60)
        // half size = max(128, 108) = 128, centre = (132, 106)
        let [tl, bl, br, tr] = quad.corners;
        assert_relative_eq!(tl.0, 4.0);
        assert_relative_eq!(tl.1, -22.0);
        assert_relative_eq!(bl.1, 234.0);
        assert_relative_eq!(br.0, 260.0);
        assert_relative_eq!(tr.1, -22.0);
        assert_relative_eq!(quad.size(), 256.0);
    }

    #[test]
    fn test_tilted_face_rotates_quad() {
        // Eye line rotated 90 degrees: right eye straight below left eye
        let lm = FaceLandmarks::new([
            (100.0, 100.0),
            (100.0, 164.0),
            (70.0, 132.0),
            (40.0, 110.0),
            (40.0, 154.0),
        ]);
        let quad = FaceQuad::from_landmarks(&lm).unwrap();
        let [tl, _, _, tr] = quad.corners;
        assert_relative_eq!(tl.0, tr.0, epsilon = 1e-9);
        assert!(tr.1 > tl.1);
        assert_relative_eq!(quad.size(), 256.0, epsilon = 1e-9);
    }

    #[test]
    fn test_point_at_corners() {
        let quad = FaceQuad::from_landmarks(&frontal()).unwrap();
        assert_eq!(quad.point_at(0.0, 0.0), quad.corners[0]);
        let (x, y) = quad.point_at(1.0, 1.0);
        assert_relative_eq!(x, quad.corners[2].0);
        assert_relative_eq!(y, quad.corners[2].1);
    }

    #[test]
    fn test_missing_mouth_has_no_quad() {
        let mut pts = *frontal().points();
        pts[3] = (0.0, 0.0);
        assert!(FaceQuad::from_landmarks(&FaceLandmarks::new(pts)).is_none());
    }
}
