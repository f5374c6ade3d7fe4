use crate::detection::domain::face_landmarks::FaceLandmarks;

use super::padding::Padding;

/// Crop edges are aligned to this grid so the generator's strided layers
/// see whole blocks.
pub const CROP_ALIGNMENT: u32 = 8;

/// Inter-ocular distance, in pixels, the frame is rescaled to.
pub const TARGET_EYE_DISTANCE: f64 = 64.0;

/// How a frame is rescaled and cropped around a face.
///
/// Computed once from the first frame of a video and reused for every
/// following frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropParameters {
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl CropParameters {
    /// Rescale so the eyes sit `TARGET_EYE_DISTANCE` apart and keep
    /// `padding` pixels around the eye midpoint.
    ///
    /// Returns `None` when the eyes are not ordered left to right or the
    /// crop would be empty.
    pub fn compute(
        landmarks: &FaceLandmarks,
        frame_width: u32,
        frame_height: u32,
        padding: &Padding,
    ) -> Option<Self> {
        let eye_span = landmarks.eye_span();
        if eye_span.is_nan() || eye_span <= 0.0 || !landmarks.has_alignment_points() {
            return None;
        }

        let scale = TARGET_EYE_DISTANCE / eye_span;
        let (ex, ey) = landmarks.eye_center();
        let (cx, cy) = (ex * scale, ey * scale);
        let w = (frame_width as f64 * scale).round() as i64;
        let h = (frame_height as f64 * scale).round() as i64;

        let grid = CROP_ALIGNMENT as i64;
        let snap = |v: i64| v.div_euclid(grid) * grid;
        let left = snap(((cx - padding.left() as f64).round() as i64).max(0));
        let right = snap(((cx + padding.right() as f64).round() as i64).min(w));
        let top = snap(((cy - padding.top() as f64).round() as i64).max(0));
        let bottom = snap(((cy + padding.bottom() as f64).round() as i64).min(h));

        if right <= left || bottom <= top {
            return None;
        }

        Some(Self {
            scale,
            scaled_width: w as u32,
            scaled_height: h as u32,
            left: left as u32,
            right: right as u32,
            top: top as u32,
            bottom: bottom as u32,
        })
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Number of `[1,3,3,1]` smoothing passes to run before downscaling,
    /// which keeps heavy downscales from aliasing.
    pub fn smoothing_passes(&self) -> usize {
        usize::from(self.scale <= 0.75) + usize::from(self.scale <= 0.375)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn face(left_eye_x: f64, right_eye_x: f64, eye_y: f64) -> FaceLandmarks {
        let mid = (left_eye_x + right_eye_x) / 2.0;
        FaceLandmarks::new([
            (left_eye_x, eye_y),
            (right_eye_x, eye_y),
            (mid, eye_y + 30.0),
            (left_eye_x + 5.0, eye_y + 60.0),
            (right_eye_x - 5.0, eye_y + 60.0),
        ])
    }

    #[test]
    fn test_unit_scale_centered_face() {
        // Eyes 64 apart: no rescale; eye midpoint at (500, 400)
        let params =
            CropParameters::compute(&face(468.0, 532.0, 400.0), 1000, 800, &Padding::default())
                .unwrap();
        assert_relative_eq!(params.scale, 1.0);
        assert_eq!((params.scaled_width, params.scaled_height), (1000, 800));
        assert_eq!((params.left, params.right), (296, 696));
        assert_eq!((params.top, params.bottom), (200, 600));
        assert_eq!((params.width(), params.height()), (400, 400));
    }

    #[test]
    fn test_downscale_by_half() {
        // Eyes 128 apart: scale 0.5, frame 2000x1600 → 1000x800
        let params =
            CropParameters::compute(&face(936.0, 1064.0, 800.0), 2000, 1600, &Padding::default())
                .unwrap();
        assert_relative_eq!(params.scale, 0.5);
        assert_eq!((params.scaled_width, params.scaled_height), (1000, 800));
        assert_eq!((params.left, params.right), (296, 696));
        assert_eq!(params.smoothing_passes(), 1);
    }

    #[test]
    fn test_crop_clamped_to_scaled_frame() {
        // Face near the top-left corner
        let params =
            CropParameters::compute(&face(20.0, 84.0, 30.0), 300, 260, &Padding::default())
                .unwrap();
        assert_eq!(params.left, 0);
        assert_eq!(params.top, 0);
        // min(52 + 200, 300) = 252 → 248; min(30 + 200, 260) = 230 → 224
        assert_eq!(params.right, 248);
        assert_eq!(params.bottom, 224);
    }

    #[rstest]
    #[case(468.0, 532.0, 1000, 800, 128, 256)]
    #[case(10.0, 30.0, 640, 480, 200, 200)]
    #[case(700.0, 900.0, 1920, 1080, 256, 136)]
    #[case(333.3, 377.7, 777, 555, 184, 248)]
    fn test_edges_on_grid_and_inside_frame(
        #[case] lx: f64,
        #[case] rx: f64,
        #[case] w: u32,
        #[case] h: u32,
        #[case] pad_a: i64,
        #[case] pad_b: i64,
    ) {
        let padding = Padding::new(pad_a, pad_b, pad_b, pad_a);
        let params = CropParameters::compute(&face(lx, rx, h as f64 / 3.0), w, h, &padding).unwrap();
        for edge in [params.left, params.right, params.top, params.bottom] {
            assert_eq!(edge % CROP_ALIGNMENT, 0);
        }
        assert!(params.right <= params.scaled_width);
        assert!(params.bottom <= params.scaled_height);
        assert!(params.left < params.right);
        assert!(params.top < params.bottom);
    }

    #[test]
    fn test_reversed_eyes_are_rejected() {
        assert!(
            CropParameters::compute(&face(532.0, 468.0, 400.0), 1000, 800, &Padding::default())
                .is_none()
        );
    }

    #[test]
    fn test_hidden_eye_is_rejected() {
        let mut pts = *face(468.0, 532.0, 400.0).points();
        pts[0] = (0.0, 0.0);
        let lm = FaceLandmarks::new(pts);
        assert!(CropParameters::compute(&lm, 1000, 800, &Padding::default()).is_none());
    }

    #[rstest]
    #[case(1.5, 0)]
    #[case(0.76, 0)]
    #[case(0.75, 1)]
    #[case(0.5, 1)]
    #[case(0.375, 2)]
    #[case(0.1, 2)]
    fn test_smoothing_passes(#[case] scale: f64, #[case] expected: usize) {
        let params = CropParameters {
            scale,
            scaled_width: 100,
            scaled_height: 100,
            left: 0,
            right: 8,
            top: 0,
            bottom: 8,
        };
        assert_eq!(params.smoothing_passes(), expected);
    }
}
