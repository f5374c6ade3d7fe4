//! 5-point face landmarks: eyes, nose tip and mouth corners.
//!
//! "Left" and "right" are image directions, so a frontal face has
//! `left_eye.x < right_eye.x`.

const LEFT_EYE: usize = 0;
const RIGHT_EYE: usize = 1;
const NOSE: usize = 2;
const LEFT_MOUTH: usize = 3;
const RIGHT_MOUTH: usize = 4;

type Point = (f64, f64);

#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    /// Points with x <= 0 are treated as invisible.
    points: [Point; 5],
}

impl FaceLandmarks {
    pub fn new(points: [Point; 5]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point; 5] {
        &self.points
    }

    pub fn left_eye(&self) -> Point {
        self.points[LEFT_EYE]
    }

    pub fn right_eye(&self) -> Point {
        self.points[RIGHT_EYE]
    }

    pub fn nose(&self) -> Point {
        self.points[NOSE]
    }

    pub fn left_mouth(&self) -> Point {
        self.points[LEFT_MOUTH]
    }

    pub fn right_mouth(&self) -> Point {
        self.points[RIGHT_MOUTH]
    }

    pub fn has_visible(&self) -> bool {
        self.points.iter().any(|(x, _)| *x > 0.0)
    }

    /// Both eyes and both mouth corners are visible.
    pub fn has_alignment_points(&self) -> bool {
        [LEFT_EYE, RIGHT_EYE, LEFT_MOUTH, RIGHT_MOUTH]
            .iter()
            .all(|&i| self.points[i].0 > 0.0)
    }

    pub fn eye_center(&self) -> Point {
        midpoint(self.left_eye(), self.right_eye())
    }

    pub fn mouth_center(&self) -> Point {
        midpoint(self.left_mouth(), self.right_mouth())
    }

    /// Signed horizontal eye distance; non-positive for unusable detections.
    pub fn eye_span(&self) -> f64 {
        self.right_eye().0 - self.left_eye().0
    }

    /// Landmarks in the coordinate space of a crop at `(x, y)` of a frame
    /// rescaled by `scale`.
    pub fn rescaled(&self, scale: f64, x: f64, y: f64) -> Self {
        let mut points = self.points;
        for p in &mut points {
            if p.0 > 0.0 {
                *p = (p.0 * scale - x, p.1 * scale - y);
            }
        }
        Self { points }
    }
}

fn midpoint(a: Point, b: Point) -> Point {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn frontal_landmarks() -> FaceLandmarks {
        FaceLandmarks::new([
            (440.0, 350.0), // left_eye
            (560.0, 350.0), // right_eye
            (500.0, 420.0), // nose
            (460.0, 470.0), // left_mouth
            (540.0, 470.0), // right_mouth
        ])
    }

    #[test]
    fn test_accessors() {
        let lm = frontal_landmarks();
        assert_eq!(lm.left_eye(), (440.0, 350.0));
        assert_eq!(lm.right_eye(), (560.0, 350.0));
        assert_eq!(lm.nose(), (500.0, 420.0));
        assert_eq!(lm.left_mouth(), (460.0, 470.0));
        assert_eq!(lm.right_mouth(), (540.0, 470.0));
    }

    #[test]
    fn test_has_visible_none_visible() {
        let lm = FaceLandmarks::new([(0.0, 0.0); 5]);
        assert!(!lm.has_visible());
    }

    #[test]
    fn test_centers_and_span() {
        let lm = frontal_landmarks();
        assert_eq!(lm.eye_center(), (500.0, 350.0));
        assert_eq!(lm.mouth_center(), (500.0, 470.0));
        assert_relative_eq!(lm.eye_span(), 120.0);
    }

    #[test]
    fn test_has_alignment_points_frontal() {
        assert!(frontal_landmarks().has_alignment_points());
    }

    #[rstest]
    #[case::left_eye(LEFT_EYE)]
    #[case::right_eye(RIGHT_EYE)]
    #[case::left_mouth(LEFT_MOUTH)]
    #[case::right_mouth(RIGHT_MOUTH)]
    fn test_has_alignment_points_missing(#[case] hidden: usize) {
        let mut pts = *frontal_landmarks().points();
        pts[hidden] = (0.0, 0.0);
        assert!(!FaceLandmarks::new(pts).has_alignment_points());
    }

    #[test]
    fn test_missing_nose_still_alignable() {
        let mut pts = *frontal_landmarks().points();
        pts[NOSE] = (0.0, 0.0);
        assert!(FaceLandmarks::new(pts).has_alignment_points());
    }

    #[test]
    fn test_rescaled_maps_into_crop() {
        let lm = frontal_landmarks().rescaled(0.5, 100.0, 50.0);
        assert_eq!(lm.left_eye(), (120.0, 125.0));
        assert_eq!(lm.right_mouth(), (170.0, 185.0));
    }

    #[test]
    fn test_rescaled_keeps_invisible_points() {
        let mut pts = *frontal_landmarks().points();
        pts[NOSE] = (0.0, 0.0);
        let lm = FaceLandmarks::new(pts).rescaled(2.0, 10.0, 10.0);
        assert_eq!(lm.nose(), (0.0, 0.0));
    }
}
