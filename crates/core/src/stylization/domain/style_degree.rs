use super::style_preset::DEGREE_SUFFIX;

/// Slider granularity for the style degree.
pub const DEGREE_STEP: f32 = 0.05;

/// Degree used by fixed-degree presets and as the slider default.
pub const DEFAULT_DEGREE: f32 = 0.5;

/// Allowed style-degree interval and its initial value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DegreeRange {
    pub min: f32,
    pub max: f32,
    pub value: f32,
}

impl DegreeRange {
    /// Clamp into the range and snap to `DEGREE_STEP`.
    pub fn clamp(&self, degree: f32) -> f32 {
        let snapped = (degree / DEGREE_STEP).round() * DEGREE_STEP;
        snapped.clamp(self.min, self.max)
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

/// Styles ending with `-d` may be blended from 0 (input face) to 1 (full
/// style); every other style is pinned at 0.5.
pub fn degree_range_for(style: &str) -> DegreeRange {
    if style.ends_with(DEGREE_SUFFIX) {
        DegreeRange {
            min: 0.0,
            max: 1.0,
            value: DEFAULT_DEGREE,
        }
    } else {
        DegreeRange {
            min: DEFAULT_DEGREE,
            max: DEFAULT_DEGREE,
            value: DEFAULT_DEGREE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylization::domain::style_preset::style_names;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("cartoon1-d", 0.0, 1.0)]
    #[case("pixar-d", 0.0, 1.0)]
    #[case("pixar", 0.5, 0.5)]
    #[case("caricature2", 0.5, 0.5)]
    #[case("not-a-style", 0.5, 0.5)]
    #[case("", 0.5, 0.5)]
    fn test_degree_range(#[case] style: &str, #[case] min: f32, #[case] max: f32) {
        let range = degree_range_for(style);
        assert_eq!((range.min, range.max, range.value), (min, max, 0.5));
    }

    #[test]
    fn test_every_preset_follows_suffix_rule() {
        for name in style_names() {
            let range = degree_range_for(name);
            if name.ends_with("-d") {
                assert!(!range.is_fixed());
            } else {
                assert!(range.is_fixed());
                assert_eq!(range.value, 0.5);
            }
        }
    }

    #[rstest]
    #[case(0.33, 0.35)]
    #[case(-1.0, 0.0)]
    #[case(1.7, 1.0)]
    #[case(0.5, 0.5)]
    fn test_clamp_adjustable(#[case] input: f32, #[case] expected: f32) {
        assert_relative_eq!(degree_range_for("comic1-d").clamp(input), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_clamp_fixed_pins_value() {
        assert_eq!(degree_range_for("arcane1").clamp(0.9), 0.5);
    }
}
