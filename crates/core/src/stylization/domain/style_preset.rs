//! Catalog of selectable portrait styles.

use thiserror::Error;

/// Presets whose identifier ends with this suffix take an adjustable
/// style degree.
pub const DEGREE_SUFFIX: &str = "-d";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PresetError {
    #[error("unknown style type '{0}'")]
    Unknown(String),
}

/// Generator family; each family shares one style-code table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleFamily {
    Cartoon,
    Comic,
    Arcane,
    Caricature,
    Pixar,
}

impl StyleFamily {
    pub fn name(self) -> &'static str {
        match self {
            StyleFamily::Cartoon => "cartoon",
            StyleFamily::Comic => "comic",
            StyleFamily::Arcane => "arcane",
            StyleFamily::Caricature => "caricature",
            StyleFamily::Pixar => "pixar",
        }
    }

    /// File holding the family's W+ style codes, one `[18, 512]` block per style.
    pub fn style_code_file(self) -> String {
        format!("vtoonify_d_{}_exstyle_code.f32", self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Generator {
    /// Family-wide model conditioned on the style degree.
    DegreeControlled,
    /// Model trained for one style at degree 0.5.
    Fixed(u16),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StylePreset {
    pub name: &'static str,
    pub family: StyleFamily,
    generator: Generator,
    /// Row of the family's style-code table.
    pub style_index: usize,
}

const fn preset(
    name: &'static str,
    family: StyleFamily,
    generator: Generator,
    style_index: usize,
) -> StylePreset {
    StylePreset {
        name,
        family,
        generator,
        style_index,
    }
}

use Generator::{DegreeControlled as D, Fixed};
use StyleFamily::*;

/// Presets in display order.
pub const STYLE_PRESETS: [StylePreset; 18] = [
    preset("cartoon1", Cartoon, Fixed(26), 26),
    preset("cartoon1-d", Cartoon, D, 26),
    preset("cartoon2-d", Cartoon, D, 64),
    preset("cartoon3-d", Cartoon, D, 153),
    preset("cartoon4", Cartoon, Fixed(299), 299),
    preset("cartoon4-d", Cartoon, D, 299),
    preset("cartoon5-d", Cartoon, D, 8),
    preset("comic1-d", Comic, D, 28),
    preset("comic2-d", Comic, D, 18),
    preset("comic3-d", Comic, D, 42),
    preset("arcane1", Arcane, Fixed(0), 0),
    preset("arcane1-d", Arcane, D, 0),
    preset("arcane2", Arcane, Fixed(77), 77),
    preset("arcane2-d", Arcane, D, 77),
    preset("caricature1", Caricature, Fixed(39), 39),
    preset("caricature2", Caricature, Fixed(68), 68),
    preset("pixar", Pixar, Fixed(52), 52),
    preset("pixar-d", Pixar, D, 52),
];

pub const DEFAULT_STYLE: &str = "cartoon1";

pub fn find_preset(name: &str) -> Result<&'static StylePreset, PresetError> {
    STYLE_PRESETS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| PresetError::Unknown(name.to_string()))
}

pub fn style_names() -> impl Iterator<Item = &'static str> {
    STYLE_PRESETS.iter().map(|p| p.name)
}

impl StylePreset {
    pub fn has_adjustable_degree(&self) -> bool {
        self.name.ends_with(DEGREE_SUFFIX)
    }

    /// ONNX export of the generator this preset runs on. Presets sharing a
    /// file share a loaded session.
    pub fn generator_file(&self) -> String {
        match self.generator {
            Generator::DegreeControlled => format!("vtoonify_d_{}_s_d.onnx", self.family.name()),
            Generator::Fixed(n) => format!("vtoonify_d_{}_s{n:03}_d0.5.onnx", self.family.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn test_display_order() {
        let names: Vec<_> = style_names().collect();
        assert_eq!(names.first(), Some(&"cartoon1"));
        assert_eq!(names.last(), Some(&"pixar-d"));
        assert_eq!(names.len(), 18);
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = style_names().collect();
        assert_eq!(names.len(), STYLE_PRESETS.len());
    }

    #[rstest]
    #[case("cartoon1", "vtoonify_d_cartoon_s026_d0.5.onnx")]
    #[case("cartoon1-d", "vtoonify_d_cartoon_s_d.onnx")]
    #[case("cartoon4", "vtoonify_d_cartoon_s299_d0.5.onnx")]
    #[case("arcane1", "vtoonify_d_arcane_s000_d0.5.onnx")]
    #[case("comic2-d", "vtoonify_d_comic_s_d.onnx")]
    #[case("pixar", "vtoonify_d_pixar_s052_d0.5.onnx")]
    fn test_generator_file(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(find_preset(name).unwrap().generator_file(), expected);
    }

    #[test]
    fn test_degree_presets_share_family_generator() {
        let files: HashSet<_> = STYLE_PRESETS
            .iter()
            .filter(|p| p.family == StyleFamily::Cartoon && p.has_adjustable_degree())
            .map(|p| p.generator_file())
            .collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_adjustable_degree_follows_suffix() {
        for p in &STYLE_PRESETS {
            assert_eq!(p.has_adjustable_degree(), p.name.ends_with("-d"));
            assert_eq!(
                p.has_adjustable_degree(),
                matches!(p.generator, Generator::DegreeControlled)
            );
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert_eq!(
            find_preset("watercolor"),
            Err(PresetError::Unknown("watercolor".into()))
        );
    }

    #[test]
    fn test_style_code_file() {
        assert_eq!(
            StyleFamily::Caricature.style_code_file(),
            "vtoonify_d_caricature_exstyle_code.f32"
        );
    }
}
