use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

use crate::platform;
use crate::settings::Appearance;

pub fn resolve_theme(appearance: Appearance, high_contrast: bool) -> Theme {
    let is_dark = match appearance {
        Appearance::Dark => true,
        Appearance::Light => false,
        Appearance::System => platform::is_dark_mode(),
    };

    let palette = match (is_dark, high_contrast) {
        (true, false) => dark_palette(),
        (false, false) => light_palette(),
        (true, true) => high_contrast_dark_palette(),
        (false, true) => high_contrast_light_palette(),
    };

    Theme::custom("Toonify", palette)
}

// Warm accents that suit the cartoon previews
fn dark_palette() -> Palette {
    Palette {
        background: color!(0x1e, 0x1b, 0x22),
        text: color!(0xd8, 0xd4, 0xdc),
        primary: color!(0xf2, 0x7a, 0x54),
        success: color!(0x4c, 0xc9, 0x7a),
        warning: color!(0xf5, 0xc2, 0x42),
        danger: color!(0xff, 0x5a, 0x5f),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xfa, 0xf7, 0xf4),
        text: color!(0x22, 0x1f, 0x24),
        primary: color!(0xe0, 0x5d, 0x36),
        success: color!(0x2f, 0xa8, 0x5c),
        warning: color!(0xd9, 0x8e, 0x04),
        danger: color!(0xd6, 0x33, 0x3a),
    }
}

fn high_contrast_dark_palette() -> Palette {
    Palette {
        background: color!(0x00, 0x00, 0x00),
        text: color!(0xff, 0xff, 0xff),
        primary: color!(0xff, 0x95, 0x6e),
        ..dark_palette()
    }
}

fn high_contrast_light_palette() -> Palette {
    Palette {
        background: color!(0xff, 0xff, 0xff),
        text: color!(0x00, 0x00, 0x00),
        primary: color!(0xb3, 0x3a, 0x12),
        ..light_palette()
    }
}

fn is_light(theme: &Theme) -> bool {
    let bg = theme.palette().background;
    bg.r * 0.299 + bg.g * 0.587 + bg.b * 0.114 > 0.5
}

/// Card and panel background, slightly offset from the window background.
pub fn surface_color(theme: &Theme) -> Color {
    let bg = theme.palette().background;
    let shift = if is_light(theme) { 0.03 } else { 0.06 };
    Color {
        r: (bg.r + shift).min(1.0),
        g: (bg.g + shift).min(1.0),
        b: (bg.b + shift).min(1.0),
        a: 1.0,
    }
}

/// Hover background for secondary controls.
pub fn surface_alt_color(theme: &Theme) -> Color {
    let bg = theme.palette().background;
    let shift = if is_light(theme) { -0.05 } else { 0.12 };
    Color {
        r: (bg.r + shift).clamp(0.0, 1.0),
        g: (bg.g + shift).clamp(0.0, 1.0),
        b: (bg.b + shift).clamp(0.0, 1.0),
        a: 1.0,
    }
}

pub fn muted_color(theme: &Theme) -> Color {
    Color {
        a: 0.7,
        ..theme.palette().text
    }
}

pub fn tertiary_color(theme: &Theme) -> Color {
    Color {
        a: 0.5,
        ..theme.palette().text
    }
}

pub fn border_color(theme: &Theme) -> Color {
    Color {
        a: 0.15,
        ..theme.palette().text
    }
}

pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    Color {
        r: a.r + (b.r - a.r) * t,
        g: a.g + (b.g - a.g) * t,
        b: a.b + (b.b - a.b) * t,
        a: a.a + (b.a - a.a) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_explicit_appearance_ignores_system() {
        let dark = resolve_theme(Appearance::Dark, false);
        let light = resolve_theme(Appearance::Light, false);
        assert!(!is_light(&dark));
        assert!(is_light(&light));
    }

    #[test]
    fn test_high_contrast_uses_pure_background() {
        assert_eq!(
            resolve_theme(Appearance::Dark, true).palette().background,
            Color::BLACK
        );
        assert_eq!(
            resolve_theme(Appearance::Light, true).palette().background,
            Color::WHITE
        );
    }

    #[test]
    fn test_lerp_color_endpoints() {
        let mid = lerp_color(Color::BLACK, Color::WHITE, 0.5);
        assert_relative_eq!(mid.r, 0.5);
        assert_eq!(lerp_color(Color::BLACK, Color::WHITE, 1.0), Color::WHITE);
    }
}
