use std::time::Duration;

use iced::border::Border;
use iced::widget::{button, container, mouse_area, text};
use iced::{Color, Element, Length, Padding, Shadow, Theme, Vector};
use iced_anim::transition::Easing;
use iced_anim::AnimationBuilder;

use crate::theme::{border_color, lerp_color, muted_color, surface_alt_color, surface_color};

const HOVER_DARKEN: f32 = 0.05;
const FLOAT_HEIGHT: f32 = 1.0;
const CORNER_RADIUS: f32 = 10.0;
const SHADOW_BLUR: (f32, f32) = (8.0, 14.0);
const SHADOW_ALPHA: (f32, f32) = (0.22, 0.35);
const DISABLED_ALPHA: f32 = 0.45;
const ANIMATION_DURATION: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Runs a model step.
    Primary,
    /// Browsing and opening files.
    Secondary,
}

/// Animated button; `on_press: None` renders it disabled.
pub fn action_button<'a, Message: Clone + 'a>(
    label: &'a str,
    font_size: f32,
    kind: ButtonKind,
    on_press: Option<Message>,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
) -> Element<'a, Message> {
    let target = if hovered && on_press.is_some() {
        1.0_f32
    } else {
        0.0
    };
    let width = match kind {
        ButtonKind::Primary => Length::Fill,
        ButtonKind::Secondary => Length::Shrink,
    };

    let animated: Element<'a, Message> = AnimationBuilder::new(target, move |t: f32| {
        build(label, font_size, kind, on_press.clone(), width, t.clamp(0.0, 1.0))
    })
    .animates_layout(true)
    .animation(Easing::EASE_OUT.with_duration(ANIMATION_DURATION))
    .into();

    mouse_area(animated)
        .on_enter(on_hover(true))
        .on_exit(on_hover(false))
        .into()
}

fn build<'a, Message: Clone + 'a>(
    label: &'a str,
    font_size: f32,
    kind: ButtonKind,
    on_press: Option<Message>,
    width: Length,
    hover_amount: f32,
) -> Element<'a, Message> {
    let padding = match kind {
        ButtonKind::Primary => [10, 20],
        ButtonKind::Secondary => [6, 14],
    };
    let label = text(label)
        .size(font_size)
        .align_x(iced::Alignment::Center)
        .width(width);
    let btn = button(label)
        .on_press_maybe(on_press)
        .padding(padding)
        .width(width)
        .style(move |theme: &Theme, status: button::Status| {
            let amount = match status {
                button::Status::Pressed => 1.0,
                _ => hover_amount,
            };
            let disabled = status == button::Status::Disabled;
            match kind {
                ButtonKind::Primary => primary_style(theme, amount, disabled),
                ButtonKind::Secondary => secondary_style(theme, amount, disabled),
            }
        });

    let rise = match kind {
        ButtonKind::Primary => hover_amount * FLOAT_HEIGHT,
        ButtonKind::Secondary => 0.0,
    };
    container(btn)
        .padding(Padding {
            top: FLOAT_HEIGHT - rise,
            bottom: rise,
            ..Padding::ZERO
        })
        .into()
}

fn primary_style(theme: &Theme, t: f32, disabled: bool) -> button::Style {
    let base = theme.extended_palette().primary.base.color;
    let alpha = if disabled { DISABLED_ALPHA } else { 1.0 };
    button::Style {
        background: Some(Color { a: alpha, ..darken(base, t) }.into()),
        text_color: Color { a: alpha, ..Color::WHITE },
        border: Border {
            radius: CORNER_RADIUS.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color {
                a: if disabled { 0.0 } else { lerp(SHADOW_ALPHA.0, SHADOW_ALPHA.1, t) },
                ..base
            },
            offset: Vector::new(0.0, 3.0),
            blur_radius: lerp(SHADOW_BLUR.0, SHADOW_BLUR.1, t),
        },
        ..button::Style::default()
    }
}

fn secondary_style(theme: &Theme, t: f32, disabled: bool) -> button::Style {
    let text = muted_color(theme);
    button::Style {
        background: Some(lerp_color(surface_color(theme), surface_alt_color(theme), t).into()),
        text_color: if disabled {
            Color { a: DISABLED_ALPHA, ..text }
        } else {
            text
        },
        border: Border {
            color: border_color(theme),
            width: 1.0,
            radius: (CORNER_RADIUS - 2.0).into(),
        },
        ..button::Style::default()
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn darken(color: Color, amount: f32) -> Color {
    let shift = HOVER_DARKEN * amount;
    Color {
        r: (color.r - shift).max(0.0),
        g: (color.g - shift).max(0.0),
        b: (color.b - shift).max(0.0),
        a: 1.0,
    }
}
