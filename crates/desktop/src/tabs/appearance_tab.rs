use iced::widget::{checkbox, column, pick_list, row, slider, text, Space};
use iced::Element;

use crate::app::{scaled, Message};
use crate::settings::{Appearance, Settings, FONT_SCALE_MAX, FONT_SCALE_MIN};

const FONT_SCALE_STEP: f32 = 0.05;

/// `appearance` is the one in effect, which a launch flag may override.
pub fn view<'a>(settings: &Settings, appearance: Appearance) -> Element<'a, Message> {
    let fs = settings.font_scale;

    column![
        text("Theme").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            text("Mode").size(scaled(13.0, fs)),
            pick_list(Appearance::ALL, Some(appearance), Message::AppearanceChanged)
                .text_size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        Space::new().height(12),
        checkbox(settings.high_contrast)
            .label("High contrast")
            .on_toggle(Message::HighContrastChanged)
            .text_size(scaled(13.0, fs)),
        Space::new().height(20),
        text("Font size").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            slider(
                FONT_SCALE_MIN..=FONT_SCALE_MAX,
                settings.font_scale,
                Message::FontScaleChanged
            )
            .step(FONT_SCALE_STEP),
            text(format!("{:.0}%", settings.font_scale * 100.0)).size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        Space::new().height(12),
        text("Appearance is saved between sessions; --theme overrides it for one run.")
            .size(scaled(12.0, fs)),
    ]
    .spacing(0)
    .into()
}
