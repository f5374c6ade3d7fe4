use std::path::Path;

use iced::widget::{column, container, row, text, Space};
use iced::{Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::{border_color, surface_color, tertiary_color};

use super::action_button::{action_button, ButtonKind};

const CORNER_RADIUS: f32 = 12.0;

/// Labelled file slot with a trailing action ("Browse", "Open").
#[allow(clippy::too_many_arguments)]
pub fn file_row<'a>(
    fs: f32,
    label: &str,
    path: Option<&Path>,
    action: &'a str,
    on_action: Option<Message>,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
    theme: &Theme,
) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    let surface = surface_color(theme);
    let border = border_color(theme);

    let display: Element<'a, Message> = match path {
        Some(p) => text(p.display().to_string()).size(scaled(14.0, fs)).into(),
        None => text("No file selected")
            .size(scaled(14.0, fs))
            .color(tertiary)
            .into(),
    };

    let label_text = text(label.to_uppercase())
        .size(scaled(11.0, fs))
        .font(iced::Font {
            weight: iced::font::Weight::Semibold,
            ..iced::Font::DEFAULT
        })
        .color(tertiary);

    let btn = action_button(
        action,
        scaled(13.0, fs),
        ButtonKind::Secondary,
        on_action,
        hovered,
        on_hover,
    );

    let info = column![label_text, Space::new().height(2), display].width(Length::Fill);

    container(row![info, btn].spacing(8).align_y(iced::Alignment::Center))
        .padding([12, 14])
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(surface)),
            border: iced::border::Border {
                color: border,
                width: 1.0,
                radius: CORNER_RADIUS.into(),
            },
            ..container::Style::default()
        })
        .into()
}
