use iced::widget::{column, container, image, text};
use iced::{Element, Length, Theme};

use toonify_core::shared::frame::Frame;

use crate::app::{scaled, Message};
use crate::theme::{surface_color, tertiary_color};

const PREVIEW_HEIGHT: f32 = 240.0;

/// Converts a packed RGB frame into an iced image handle.
pub fn frame_handle(frame: &Frame) -> image::Handle {
    let mut rgba = Vec::with_capacity(frame.data().len() / 3 * 4);
    for px in frame.data().chunks_exact(3) {
        rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
    }
    image::Handle::from_rgba(frame.width(), frame.height(), rgba)
}

/// Titled box showing an image, or a placeholder line.
pub fn preview_panel<'a>(
    fs: f32,
    title: &'a str,
    handle: Option<&image::Handle>,
    placeholder: String,
    theme: &Theme,
) -> Element<'a, Message> {
    let surface = surface_color(theme);
    let body: Element<'a, Message> = match handle {
        Some(h) => image(h.clone()).height(PREVIEW_HEIGHT).into(),
        None => text(placeholder)
            .size(scaled(13.0, fs))
            .color(tertiary_color(theme))
            .into(),
    };

    container(column![text(title).size(scaled(12.0, fs)), body].spacing(6))
        .padding(10)
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(surface)),
            border: iced::border::Border {
                radius: 10.0.into(),
                ..Default::default()
            },
            ..container::Style::default()
        })
        .into()
}
