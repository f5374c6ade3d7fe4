use iced::widget::{button, column, text, Space};
use iced::Element;

use crate::app::{scaled, Message};

pub fn view(fs: f32) -> Element<'static, Message> {
    let version = env!("CARGO_PKG_VERSION");

    column![
        text("Portrait Toonify").size(scaled(22.0, fs)),
        Space::new().height(4),
        text(format!("Version {version}")).size(scaled(13.0, fs)),
        Space::new().height(12),
        text(
            "Turns portrait photos and short clips into cartoon, comic, \
             Pixar-like and other styles. Faces are detected and aligned \
             first, then restyled by a pretrained exemplar-based generator."
        )
        .size(scaled(13.0, fs)),
        Space::new().height(8),
        text(
            "Videos are capped at 100 frames on CPU and 300 on GPU. \
             Styles ending in -d accept a style degree between 0 and 1."
        )
        .size(scaled(13.0, fs)),
        Space::new().height(16),
        button(text("Project page").size(scaled(13.0, fs)))
            .on_press(Message::OpenProjectPage)
            .padding([8, 16]),
    ]
    .spacing(0)
    .into()
}
