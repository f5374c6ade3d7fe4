use std::path::Path;

use iced::widget::{button, column, image, row, text, Row};
use iced::{Element, Length};

use crate::app::{scaled, Message};

const THUMBNAIL_SIZE: f32 = 72.0;

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Clickable thumbnails; each click forwards its path unchanged.
pub fn image_gallery<'a>(fs: f32, paths: &'static [&'static str]) -> Element<'a, Message> {
    let items = paths.iter().map(|&path| {
        let thumb = image(image::Handle::from_path(path))
            .width(THUMBNAIL_SIZE)
            .height(THUMBNAIL_SIZE);
        button(column![thumb, text(file_name(path)).size(scaled(10.0, fs))].spacing(2))
            .on_press(Message::ExampleImageSelected(path))
            .padding(4)
            .style(button::text)
            .into()
    });
    gallery(fs, "Examples", items)
}

pub fn video_gallery<'a>(fs: f32, paths: &'static [&'static str]) -> Element<'a, Message> {
    let items = paths.iter().map(|&path| {
        button(text(file_name(path)).size(scaled(12.0, fs)))
            .on_press(Message::ExampleVideoSelected(path))
            .padding([4, 10])
            .style(button::secondary)
            .into()
    });
    gallery(fs, "Example videos", items)
}

fn gallery<'a>(
    fs: f32,
    title: &'a str,
    items: impl Iterator<Item = Element<'a, Message>>,
) -> Element<'a, Message> {
    column![
        text(title).size(scaled(12.0, fs)),
        Row::with_children(items).spacing(6).wrap(),
    ]
    .spacing(4)
    .width(Length::Fill)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_strips_directories() {
        assert_eq!(file_name("./vtoonify/data/077436.jpg"), "077436.jpg");
        assert_eq!(file_name("651.mp4"), "651.mp4");
    }
}
