//! The three-step workflow: pick a style, rescale an input, toonify it.

use iced::widget::{column, container, image, radio, row, slider, text, Row, Space};
use iced::{Element, Length, Theme};

use toonify_core::alignment::domain::padding::{PaddingSide, PADDING_MAX, PADDING_MIN, PADDING_STEP};
use toonify_core::shared::constants::{EXAMPLE_IMAGES, EXAMPLE_VIDEOS};
use toonify_core::stylization::domain::style_degree::DEGREE_STEP;
use toonify_core::stylization::domain::style_preset::style_names;

use crate::app::{scaled, ButtonId, Message};
use crate::session::Session;
use crate::theme::{border_color, muted_color, surface_alt_color};
use crate::widgets::action_button::{action_button, ButtonKind};
use crate::widgets::example_gallery::{image_gallery, video_gallery};
use crate::widgets::file_row::file_row;
use crate::widgets::preview_panel::preview_panel;

/// Everything the main tab reads from the app.
pub struct MainView<'a> {
    pub fs: f32,
    pub session: &'a Session,
    pub aligned: Option<&'a image::Handle>,
    pub result: Option<&'a image::Handle>,
    pub hovered: Option<ButtonId>,
    pub pending: usize,
    pub model_banner: Option<String>,
    pub save_status: Option<&'a str>,
}

impl MainView<'_> {
    fn is_hovered(&self, id: ButtonId) -> bool {
        self.hovered == Some(id)
    }
}

fn hover(id: ButtonId) -> impl Fn(bool) -> Message {
    move |on| Message::ButtonHovered(id, on)
}

pub fn view<'a>(v: MainView<'a>, theme: &Theme) -> Element<'a, Message> {
    let fs = v.fs;
    let muted = muted_color(theme);

    let mut header = column![
        text("Portrait Toonify").size(scaled(22.0, fs)),
        text("Style transfer for portrait images and videos.")
            .size(scaled(13.0, fs))
            .color(muted),
    ]
    .spacing(4);
    if let Some(banner) = v.model_banner.clone() {
        header = header.push(text(banner).size(scaled(12.0, fs)).color(muted));
    }
    if v.pending > 0 {
        header = header.push(
            text(format!("Working... ({} pending)", v.pending))
                .size(scaled(12.0, fs))
                .color(muted),
        );
    }

    column![
        header,
        step_one(&v, theme),
        step_two(&v, theme),
        step_three(&v, theme),
    ]
    .spacing(16)
    .into()
}

fn step_one<'a>(v: &MainView<'a>, theme: &Theme) -> Element<'a, Message> {
    let fs = v.fs;
    let selected = Some(v.session.style.as_str());
    let styles = style_names().map(|name| {
        radio(name, name, selected, |style: &str| {
            Message::StyleSelected(style.to_string())
        })
        .size(scaled(14.0, fs))
        .text_size(scaled(13.0, fs))
        .into()
    });

    let body = column![
        text("Style").size(scaled(13.0, fs)),
        Row::with_children(styles).spacing(14).wrap(),
        action_button(
            "Load Model",
            scaled(14.0, fs),
            ButtonKind::Primary,
            Some(Message::LoadModel),
            v.is_hovered(ButtonId::LoadModel),
            hover(ButtonId::LoadModel),
        ),
        status_line(fs, &v.session.model_status, theme),
    ]
    .spacing(10);

    step_card(fs, "Step 1: Select a style and load the model", body.into(), theme)
}

fn step_two<'a>(v: &MainView<'a>, theme: &Theme) -> Element<'a, Message> {
    let fs = v.fs;
    let session = v.session;

    let image_row = file_row(
        fs,
        "Input image",
        session.input_image.as_deref(),
        "Browse",
        Some(Message::SelectImage),
        v.is_hovered(ButtonId::BrowseImage),
        hover(ButtonId::BrowseImage),
        theme,
    );
    let video_row = file_row(
        fs,
        "Input video",
        session.input_video.as_deref(),
        "Browse",
        Some(Message::SelectVideo),
        v.is_hovered(ButtonId::BrowseVideo),
        hover(ButtonId::BrowseVideo),
        theme,
    );

    let sliders = PaddingSide::ALL.iter().fold(column![].spacing(6), |col, &side| {
        col.push(
            row![
                text(side.label()).size(scaled(13.0, fs)).width(60),
                slider(PADDING_MIN..=PADDING_MAX, session.padding.get(side), move |value| {
                    Message::PaddingChanged(side, value)
                })
                .step(PADDING_STEP),
                text(session.padding.get(side).to_string())
                    .size(scaled(13.0, fs))
                    .width(36),
            ]
            .spacing(12)
            .align_y(iced::Alignment::Center),
        )
    });

    let rescale = row![
        action_button(
            "Rescale Image",
            scaled(13.0, fs),
            ButtonKind::Primary,
            Some(Message::RescaleImage),
            v.is_hovered(ButtonId::RescaleImage),
            hover(ButtonId::RescaleImage),
        ),
        action_button(
            "Rescale First Frame",
            scaled(13.0, fs),
            ButtonKind::Primary,
            Some(Message::RescaleFirstFrame),
            v.is_hovered(ButtonId::RescaleFirstFrame),
            hover(ButtonId::RescaleFirstFrame),
        ),
        action_button(
            "Rescale Video",
            scaled(13.0, fs),
            ButtonKind::Primary,
            Some(Message::RescaleVideo),
            v.is_hovered(ButtonId::RescaleVideo),
            hover(ButtonId::RescaleVideo),
        ),
    ]
    .spacing(8);

    let aligned_video = file_row(
        fs,
        "Rescaled video",
        session.aligned_video.as_deref(),
        "Open",
        session.aligned_video.as_ref().map(|_| Message::OpenAlignedVideo),
        v.is_hovered(ButtonId::OpenAlignedVideo),
        hover(ButtonId::OpenAlignedVideo),
        theme,
    );

    let body = column![
        image_row,
        image_gallery(fs, EXAMPLE_IMAGES),
        video_row,
        video_gallery(fs, EXAMPLE_VIDEOS),
        text("Padding around the face").size(scaled(13.0, fs)),
        sliders,
        rescale,
        status_line(fs, &session.align_status, theme),
        preview_panel(
            fs,
            "Rescaled face",
            v.aligned,
            "Rescale an image or a first frame to preview it here.".to_string(),
            theme,
        ),
        aligned_video,
    ]
    .spacing(10);

    step_card(fs, "Step 2: Upload an image or video and rescale it", body.into(), theme)
}

fn step_three<'a>(v: &MainView<'a>, theme: &Theme) -> Element<'a, Message> {
    let fs = v.fs;
    let session = v.session;
    let range = session.degree_range;

    let degree_hint = if range.is_fixed() {
        "fixed for this style"
    } else {
        "0 keeps the input face, 1 applies the full style"
    };

    let degree = column![
        row![
            text("Style degree").size(scaled(13.0, fs)),
            slider(range.min..=range.max, session.degree, Message::DegreeChanged)
                .step(DEGREE_STEP),
            text(format!("{:.2}", session.degree)).size(scaled(13.0, fs)).width(40),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        text(degree_hint)
            .size(scaled(11.0, fs))
            .color(muted_color(theme)),
    ]
    .spacing(4);

    let run = row![
        action_button(
            "Toonify!",
            scaled(14.0, fs),
            ButtonKind::Primary,
            Some(Message::Toonify),
            v.is_hovered(ButtonId::Toonify),
            hover(ButtonId::Toonify),
        ),
        action_button(
            "VToonify!",
            scaled(14.0, fs),
            ButtonKind::Primary,
            Some(Message::VToonify),
            v.is_hovered(ButtonId::VToonify),
            hover(ButtonId::VToonify),
        ),
    ]
    .spacing(8);

    let mut result = column![preview_panel(
        fs,
        "Result image",
        v.result,
        crate::session::NOT_AVAILABLE.to_string(),
        theme,
    )]
    .spacing(8);
    if v.result.is_some() {
        result = result.push(action_button(
            "Save As...",
            scaled(13.0, fs),
            ButtonKind::Secondary,
            Some(Message::SaveResultImage),
            v.is_hovered(ButtonId::SaveResultImage),
            hover(ButtonId::SaveResultImage),
        ));
    }
    if let Some(saved) = v.save_status {
        result = result.push(text(saved).size(scaled(12.0, fs)));
    }
    result = result.push(file_row(
        fs,
        "Result video",
        session.result_video.as_deref(),
        "Open",
        session.result_video.as_ref().map(|_| Message::OpenResultVideo),
        v.is_hovered(ButtonId::OpenResultVideo),
        hover(ButtonId::OpenResultVideo),
        theme,
    ));

    let body = column![
        degree,
        run,
        status_line(fs, &session.result_status, theme),
        result,
    ]
    .spacing(10);

    step_card(fs, "Step 3: Set the style degree and toonify", body.into(), theme)
}

fn status_line<'a>(fs: f32, status: &str, theme: &Theme) -> Element<'a, Message> {
    let background = surface_alt_color(theme);
    container(text(status.to_string()).size(scaled(13.0, fs)))
        .padding([6, 10])
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(background)),
            border: iced::border::Border {
                radius: 6.0.into(),
                ..Default::default()
            },
            ..container::Style::default()
        })
        .into()
}

fn step_card<'a>(
    fs: f32,
    title: &'a str,
    body: Element<'a, Message>,
    theme: &Theme,
) -> Element<'a, Message> {
    let border = border_color(theme);
    container(
        column![
            text(title).size(scaled(16.0, fs)).font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..iced::Font::DEFAULT
            }),
            Space::new().height(4),
            body,
        ]
        .spacing(6),
    )
    .padding(14)
    .width(Length::Fill)
    .style(move |_theme: &Theme| container::Style {
        border: iced::border::Border {
            color: border,
            width: 1.0,
            radius: 14.0.into(),
        },
        ..container::Style::default()
    })
    .into()
}
