use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};

use toonify_core::alignment::domain::padding::PaddingSide;
use toonify_core::pipeline::toonify_model::ToonifyConfig;
use toonify_core::shared::constants::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use toonify_core::shared::frame::Frame;
use toonify_core::video::domain::image_writer::ImageWriter;
use toonify_core::video::infrastructure::image_file_writer::ImageFileWriter;

use crate::launch::LaunchOptions;
use crate::session::Session;
use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::tabs::main_tab::MainView;
use crate::theme;
use crate::widgets::preview_panel::frame_handle;
use crate::workers::job_dispatcher::{Job, JobDispatcher};
use crate::workers::model_cache::{CacheState, ModelCache};

const PROJECT_URL: &str = "https://github.com/williamyang1991/VToonify";

/// Results are polled at this interval.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Main,
    Appearance,
    About,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Main, Tab::Appearance, Tab::About];

    fn label(self) -> &'static str {
        match self {
            Tab::Main => "Toonify",
            Tab::Appearance => "Appearance",
            Tab::About => "About",
        }
    }
}

/// Buttons that animate on hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    LoadModel,
    BrowseImage,
    BrowseVideo,
    RescaleImage,
    RescaleFirstFrame,
    RescaleVideo,
    Toonify,
    VToonify,
    OpenAlignedVideo,
    OpenResultVideo,
    SaveResultImage,
}

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    OpenProjectPage,
    ButtonHovered(ButtonId, bool),
    StyleSelected(String),
    LoadModel,
    SelectImage,
    ImageSelected(Option<PathBuf>),
    SelectVideo,
    VideoSelected(Option<PathBuf>),
    ExampleImageSelected(&'static str),
    ExampleVideoSelected(&'static str),
    PaddingChanged(PaddingSide, u32),
    RescaleImage,
    RescaleFirstFrame,
    RescaleVideo,
    DegreeChanged(f32),
    Toonify,
    VToonify,
    OpenAlignedVideo,
    OpenResultVideo,
    SaveResultImage,
    ResultImageTarget(Option<PathBuf>),
    AppearanceChanged(Appearance),
    HighContrastChanged(bool),
    FontScaleChanged(f32),
    Tick,
}

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    pub session: Session,
    cache: Arc<ModelCache>,
    dispatcher: JobDispatcher,
    hovered: Option<ButtonId>,
    aligned_handle: Option<image::Handle>,
    result_handle: Option<image::Handle>,
    /// Last outcome of saving the result image, shown under the preview.
    save_status: Option<String>,
    /// `--theme` for this run. Never written back to the settings file.
    theme_override: Option<Appearance>,
}

impl App {
    pub fn new(options: LaunchOptions) -> (Self, Task<Message>) {
        let settings = Settings::load();

        let cache = ModelCache::spawn(ToonifyConfig {
            device: options.device,
            model_dir: options.model_dir.clone(),
            work_dir: None,
        });
        let dispatcher = JobDispatcher::new(Arc::clone(&cache), !options.disable_queue);

        (
            Self {
                active_tab: Tab::Main,
                settings,
                session: Session::default(),
                cache,
                dispatcher,
                hovered: None,
                aligned_handle: None,
                result_handle: None,
                save_status: None,
                theme_override: options.theme,
            },
            Task::none(),
        )
    }

    fn submit(&mut self, job: Job) {
        self.dispatcher.submit(job);
    }

    /// Re-derive image handles after the session's frames change.
    fn refresh_previews(&mut self) {
        self.aligned_handle = self.session.aligned_face.as_ref().map(frame_handle);
        self.result_handle = self.session.result_image.as_ref().map(frame_handle);
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::OpenProjectPage => open_external(PROJECT_URL),
            Message::ButtonHovered(id, true) => {
                self.hovered = Some(id);
            }
            Message::ButtonHovered(id, false) => {
                if self.hovered == Some(id) {
                    self.hovered = None;
                }
            }
            Message::StyleSelected(style) => {
                self.session.select_style(&style);
            }
            Message::LoadModel => self.submit(self.session.load_model_job()),
            Message::SelectImage => {
                return pick_file("Select an image", "Images", IMAGE_EXTENSIONS, Message::ImageSelected);
            }
            Message::ImageSelected(Some(path)) => {
                self.session.input_image = Some(path);
            }
            Message::SelectVideo => {
                return pick_file("Select a video", "Videos", VIDEO_EXTENSIONS, Message::VideoSelected);
            }
            Message::VideoSelected(Some(path)) => {
                self.session.input_video = Some(path);
            }
            Message::ImageSelected(None) | Message::VideoSelected(None) => {}
            Message::ExampleImageSelected(path) => self.session.select_example_image(path),
            Message::ExampleVideoSelected(path) => self.session.select_example_video(path),
            Message::PaddingChanged(side, value) => {
                self.session.set_padding(side, i64::from(value));
            }
            Message::RescaleImage => self.submit(self.session.align_image_job()),
            Message::RescaleFirstFrame => self.submit(self.session.align_first_frame_job()),
            Message::RescaleVideo => self.submit(self.session.align_video_job()),
            Message::DegreeChanged(degree) => self.session.set_degree(degree),
            Message::Toonify => self.submit(self.session.toonify_image_job()),
            Message::VToonify => self.submit(self.session.toonify_video_job()),
            Message::OpenAlignedVideo => {
                if let Some(path) = &self.session.aligned_video {
                    open_external(path);
                }
            }
            Message::OpenResultVideo => {
                if let Some(path) = &self.session.result_video {
                    open_external(path);
                }
            }
            Message::SaveResultImage => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Save toonified image")
                            .add_filter("Images", &["png", "jpg", "jpeg"])
                            .set_file_name("toonified.png")
                            .save_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::ResultImageTarget,
                );
            }
            Message::ResultImageTarget(Some(path)) => {
                if let Some(frame) = &self.session.result_image {
                    self.save_status = Some(save_frame(frame, &path));
                }
            }
            Message::ResultImageTarget(None) => {}
            Message::AppearanceChanged(appearance) => {
                self.theme_override = None;
                self.settings.appearance = appearance;
                self.settings.save();
            }
            Message::HighContrastChanged(enabled) => {
                self.settings.high_contrast = enabled;
                self.settings.save();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::Tick => {
                let results = self.dispatcher.drain();
                if !results.is_empty() {
                    for result in results {
                        log::info!("{}", result.status());
                        self.session.apply(result);
                    }
                    self.save_status = None;
                    self.refresh_previews();
                }
            }
        }
        Task::none()
    }

    /// One-line banner while models are still being prepared.
    fn model_banner(&self) -> Option<String> {
        match self.cache.state() {
            CacheState::Ready => None,
            CacheState::Failed(e) => Some(format!("Models unavailable: {e}")),
            CacheState::Loading {
                file: Some(file),
                downloaded,
                total,
            } if total > 0 => Some(format!(
                "Downloading {file}: {:.0}%",
                downloaded as f64 / total as f64 * 100.0
            )),
            CacheState::Loading {
                file: Some(file), ..
            } => Some(format!("Downloading {file}...")),
            CacheState::Loading { file: None, .. } => Some("Preparing models...".to_string()),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;
        let theme = self.theme();

        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let label = text(tab.label()).size(scaled(13.0, fs));
                let btn = button(label)
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        let content: Element<'_, Message> = match self.active_tab {
            Tab::Main => tabs::main_tab::view(
                MainView {
                    fs,
                    session: &self.session,
                    aligned: self.aligned_handle.as_ref(),
                    result: self.result_handle.as_ref(),
                    hovered: self.hovered,
                    pending: self.dispatcher.pending(),
                    model_banner: self.model_banner(),
                    save_status: self.save_status.as_deref(),
                },
                &theme,
            ),
            Tab::Appearance => tabs::appearance_tab::view(&self.settings, self.appearance()),
            Tab::About => tabs::about_tab::view(fs),
        };

        let tab_content = container(scrollable(content).height(Length::Fill))
            .padding(16)
            .height(Length::Fill);

        let queue_mode = if self.dispatcher.is_queued() {
            "Queued requests"
        } else {
            "Concurrent requests"
        };
        let footer = container(text(queue_mode).size(scaled(11.0, fs)))
            .width(Length::Fill)
            .center_x(Length::Fill)
            .padding([4, 0]);

        column![tab_bar, tab_content, footer]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.appearance(), self.settings.high_contrast)
    }

    fn appearance(&self) -> Appearance {
        effective_appearance(&self.settings, self.theme_override)
    }

    /// The tick drains finished jobs and, with the system appearance, also
    /// picks up OS theme switches since `theme()` is re-resolved per frame.
    pub fn subscription(&self) -> Subscription<Message> {
        iced::time::every(POLL_INTERVAL).map(|_| Message::Tick)
    }
}

fn pick_file(
    title: &'static str,
    filter: &'static str,
    extensions: &'static [&'static str],
    on_pick: fn(Option<PathBuf>) -> Message,
) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncFileDialog::new()
                .set_title(title)
                .add_filter(filter, extensions)
                .pick_file()
                .await
                .map(|h| h.path().to_path_buf())
        },
        on_pick,
    )
}

fn open_external(target: impl AsRef<std::ffi::OsStr>) {
    if let Err(e) = open::that(target.as_ref()) {
        log::warn!("Failed to open {}: {e}", target.as_ref().to_string_lossy());
    }
}

fn save_frame(frame: &Frame, path: &std::path::Path) -> String {
    match ImageFileWriter::new().write(path, frame) {
        Ok(()) => format!("Saved to {}", path.display()),
        Err(e) => {
            log::warn!("Failed to save {}: {e}", path.display());
            format!("Error: {e}")
        }
    }
}

/// A launch override wins over the saved appearance until the user picks one.
fn effective_appearance(settings: &Settings, launch_override: Option<Appearance>) -> Appearance {
    launch_override.unwrap_or(settings.appearance)
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_rounds() {
        assert_eq!(scaled(13.0, 1.0), 13.0);
        assert_eq!(scaled(13.0, 1.5), 20.0);
        assert_eq!(scaled(10.0, 0.8), 8.0);
    }

    #[test]
    fn test_launch_theme_overrides_saved_appearance() {
        let settings = Settings {
            appearance: Appearance::Light,
            ..Settings::default()
        };
        assert_eq!(effective_appearance(&settings, None), Appearance::Light);
        assert_eq!(
            effective_appearance(&settings, Some(Appearance::Dark)),
            Appearance::Dark
        );
    }

    #[test]
    fn test_launch_theme_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings {
            appearance: Appearance::Light,
            ..Settings::default()
        };
        let launch_override = Some(Appearance::Dark);
        settings.high_contrast = true;
        settings.save_to(&path).unwrap();

        let saved = Settings::load_from(&path);
        assert_eq!(saved.appearance, Appearance::Light);
        assert!(saved.high_contrast);
        assert_eq!(effective_appearance(&saved, launch_override), Appearance::Dark);
    }

    #[test]
    fn test_save_frame_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let status = save_frame(&Frame::black(8, 8), &path);
        assert!(status.starts_with("Saved to"));
        assert!(path.exists());
    }

    #[test]
    fn test_save_frame_reports_error() {
        let status = save_frame(&Frame::black(8, 8), std::path::Path::new("/nonexistent/dir/out.png"));
        assert!(status.starts_with("Error:"));
    }
}
