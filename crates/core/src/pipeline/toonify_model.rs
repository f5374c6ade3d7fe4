use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::alignment::domain::padding::Padding;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::device::Device;
use crate::shared::frame::Frame;
use crate::stylization::domain::face_parser::FaceParser;
use crate::stylization::domain::style_code::{StyleCode, StyleInputCode};
use crate::stylization::domain::style_degree::degree_range_for;
use crate::stylization::domain::style_encoder::StyleEncoder;
use crate::stylization::domain::style_preset::{PresetError, StyleFamily};
use crate::stylization::domain::toonify_generator::ToonifyGenerator;
use crate::stylization::infrastructure::style_code_store::StyleCodeTable;
use crate::video::domain::media_io::MediaIo;
use crate::video::infrastructure::ffmpeg_media_io::FfmpegMediaIo;

use super::align_frame_use_case::AlignFrameUseCase;
use super::align_video_use_case::{AlignVideoOutcome, AlignVideoUseCase};
use super::infrastructure::onnx_network_factory::{DownloadProgress, OnnxNetworkFactory};
use super::load_style_use_case::LoadStyleUseCase;
use super::model_adapter::{
    status, AlignedImage, AlignedVideo, LoadedStyle, ModelAdapter, ToonifiedImage, ToonifiedVideo,
};
use super::network_factory::NetworkFactory;
use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use super::toonify_image_use_case::ToonifyImageUseCase;
use super::toonify_video_use_case::{ToonifyVideoOutcome, ToonifyVideoUseCase};

type DynError = Box<dyn std::error::Error>;

#[derive(Clone, Debug, Default)]
pub struct ToonifyConfig {
    pub device: Device,
    /// Directory searched for bundled model files.
    pub model_dir: Option<PathBuf>,
    /// Where aligned and stylized videos are written. A temporary
    /// directory removed on drop when `None`.
    pub work_dir: Option<PathBuf>,
}

struct LoadedGenerator {
    file: String,
    style: &'static str,
    network: Box<dyn ToonifyGenerator>,
}

enum WorkDir {
    Fixed(PathBuf),
    Temp(TempDir),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Fixed(p) => p,
            WorkDir::Temp(t) => t.path(),
        }
    }
}

/// The process-wide [`ModelAdapter`] backed by ONNX networks.
///
/// Shared networks are built once at construction; the generator is
/// swapped only when a style needs a different checkpoint.
pub struct ToonifyModel {
    device: Device,
    factory: Box<dyn NetworkFactory>,
    media: Box<dyn MediaIo>,
    logger: Box<dyn PipelineLogger>,
    detector: Box<dyn FaceDetector>,
    encoder: Box<dyn StyleEncoder>,
    parser: Box<dyn FaceParser>,
    generator: Option<LoadedGenerator>,
    style_tables: HashMap<StyleFamily, StyleCodeTable>,
    work_dir: WorkDir,
    outputs: usize,
    /// Latest video written per file stem.
    latest: HashMap<&'static str, PathBuf>,
}

impl ToonifyModel {
    /// Builds the ONNX networks on `config.device`, fetching missing model
    /// files first and reporting each download to `progress`.
    pub fn with_download_progress(
        config: ToonifyConfig,
        progress: DownloadProgress,
    ) -> Result<Self, DynError> {
        let factory = OnnxNetworkFactory::new(config.device, config.model_dir.clone())
            .with_progress(progress);
        factory.prefetch()?;
        Self::with_factory(config, Box::new(factory), Box::new(FfmpegMediaIo))
    }

    pub fn with_factory(
        config: ToonifyConfig,
        factory: Box<dyn NetworkFactory>,
        media: Box<dyn MediaIo>,
    ) -> Result<Self, DynError> {
        let work_dir = match config.work_dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                WorkDir::Fixed(dir)
            }
            None => WorkDir::Temp(tempfile::Builder::new().prefix("toonify-").tempdir()?),
        };
        log::info!(
            "Building networks on {} (work dir {})",
            config.device,
            work_dir.path().display()
        );

        Ok(Self {
            device: config.device,
            detector: factory.face_detector()?,
            encoder: factory.style_encoder()?,
            parser: factory.face_parser()?,
            factory,
            media,
            logger: Box::new(NullPipelineLogger),
            generator: None,
            style_tables: HashMap::new(),
            work_dir,
            outputs: 0,
            latest: HashMap::new(),
        })
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Style whose generator is currently loaded.
    pub fn current_style(&self) -> Option<&'static str> {
        self.generator.as_ref().map(|g| g.style)
    }

    fn next_output(&mut self, stem: &str) -> PathBuf {
        self.outputs += 1;
        self.work_dir.path().join(format!("{stem}_{}.mp4", self.outputs))
    }

    /// Records `path` as the current `stem` video and deletes the one it
    /// supersedes.
    fn replace_output(&mut self, stem: &'static str, path: &Path) {
        let Some(old) = self.latest.insert(stem, path.to_path_buf()) else {
            return;
        };
        match std::fs::remove_file(&old) {
            Ok(()) => log::debug!("Removed superseded {}", old.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {e}", old.display()),
        }
    }

    fn try_load(&mut self, style_name: &str) -> Result<StyleCode, DynError> {
        let (preset, code) =
            LoadStyleUseCase::new(&*self.factory, &mut self.style_tables).execute(style_name)?;
        let file = preset.generator_file();
        match self.generator.as_mut() {
            Some(loaded) if loaded.file == file => loaded.style = preset.name,
            _ => {
                log::info!("Loading generator {file}");
                let network = self.factory.generator(&file)?;
                self.generator = Some(LoadedGenerator {
                    file,
                    style: preset.name,
                    network,
                });
            }
        }
        Ok(code)
    }

    fn align_first_frame(
        &mut self,
        path: Option<&Path>,
        padding: Padding,
        from_video: bool,
    ) -> AlignedImage {
        let (load_error, no_face) = if from_video {
            (status::BAD_VIDEO, status::NO_FACE_VIDEO)
        } else {
            (status::BAD_IMAGE, status::NO_FACE_IMAGE)
        };
        let failed = |status: String| AlignedImage {
            face: None,
            style_input: None,
            status,
        };

        let Some(path) = path else {
            return failed(status::EMPTY_FILE.into());
        };
        let mut reader = if from_video {
            self.media.video_reader()
        } else {
            self.media.image_reader()
        };
        let frame = match reader.open(path).and_then(|_| reader.first_frame()) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                return failed(load_error.into());
            }
        };
        reader.close();

        match AlignFrameUseCase::new(&mut *self.detector, &mut *self.encoder)
            .execute(&frame, &padding)
        {
            Ok(Some(aligned)) => {
                let (w, h) = (aligned.face.width(), aligned.face.height());
                log::info!("Aligned {} to {w}x{h}", path.display());
                AlignedImage {
                    face: Some(aligned.face),
                    style_input: Some(aligned.style_input),
                    status: status::frame_rescaled(h, w),
                }
            }
            Ok(None) => failed(no_face.into()),
            Err(e) => {
                log::warn!("Alignment failed: {e}");
                failed(status::error(&e))
            }
        }
    }
}

impl ModelAdapter for ToonifyModel {
    fn load_model(&mut self, style_name: &str) -> LoadedStyle {
        match self.try_load(style_name) {
            Ok(code) => {
                log::info!("Model of {style_name} loaded");
                LoadedStyle {
                    style_code: Some(code),
                    status: status::model_loaded(style_name),
                }
            }
            Err(e) if e.downcast_ref::<PresetError>().is_some() => LoadedStyle {
                style_code: None,
                status: status::UNKNOWN_STYLE.into(),
            },
            Err(e) => {
                log::warn!("Failed to load {style_name}: {e}");
                LoadedStyle {
                    style_code: None,
                    status: status::error(&e),
                }
            }
        }
    }

    fn detect_and_align_image(
        &mut self,
        image_path: Option<&Path>,
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
    ) -> AlignedImage {
        let padding = Padding::new(top.into(), bottom.into(), left.into(), right.into());
        self.align_first_frame(image_path, padding, false)
    }

    fn detect_and_align_video(
        &mut self,
        video_path: Option<&Path>,
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
    ) -> AlignedImage {
        let padding = Padding::new(top.into(), bottom.into(), left.into(), right.into());
        self.align_first_frame(video_path, padding, true)
    }

    fn detect_and_align_full_video(
        &mut self,
        video_path: Option<&Path>,
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
    ) -> AlignedVideo {
        let failed = |status: String| AlignedVideo {
            video: None,
            style_input: None,
            status,
        };
        let Some(input) = video_path else {
            return failed(status::EMPTY_FILE.into());
        };
        let padding = Padding::new(top.into(), bottom.into(), left.into(), right.into());
        let output = self.next_output("input");

        let outcome = AlignVideoUseCase::new(
            self.media.video_reader(),
            self.media.video_writer(),
            &mut *self.detector,
            &mut *self.encoder,
            &mut *self.logger,
            self.device.video_frame_limit(),
        )
        .execute(input, &output, &padding);

        match outcome {
            Ok(AlignVideoOutcome::Aligned {
                first,
                frames_written,
            }) => {
                let (w, h) = (first.face.width(), first.face.height());
                log::info!("Aligned {frames_written} frames of {} to {w}x{h}", input.display());
                self.replace_output("input", &output);
                AlignedVideo {
                    video: Some(output),
                    style_input: Some(first.style_input),
                    status: status::video_rescaled(h, w),
                }
            }
            Ok(AlignVideoOutcome::NoFace) => failed(status::NO_FACE_VIDEO.into()),
            Ok(AlignVideoOutcome::Unreadable(reason)) => {
                log::warn!("Failed to read {}: {reason}", input.display());
                failed(status::BAD_VIDEO.into())
            }
            Err(e) => {
                log::warn!("Video alignment failed: {e}");
                failed(status::error(&e))
            }
        }
    }

    fn image_toonify(
        &mut self,
        aligned_face: Option<&Frame>,
        style_input: Option<&StyleInputCode>,
        style_code: Option<&StyleCode>,
        degree: f32,
    ) -> ToonifiedImage {
        let failed = |status: String| ToonifiedImage {
            image: None,
            status,
        };
        let (Some(face), Some(style_input)) = (aligned_face, style_input) else {
            return failed(status::BAD_IMAGE_INPUT.into());
        };
        let (Some(style_code), Some(loaded)) = (style_code, self.generator.as_mut()) else {
            return failed(status::BAD_STYLE.into());
        };

        let style = loaded.style;
        let degree = degree_range_for(style).clamp(degree);
        log::info!(
            "Toonify {}x{} image with style of {style}",
            face.width(),
            face.height()
        );

        match ToonifyImageUseCase::new(
            &mut *self.parser,
            &mut *loaded.network,
            &mut *self.logger,
        )
        .execute(face, style_input, style_code, degree)
        {
            Ok(image) => ToonifiedImage {
                image: Some(image),
                status: status::image_toonified(style),
            },
            Err(e) => {
                log::warn!("Image toonify failed: {e}");
                failed(status::error(&e))
            }
        }
    }

    fn video_toonify(
        &mut self,
        aligned_video: Option<&Path>,
        style_input: Option<&StyleInputCode>,
        style_code: Option<&StyleCode>,
        degree: f32,
    ) -> ToonifiedVideo {
        let failed = |status: String| ToonifiedVideo {
            video: None,
            status,
        };
        let (Some(input), Some(style_input)) = (aligned_video, style_input) else {
            return failed(status::BAD_VIDEO_INPUT.into());
        };
        let Some(style_code) = style_code.filter(|_| self.generator.is_some()) else {
            return failed(status::BAD_STYLE.into());
        };
        let output = self.next_output("output");
        let Some(loaded) = self.generator.as_mut() else {
            return failed(status::BAD_STYLE.into());
        };

        let style = loaded.style;
        let degree = degree_range_for(style).clamp(degree);
        log::info!("Toonify {} with style of {style}", input.display());

        let outcome = ToonifyVideoUseCase::new(
            self.media.video_reader(),
            self.media.video_writer(),
            &mut *self.parser,
            &mut *loaded.network,
            &mut *self.logger,
            self.device,
        )
        .execute(input, &output, style_input, style_code, degree);

        match outcome {
            Ok(ToonifyVideoOutcome::Done { frames }) => {
                self.replace_output("output", &output);
                ToonifiedVideo {
                    video: Some(output),
                    status: status::video_toonified(frames, style),
                }
            }
            Ok(ToonifyVideoOutcome::Unreadable(reason)) => {
                log::warn!("Failed to read {}: {reason}", input.display());
                failed(status::BAD_VIDEO.into())
            }
            Err(e) => {
                log::warn!("Video toonify failed: {e}");
                failed(status::error(&e))
            }
        }
    }
}
