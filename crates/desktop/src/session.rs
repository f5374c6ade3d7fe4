//! What the window currently shows: selections, intermediate results and
//! the read-only status texts. Nothing here touches the models.

use std::path::PathBuf;

use toonify_core::alignment::domain::padding::{Padding, PaddingSide};
use toonify_core::pipeline::model_adapter::status;
use toonify_core::shared::frame::Frame;
use toonify_core::stylization::domain::style_code::{StyleCode, StyleInputCode};
use toonify_core::stylization::domain::style_degree::{degree_range_for, DegreeRange};
use toonify_core::stylization::domain::style_preset::DEFAULT_STYLE;

use crate::workers::job_dispatcher::{Job, JobKind, JobResult};

/// Placeholder shown in status boxes before anything has run.
pub const NOT_AVAILABLE: &str = "n.a.";

pub struct Session {
    pub style: String,
    pub style_code: Option<StyleCode>,
    pub model_status: String,
    pub degree_range: DegreeRange,
    pub degree: f32,
    pub padding: Padding,
    pub input_image: Option<PathBuf>,
    pub input_video: Option<PathBuf>,
    pub aligned_face: Option<Frame>,
    pub aligned_video: Option<PathBuf>,
    /// Encoder code of the most recent alignment, image or video.
    pub style_input: Option<StyleInputCode>,
    pub align_status: String,
    pub result_image: Option<Frame>,
    pub result_video: Option<PathBuf>,
    pub result_status: String,
}

impl Default for Session {
    fn default() -> Self {
        let degree_range = degree_range_for(DEFAULT_STYLE);
        Self {
            style: DEFAULT_STYLE.to_string(),
            style_code: None,
            model_status: status::NO_MODEL.to_string(),
            degree: degree_range.value,
            degree_range,
            padding: Padding::default(),
            input_image: None,
            input_video: None,
            aligned_face: None,
            aligned_video: None,
            style_input: None,
            align_status: NOT_AVAILABLE.to_string(),
            result_image: None,
            result_video: None,
            result_status: NOT_AVAILABLE.to_string(),
        }
    }
}

impl Session {
    /// Selecting a style re-derives the degree slider.
    pub fn select_style(&mut self, style: &str) {
        self.style = style.to_string();
        self.degree_range = degree_range_for(style);
        self.degree = self.degree_range.value;
    }

    pub fn set_degree(&mut self, degree: f32) {
        self.degree = self.degree_range.clamp(degree);
    }

    pub fn set_padding(&mut self, side: PaddingSide, value: i64) {
        self.padding.set(side, value);
    }

    pub fn select_example_image(&mut self, path: &str) {
        self.input_image = Some(PathBuf::from(path));
    }

    pub fn select_example_video(&mut self, path: &str) {
        log::info!("Example video selected: {path}");
        self.input_video = Some(PathBuf::from(path));
    }

    pub fn load_model_job(&self) -> Job {
        Job::LoadModel {
            style: self.style.clone(),
        }
    }

    pub fn align_image_job(&self) -> Job {
        Job::AlignImage {
            path: self.input_image.clone(),
            padding: self.padding,
        }
    }

    pub fn align_first_frame_job(&self) -> Job {
        Job::AlignFirstFrame {
            path: self.input_video.clone(),
            padding: self.padding,
        }
    }

    pub fn align_video_job(&self) -> Job {
        Job::AlignVideo {
            path: self.input_video.clone(),
            padding: self.padding,
        }
    }

    pub fn toonify_image_job(&self) -> Job {
        Job::ToonifyImage {
            face: self.aligned_face.clone(),
            style_input: self.style_input.clone(),
            style_code: self.style_code.clone(),
            degree: self.degree,
        }
    }

    pub fn toonify_video_job(&self) -> Job {
        Job::ToonifyVideo {
            video: self.aligned_video.clone(),
            style_input: self.style_input.clone(),
            style_code: self.style_code.clone(),
            degree: self.degree,
        }
    }

    /// Write a finished job's outputs into the widgets bound to it.
    pub fn apply(&mut self, result: JobResult) {
        match result {
            JobResult::ModelLoaded(loaded) => {
                self.style_code = loaded.style_code;
                self.model_status = loaded.status;
            }
            JobResult::ImageAligned(aligned) | JobResult::FirstFrameAligned(aligned) => {
                self.aligned_face = aligned.face;
                self.style_input = aligned.style_input;
                self.align_status = aligned.status;
            }
            JobResult::VideoAligned(aligned) => {
                self.aligned_video = aligned.video;
                self.style_input = aligned.style_input;
                self.align_status = aligned.status;
            }
            JobResult::ImageToonified(toonified) => {
                self.result_image = toonified.image;
                self.result_status = toonified.status;
            }
            JobResult::VideoToonified(toonified) => {
                self.result_video = toonified.video;
                self.result_status = toonified.status;
            }
            JobResult::Rejected { kind, status } => match kind {
                JobKind::LoadModel => self.model_status = status,
                JobKind::AlignImage | JobKind::AlignFirstFrame | JobKind::AlignVideo => {
                    self.align_status = status;
                }
                JobKind::ToonifyImage | JobKind::ToonifyVideo => self.result_status = status,
            },
        }
    }
}
