//! The operations the front-ends drive.
//!
//! Every call is synchronous and reports failure only through its
//! human-readable `status`; callers never see an `Err`.

use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::stylization::domain::style_code::{StyleCode, StyleInputCode};

#[derive(Clone, Debug)]
pub struct LoadedStyle {
    pub style_code: Option<StyleCode>,
    pub status: String,
}

#[derive(Clone, Debug)]
pub struct AlignedImage {
    pub face: Option<Frame>,
    pub style_input: Option<StyleInputCode>,
    pub status: String,
}

#[derive(Clone, Debug)]
pub struct AlignedVideo {
    pub video: Option<PathBuf>,
    pub style_input: Option<StyleInputCode>,
    pub status: String,
}

#[derive(Clone, Debug)]
pub struct ToonifiedImage {
    pub image: Option<Frame>,
    pub status: String,
}

#[derive(Clone, Debug)]
pub struct ToonifiedVideo {
    pub video: Option<PathBuf>,
    pub status: String,
}

pub trait ModelAdapter: Send {
    /// Select a style preset, loading its generator if needed.
    fn load_model(&mut self, style_name: &str) -> LoadedStyle;

    fn detect_and_align_image(
        &mut self,
        image_path: Option<&Path>,
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
    ) -> AlignedImage;

    /// Align using only the first frame of the video.
    fn detect_and_align_video(
        &mut self,
        video_path: Option<&Path>,
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
    ) -> AlignedImage;

    /// Align the first frame and crop the rest of the clip identically.
    fn detect_and_align_full_video(
        &mut self,
        video_path: Option<&Path>,
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
    ) -> AlignedVideo;

    fn image_toonify(
        &mut self,
        aligned_face: Option<&Frame>,
        style_input: Option<&StyleInputCode>,
        style_code: Option<&StyleCode>,
        degree: f32,
    ) -> ToonifiedImage;

    fn video_toonify(
        &mut self,
        aligned_video: Option<&Path>,
        style_input: Option<&StyleInputCode>,
        style_code: Option<&StyleCode>,
        degree: f32,
    ) -> ToonifiedVideo;
}

pub mod status {
    pub const UNKNOWN_STYLE: &str = "Oops, unknown style type. Please select a valid style.";
    pub const EMPTY_FILE: &str = "Error: fail to load empty file.";
    pub const BAD_IMAGE: &str = "Error: fail to load the image.";
    pub const BAD_VIDEO: &str = "Error: fail to load the video.";
    pub const NO_FACE_IMAGE: &str = "Error: no face detected! Please retry or change the photo.";
    pub const NO_FACE_VIDEO: &str = "Error: no face detected! Please retry or change the video.";
    pub const BAD_IMAGE_INPUT: &str = "Oops, something wrong with the input. Please go to Step 2 and Rescale Image/First Frame first.";
    pub const BAD_VIDEO_INPUT: &str =
        "Oops, something wrong with the input. Please go to Step 2 and Rescale Video first.";
    pub const BAD_STYLE: &str =
        "Oops, something wrong with the style type. Please go to Step 1 and load model again.";
    pub const BUSY: &str = "The model is busy with another request. Please retry.";
    pub const NO_MODEL: &str = "No model loaded.";

    pub fn model_loaded(style: &str) -> String {
        format!("Model of {style} loaded.")
    }

    pub fn frame_rescaled(height: u32, width: u32) -> String {
        format!("Successfully rescaled the frame to ({height}, {width})")
    }

    pub fn video_rescaled(height: u32, width: u32) -> String {
        format!("Successfully rescaled the video to ({height}, {width})")
    }

    pub fn image_toonified(style: &str) -> String {
        format!("Successfully toonified the image with style of {style}")
    }

    pub fn video_toonified(frames: usize, style: &str) -> String {
        format!("Successfully toonified video of {frames} frames with style of {style}")
    }

    pub fn error(err: &dyn std::fmt::Display) -> String {
        format!("Error: {err}")
    }
}
