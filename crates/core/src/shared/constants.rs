pub const DETECTOR_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const DETECTOR_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const ENCODER_MODEL_NAME: &str = "vtoonify_pspencoder.onnx";
pub const PARSER_MODEL_NAME: &str = "vtoonify_faceparsing.onnx";

/// Base URL for the stylization ONNX exports; overridable via `MODEL_BASE_URL_ENV`.
pub const MODEL_BASE_URL: &str = "https://huggingface.co/PKUWilliamYang/VToonify/resolve/main/onnx";
pub const MODEL_BASE_URL_ENV: &str = "TOONIFY_MODEL_BASE_URL";

/// Max frames processed per video on CPU.
pub const VIDEO_FRAME_LIMIT_CPU: usize = 100;
/// Max frames processed per video on GPU.
pub const VIDEO_FRAME_LIMIT_GPU: usize = 300;

/// Side length of the aligned face fed to the style encoder.
pub const ALIGNED_FACE_SIZE: u32 = 256;

/// Number of style layers in a W+ code.
pub const STYLE_LAYERS: usize = 18;
/// Width of each W+ style layer.
pub const STYLE_DIM: usize = 512;
/// Leading W+ layers taken from the exstyle code when mixing.
pub const STRUCTURE_LAYERS: usize = 7;

/// The generator upsamples its input by this factor.
pub const GENERATOR_UPSCALE: u32 = 4;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm"];

pub const EXAMPLE_IMAGES: &[&str] = &[
    "./vtoonify/data/pexels-andrea-piacquadio-733872.jpg",
    "./vtoonify/data/i5R8hbZFDdc.jpg",
    "./vtoonify/data/yRpe13BHdKw.jpg",
    "./vtoonify/data/ILip77SbmOE.jpg",
    "./vtoonify/data/077436.jpg",
    "./vtoonify/data/081680.jpg",
];

pub const EXAMPLE_VIDEOS: &[&str] = &[
    "./vtoonify/data/529_2.mp4",
    "./vtoonify/data/7154235.mp4",
    "./vtoonify/data/651.mp4",
    "./vtoonify/data/908.mp4",
];

/// Resolve the stylization model base URL, honouring the environment override.
pub fn model_base_url() -> String {
    std::env::var(MODEL_BASE_URL_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|| MODEL_BASE_URL.to_string())
}

/// Full download URL for a stylization model file.
pub fn model_url(file_name: &str) -> String {
    format!("{}/{file_name}", model_base_url())
}

pub fn is_image_path(path: &std::path::Path) -> bool {
    has_extension(path, IMAGE_EXTENSIONS)
}

pub fn is_video_path(path: &std::path::Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

fn has_extension(path: &std::path::Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
