use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::builder::PossibleValuesParser;
use clap::Parser;

use toonify_core::alignment::domain::padding::{PADDING_DEFAULT, PADDING_MAX, PADDING_MIN};
use toonify_core::pipeline::model_adapter::ModelAdapter;
use toonify_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use toonify_core::pipeline::toonify_model::{ToonifyConfig, ToonifyModel};
use toonify_core::shared::constants::{is_image_path, is_video_path};
use toonify_core::shared::device::Device;
use toonify_core::stylization::domain::style_code::StyleCode;
use toonify_core::stylization::domain::style_degree::{degree_range_for, DEFAULT_DEGREE};
use toonify_core::stylization::domain::style_preset::{style_names, DEFAULT_STYLE};
use toonify_core::video::domain::image_writer::ImageWriter;
use toonify_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Portrait style transfer for images and videos.
#[derive(Parser, Debug)]
#[command(name = "toonify")]
struct Cli {
    /// Input image or video file.
    input: PathBuf,

    /// Output file. Images produce an image, videos an mp4.
    output: PathBuf,

    /// Style preset.
    #[arg(
        long,
        default_value = DEFAULT_STYLE,
        value_parser = PossibleValuesParser::new(style_names())
    )]
    style: String,

    /// Style degree in [0, 1]; only presets ending in -d honour it.
    #[arg(long, default_value_t = DEFAULT_DEGREE)]
    degree: f32,

    /// Padding above the eyes, in rescaled pixels (128-256).
    #[arg(long, default_value_t = PADDING_DEFAULT)]
    top: u32,

    /// Padding below the eyes (128-256).
    #[arg(long, default_value_t = PADDING_DEFAULT)]
    bottom: u32,

    /// Padding left of the eyes (128-256).
    #[arg(long, default_value_t = PADDING_DEFAULT)]
    left: u32,

    /// Padding right of the eyes (128-256).
    #[arg(long, default_value_t = PADDING_DEFAULT)]
    right: u32,

    /// Compute device: cpu, gpu, cuda or cuda:N.
    #[arg(long, default_value = "cpu")]
    device: Device,

    /// Directory with pre-downloaded model files.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Keep intermediate aligned videos in this directory.
    #[arg(long)]
    work_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = ToonifyConfig {
        device: cli.device,
        model_dir: cli.model_dir.clone(),
        work_dir: cli.work_dir.clone(),
    };
    let mut model = ToonifyModel::with_download_progress(config, Arc::new(download_progress))?
        .with_logger(Box::new(StdoutPipelineLogger::default()));
    eprintln!();

    let loaded = model.load_model(&cli.style);
    let style_code = loaded.style_code.ok_or(loaded.status)?;
    let degree = degree_range_for(&cli.style).clamp(cli.degree);

    if is_image_path(&cli.input) {
        run_image(&mut model, &cli, degree, style_code)
    } else {
        run_video(&mut model, &cli, degree, style_code)
    }
}

fn run_image(
    model: &mut ToonifyModel,
    cli: &Cli,
    degree: f32,
    style_code: StyleCode,
) -> Result<(), Box<dyn std::error::Error>> {
    let aligned = model.detect_and_align_image(
        Some(&cli.input),
        cli.top,
        cli.bottom,
        cli.left,
        cli.right,
    );
    log::info!("{}", aligned.status);
    let (Some(face), Some(style_input)) = (aligned.face, aligned.style_input) else {
        return Err(aligned.status.into());
    };

    let result = model.image_toonify(Some(&face), Some(&style_input), Some(&style_code), degree);
    let image = result.image.ok_or(result.status.clone())?;
    ImageFileWriter::new().write(&cli.output, &image)?;
    log::info!("{}", result.status);
    log::info!("Output written to {}", cli.output.display());
    Ok(())
}

fn run_video(
    model: &mut ToonifyModel,
    cli: &Cli,
    degree: f32,
    style_code: StyleCode,
) -> Result<(), Box<dyn std::error::Error>> {
    let aligned = model.detect_and_align_full_video(
        Some(&cli.input),
        cli.top,
        cli.bottom,
        cli.left,
        cli.right,
    );
    log::info!("{}", aligned.status);
    let (Some(clip), Some(style_input)) = (aligned.video, aligned.style_input) else {
        return Err(aligned.status.into());
    };

    let result = model.video_toonify(Some(&clip), Some(&style_input), Some(&style_code), degree);
    let video = result.video.ok_or(result.status.clone())?;
    move_file(&video, &cli.output)?;
    log::info!("{}", result.status);
    log::info!("Output written to {}", cli.output.display());
    Ok(())
}

/// Rename, falling back to copy when the work dir sits on another filesystem.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if std::fs::rename(from, to).is_err() {
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)?;
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image_path(&cli.input) && !is_video_path(&cli.input) {
        return Err(format!("Unsupported input type: {}", cli.input.display()).into());
    }
    if is_image_path(&cli.input) != is_image_path(&cli.output) {
        return Err("Output must be an image for image input and a video for video input".into());
    }
    if !(0.0..=1.0).contains(&cli.degree) {
        return Err(format!("Degree must be between 0.0 and 1.0, got {}", cli.degree).into());
    }
    for (name, value) in [
        ("top", cli.top),
        ("bottom", cli.bottom),
        ("left", cli.left),
        ("right", cli.right),
    ] {
        if !(PADDING_MIN..=PADDING_MAX).contains(&value) {
            return Err(format!(
                "--{name} must be between {PADDING_MIN} and {PADDING_MAX}, got {value}"
            )
            .into());
        }
    }
    Ok(())
}

fn download_progress(name: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {name}... {pct}%");
    } else {
        eprint!("\rDownloading {name}... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("toonify").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["in.jpg", "out.png"]);
        assert_eq!(cli.style, "cartoon1");
        assert_eq!(cli.degree, 0.5);
        assert_eq!((cli.top, cli.bottom, cli.left, cli.right), (200, 200, 200, 200));
        assert_eq!(cli.device, Device::Cpu);
        assert!(cli.model_dir.is_none());
    }

    #[test]
    fn test_device_flag_parses() {
        let cli = parse(&["in.mp4", "out.mp4", "--device", "cuda:1"]);
        assert_eq!(cli.device, Device::Gpu(1));
    }

    #[test]
    fn test_help_lists_style_presets() {
        use clap::CommandFactory;
        let help = Cli::command().render_help().to_string();
        for name in style_names() {
            assert!(help.contains(name), "{name} missing from --help");
        }
    }

    #[test]
    fn test_unknown_style_is_rejected() {
        assert!(Cli::try_parse_from(["toonify", "a.jpg", "b.jpg", "--style", "sketch"]).is_err());
    }

    #[test]
    fn test_bad_device_is_rejected() {
        assert!(Cli::try_parse_from(["toonify", "a.jpg", "b.jpg", "--device", "tpu"]).is_err());
    }

    fn validated(args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join(args[0]);
        std::fs::write(&input, b"x").unwrap();
        let rest = args[1..].iter().map(|s| s.to_string());
        let argv = ["toonify".to_string(), input.display().to_string()]
            .into_iter()
            .chain(rest);
        validate(&Cli::try_parse_from(argv).unwrap())
    }

    #[rstest]
    #[case(&["face.jpg", "out.png"], true)]
    #[case(&["clip.mp4", "out.mp4", "--style", "pixar-d", "--degree", "0.8"], true)]
    #[case(&["face.jpg", "out.mp4"], false)]
    #[case(&["face.jpg", "out.png", "--degree", "1.5"], false)]
    #[case(&["face.jpg", "out.png", "--top", "100"], false)]
    #[case(&["notes.txt", "out.png"], false)]
    fn test_validate(#[case] args: &[&str], #[case] ok: bool) {
        assert_eq!(validated(args).is_ok(), ok);
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let cli = parse(&["/nonexistent/face.jpg", "out.png"]);
        assert!(validate(&cli).is_err());
    }
}
