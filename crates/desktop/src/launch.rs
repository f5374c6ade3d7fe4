use std::path::PathBuf;

use clap::Parser;

use toonify_core::shared::device::Device;

use crate::settings::Appearance;

/// Launch flags for the desktop window.
#[derive(Parser, Debug, Clone)]
#[command(name = "toonify-desktop")]
pub struct LaunchOptions {
    /// Compute device: cpu, gpu, cuda or cuda:N.
    #[arg(long, default_value = "cpu")]
    pub device: Device,

    /// Override the saved appearance for this session.
    #[arg(long, value_enum)]
    pub theme: Option<Appearance>,

    /// Accepted for compatibility with hosted launch scripts; ignored.
    #[arg(long)]
    pub share: bool,

    /// Accepted for compatibility with hosted launch scripts; ignored.
    #[arg(long)]
    pub port: Option<u16>,

    /// Run each request on its own thread instead of one FIFO worker.
    #[arg(long)]
    pub disable_queue: bool,

    /// Directory with pre-downloaded model files.
    #[arg(long)]
    pub model_dir: Option<PathBuf>,
}

impl LaunchOptions {
    /// Flags that only make sense for a web server.
    pub fn warn_ignored(&self) {
        if self.share {
            log::warn!("--share has no effect for a desktop window; ignoring");
        }
        if let Some(port) = self.port {
            log::warn!("--port {port} has no effect for a desktop window; ignoring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> LaunchOptions {
        LaunchOptions::try_parse_from(std::iter::once("toonify-desktop").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let opts = parse(&[]);
        assert_eq!(opts.device, Device::Cpu);
        assert_eq!(opts.theme, None);
        assert!(!opts.share);
        assert_eq!(opts.port, None);
        assert!(!opts.disable_queue);
        assert_eq!(opts.model_dir, None);
    }

    #[rstest]
    #[case("cpu", Device::Cpu)]
    #[case("cuda", Device::Gpu(0))]
    #[case("cuda:1", Device::Gpu(1))]
    fn test_device_flag(#[case] value: &str, #[case] expected: Device) {
        assert_eq!(parse(&["--device", value]).device, expected);
    }

    #[rstest]
    #[case("system", Appearance::System)]
    #[case("dark", Appearance::Dark)]
    #[case("light", Appearance::Light)]
    fn test_theme_flag(#[case] value: &str, #[case] expected: Appearance) {
        assert_eq!(parse(&["--theme", value]).theme, Some(expected));
    }

    #[test]
    fn test_server_flags_are_accepted() {
        let opts = parse(&["--share", "--port", "7860", "--disable-queue"]);
        assert!(opts.share);
        assert_eq!(opts.port, Some(7860));
        assert!(opts.disable_queue);
        opts.warn_ignored();
    }

    #[test]
    fn test_unknown_device_rejected() {
        let result = LaunchOptions::try_parse_from(["toonify-desktop", "--device", "tpu"]);
        assert!(result.is_err());
    }
}
