use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::constants::{VIDEO_FRAME_LIMIT_CPU, VIDEO_FRAME_LIMIT_GPU};

/// Compute device the ONNX sessions run on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Device {
    #[default]
    Cpu,
    /// GPU with a device ordinal (`cuda:1` → 1).
    Gpu(u32),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown device '{0}', expected cpu, gpu, cuda or cuda:N")]
pub struct ParseDeviceError(String);

impl Device {
    pub fn is_gpu(self) -> bool {
        matches!(self, Device::Gpu(_))
    }

    /// Upper bound on frames read from a video on this device.
    pub fn video_frame_limit(self) -> usize {
        match self {
            Device::Cpu => VIDEO_FRAME_LIMIT_CPU,
            Device::Gpu(_) => VIDEO_FRAME_LIMIT_GPU,
        }
    }
}

impl FromStr for Device {
    type Err = ParseDeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "cpu" => Ok(Device::Cpu),
            "gpu" | "cuda" => Ok(Device::Gpu(0)),
            _ => lower
                .strip_prefix("cuda:")
                .and_then(|n| n.parse::<u32>().ok())
                .map(Device::Gpu)
                .ok_or_else(|| ParseDeviceError(s.to_string())),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu(0) => write!(f, "cuda"),
            Device::Gpu(n) => write!(f, "cuda:{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cpu", Device::Cpu)]
    #[case("CPU", Device::Cpu)]
    #[case("cuda", Device::Gpu(0))]
    #[case("gpu", Device::Gpu(0))]
    #[case("cuda:2", Device::Gpu(2))]
    fn test_parse_device(#[case] input: &str, #[case] expected: Device) {
        assert_eq!(input.parse::<Device>().unwrap(), expected);
    }

    #[rstest]
    #[case("tpu")]
    #[case("cuda:x")]
    #[case("")]
    fn test_parse_invalid_device(#[case] input: &str) {
        assert!(input.parse::<Device>().is_err());
    }

    #[test]
    fn test_frame_limit_depends_on_device() {
        assert_eq!(Device::Cpu.video_frame_limit(), 100);
        assert_eq!(Device::Gpu(0).video_frame_limit(), 300);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for device in [Device::Cpu, Device::Gpu(0), Device::Gpu(3)] {
            assert_eq!(device.to_string().parse::<Device>().unwrap(), device);
        }
    }
}
