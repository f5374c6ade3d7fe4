use std::path::Path;

use crate::shared::device::Device;

/// Return the ONNX execution providers for `device`.
///
/// `Device::Cpu` registers none, so ONNX Runtime uses its default CPU
/// provider. For GPUs the platform accelerator is requested; ONNX Runtime
/// falls back to CPU if it is unavailable.
pub fn execution_providers(
    device: Device,
) -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    let Device::Gpu(ordinal) = device else {
        return vec![];
    };

    #[cfg(target_os = "macos")]
    {
        let _ = ordinal;
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default()
            .with_device_id(ordinal as i32)
            .build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![ort::execution_providers::CUDAExecutionProvider::default()
            .with_device_id(ordinal as i32)
            .build()]
    }
}

/// Open an ONNX model as a session on `device`.
pub fn build_session(
    model_path: &Path,
    device: Device,
) -> Result<ort::session::Session, Box<dyn std::error::Error>> {
    let intra_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let session = ort::session::Session::builder()?
        .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .with_execution_providers(execution_providers(device))?
        .commit_from_file(model_path)?;
    Ok(session)
}
