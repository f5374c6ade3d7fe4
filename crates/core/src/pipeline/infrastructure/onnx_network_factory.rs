use std::path::PathBuf;
use std::sync::Arc;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::infrastructure::onnx_yolo_detector::{OnnxYoloDetector, DEFAULT_CONFIDENCE};
use crate::pipeline::network_factory::NetworkFactory;
use crate::shared::constants::{
    model_url, DETECTOR_MODEL_NAME, DETECTOR_MODEL_URL, ENCODER_MODEL_NAME, PARSER_MODEL_NAME,
};
use crate::shared::device::Device;
use crate::shared::model_resolver::{self, ProgressFn};
use crate::stylization::domain::face_parser::FaceParser;
use crate::stylization::domain::style_encoder::StyleEncoder;
use crate::stylization::domain::style_preset::StyleFamily;
use crate::stylization::domain::toonify_generator::ToonifyGenerator;
use crate::stylization::infrastructure::onnx_face_parser::OnnxFaceParser;
use crate::stylization::infrastructure::onnx_style_encoder::OnnxStyleEncoder;
use crate::stylization::infrastructure::onnx_toonify_generator::OnnxToonifyGenerator;
use crate::stylization::infrastructure::style_code_store::StyleCodeTable;

type DynError = Box<dyn std::error::Error>;

/// Download progress: `(model file, bytes_downloaded, total_bytes)`.
pub type DownloadProgress = Arc<dyn Fn(&str, u64, u64) + Send + Sync>;

/// Resolves model files through the model cache and runs them with
/// ONNX Runtime on the configured device.
pub struct OnnxNetworkFactory {
    device: Device,
    model_dir: Option<PathBuf>,
    progress: Option<DownloadProgress>,
}

impl OnnxNetworkFactory {
    pub fn new(device: Device, model_dir: Option<PathBuf>) -> Self {
        Self {
            device,
            model_dir,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: DownloadProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    fn resolve(&self, name: &str, url: &str) -> Result<PathBuf, DynError> {
        let progress: Option<ProgressFn> = self.progress.clone().map(|cb| {
            let name = name.to_string();
            Box::new(move |done: u64, total: u64| cb(&name, done, total)) as ProgressFn
        });
        let path = model_resolver::resolve(name, url, self.model_dir.as_deref(), progress)?;
        log::debug!("Resolved {name} to {}", path.display());
        Ok(path)
    }

    fn resolve_stylization(&self, name: &str) -> Result<PathBuf, DynError> {
        self.resolve(name, &model_url(name))
    }

    /// Fetch the shared networks ahead of the first request so the UI can
    /// show download progress at startup.
    pub fn prefetch(&self) -> Result<(), DynError> {
        self.resolve(DETECTOR_MODEL_NAME, DETECTOR_MODEL_URL)?;
        self.resolve_stylization(ENCODER_MODEL_NAME)?;
        self.resolve_stylization(PARSER_MODEL_NAME)?;
        Ok(())
    }
}

impl NetworkFactory for OnnxNetworkFactory {
    fn face_detector(&self) -> Result<Box<dyn FaceDetector>, DynError> {
        let path = self.resolve(DETECTOR_MODEL_NAME, DETECTOR_MODEL_URL)?;
        Ok(Box::new(OnnxYoloDetector::new(
            &path,
            self.device,
            DEFAULT_CONFIDENCE,
        )?))
    }

    fn style_encoder(&self) -> Result<Box<dyn StyleEncoder>, DynError> {
        let path = self.resolve_stylization(ENCODER_MODEL_NAME)?;
        Ok(Box::new(OnnxStyleEncoder::new(&path, self.device)?))
    }

    fn face_parser(&self) -> Result<Box<dyn FaceParser>, DynError> {
        let path = self.resolve_stylization(PARSER_MODEL_NAME)?;
        Ok(Box::new(OnnxFaceParser::new(&path, self.device)?))
    }

    fn generator(&self, file_name: &str) -> Result<Box<dyn ToonifyGenerator>, DynError> {
        let path = self.resolve_stylization(file_name)?;
        Ok(Box::new(OnnxToonifyGenerator::new(&path, self.device)?))
    }

    fn style_codes(&self, family: StyleFamily) -> Result<StyleCodeTable, DynError> {
        let path = self.resolve_stylization(&family.style_code_file())?;
        Ok(StyleCodeTable::load(&path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_bundled_style_codes_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let values = vec![0.5f32; 18 * 512 * 2];
        std::fs::write(
            dir.path().join(StyleFamily::Pixar.style_code_file()),
            bytemuck::cast_slice::<f32, u8>(&values),
        )
        .unwrap();

        let factory = OnnxNetworkFactory::new(Device::Cpu, Some(dir.path().to_path_buf()));
        let table = factory.style_codes(StyleFamily::Pixar).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_progress_callback_receives_file_name() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let factory = OnnxNetworkFactory::new(Device::Cpu, None).with_progress(Arc::new(
            move |name: &str, done, total| {
                sink.lock().unwrap().push((name.to_string(), done, total));
            },
        ));
        let progress = factory.progress.clone().unwrap();
        progress("a.onnx", 1, 2);
        assert_eq!(seen.lock().unwrap()[0], ("a.onnx".to_string(), 1, 2));
    }
}
