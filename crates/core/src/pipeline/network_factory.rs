use crate::detection::domain::face_detector::FaceDetector;
use crate::stylization::domain::face_parser::FaceParser;
use crate::stylization::domain::style_encoder::StyleEncoder;
use crate::stylization::domain::style_preset::StyleFamily;
use crate::stylization::domain::toonify_generator::ToonifyGenerator;
use crate::stylization::infrastructure::style_code_store::StyleCodeTable;

type DynError = Box<dyn std::error::Error>;

/// Builds the networks and style tables the model adapter runs on.
///
/// Separates where models come from (cache, bundle, download) and which
/// runtime executes them from the orchestration in `ToonifyModel`.
pub trait NetworkFactory: Send {
    fn face_detector(&self) -> Result<Box<dyn FaceDetector>, DynError>;
    fn style_encoder(&self) -> Result<Box<dyn StyleEncoder>, DynError>;
    fn face_parser(&self) -> Result<Box<dyn FaceParser>, DynError>;
    fn generator(&self, file_name: &str) -> Result<Box<dyn ToonifyGenerator>, DynError>;
    fn style_codes(&self, family: StyleFamily) -> Result<StyleCodeTable, DynError>;
}
