use crate::alignment::domain::crop_parameters::CropParameters;
use crate::alignment::domain::face_quad::FaceQuad;
use crate::alignment::domain::padding::Padding;
use crate::alignment::infrastructure::resample::{resize, smooth, warp_quad};
use crate::detection::domain::face_detector::{primary_face, FaceDetector};
use crate::shared::constants::ALIGNED_FACE_SIZE;
use crate::shared::frame::Frame;
use crate::stylization::domain::style_code::StyleInputCode;
use crate::stylization::domain::style_encoder::StyleEncoder;

type DynError = Box<dyn std::error::Error>;

/// A frame rescaled and cropped around its face, with the encoder's code
/// for that face.
#[derive(Clone, Debug)]
pub struct AlignedFace {
    pub face: Frame,
    pub crop: CropParameters,
    pub style_input: StyleInputCode,
}

/// Rescale and crop `frame` with precomputed crop parameters.
///
/// Shared by the first frame and every following frame of a video so the
/// whole clip keeps one framing.
pub fn apply_crop(frame: &Frame, crop: &CropParameters) -> Result<Frame, DynError> {
    let mut source = frame.clone();
    smooth(&mut source, crop.smoothing_passes());
    let scaled = resize(&source, crop.scaled_width, crop.scaled_height)?;
    if crop.right > scaled.width() || crop.bottom > scaled.height() {
        return Err("crop exceeds the rescaled frame".into());
    }
    Ok(scaled.crop(crop.left, crop.top, crop.width(), crop.height()))
}

/// Detects the face in one frame, rescales it to the generator's working
/// scale and encodes its style.
pub struct AlignFrameUseCase<'a> {
    detector: &'a mut dyn FaceDetector,
    encoder: &'a mut dyn StyleEncoder,
}

impl<'a> AlignFrameUseCase<'a> {
    pub fn new(detector: &'a mut dyn FaceDetector, encoder: &'a mut dyn StyleEncoder) -> Self {
        Self { detector, encoder }
    }

    /// `Ok(None)` when no usable face is found.
    pub fn execute(
        &mut self,
        frame: &Frame,
        padding: &Padding,
    ) -> Result<Option<AlignedFace>, DynError> {
        let detections = self.detector.detect(frame)?;
        let Some(landmarks) = primary_face(&detections) else {
            return Ok(None);
        };
        let Some(crop) = CropParameters::compute(landmarks, frame.width(), frame.height(), padding)
        else {
            return Ok(None);
        };
        let face = apply_crop(frame, &crop)?;

        // The encoder wants FFHQ framing, which needs landmarks on the
        // rescaled face
        let detections = self.detector.detect(&face)?;
        let Some(quad) = primary_face(&detections).and_then(FaceQuad::from_landmarks) else {
            return Ok(None);
        };
        let encoder_input = warp_quad(&face, &quad, ALIGNED_FACE_SIZE)?;
        let style_input = self.encoder.encode(&encoder_input)?;

        Ok(Some(AlignedFace {
            face,
            crop,
            style_input,
        }))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_aligns_centered_face() {
        // 512 wide: eyes 128 apart → scale 0.5, frame becomes 256x256,
        // eye midpoint at (128, 128)
        let mut detector = CenteredFaceDetector { calls: 0 };
        let mut encoder = ConstantEncoder { seen: Vec::new() };
        let frame = gray_frame(512, 512);

        let aligned = AlignFrameUseCase::new(&mut detector, &mut encoder)
            .execute(&frame, &Padding::default())
            .unwrap()
            .unwrap();

        assert_eq!((aligned.crop.scaled_width, aligned.crop.scaled_height), (256, 256));
        assert_eq!((aligned.crop.left, aligned.crop.top), (0, 0));
        assert_eq!((aligned.crop.right, aligned.crop.bottom), (256, 256));
        assert_eq!((aligned.face.width(), aligned.face.height()), (256, 256));
        assert_eq!(encoder.seen, vec![(256, 256)]);
        assert_eq!(detector.calls, 2);
    }

    #[test]
    fn test_padding_changes_crop_size() {
        // 1024 wide: eyes 256 apart → scale 0.25, 256x256 frame again
        let mut detector = CenteredFaceDetector { calls: 0 };
        let mut encoder = ConstantEncoder { seen: Vec::new() };
        let frame = gray_frame(1024, 1024);
        let padding = Padding::new(128, 128, 128, 128);

        let aligned = AlignFrameUseCase::new(&mut detector, &mut encoder)
            .execute(&frame, &padding)
            .unwrap()
            .unwrap();
        assert_eq!(aligned.crop.smoothing_passes(), 2);
        assert_eq!((aligned.face.width(), aligned.face.height()), (256, 256));
    }

    #[test]
    fn test_no_face_returns_none() {
        let mut detector = NoFaceDetector;
        let mut encoder = ConstantEncoder { seen: Vec::new() };
        let result = AlignFrameUseCase::new(&mut detector, &mut encoder)
            .execute(&gray_frame(64, 64), &Padding::default())
            .unwrap();
        assert!(result.is_none());
        assert!(encoder.seen.is_empty());
    }

    #[test]
    fn test_apply_crop_uses_crop_window() {
        let crop = CropParameters {
            scale: 1.0,
            scaled_width: 64,
            scaled_height: 48,
            left: 8,
            right: 40,
            top: 16,
            bottom: 48,
        };
        let cropped = apply_crop(&gray_frame(64, 48), &crop).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (32, 32));
    }

    #[test]
    fn test_apply_crop_rejects_out_of_frame_window() {
        let crop = CropParameters {
            scale: 1.0,
            scaled_width: 64,
            scaled_height: 48,
            left: 8,
            right: 72,
            top: 0,
            bottom: 8,
        };
        assert!(apply_crop(&gray_frame(64, 48), &crop).is_err());
    }
}
