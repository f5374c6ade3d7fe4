use ndarray::{s, Array2, ArrayView2};
use thiserror::Error;

use crate::shared::constants::{STRUCTURE_LAYERS, STYLE_DIM, STYLE_LAYERS};

#[derive(Error, Debug)]
pub enum StyleCodeError {
    #[error("style code has {actual} values, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
    #[error("style index {index} out of range, table holds {count} codes")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("style code table {path} is not a whole number of codes ({bytes} bytes)")]
    Truncated { path: String, bytes: usize },
    #[error("failed to read style code table: {0}")]
    Io(#[from] std::io::Error),
}

const CODE_LEN: usize = STYLE_LAYERS * STYLE_DIM;

fn to_matrix(values: Vec<f32>) -> Result<Array2<f32>, StyleCodeError> {
    let actual = values.len();
    Array2::from_shape_vec((STYLE_LAYERS, STYLE_DIM), values).map_err(|_| {
        StyleCodeError::WrongLength {
            expected: CODE_LEN,
            actual,
        }
    })
}

/// Extrinsic style code of a preset, a W+ latent of shape `[18, 512]`.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleCode(Array2<f32>);

/// The style encoder's W+ code for an aligned input face.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleInputCode(Array2<f32>);

impl StyleCode {
    pub fn from_vec(values: Vec<f32>) -> Result<Self, StyleCodeError> {
        to_matrix(values).map(Self)
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.0.view()
    }

    /// Generator conditioning: the input face's code with its structure
    /// layers replaced by this style's.
    pub fn mix_into(&self, input: &StyleInputCode) -> Array2<f32> {
        let mut mixed = input.0.clone();
        mixed
            .slice_mut(s![..STRUCTURE_LAYERS, ..])
            .assign(&self.0.slice(s![..STRUCTURE_LAYERS, ..]));
        mixed
    }
}

impl StyleInputCode {
    pub fn from_vec(values: Vec<f32>) -> Result<Self, StyleCodeError> {
        to_matrix(values).map(Self)
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.0.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(v: f32) -> Vec<f32> {
        vec![v; CODE_LEN]
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = StyleCode::from_vec(vec![0.0; 10]).unwrap_err();
        assert!(matches!(
            err,
            StyleCodeError::WrongLength {
                expected: 9216,
                actual: 10
            }
        ));
    }

    #[test]
    fn test_shape() {
        let code = StyleInputCode::from_vec(filled(0.0)).unwrap();
        assert_eq!(code.view().shape(), &[18, 512]);
    }

    #[test]
    fn test_mix_takes_structure_layers_from_style() {
        let style = StyleCode::from_vec(filled(1.0)).unwrap();
        let input = StyleInputCode::from_vec(filled(-1.0)).unwrap();
        let mixed = style.mix_into(&input);

        assert_eq!(mixed.shape(), &[18, 512]);
        for layer in 0..18 {
            let expected = if layer < 7 { 1.0 } else { -1.0 };
            assert!(mixed.row(layer).iter().all(|&v| v == expected), "layer {layer}");
        }
    }

    #[test]
    fn test_mix_leaves_inputs_untouched() {
        let style = StyleCode::from_vec(filled(1.0)).unwrap();
        let input = StyleInputCode::from_vec(filled(-1.0)).unwrap();
        let _ = style.mix_into(&input);
        assert!(input.view().iter().all(|&v| v == -1.0));
    }
}
