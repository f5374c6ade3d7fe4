use std::path::Path;

use crate::shared::constants::{STYLE_DIM, STYLE_LAYERS};
use crate::stylization::domain::style_code::{StyleCode, StyleCodeError};

const CODE_LEN: usize = STYLE_LAYERS * STYLE_DIM;
const CODE_BYTES: usize = CODE_LEN * std::mem::size_of::<f32>();

/// A family's style codes: consecutive `[18, 512]` little-endian f32
/// blocks, one per style, with no header.
pub struct StyleCodeTable {
    values: Vec<f32>,
}

impl StyleCodeTable {
    pub fn load(path: &Path) -> Result<Self, StyleCodeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes).map_err(|e| match e {
            StyleCodeError::Truncated { bytes, .. } => StyleCodeError::Truncated {
                path: path.display().to_string(),
                bytes,
            },
            other => other,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StyleCodeError> {
        if bytes.is_empty() || bytes.len() % CODE_BYTES != 0 {
            return Err(StyleCodeError::Truncated {
                path: String::new(),
                bytes: bytes.len(),
            });
        }
        // Copies into an f32 buffer, so the byte slice needs no alignment
        let values: Vec<f32> = bytemuck::pod_collect_to_vec(bytes);
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len() / CODE_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn code(&self, index: usize) -> Result<StyleCode, StyleCodeError> {
        if index >= self.len() {
            return Err(StyleCodeError::IndexOutOfRange {
                index,
                count: self.len(),
            });
        }
        let start = index * CODE_LEN;
        StyleCode::from_vec(self.values[start..start + CODE_LEN].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_bytes(codes: usize) -> Vec<u8> {
        let values: Vec<f32> = (0..codes * CODE_LEN).map(|i| (i / CODE_LEN) as f32).collect();
        bytemuck::cast_slice(&values).to_vec()
    }

    #[test]
    fn test_from_bytes_counts_codes() {
        let table = StyleCodeTable::from_bytes(&table_bytes(3)).unwrap();
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_code_selects_block() {
        let table = StyleCodeTable::from_bytes(&table_bytes(3)).unwrap();
        let code = table.code(2).unwrap();
        assert!(code.view().iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_index_out_of_range() {
        let table = StyleCodeTable::from_bytes(&table_bytes(2)).unwrap();
        assert!(matches!(
            table.code(2),
            Err(StyleCodeError::IndexOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_truncated_table_rejected() {
        let mut bytes = table_bytes(1);
        bytes.pop();
        assert!(matches!(
            StyleCodeTable::from_bytes(&bytes),
            Err(StyleCodeError::Truncated { .. })
        ));
        assert!(StyleCodeTable::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.f32");
        std::fs::write(&path, table_bytes(2)).unwrap();
        let table = StyleCodeTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_load_reports_path_on_truncation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.f32");
        std::fs::write(&path, [0u8; 7]).unwrap();
        match StyleCodeTable::load(&path) {
            Err(StyleCodeError::Truncated { path: p, bytes }) => {
                assert!(p.ends_with("broken.f32"));
                assert_eq!(bytes, 7);
            }
            _ => panic!("expected truncation error"),
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            StyleCodeTable::load(Path::new("/nonexistent/codes.f32")),
            Err(StyleCodeError::Io(_))
        ));
    }
}
