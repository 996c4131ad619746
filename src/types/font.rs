use std::path::Path;

use crate::error::{AssetError, Result};

/// sfnt version tags accepted as font files
const FONT_MAGIC: [[u8; 4]; 4] = [*b"\x00\x01\x00\x00", *b"OTTO", *b"true", *b"ttcf"];

/// Raw TrueType/OpenType font file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Font {
    name: String,
    data: Vec<u8>,
}

impl Font {
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let valid = data.len() >= 4 && FONT_MAGIC.iter().any(|magic| data[..4] == magic[..]);
        if !valid {
            return Err(AssetError::DecodeError {
                path: name.into(),
                reason: "not a TrueType or OpenType font".to_string(),
            });
        }
        Ok(Self { name, data })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| AssetError::DecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(name, data).map_err(|e| match e {
            AssetError::DecodeError { reason, .. } => AssetError::DecodeError {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_check() {
        assert!(Font::from_bytes("a", b"OTTO\0\0\0\0".to_vec()).is_ok());
        assert!(Font::from_bytes("b", vec![0, 1, 0, 0, 0, 12]).is_ok());
        assert!(Font::from_bytes("c", b"PK\x03\x04".to_vec()).is_err());
        assert!(Font::from_bytes("d", vec![0, 1]).is_err());
    }
}
