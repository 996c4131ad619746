use std::path::PathBuf;

use crate::asset_type::AssetType;
use crate::handle::Handle;

/// Registry record binding a handle to a project-relative path
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetMetadata {
    pub handle: Handle,
    pub asset_type: AssetType,
    /// Relative to the asset directory
    pub file_path: PathBuf,
    /// Transient, never persisted
    pub is_data_loaded: bool,
}

impl AssetMetadata {
    pub fn new(handle: Handle, asset_type: AssetType, file_path: impl Into<PathBuf>) -> Self {
        Self {
            handle,
            asset_type,
            file_path: file_path.into(),
            is_data_loaded: false,
        }
    }

    /// Null record returned by failed lookups
    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_non_zero()
    }

    /// Path with forward slashes, as written to the registry file
    pub fn persisted_path(&self) -> String {
        self.file_path.to_string_lossy().replace('\\', "/")
    }

    /// File name without extension
    pub fn name(&self) -> String {
        self.file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_metadata_is_invalid() {
        assert!(!AssetMetadata::null().is_valid());
        let metadata = AssetMetadata::new(Handle::from_raw(7), AssetType::Material, "Red.fmat");
        assert!(metadata.is_valid());
        assert!(!metadata.is_data_loaded);
    }

    #[test]
    fn test_persisted_path_uses_forward_slashes() {
        let metadata = AssetMetadata::new(
            Handle::from_raw(1),
            AssetType::Texture,
            "Textures\\Walls\\Brick.png",
        );
        assert_eq!(metadata.persisted_path(), "Textures/Walls/Brick.png");
    }

    #[test]
    fn test_name_is_file_stem() {
        let metadata =
            AssetMetadata::new(Handle::from_raw(1), AssetType::Material, "Materials/Red.fmat");
        assert_eq!(metadata.name(), "Red");
    }
}
