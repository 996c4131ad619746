//! Per-type serializers
//!
//! Each asset type has one stateless serializer that decodes its file,
//! writes it back and builds a default instance. Dispatch is an exhaustive
//! match over [`AssetType`].

mod animation_blueprint;
mod font;
mod material;
mod mesh;
mod physics_material;
mod scene;
mod texture;

pub use animation_blueprint::AnimationBlueprintSerializer;
pub use font::FontSerializer;
pub use material::MaterialSerializer;
pub use mesh::MeshSerializer;
pub use physics_material::PhysicsMaterialSerializer;
pub use scene::{PrefabSerializer, SceneSerializer};
pub use texture::{EnvMapSerializer, TextureSerializer};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::asset::{Asset, AssetData};
use crate::asset_type::AssetType;
use crate::error::{AssetError, Result};
use crate::handle::Handle;
use crate::manager::AssetManager;
use crate::metadata::AssetMetadata;
use crate::types::TextureSpecification;

/// Extra arguments forwarded to a serializer
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadArgs {
    #[default]
    None,
    /// Decode hints for textures
    Texture(TextureSpecification),
    /// Mesh an animation blueprint is bound to
    ParentMesh(Handle),
}

/// Everything a serializer needs to know about the file it works on
#[derive(Clone, Debug)]
pub struct LoadContext {
    pub metadata: AssetMetadata,
    /// Absolute path of the backing file
    pub path: PathBuf,
    pub args: LoadArgs,
}

impl LoadContext {
    pub fn new(metadata: AssetMetadata, path: PathBuf, args: LoadArgs) -> Self {
        Self {
            metadata,
            path,
            args,
        }
    }

    /// Display name derived from the file stem
    pub fn name(&self) -> String {
        self.metadata.name()
    }
}

/// Decode, encode and default-construct one asset type.
///
/// Serializers receive the manager so they can resolve the assets they
/// reference (textures of a material, the mesh of a blueprint).
pub trait AssetSerializer: Send + Sync {
    /// Decode the backing file
    fn try_load_data(&self, manager: &mut AssetManager, ctx: &LoadContext) -> Result<AssetData>;

    /// Write a resident asset back to its file. Import-only types do nothing.
    fn serialize(&self, _manager: &AssetManager, _ctx: &LoadContext, _asset: &Asset) -> Result<()> {
        Ok(())
    }

    /// Build the default instance used by asset creation
    fn create_asset(&self, _manager: &AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        Err(AssetError::CreationUnsupported(ctx.metadata.asset_type))
    }
}

/// Serializer for a declared type. `None` has no serializer.
pub fn serializer_for(asset_type: AssetType) -> Option<&'static dyn AssetSerializer> {
    let serializer: &'static dyn AssetSerializer = match asset_type {
        AssetType::None => return None,
        AssetType::Scene => &SceneSerializer,
        AssetType::MeshAsset => &MeshSerializer,
        AssetType::Material => &MaterialSerializer,
        AssetType::Prefab => &PrefabSerializer,
        AssetType::PhysicsMat => &PhysicsMaterialSerializer,
        AssetType::Texture => &TextureSerializer,
        AssetType::EnvMap => &EnvMapSerializer,
        AssetType::Font => &FontSerializer,
        AssetType::AnimationBlueprint => &AnimationBlueprintSerializer,
    };
    Some(serializer)
}

/// Read and parse a JSON document. Every failure is reported against the path.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let decode_error = |reason: String| AssetError::DecodeError {
        path: path.to_path_buf(),
        reason,
    };
    let content = fs::read_to_string(path).map_err(|e| decode_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| decode_error(e.to_string()))
}

/// Write a JSON document with 4-space indentation, creating parent directories
pub(crate) fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|e| AssetError::SerializationError(e.to_string()))?;
    fs::write(path, buffer)?;
    Ok(())
}

/// Payload of an asset the caller already type-checked
pub(crate) fn expect_payload<'a, T: crate::asset::AssetKind>(asset: &'a Asset) -> Result<&'a T> {
    asset.get::<T>().ok_or(AssetError::TypeMismatch {
        expected: T::TYPE,
        found: asset.asset_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_a_serializer() {
        for asset_type in AssetType::ALL {
            assert!(serializer_for(asset_type).is_some(), "{asset_type}");
        }
        assert!(serializer_for(AssetType::None).is_none());
    }

    #[test]
    fn test_documents_use_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/doc.json");
        write_document(&path, &serde_json::json!({ "Key": 1 })).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n    \"Key\": 1\n}");
        let value: serde_json::Value = read_document(&path).unwrap();
        assert_eq!(value["Key"], 1);
    }

    #[test]
    fn test_read_missing_document_reports_path() {
        let err = read_document::<serde_json::Value>(Path::new("/no/such/file.fmat")).unwrap_err();
        match err {
            AssetError::DecodeError { path, .. } => {
                assert_eq!(path, Path::new("/no/such/file.fmat"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
