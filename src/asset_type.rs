//! Declared asset types and the extension classifier

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Declared type of an asset file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetType {
    #[default]
    None,
    Scene,
    MeshAsset,
    Material,
    Prefab,
    PhysicsMat,
    Texture,
    EnvMap,
    Font,
    AnimationBlueprint,
}

/// Extension table, matched case-sensitively including the leading dot
const EXTENSION_TABLE: &[(&str, AssetType)] = &[
    // Engine documents
    (".fsc", AssetType::Scene),
    (".fmat", AssetType::Material),
    (".fprefab", AssetType::Prefab),
    (".fpmat", AssetType::PhysicsMat),
    (".fpm", AssetType::PhysicsMat),
    (".fanim", AssetType::AnimationBlueprint),
    // Meshes
    (".fbx", AssetType::MeshAsset),
    (".gltf", AssetType::MeshAsset),
    (".obj", AssetType::MeshAsset),
    // Textures
    (".png", AssetType::Texture),
    (".jpg", AssetType::Texture),
    (".jpeg", AssetType::Texture),
    (".hdr", AssetType::EnvMap),
    // Fonts
    (".ttf", AssetType::Font),
    (".otf", AssetType::Font),
];

impl AssetType {
    /// Every persistable type, in declaration order
    pub const ALL: [AssetType; 9] = [
        AssetType::Scene,
        AssetType::MeshAsset,
        AssetType::Material,
        AssetType::Prefab,
        AssetType::PhysicsMat,
        AssetType::Texture,
        AssetType::EnvMap,
        AssetType::Font,
        AssetType::AnimationBlueprint,
    ];

    /// Stable on-disk name. These strings are part of the registry format.
    pub const fn as_str(self) -> &'static str {
        match self {
            AssetType::None => "None",
            AssetType::Prefab => "Prefab",
            AssetType::Scene => "Scene",
            AssetType::MeshAsset => "MeshAsset",
            AssetType::Material => "Material",
            AssetType::EnvMap => "EnvMap",
            AssetType::Texture => "Texture",
            AssetType::PhysicsMat => "PhysicsMat",
            AssetType::Font => "Font",
            AssetType::AnimationBlueprint => "AnimBlueprint",
        }
    }

    /// Classify by extension (with leading dot, case as given)
    pub fn from_extension(extension: &str) -> Option<AssetType> {
        EXTENSION_TABLE
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, asset_type)| *asset_type)
    }

    /// Classify a file path by its extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<AssetType> {
        let extension = path.as_ref().extension()?.to_str()?;
        Self::from_extension(&format!(".{extension}"))
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unrecognized on-disk type string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAssetType(pub String);

impl fmt::Display for UnknownAssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown asset type '{}'", self.0)
    }
}

impl std::error::Error for UnknownAssetType {}

impl FromStr for AssetType {
    type Err = UnknownAssetType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(AssetType::None),
            "Prefab" => Ok(AssetType::Prefab),
            "Scene" => Ok(AssetType::Scene),
            "MeshAsset" => Ok(AssetType::MeshAsset),
            "Material" => Ok(AssetType::Material),
            "EnvMap" => Ok(AssetType::EnvMap),
            "Texture" => Ok(AssetType::Texture),
            "PhysicsMat" => Ok(AssetType::PhysicsMat),
            "Font" => Ok(AssetType::Font),
            "AnimBlueprint" => Ok(AssetType::AnimationBlueprint),
            other => Err(UnknownAssetType(other.to_string())),
        }
    }
}
