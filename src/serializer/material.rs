use glam::Vec4;
use serde::{Deserialize, Serialize};

use super::{expect_payload, read_document, write_document, AssetSerializer, LoadArgs, LoadContext};
use crate::asset::{Asset, AssetData};
use crate::error::Result;
use crate::handle::Handle;
use crate::manager::AssetManager;
use crate::types::{
    ImageFormat, ImageUsage, MaterialAsset, MaterialTexture, Texture2D, TextureSlot,
    TextureSpecification,
};

/// On-disk material document
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct MaterialDocument {
    #[serde(rename = "AlbedoColor")]
    albedo_color: [f32; 4],
    #[serde(rename = "RoughnessValue")]
    roughness: f32,
    #[serde(rename = "MetalnessValue")]
    metalness: f32,
    #[serde(rename = "EmissionValue")]
    emission: f32,
    #[serde(rename = "UseNormalMap")]
    use_normal_map: u32,
    #[serde(rename = "AlbedoTexture")]
    albedo_texture: u64,
    #[serde(rename = "NormalTexture")]
    normal_texture: u64,
    #[serde(rename = "RoughnessTexture")]
    roughness_texture: u64,
    #[serde(rename = "MetalnessTexture")]
    metalness_texture: u64,
}

impl Default for MaterialDocument {
    fn default() -> Self {
        Self {
            albedo_color: [1.0; 4],
            roughness: 0.0,
            metalness: 0.0,
            emission: 0.0,
            use_normal_map: 0,
            albedo_texture: 0,
            normal_texture: 0,
            roughness_texture: 0,
            metalness_texture: 0,
        }
    }
}

impl MaterialDocument {
    fn texture(&self, slot: TextureSlot) -> u64 {
        match slot {
            TextureSlot::Albedo => self.albedo_texture,
            TextureSlot::Normal => self.normal_texture,
            TextureSlot::Roughness => self.roughness_texture,
            TextureSlot::Metalness => self.metalness_texture,
        }
    }
}

impl From<&MaterialAsset> for MaterialDocument {
    fn from(material: &MaterialAsset) -> Self {
        Self {
            albedo_color: material.albedo_color().to_array(),
            roughness: material.roughness(),
            metalness: material.metalness(),
            emission: material.emission(),
            use_normal_map: material.is_using_normal_map() as u32,
            albedo_texture: material.texture(TextureSlot::Albedo).handle().raw(),
            normal_texture: material.texture(TextureSlot::Normal).handle().raw(),
            roughness_texture: material.texture(TextureSlot::Roughness).handle().raw(),
            metalness_texture: material.texture(TextureSlot::Metalness).handle().raw(),
        }
    }
}

fn texture_specification(slot: TextureSlot) -> TextureSpecification {
    TextureSpecification {
        format: ImageFormat::Rgba8,
        usage: ImageUsage::ReadOnly,
        use_mips: slot == TextureSlot::Albedo,
        flip_texture: true,
    }
}

pub struct MaterialSerializer;

impl MaterialSerializer {
    /// Resolve one texture slot. Unresolvable references fall back to the placeholder.
    fn resolve_texture(
        manager: &mut AssetManager,
        ctx: &LoadContext,
        slot: TextureSlot,
        raw: u64,
    ) -> MaterialTexture {
        let handle = Handle::from_raw(raw);
        if !handle.is_non_zero() {
            return MaterialTexture::Placeholder;
        }

        let args = LoadArgs::Texture(texture_specification(slot));
        match manager.get_or_load_asset_by_handle::<Texture2D>(handle, args) {
            Some(_) => MaterialTexture::Asset(handle),
            None => {
                tracing::error!(
                    "{:?} texture {} of material '{}' ({}) was not found",
                    slot,
                    handle,
                    ctx.metadata.persisted_path(),
                    ctx.metadata.handle
                );
                MaterialTexture::Placeholder
            }
        }
    }
}

impl AssetSerializer for MaterialSerializer {
    fn try_load_data(&self, manager: &mut AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        let document: MaterialDocument = read_document(&ctx.path)?;

        let mut material = MaterialAsset::new(ctx.name());
        material.set_albedo_color(Vec4::from_array(document.albedo_color));
        material.set_roughness(document.roughness);
        material.set_metalness(document.metalness);
        material.set_emission(document.emission);
        material.set_use_normal_map(document.use_normal_map != 0);
        for slot in TextureSlot::ALL {
            let texture = Self::resolve_texture(manager, ctx, slot, document.texture(slot));
            material.set_texture(slot, texture);
        }

        Ok(AssetData::Material(material))
    }

    fn serialize(&self, _manager: &AssetManager, ctx: &LoadContext, asset: &Asset) -> Result<()> {
        let material = expect_payload::<MaterialAsset>(asset)?;
        write_document(&ctx.path, &MaterialDocument::from(material))
    }

    fn create_asset(&self, _manager: &AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        Ok(AssetData::Material(MaterialAsset::new(ctx.name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_keys_and_defaults() {
        let document = MaterialDocument::from(&MaterialAsset::new("Red"));
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["AlbedoColor"], serde_json::json!([1.0, 1.0, 1.0, 1.0]));
        assert_eq!(value["UseNormalMap"], 0);
        assert_eq!(value["AlbedoTexture"], 0);

        let partial: MaterialDocument =
            serde_json::from_str(r#"{ "RoughnessValue": 0.25 }"#).unwrap();
        assert_eq!(partial.roughness, 0.25);
        assert_eq!(partial.albedo_color, [1.0; 4]);
    }

    #[test]
    fn test_albedo_gets_mips() {
        assert!(texture_specification(TextureSlot::Albedo).use_mips);
        assert!(!texture_specification(TextureSlot::Normal).use_mips);
    }
}
