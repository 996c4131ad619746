use serde::{Deserialize, Serialize};

use super::{expect_payload, read_document, write_document, AssetSerializer, LoadContext};
use crate::asset::{Asset, AssetData};
use crate::error::Result;
use crate::manager::AssetManager;
use crate::types::PhysicsMaterial;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct PhysicsMaterialDocument {
    static_friction: f32,
    dynamic_friction: f32,
    bounciness: f32,
}

impl Default for PhysicsMaterialDocument {
    fn default() -> Self {
        let material = PhysicsMaterial::default();
        Self {
            static_friction: material.static_friction,
            dynamic_friction: material.dynamic_friction,
            bounciness: material.bounciness,
        }
    }
}

pub struct PhysicsMaterialSerializer;

impl AssetSerializer for PhysicsMaterialSerializer {
    fn try_load_data(&self, _manager: &mut AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        let document: PhysicsMaterialDocument = read_document(&ctx.path)?;
        let material = PhysicsMaterial::new(
            document.static_friction,
            document.dynamic_friction,
            document.bounciness,
        )
        .with_name(ctx.name());
        Ok(AssetData::PhysicsMaterial(material))
    }

    fn serialize(&self, _manager: &AssetManager, ctx: &LoadContext, asset: &Asset) -> Result<()> {
        let material = expect_payload::<PhysicsMaterial>(asset)?;
        let document = PhysicsMaterialDocument {
            static_friction: material.static_friction,
            dynamic_friction: material.dynamic_friction,
            bounciness: material.bounciness,
        };
        write_document(&ctx.path, &document)
    }

    fn create_asset(&self, _manager: &AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        Ok(AssetData::PhysicsMaterial(PhysicsMaterial::default().with_name(ctx.name())))
    }
}
