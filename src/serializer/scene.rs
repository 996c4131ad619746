use super::{expect_payload, read_document, write_document, AssetSerializer, LoadContext};
use crate::asset::{Asset, AssetData};
use crate::error::Result;
use crate::manager::AssetManager;
use crate::types::{Prefab, Scene, SceneEntity};

/// Scenes are a JSON array of entities; the scene name is the file stem
pub struct SceneSerializer;

impl AssetSerializer for SceneSerializer {
    fn try_load_data(&self, _manager: &mut AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        let entities: Vec<SceneEntity> = read_document(&ctx.path)?;
        tracing::debug!(
            "Deserialized {} entities from scene '{}'",
            entities.len(),
            ctx.metadata.persisted_path()
        );
        Ok(AssetData::Scene(Scene::from_entities(ctx.name(), entities)))
    }

    fn serialize(&self, _manager: &AssetManager, ctx: &LoadContext, asset: &Asset) -> Result<()> {
        let scene = expect_payload::<Scene>(asset)?;
        write_document(&ctx.path, &scene.entities())
    }

    fn create_asset(&self, _manager: &AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        Ok(AssetData::Scene(Scene::new(ctx.name())))
    }
}

/// Prefabs share the scene entity format
pub struct PrefabSerializer;

impl AssetSerializer for PrefabSerializer {
    fn try_load_data(&self, _manager: &mut AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        let entities: Vec<SceneEntity> = read_document(&ctx.path)?;
        Ok(AssetData::Prefab(Prefab::new(entities)))
    }

    fn serialize(&self, _manager: &AssetManager, ctx: &LoadContext, asset: &Asset) -> Result<()> {
        let prefab = expect_payload::<Prefab>(asset)?;
        write_document(&ctx.path, &prefab.entities())
    }

    fn create_asset(&self, _manager: &AssetManager, _ctx: &LoadContext) -> Result<AssetData> {
        Ok(AssetData::Prefab(Prefab::default()))
    }
}
