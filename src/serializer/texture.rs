use super::{AssetSerializer, LoadArgs, LoadContext};
use crate::asset::AssetData;
use crate::error::Result;
use crate::manager::AssetManager;
use crate::types::{Texture2D, TextureCubeMap, TextureSpecification};

pub struct TextureSerializer;

impl AssetSerializer for TextureSerializer {
    fn try_load_data(&self, _manager: &mut AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        let specification = match &ctx.args {
            LoadArgs::Texture(specification) => *specification,
            _ => TextureSpecification::default(),
        };
        Ok(AssetData::Texture(Texture2D::load(&ctx.path, &specification)?))
    }
}

pub struct EnvMapSerializer;

impl AssetSerializer for EnvMapSerializer {
    fn try_load_data(&self, _manager: &mut AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        Ok(AssetData::EnvMap(TextureCubeMap::load(&ctx.path)?))
    }
}
