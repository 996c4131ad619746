use super::{AssetSerializer, LoadContext};
use crate::asset::AssetData;
use crate::error::Result;
use crate::manager::AssetManager;
use crate::types::Font;

pub struct FontSerializer;

impl AssetSerializer for FontSerializer {
    fn try_load_data(&self, _manager: &mut AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        Ok(AssetData::Font(Font::load(&ctx.path)?))
    }
}
