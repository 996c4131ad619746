use super::{AssetSerializer, LoadContext};
use crate::asset::AssetData;
use crate::error::Result;
use crate::manager::AssetManager;
use crate::types::MeshAsset;

/// Imported meshes are read-only; nothing is written back
pub struct MeshSerializer;

impl AssetSerializer for MeshSerializer {
    fn try_load_data(&self, _manager: &mut AssetManager, ctx: &LoadContext) -> Result<AssetData> {
        let mesh = MeshAsset::import(&ctx.path)?;
        tracing::debug!(
            "Imported mesh '{}' with {} submesh(es) and {} animation(s)",
            ctx.metadata.persisted_path(),
            mesh.submeshes().len(),
            mesh.animations().len()
        );
        Ok(AssetData::Mesh(mesh))
    }
}
