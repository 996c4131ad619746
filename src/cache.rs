use ahash::AHashMap;

use crate::asset::{Asset, AssetKind, AssetRef, SharedAsset};
use crate::asset_type::AssetType;
use crate::handle::Handle;
use parking_lot::RwLock;
use std::sync::Arc;

/// Types torn down in their own batch, in this order, before everything else
pub const TEARDOWN_ORDER: [AssetType; 3] =
    [AssetType::Scene, AssetType::MeshAsset, AssetType::Material];

/// Cache statistics
#[derive(Clone, Debug, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_loads: u64,
}

/// Resident assets keyed by handle.
///
/// Residency is governed here, not by reference counts: an entry stays until
/// it is removed explicitly or the cache is torn down. The payload type is
/// recorded at insert, so type queries never lock an asset.
#[derive(Default)]
pub struct AssetCache {
    entries: AHashMap<Handle, (AssetType, SharedAsset)>,
    stats: CacheStats,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a loaded asset. If the handle is already resident the existing
    /// object is kept and returned.
    pub fn insert(&mut self, asset: Asset) -> SharedAsset {
        let handle = asset.handle();
        let asset_type = asset.asset_type();
        let stats = &mut self.stats;
        let (_, shared) = self.entries.entry(handle).or_insert_with(|| {
            stats.total_loads += 1;
            (asset_type, Arc::new(RwLock::new(asset)))
        });
        Arc::clone(shared)
    }

    /// Get a resident asset, counting the hit or miss
    pub fn get(&mut self, handle: Handle) -> Option<SharedAsset> {
        match self.entries.get(&handle) {
            Some((_, shared)) => {
                self.stats.hits += 1;
                Some(Arc::clone(shared))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Get a resident asset without touching statistics
    pub fn peek(&self, handle: Handle) -> Option<&SharedAsset> {
        self.entries.get(&handle).map(|(_, shared)| shared)
    }

    /// Payload type of a resident asset
    pub fn asset_type_of(&self, handle: Handle) -> Option<AssetType> {
        self.entries.get(&handle).map(|(asset_type, _)| *asset_type)
    }

    /// Typed view of a resident asset, `None` if absent or of another type
    pub fn view<T: AssetKind>(&self, handle: Handle) -> Option<AssetRef<T>> {
        match self.entries.get(&handle) {
            Some((asset_type, shared)) if *asset_type == T::TYPE => {
                Some(AssetRef::from_resident(handle, Arc::clone(shared)))
            }
            _ => None,
        }
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Remove asset from cache
    pub fn remove(&mut self, handle: Handle) -> Option<SharedAsset> {
        let (_, removed) = self.entries.remove(&handle)?;
        self.stats.evictions += 1;
        Some(removed)
    }

    /// Handles of every resident asset of a type
    pub fn handles_of_type(&self, asset_type: AssetType) -> Vec<Handle> {
        self.entries
            .iter()
            .filter(|(_, (resident_type, _))| *resident_type == asset_type)
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Tear down in a fixed order: one batch per type in [`TEARDOWN_ORDER`],
    /// then everything left
    pub fn clear_ordered(&mut self) {
        for asset_type in TEARDOWN_ORDER {
            let batch = self.handles_of_type(asset_type);
            if batch.is_empty() {
                continue;
            }
            tracing::debug!("[AssetCache] Releasing {} {} asset(s)", batch.len(), asset_type);
            for handle in batch {
                self.remove(handle);
            }
        }

        if !self.entries.is_empty() {
            tracing::debug!("[AssetCache] Releasing {} remaining asset(s)", self.entries.len());
            self.stats.evictions += self.entries.len() as u64;
            self.entries.clear();
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
