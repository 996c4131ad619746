//! Path-keyed asset registry
//!
//! Keys are always asset-directory-relative, lexically normalized paths so
//! the project folder can move without invalidating any identity. A secondary
//! handle index is kept in lockstep with the primary map by every mutation.

use ahash::{AHashMap, RandomState};
use indexmap::IndexMap;
use std::ops::{Deref, DerefMut};
use std::path::{Component, Path, PathBuf};

use crate::error::{AssetError, Result};
use crate::handle::Handle;
use crate::metadata::AssetMetadata;

/// Lexically normalize a path: drop `.` and fold `..` into its parent
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else {
                    normalized.push(component.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Ordered index of every known asset file
pub struct AssetRegistry {
    asset_directory: PathBuf,
    entries: IndexMap<PathBuf, AssetMetadata, RandomState>,
    by_handle: AHashMap<Handle, PathBuf>,
}

impl AssetRegistry {
    /// Create an empty registry rooted at the asset directory
    pub fn new(asset_directory: impl AsRef<Path>) -> Self {
        Self {
            asset_directory: normalize_path(asset_directory.as_ref()),
            entries: IndexMap::with_hasher(RandomState::new()),
            by_handle: AHashMap::new(),
        }
    }

    pub fn asset_directory(&self) -> &Path {
        &self.asset_directory
    }

    /// Registry key for a path. Paths outside the asset directory are used as given.
    pub fn relative_key(&self, path: impl AsRef<Path>) -> PathBuf {
        let normalized = normalize_path(path.as_ref());
        if self.asset_directory.as_os_str().is_empty() {
            return normalized;
        }
        match normalized.strip_prefix(&self.asset_directory) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => normalized,
        }
    }

    /// Look up the record for a path
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&AssetMetadata> {
        let key = self.relative_key(path);
        self.entries.get(key.as_path())
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.get(path).is_some()
    }

    /// Return the record for a path, creating a zero-initialized one if absent
    pub fn upsert(&mut self, path: impl AsRef<Path>) -> MetadataEntry<'_> {
        let key = self.relative_key(path);
        let entry = self.entries.entry(key.clone());
        let index = entry.index();
        entry.or_insert_with(|| AssetMetadata {
            file_path: key,
            ..AssetMetadata::default()
        });
        let previous = self.entries[index].handle;
        MetadataEntry {
            registry: self,
            index,
            previous,
        }
    }

    /// Insert a full record at its own path, replacing any record there
    pub fn insert(&mut self, mut metadata: AssetMetadata) -> Option<AssetMetadata> {
        metadata.file_path = self.relative_key(&metadata.file_path);
        let replaced = self.take(&metadata.file_path.clone());
        if metadata.handle.is_non_zero() {
            self.by_handle
                .insert(metadata.handle, metadata.file_path.clone());
        }
        self.entries.insert(metadata.file_path.clone(), metadata);
        replaced
    }

    /// Erase the record for a path
    pub fn remove(&mut self, path: impl AsRef<Path>) -> bool {
        let key = self.relative_key(path);
        self.take(&key).is_some()
    }

    /// Move a record to a new path in a single map update, keeping its handle.
    ///
    /// Returns the record previously registered at the new path, if any. It
    /// is no longer in the registry; the caller owns its cleanup.
    pub fn relocate(
        &mut self,
        old_path: impl AsRef<Path>,
        new_path: impl AsRef<Path>,
    ) -> Result<Option<AssetMetadata>> {
        let old_key = self.relative_key(old_path);
        let new_key = self.relative_key(new_path);
        let mut metadata = self
            .take(&old_key)
            .ok_or(AssetError::AssetNotFound(old_key))?;
        metadata.file_path = new_key;
        let displaced = self.insert(metadata);
        if let Some(displaced) = &displaced {
            tracing::warn!(
                "[AssetRegistry] Relocation over '{}' displaced handle {}",
                displaced.file_path.display(),
                displaced.handle
            );
        }
        Ok(displaced)
    }

    /// Look up the record owning a handle
    pub fn get_by_handle(&self, handle: Handle) -> Option<&AssetMetadata> {
        let path = self.by_handle.get(&handle)?;
        self.entries.get(path.as_path())
    }

    /// Mutable record for a handle
    pub fn get_by_handle_mut(&mut self, handle: Handle) -> Option<MetadataEntry<'_>> {
        let path = self.by_handle.get(&handle)?;
        let index = self.entries.get_index_of(path.as_path())?;
        Some(MetadataEntry {
            registry: self,
            index,
            previous: handle,
        })
    }

    pub fn contains_handle(&self, handle: Handle) -> bool {
        self.by_handle.contains_key(&handle)
    }

    /// Number of records
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_handle.clear();
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &AssetMetadata> {
        self.entries.values()
    }

    fn take(&mut self, key: &Path) -> Option<AssetMetadata> {
        let metadata = self.entries.shift_remove(key)?;
        if self.by_handle.get(&metadata.handle).map(PathBuf::as_path) == Some(key) {
            self.by_handle.remove(&metadata.handle);
        }
        Some(metadata)
    }
}

/// Mutable view of one record.
///
/// The record's path is pinned to its key and the handle index is updated
/// when the view is dropped.
pub struct MetadataEntry<'a> {
    registry: &'a mut AssetRegistry,
    index: usize,
    previous: Handle,
}

impl Deref for MetadataEntry<'_> {
    type Target = AssetMetadata;

    fn deref(&self) -> &AssetMetadata {
        &self.registry.entries[self.index]
    }
}

impl DerefMut for MetadataEntry<'_> {
    fn deref_mut(&mut self) -> &mut AssetMetadata {
        &mut self.registry.entries[self.index]
    }
}

impl Drop for MetadataEntry<'_> {
    fn drop(&mut self) {
        let Some((key, metadata)) = self.registry.entries.get_index_mut(self.index) else {
            return;
        };
        metadata.file_path = key.clone();
        let (key, current) = (key.clone(), metadata.handle);
        if current == self.previous {
            return;
        }

        let by_handle = &mut self.registry.by_handle;
        if by_handle.get(&self.previous) == Some(&key) {
            by_handle.remove(&self.previous);
        }
        if current.is_non_zero() {
            by_handle.insert(current, key);
        }
    }
}
