//! Asset manager façade
//!
//! Owns the registry index, the asset cache and the handle generator of one
//! open project. Every operation that changes the index structurally
//! persists it before returning.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::asset::{Asset, AssetData, AssetFlags, AssetKind, AssetRef, SharedAsset};
use crate::asset_type::AssetType;
use crate::cache::{AssetCache, CacheStats};
use crate::error::{AssetError, Result};
use crate::handle::{Handle, HandleGenerator};
use crate::metadata::AssetMetadata;
use crate::project::Project;
use crate::registry::AssetRegistry;
use crate::serializer::{serializer_for, write_document, AssetSerializer, LoadArgs, LoadContext};
use crate::types::{MaterialAsset, MaterialTexture, PhysicsMaterial, Texture2D};

/// One entry of the on-disk registry index
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RegistryEntryDocument {
    handle: u64,
    file_path: String,
    #[serde(rename = "Type")]
    asset_type: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ManagerState {
    Closed,
    Open,
}

/// Asset subsystem of one project
pub struct AssetManager {
    asset_directory: PathBuf,
    registry_path: PathBuf,
    registry: AssetRegistry,
    cache: AssetCache,
    handles: HandleGenerator,
    /// Arguments each resident asset was loaded with, reused on reload
    load_args: AHashMap<Handle, LoadArgs>,
    placeholder: AssetRef<Texture2D>,
    state: ManagerState,
}

impl AssetManager {
    /// Create a closed manager for an asset directory and its registry file
    pub fn new(asset_directory: impl Into<PathBuf>, registry_path: impl Into<PathBuf>) -> Self {
        let asset_directory = asset_directory.into();
        Self {
            registry: AssetRegistry::new(&asset_directory),
            asset_directory,
            registry_path: registry_path.into(),
            cache: AssetCache::new(),
            handles: HandleGenerator::new(),
            load_args: AHashMap::new(),
            placeholder: AssetRef::new(Handle::NULL, Texture2D::white()),
            state: ManagerState::Closed,
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self::new(project.asset_directory(), project.asset_registry_path())
    }

    /// Open the manager: read the registry index from disk
    pub fn init(&mut self) -> Result<()> {
        if self.is_open() {
            tracing::warn!("[AssetManager] Already initialized");
            return Ok(());
        }
        self.load_asset_registry()?;
        self.state = ManagerState::Open;
        tracing::info!(
            "[AssetManager] Initialized with asset directory '{}'",
            self.asset_directory.display()
        );
        Ok(())
    }

    /// Persist the index, then release every resident asset in teardown order
    pub fn shutdown(&mut self) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("asset_manager_shutdown").entered();

        let written = self.write_registry_to_file();
        if let Err(e) = &written {
            tracing::error!("[AssetManager] Failed to write asset registry on shutdown: {}", e);
        }

        self.cache.clear_ordered();
        self.registry.clear();
        self.load_args.clear();
        self.state = ManagerState::Closed;
        tracing::info!("[AssetManager] Shut down");
        written
    }

    pub fn is_open(&self) -> bool {
        self.state == ManagerState::Open
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(AssetError::ManagerClosed)
        }
    }

    /// Read the index file into memory.
    ///
    /// A missing file is created empty. Malformed entries are skipped with a
    /// warning; entries whose file is gone are kept until the next write.
    pub fn load_asset_registry(&mut self) -> Result<()> {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("load_asset_registry").entered();
        tracing::info!("[AssetManager] Loading asset registry");

        self.registry.clear();
        if !self.registry_path.exists() {
            tracing::info!(
                "[AssetManager] Asset registry '{}' not found, creating a new one",
                self.registry_path.display()
            );
            return self.write_registry_to_file();
        }

        let content = fs::read_to_string(&self.registry_path)?;
        if content.trim().is_empty() {
            return Ok(());
        }
        let parse_error = |reason: String| AssetError::RegistryParseError {
            path: self.registry_path.clone(),
            reason,
        };
        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
        let serde_json::Value::Array(entries) = document else {
            return Err(parse_error("expected a JSON array of assets".to_string()));
        };

        for entry in entries {
            let entry: RegistryEntryDocument = match serde_json::from_value(entry) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("[AssetManager] Skipping malformed registry entry: {}", e);
                    continue;
                }
            };
            let asset_type = match entry.asset_type.parse::<AssetType>() {
                Ok(AssetType::None) | Err(_) => {
                    tracing::warn!(
                        "[AssetManager] Skipping '{}' with unknown type '{}'",
                        entry.file_path,
                        entry.asset_type
                    );
                    continue;
                }
                Ok(asset_type) => asset_type,
            };
            let handle = Handle::from_raw(entry.handle);
            if !handle.is_non_zero() {
                tracing::warn!(
                    "[AssetManager] AssetHandle for '{}' is 0, this shouldn't happen",
                    entry.file_path
                );
                continue;
            }
            if self.registry.contains_handle(handle) {
                tracing::warn!(
                    "[AssetManager] Skipping '{}': handle {} is already used",
                    entry.file_path,
                    handle
                );
                continue;
            }

            let metadata = AssetMetadata::new(handle, asset_type, entry.file_path);
            if !self.file_exists(&metadata) {
                tracing::debug!(
                    "[AssetManager] '{}' no longer exists and will be pruned on next write",
                    metadata.persisted_path()
                );
            }
            if let Some(replaced) = self.registry.insert(metadata) {
                tracing::warn!(
                    "[AssetManager] Duplicate registry path '{}', dropping handle {}",
                    replaced.persisted_path(),
                    replaced.handle
                );
            }
        }

        tracing::info!("[AssetManager] Loaded {} asset entries", self.registry.count());
        Ok(())
    }

    /// Write the index sorted by handle, skipping null handles and missing files
    pub fn write_registry_to_file(&self) -> Result<()> {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("write_registry_to_file").entered();

        let sorted: BTreeMap<Handle, RegistryEntryDocument> = self
            .registry
            .iter()
            .filter(|metadata| metadata.is_valid() && self.file_exists(metadata))
            .map(|metadata| {
                let entry = RegistryEntryDocument {
                    handle: metadata.handle.raw(),
                    file_path: metadata.persisted_path(),
                    asset_type: metadata.asset_type.as_str().to_string(),
                };
                (metadata.handle, entry)
            })
            .collect();

        tracing::info!("[AssetManager] Serializing asset registry with {} entries", sorted.len());
        let entries: Vec<&RegistryEntryDocument> = sorted.values().collect();
        write_document(&self.registry_path, &entries)
    }

    pub fn asset_directory(&self) -> &Path {
        &self.asset_directory
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Absolute path of an asset's backing file
    pub fn file_system_path(&self, metadata: &AssetMetadata) -> PathBuf {
        self.asset_directory.join(&metadata.file_path)
    }

    /// Registry key for a path
    pub fn relative_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.registry.relative_key(path)
    }

    pub fn file_exists(&self, metadata: &AssetMetadata) -> bool {
        self.file_system_path(metadata).exists()
    }

    /// Handle registered for a path, or the null handle
    pub fn asset_handle_from_file_path(&self, path: impl AsRef<Path>) -> Handle {
        self.registry
            .get(path)
            .map(|metadata| metadata.handle)
            .unwrap_or(Handle::NULL)
    }

    pub fn get_metadata(&self, handle: Handle) -> Option<&AssetMetadata> {
        self.registry.get_by_handle(handle)
    }

    pub fn get_metadata_by_path(&self, path: impl AsRef<Path>) -> Option<&AssetMetadata> {
        self.registry.get(path)
    }

    pub fn is_asset_handle_valid(&self, handle: Handle) -> bool {
        handle.is_non_zero() && self.registry.contains_handle(handle)
    }

    pub fn is_asset_loaded(&self, handle: Handle) -> bool {
        self.cache.contains(handle)
    }

    fn load_context(&self, metadata: &AssetMetadata, args: LoadArgs) -> LoadContext {
        LoadContext::new(metadata.clone(), self.file_system_path(metadata), args)
    }

    fn serializer(asset_type: AssetType) -> Result<&'static dyn AssetSerializer> {
        serializer_for(asset_type).ok_or(AssetError::TypeMismatch {
            expected: asset_type,
            found: AssetType::None,
        })
    }

    fn set_data_loaded(&mut self, handle: Handle, loaded: bool) {
        if let Some(mut metadata) = self.registry.get_by_handle_mut(handle) {
            metadata.is_data_loaded = loaded;
        }
    }

    /// Decode an asset's file through its serializer
    fn load_data(&mut self, metadata: &AssetMetadata, args: LoadArgs) -> Result<AssetData> {
        #[cfg(feature = "profiling")]
        let _span = tracing::info_span!("load_asset", handle = metadata.handle.raw()).entered();

        let serializer = Self::serializer(metadata.asset_type)?;
        let ctx = self.load_context(metadata, args);
        serializer.try_load_data(self, &ctx)
    }

    /// Load a registered asset into the cache, or return the resident one
    fn load_shared(&mut self, handle: Handle, args: LoadArgs) -> Result<SharedAsset> {
        if let Some(shared) = self.cache.get(handle) {
            return Ok(shared);
        }
        let metadata = self
            .registry
            .get_by_handle(handle)
            .cloned()
            .ok_or(AssetError::HandleNotFound(handle))?;

        match self.load_data(&metadata, args.clone()) {
            Ok(data) => {
                let shared = self.cache.insert(Asset::new(handle, data));
                self.load_args.insert(handle, args);
                self.set_data_loaded(handle, true);
                tracing::debug!(
                    "[AssetManager] Loaded '{}' ({})",
                    metadata.persisted_path(),
                    handle
                );
                Ok(shared)
            }
            Err(e) => {
                self.set_data_loaded(handle, false);
                tracing::error!(
                    "[AssetManager] Failed to load '{}' ({}): {}",
                    metadata.persisted_path(),
                    handle,
                    e
                );
                Err(e)
            }
        }
    }

    fn typed_load<T: AssetKind>(&mut self, handle: Handle, args: LoadArgs) -> Option<AssetRef<T>> {
        let metadata = self.registry.get_by_handle(handle)?;
        if metadata.asset_type != T::TYPE {
            tracing::error!(
                "[AssetManager] '{}' is a {}, not a {}",
                metadata.persisted_path(),
                metadata.asset_type,
                T::TYPE
            );
            return None;
        }
        self.load_shared(handle, args).ok()?;
        self.cache.view(handle)
    }

    /// Resolve a path to its asset, loading it on first use.
    ///
    /// Never registers new paths: unknown paths and null handles yield `None`.
    pub fn get_or_load_asset<T: AssetKind>(
        &mut self,
        path: impl AsRef<Path>,
        args: LoadArgs,
    ) -> Option<AssetRef<T>> {
        if !self.is_open() {
            tracing::warn!("[AssetManager] Load requested while closed");
            return None;
        }
        let path = path.as_ref();
        let handle = self.asset_handle_from_file_path(path);
        if !handle.is_non_zero() {
            tracing::debug!("[AssetManager] '{}' is not registered", path.display());
            return None;
        }
        self.typed_load(handle, args)
    }

    pub fn get_or_load_asset_by_handle<T: AssetKind>(
        &mut self,
        handle: Handle,
        args: LoadArgs,
    ) -> Option<AssetRef<T>> {
        if !self.is_open() || !handle.is_non_zero() {
            return None;
        }
        self.typed_load(handle, args)
    }

    /// Resident asset for a path; never touches disk
    pub fn get_asset<T: AssetKind>(&self, path: impl AsRef<Path>) -> Option<AssetRef<T>> {
        self.get_asset_by_handle(self.asset_handle_from_file_path(path))
    }

    pub fn get_asset_by_handle<T: AssetKind>(&self, handle: Handle) -> Option<AssetRef<T>> {
        self.cache.view(handle)
    }

    /// Every resident asset of a type
    pub fn loaded_assets_of_type<T: AssetKind>(&self) -> Vec<AssetRef<T>> {
        self.cache
            .handles_of_type(T::TYPE)
            .into_iter()
            .filter_map(|handle| self.get_asset_by_handle(handle))
            .collect()
    }

    fn allocate_handle(&mut self) -> Handle {
        let registry = &self.registry;
        self.handles.allocate(|handle| registry.contains_handle(handle))
    }

    /// Create an asset file with default content, register it and cache it.
    ///
    /// The file is written before the index so the new entry survives the
    /// index write's pruning of missing files. Creating at an already
    /// registered path keeps that path's handle.
    pub fn create_new_asset<T: AssetKind>(
        &mut self,
        path: impl AsRef<Path>,
        args: LoadArgs,
    ) -> Result<AssetRef<T>> {
        self.ensure_open()?;
        let key = self.relative_path(path);

        let existing = self.registry.get(&key).cloned();
        let handle = match existing {
            Some(existing) if existing.is_valid() => {
                if existing.asset_type != T::TYPE {
                    return Err(AssetError::TypeMismatch {
                        expected: T::TYPE,
                        found: existing.asset_type,
                    });
                }
                if self.file_exists(&existing) {
                    if let Some(asset) = self.typed_load::<T>(existing.handle, args.clone()) {
                        tracing::info!(
                            "[AssetManager] '{}' already exists, reusing it",
                            existing.persisted_path()
                        );
                        return Ok(asset);
                    }
                }
                existing.handle
            }
            _ => self.allocate_handle(),
        };

        let metadata = AssetMetadata {
            handle,
            asset_type: T::TYPE,
            file_path: key,
            is_data_loaded: true,
        };
        let serializer = Self::serializer(T::TYPE)?;
        let ctx = self.load_context(&metadata, args.clone());
        let data = serializer.create_asset(self, &ctx)?;
        if data.asset_type() != T::TYPE {
            return Err(AssetError::TypeMismatch {
                expected: T::TYPE,
                found: data.asset_type(),
            });
        }
        let asset = Asset::new(handle, data);
        serializer.serialize(self, &ctx, &asset)?;

        self.registry.insert(metadata);
        self.cache.remove(handle);
        self.cache.insert(asset);
        self.load_args.insert(handle, args);
        self.write_registry_to_file()?;

        tracing::info!(
            "[AssetManager] Created {} '{}' ({})",
            T::TYPE,
            ctx.metadata.persisted_path(),
            handle
        );
        self.cache.view(handle).ok_or(AssetError::HandleNotFound(handle))
    }

    /// Register an existing file under a fresh handle
    pub fn import_asset(&mut self, path: impl AsRef<Path>) -> Result<Handle> {
        self.ensure_open()?;
        let handle = self.register_file(path.as_ref())?;
        self.write_registry_to_file()?;
        Ok(handle)
    }

    fn register_file(&mut self, path: &Path) -> Result<Handle> {
        let key = self.relative_path(path);
        if let Some(existing) = self.registry.get(&key).filter(|metadata| metadata.is_valid()) {
            return Ok(existing.handle);
        }

        let asset_type =
            AssetType::from_path(&key).ok_or_else(|| AssetError::UnsupportedFormat(key.clone()))?;
        let metadata = AssetMetadata::new(Handle::NULL, asset_type, key);
        if !self.file_exists(&metadata) {
            return Err(AssetError::AssetNotFound(metadata.file_path));
        }

        let handle = self.allocate_handle();
        let mut entry = self.registry.upsert(&metadata.file_path);
        entry.handle = handle;
        entry.asset_type = asset_type;
        tracing::debug!(
            "[AssetManager] Imported {} '{}' ({})",
            asset_type,
            entry.persisted_path(),
            handle
        );
        Ok(handle)
    }

    /// Register every classified file under the asset directory that is not
    /// yet in the index. Returns how many files were imported.
    pub fn scan_asset_directory(&mut self) -> Result<usize> {
        self.ensure_open()?;

        for metadata in self.registry.iter().filter(|metadata| !metadata.is_valid()) {
            tracing::warn!(
                "[AssetManager] '{}' is registered without a handle",
                metadata.persisted_path()
            );
        }

        let mut candidates = Vec::new();
        for entry in walkdir::WalkDir::new(&self.asset_directory).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("[AssetManager] Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && AssetType::from_path(entry.path()).is_some() {
                candidates.push(entry.into_path());
            }
        }

        let mut imported = 0;
        for path in candidates {
            let already_known = self
                .registry
                .get(&path)
                .is_some_and(|metadata| metadata.is_valid());
            if !already_known {
                self.register_file(&path)?;
                imported += 1;
            }
        }

        if imported > 0 {
            self.write_registry_to_file()?;
        }
        tracing::info!("[AssetManager] Scan imported {} new asset(s)", imported);
        Ok(imported)
    }

    /// Forget a deleted asset: drop its index entry and cached object
    pub fn on_asset_deleted(&mut self, handle: Handle) -> Result<()> {
        self.ensure_open()?;
        let Some(metadata) = self.registry.get_by_handle(handle).cloned() else {
            tracing::debug!("[AssetManager] Deleted handle {} is not registered", handle);
            return Ok(());
        };

        self.registry.remove(&metadata.file_path);
        self.cache.remove(handle);
        self.load_args.remove(&handle);
        tracing::info!(
            "[AssetManager] Removed '{}' ({})",
            metadata.persisted_path(),
            handle
        );
        self.write_registry_to_file()
    }

    /// The file at `path` was renamed on disk to `new_name` in the same
    /// directory. A name without an extension keeps the old extension.
    pub fn on_rename_asset(&mut self, path: impl AsRef<Path>, new_name: &str) -> Result<()> {
        self.ensure_open()?;
        let key = self.relative_path(path);
        let metadata = self
            .registry
            .get(&key)
            .cloned()
            .ok_or_else(|| AssetError::AssetNotFound(key.clone()))?;

        let mut file_name = new_name.to_string();
        if Path::new(new_name).extension().is_none() {
            if let Some(extension) = key.extension() {
                file_name.push('.');
                file_name.push_str(&extension.to_string_lossy());
            }
        }
        let new_key = key.with_file_name(&file_name);
        let displaced = self.registry.relocate(&key, &new_key)?;
        self.evict_displaced(displaced);

        if let Some(shared) = self.cache.peek(metadata.handle) {
            let stem = new_key
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut asset = shared.write();
            if let Some(material) = asset.get_mut::<MaterialAsset>() {
                material.set_name(stem);
            } else if let Some(material) = asset.get_mut::<PhysicsMaterial>() {
                material.name = stem;
            }
        }

        tracing::info!(
            "[AssetManager] Renamed '{}' to '{}'",
            key.display(),
            new_key.display()
        );
        self.write_registry_to_file()
    }

    /// The file at `old_path` was moved on disk; its handle follows it
    pub fn on_move_asset(
        &mut self,
        old_path: impl AsRef<Path>,
        new_path: impl AsRef<Path>,
    ) -> Result<()> {
        self.ensure_open()?;
        let old_key = self.relative_path(old_path);
        let new_key = self.relative_path(new_path);
        let displaced = self.registry.relocate(&old_key, &new_key)?;
        self.evict_displaced(displaced);
        tracing::info!(
            "[AssetManager] Moved '{}' to '{}'",
            old_key.display(),
            new_key.display()
        );
        self.write_registry_to_file()
    }

    /// A directory was renamed on disk: relocate every asset below it
    pub fn on_rename_filepath(
        &mut self,
        old_dir: impl AsRef<Path>,
        new_dir: impl AsRef<Path>,
    ) -> Result<usize> {
        self.ensure_open()?;
        let old_key = self.relative_path(old_dir);
        let new_key = self.relative_path(new_dir);
        let moved = self.relocate_subtree(&old_key, &new_key);
        self.write_registry_to_file()?;
        Ok(moved)
    }

    /// A directory was moved on disk: relocate every asset below it.
    ///
    /// Keys are rewritten by whole-component prefix substitution, the same
    /// mapping [`AssetManager::on_rename_filepath`] applies.
    pub fn on_move_filepath(
        &mut self,
        old_dir: impl AsRef<Path>,
        new_dir: impl AsRef<Path>,
    ) -> Result<usize> {
        self.ensure_open()?;
        let old_key = self.relative_path(old_dir);
        let new_key = self.relative_path(new_dir);
        tracing::debug!(
            "[AssetManager] Moving directory '{}' to '{}'",
            old_key.display(),
            new_key.display()
        );
        let moved = self.relocate_subtree(&old_key, &new_key);
        self.write_registry_to_file()?;
        Ok(moved)
    }

    /// Relocate every entry strictly below `old_dir`, matched by whole components
    fn relocate_subtree(&mut self, old_dir: &Path, new_dir: &Path) -> usize {
        let is_root = old_dir.components().all(|c| matches!(c, Component::CurDir));
        if is_root {
            tracing::warn!("[AssetManager] Refusing to relocate the asset root");
            return 0;
        }

        let relocations: Vec<(PathBuf, PathBuf)> = self
            .registry
            .iter()
            .filter_map(|metadata| {
                let remainder = metadata.file_path.strip_prefix(old_dir).ok()?;
                if remainder.as_os_str().is_empty() {
                    return None;
                }
                Some((metadata.file_path.clone(), new_dir.join(remainder)))
            })
            .collect();

        for (from, to) in &relocations {
            match self.registry.relocate(from, to) {
                Ok(displaced) => self.evict_displaced(displaced),
                Err(e) => tracing::warn!("[AssetManager] Skipped relocation: {}", e),
            }
        }
        tracing::info!(
            "[AssetManager] Relocated {} asset(s) from '{}' to '{}'",
            relocations.len(),
            old_dir.display(),
            new_dir.display()
        );
        relocations.len()
    }

    /// Drop the resident object of a record that a relocation pushed out of
    /// the registry
    fn evict_displaced(&mut self, displaced: Option<AssetMetadata>) {
        let Some(displaced) = displaced else {
            return;
        };
        self.cache.remove(displaced.handle);
        self.load_args.remove(&displaced.handle);
        tracing::info!(
            "[AssetManager] Evicted '{}' ({}), replaced by a relocated asset",
            displaced.persisted_path(),
            displaced.handle
        );
    }

    /// Re-read an asset's file and swap the payload in place.
    ///
    /// On failure the previous payload is kept and the asset is flagged
    /// missing or invalid. Non-resident assets are simply loaded.
    pub fn reload_data(&mut self, handle: Handle) -> Result<()> {
        self.ensure_open()?;
        let metadata = self
            .registry
            .get_by_handle(handle)
            .cloned()
            .ok_or(AssetError::HandleNotFound(handle))?;
        let args = self.load_args.get(&handle).cloned().unwrap_or_default();

        let Some(shared) = self.cache.peek(handle).cloned() else {
            tracing::warn!(
                "[AssetManager] Reloading '{}' which was never loaded",
                metadata.persisted_path()
            );
            return self.load_shared(handle, args).map(|_| ());
        };

        match self.load_data(&metadata, args) {
            Ok(data) => {
                shared.write().replace_data(data)?;
                self.set_data_loaded(handle, true);
                tracing::info!("[AssetManager] Reloaded '{}'", metadata.persisted_path());
                Ok(())
            }
            Err(e) => {
                let flag = if self.file_exists(&metadata) {
                    AssetFlags::INVALID
                } else {
                    AssetFlags::MISSING
                };
                shared.write().set_flag(flag, true);
                tracing::error!(
                    "[AssetManager] Failed to reload '{}' ({}): {}",
                    metadata.persisted_path(),
                    handle,
                    e
                );
                Err(e)
            }
        }
    }

    /// Write a resident asset back to its file
    pub fn save_asset(&self, handle: Handle) -> Result<()> {
        let shared = self.cache.peek(handle).ok_or(AssetError::HandleNotFound(handle))?;
        let metadata = self
            .registry
            .get_by_handle(handle)
            .ok_or(AssetError::HandleNotFound(handle))?;
        let serializer = Self::serializer(metadata.asset_type)?;
        let args = self.load_args.get(&handle).cloned().unwrap_or_default();
        let ctx = self.load_context(metadata, args);
        let asset = shared.read();
        serializer.serialize(self, &ctx, &asset)
    }

    /// Save a resident asset and drop it from memory, keeping its index entry
    pub fn remove_asset_from_memory(&mut self, handle: Handle) -> Result<()> {
        let valid = self
            .cache
            .peek(handle)
            .is_some_and(|shared| shared.read().is_valid());
        if !valid {
            tracing::error!(
                "[AssetManager] Cannot unload {}: not resident or invalid",
                handle
            );
            return Err(AssetError::HandleNotFound(handle));
        }

        self.save_asset(handle)?;
        self.cache.remove(handle);
        self.set_data_loaded(handle, false);
        tracing::debug!("[AssetManager] Unloaded {}", handle);
        Ok(())
    }

    pub fn remove_asset_from_memory_by_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let handle = self.asset_handle_from_file_path(path);
        self.remove_asset_from_memory(handle)
    }

    /// Built-in white texture standing in for unresolved texture references
    pub fn placeholder_texture(&self) -> AssetRef<Texture2D> {
        self.placeholder.clone()
    }

    /// Texture bound to a material slot, or the placeholder
    pub fn resolve_material_texture(&self, texture: MaterialTexture) -> AssetRef<Texture2D> {
        match texture {
            MaterialTexture::Placeholder => self.placeholder_texture(),
            MaterialTexture::Asset(handle) => self
                .get_asset_by_handle(handle)
                .unwrap_or_else(|| self.placeholder_texture()),
        }
    }
}

impl Drop for AssetManager {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::error!("[AssetManager] Shutdown on drop failed: {}", e);
        }
    }
}
