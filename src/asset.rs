//! Shared asset objects and typed views over them

use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::asset_type::AssetType;
use crate::error::{AssetError, Result};
use crate::handle::Handle;
use crate::types::{
    AnimationBlueprint, Font, MaterialAsset, MeshAsset, PhysicsMaterial, Prefab, Scene, Texture2D,
    TextureCubeMap,
};

/// Health flags of a resident asset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AssetFlags(u8);

impl AssetFlags {
    pub const NONE: AssetFlags = AssetFlags(0);
    /// Backing file disappeared
    pub const MISSING: AssetFlags = AssetFlags(1);
    /// Backing file failed to parse
    pub const INVALID: AssetFlags = AssetFlags(1 << 1);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: AssetFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: AssetFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: AssetFlags) {
        self.0 &= !other.0;
    }
}

/// Payload of one asset, closed over every supported type
#[derive(Clone, Debug, PartialEq)]
pub enum AssetData {
    Scene(Scene),
    Mesh(MeshAsset),
    Material(MaterialAsset),
    Prefab(Prefab),
    PhysicsMaterial(PhysicsMaterial),
    Texture(Texture2D),
    EnvMap(TextureCubeMap),
    Font(Font),
    AnimationBlueprint(AnimationBlueprint),
}

impl AssetData {
    pub fn asset_type(&self) -> AssetType {
        match self {
            AssetData::Scene(_) => AssetType::Scene,
            AssetData::Mesh(_) => AssetType::MeshAsset,
            AssetData::Material(_) => AssetType::Material,
            AssetData::Prefab(_) => AssetType::Prefab,
            AssetData::PhysicsMaterial(_) => AssetType::PhysicsMat,
            AssetData::Texture(_) => AssetType::Texture,
            AssetData::EnvMap(_) => AssetType::EnvMap,
            AssetData::Font(_) => AssetType::Font,
            AssetData::AnimationBlueprint(_) => AssetType::AnimationBlueprint,
        }
    }
}

/// A resident asset: identity, health flags and payload
#[derive(Debug)]
pub struct Asset {
    handle: Handle,
    flags: AssetFlags,
    data: AssetData,
}

impl Asset {
    pub fn new(handle: Handle, data: AssetData) -> Self {
        Self {
            handle,
            flags: AssetFlags::NONE,
            data,
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn asset_type(&self) -> AssetType {
        self.data.asset_type()
    }

    pub fn flags(&self) -> AssetFlags {
        self.flags
    }

    pub fn set_flag(&mut self, flag: AssetFlags, value: bool) {
        if value {
            self.flags.insert(flag);
        } else {
            self.flags.remove(flag);
        }
    }

    pub fn is_flag_set(&self, flag: AssetFlags) -> bool {
        self.flags.contains(flag) && !flag.is_empty()
    }

    /// Not missing and not invalid
    pub fn is_valid(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn data(&self) -> &AssetData {
        &self.data
    }

    pub fn get<T: AssetKind>(&self) -> Option<&T> {
        T::from_data(&self.data)
    }

    pub fn get_mut<T: AssetKind>(&mut self) -> Option<&mut T> {
        T::from_data_mut(&mut self.data)
    }

    /// Swap the payload in place, keeping identity. Clears the health flags.
    pub fn replace_data(&mut self, data: AssetData) -> Result<()> {
        if data.asset_type() != self.asset_type() {
            return Err(AssetError::TypeMismatch {
                expected: self.asset_type(),
                found: data.asset_type(),
            });
        }
        self.data = data;
        self.flags = AssetFlags::NONE;
        Ok(())
    }
}

/// Shared, lockable asset as held by the cache and every consumer
pub type SharedAsset = Arc<RwLock<Asset>>;

/// Payload types that can be viewed through an [`AssetRef`]
pub trait AssetKind: Sized + Send + Sync + 'static {
    const TYPE: AssetType;

    fn from_data(data: &AssetData) -> Option<&Self>;
    fn from_data_mut(data: &mut AssetData) -> Option<&mut Self>;
    fn into_data(self) -> AssetData;
}

macro_rules! impl_asset_kind {
    ($($ty:ty => $variant:ident, $asset_type:expr;)*) => {
        $(
            impl AssetKind for $ty {
                const TYPE: AssetType = $asset_type;

                fn from_data(data: &AssetData) -> Option<&Self> {
                    match data {
                        AssetData::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_data_mut(data: &mut AssetData) -> Option<&mut Self> {
                    match data {
                        AssetData::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn into_data(self) -> AssetData {
                    AssetData::$variant(self)
                }
            }
        )*
    };
}

impl_asset_kind! {
    Scene => Scene, AssetType::Scene;
    MeshAsset => Mesh, AssetType::MeshAsset;
    MaterialAsset => Material, AssetType::Material;
    Prefab => Prefab, AssetType::Prefab;
    PhysicsMaterial => PhysicsMaterial, AssetType::PhysicsMat;
    Texture2D => Texture, AssetType::Texture;
    TextureCubeMap => EnvMap, AssetType::EnvMap;
    Font => Font, AssetType::Font;
    AnimationBlueprint => AnimationBlueprint, AssetType::AnimationBlueprint;
}

/// Typed view of a shared asset.
///
/// Cloning shares the same underlying object. The payload variant of an
/// asset never changes after creation, so the typed accessors cannot fail.
/// The handle is kept outside the lock and can be read while the asset is
/// being written.
pub struct AssetRef<T: AssetKind> {
    handle: Handle,
    shared: SharedAsset,
    _marker: PhantomData<fn() -> T>,
}

impl<T: AssetKind> AssetRef<T> {
    /// Wrap a shared asset, checking its payload type.
    ///
    /// Takes a read lock once; do not call while holding a write guard on
    /// the same asset.
    pub fn from_shared(shared: SharedAsset) -> Option<Self> {
        let (handle, asset_type) = {
            let asset = shared.read();
            (asset.handle(), asset.asset_type())
        };
        if asset_type != T::TYPE {
            return None;
        }
        Some(Self::from_resident(handle, shared))
    }

    /// Wrap a shared asset whose handle and payload type are already known
    pub(crate) fn from_resident(handle: Handle, shared: SharedAsset) -> Self {
        Self {
            handle,
            shared,
            _marker: PhantomData,
        }
    }

    /// Build a fresh shared asset
    pub fn new(handle: Handle, payload: T) -> Self {
        let asset = Asset::new(handle, payload.into_data());
        Self::from_resident(handle, Arc::new(RwLock::new(asset)))
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Lock the whole asset, including its flags
    pub fn asset(&self) -> RwLockReadGuard<'_, Asset> {
        self.shared.read()
    }

    pub fn asset_mut(&self) -> RwLockWriteGuard<'_, Asset> {
        self.shared.write()
    }

    /// Read the payload
    ///
    /// # Panics
    ///
    /// Panics if the payload variant was changed behind this view, which
    /// [`Asset::replace_data`] never allows.
    pub fn read(&self) -> MappedRwLockReadGuard<'_, T> {
        RwLockReadGuard::map(self.shared.read(), |asset| match T::from_data(&asset.data) {
            Some(payload) => payload,
            None => unreachable!("asset {} changed payload type", asset.handle),
        })
    }

    /// Write the payload
    ///
    /// # Panics
    ///
    /// Same contract as [`AssetRef::read`].
    pub fn write(&self) -> MappedRwLockWriteGuard<'_, T> {
        RwLockWriteGuard::map(self.shared.write(), |asset| {
            let handle = asset.handle;
            match T::from_data_mut(&mut asset.data) {
                Some(payload) => payload,
                None => unreachable!("asset {handle} changed payload type"),
            }
        })
    }

    pub fn shared(&self) -> &SharedAsset {
        &self.shared
    }

    pub fn into_shared(self) -> SharedAsset {
        self.shared
    }

    /// Check both views point at the same resident object
    pub fn ptr_eq(&self, other: &AssetRef<T>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T: AssetKind> Clone for AssetRef<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle,
            shared: Arc::clone(&self.shared),
            _marker: PhantomData,
        }
    }
}

impl<T: AssetKind> fmt::Debug for AssetRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetRef")
            .field("type", &T::TYPE)
            .field("handle", &self.handle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let data = AssetData::PhysicsMaterial(PhysicsMaterial::default());
        let mut asset = Asset::new(Handle::from_raw(1), data);
        assert!(asset.is_valid());
        asset.set_flag(AssetFlags::MISSING, true);
        assert!(asset.is_flag_set(AssetFlags::MISSING));
        assert!(!asset.is_flag_set(AssetFlags::INVALID));
        assert!(!asset.is_valid());
        asset.set_flag(AssetFlags::MISSING, false);
        assert!(asset.is_valid());
    }

    #[test]
    fn test_replace_data_keeps_variant() {
        let mut asset = Asset::new(Handle::from_raw(1), MaterialAsset::new("A").into_data());
        asset.set_flag(AssetFlags::INVALID, true);
        asset.replace_data(MaterialAsset::new("B").into_data()).unwrap();
        assert_eq!(asset.get::<MaterialAsset>().unwrap().name(), "B");
        assert!(asset.is_valid());

        let err = asset.replace_data(Scene::new("S").into_data()).unwrap_err();
        assert!(matches!(err, AssetError::TypeMismatch { .. }));
    }

    #[test]
    fn test_asset_ref_shares_object() {
        let material = AssetRef::new(Handle::from_raw(5), MaterialAsset::new("Red"));
        let other = material.clone();
        other.write().set_roughness(0.5);

        assert!(material.ptr_eq(&other));
        assert_eq!(material.read().roughness(), 0.5);
        assert_eq!(material.handle(), Handle::from_raw(5));
    }

    #[test]
    fn test_from_shared_checks_type() {
        let material = AssetRef::new(Handle::from_raw(5), MaterialAsset::new("Red"));
        let shared = material.shared().clone();
        assert!(AssetRef::<MaterialAsset>::from_shared(shared.clone()).is_some());
        assert!(AssetRef::<Scene>::from_shared(shared).is_none());
    }

    #[test]
    fn test_handle_readable_while_writing() {
        let material = AssetRef::new(Handle::from_raw(9), MaterialAsset::new("Red"));
        let mut payload = material.write();
        payload.set_roughness(0.25);
        assert_eq!(material.handle(), Handle::from_raw(9));
        assert!(format!("{material:?}").contains("Material"));
    }
}
