// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Editor asset core
//!
//! Stable 64-bit handles for every content file under a project's asset
//! directory, a JSON registry index mapping handles to relative paths, and a
//! typed cache holding at most one live object per handle.
//!
//! ```no_run
//! use editor_assets::{AssetManager, LoadArgs, MaterialAsset};
//!
//! # fn main() -> editor_assets::Result<()> {
//! let mut assets = AssetManager::new("Sandbox/Assets", "Sandbox/Assets/AssetRegistry.fr");
//! assets.init()?;
//! let red = assets.create_new_asset::<MaterialAsset>("Materials/Red.fmat", LoadArgs::None)?;
//! red.write().set_roughness(0.4);
//! assets.save_asset(red.handle())?;
//! assets.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod asset_type;
pub mod cache;
pub mod error;
pub mod handle;
pub mod manager;
pub mod metadata;
pub mod project;
pub mod registry;
pub mod serializer;
pub mod types;


pub use asset::{Asset, AssetData, AssetFlags, AssetKind, AssetRef, SharedAsset};
pub use asset_type::AssetType;
pub use cache::{AssetCache, CacheStats};
pub use error::*;
pub use handle::{Handle, HandleGenerator};
pub use manager::AssetManager;
pub use metadata::AssetMetadata;
pub use project::{Project, ProjectConfig, ProjectContext};
pub use registry::AssetRegistry;
pub use serializer::{AssetSerializer, LoadArgs, LoadContext};
pub use types::*;
