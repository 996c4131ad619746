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

//! Error types

use std::fmt;
use std::path::PathBuf;

use crate::asset_type::AssetType;
use crate::handle::Handle;

/// Asset core error type
#[derive(Debug, Clone)]
pub enum AssetError {
    /// IO error (file operations, etc.)
    IoError(String),

    /// Serialization error
    SerializationError(String),

    /// Deserialization error
    DeserializationError(String),

    /// The on-disk registry index could not be parsed as a whole
    RegistryParseError { path: PathBuf, reason: String },

    /// Path is not known to the registry
    AssetNotFound(PathBuf),

    /// Handle is not known to the registry
    HandleNotFound(Handle),

    /// Backing file is missing, corrupt or failed to decode
    DecodeError { path: PathBuf, reason: String },

    /// No codec for this file format
    UnsupportedFormat(PathBuf),

    /// Declared type of a record does not match the requested type
    TypeMismatch {
        expected: AssetType,
        found: AssetType,
    },

    /// File is well formed but structurally incompatible with its load context
    StructuralMismatch(String),

    /// Type is import-only and has no default instance
    CreationUnsupported(AssetType),

    /// Operation needs an open asset manager
    ManagerClosed,

    /// Operation needs an active project
    NoActiveProject,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::IoError(msg) => write!(f, "IO error: {msg}"),
            AssetError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            AssetError::DeserializationError(msg) => write!(f, "Deserialization error: {msg}"),
            AssetError::RegistryParseError { path, reason } => {
                write!(f, "Failed to parse asset registry '{}': {reason}", path.display())
            }
            AssetError::AssetNotFound(path) => write!(f, "Asset not found: '{}'", path.display()),
            AssetError::HandleNotFound(handle) => write!(f, "Asset handle not found: {handle}"),
            AssetError::DecodeError { path, reason } => {
                write!(f, "Failed to load '{}': {reason}", path.display())
            }
            AssetError::UnsupportedFormat(path) => {
                write!(f, "Unsupported file format: '{}'", path.display())
            }
            AssetError::TypeMismatch { expected, found } => {
                write!(f, "Asset type mismatch: expected {expected}, found {found}")
            }
            AssetError::StructuralMismatch(msg) => write!(f, "Structural mismatch: {msg}"),
            AssetError::CreationUnsupported(asset_type) => {
                write!(f, "Assets of type {asset_type} are import-only and cannot be created")
            }
            AssetError::ManagerClosed => write!(f, "Asset manager is not initialized"),
            AssetError::NoActiveProject => write!(f, "No active project"),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        AssetError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            AssetError::IoError(err.to_string())
        } else {
            AssetError::DeserializationError(err.to_string())
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AssetError>;
