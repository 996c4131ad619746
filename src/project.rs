//! Project document and the active-project session
//!
//! A project file `<dir>/<Name>.fproj` names the asset directory and the
//! registry index that one [`AssetManager`] operates on.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AssetError, Result};
use crate::manager::AssetManager;
use crate::serializer::{read_document, write_document};

pub const PROJECT_EXTENSION: &str = "fproj";

/// Persisted project settings. Paths are relative to the project directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectConfig {
    #[serde(skip)]
    pub name: String,
    #[serde(skip)]
    pub project_directory: PathBuf,

    pub asset_directory: PathBuf,
    pub asset_registry_path: PathBuf,
    pub script_module_path: PathBuf,
    pub default_namespace: String,
    pub start_scene: PathBuf,
    pub reload_assembly_on_play: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            project_directory: PathBuf::new(),
            asset_directory: PathBuf::from("Assets"),
            asset_registry_path: PathBuf::from("Assets/AssetRegistry.fr"),
            script_module_path: PathBuf::from("Assets/Scripts/Binaries"),
            default_namespace: String::new(),
            start_scene: PathBuf::new(),
            reload_assembly_on_play: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    config: ProjectConfig,
}

impl Project {
    /// New project named `name` rooted at `directory`, with default layout
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            config: ProjectConfig {
                default_namespace: name.clone(),
                name,
                project_directory: directory.into(),
                ..ProjectConfig::default()
            },
        }
    }

    /// Read a project file. Name and directory come from the file's path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config: ProjectConfig = read_document(path)?;
        config.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        config.project_directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        tracing::info!("[Project] Loaded '{}' from '{}'", config.name, path.display());
        Ok(Self { config })
    }

    /// Write the project file back to `<dir>/<Name>.fproj`
    pub fn save(&self) -> Result<()> {
        let path = self.project_file_path();
        write_document(&path, &self.config)?;
        tracing::debug!("[Project] Saved '{}'", path.display());
        Ok(())
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ProjectConfig {
        &mut self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn project_directory(&self) -> &Path {
        &self.config.project_directory
    }

    pub fn project_file_path(&self) -> PathBuf {
        self.config
            .project_directory
            .join(format!("{}.{}", self.config.name, PROJECT_EXTENSION))
    }

    pub fn asset_directory(&self) -> PathBuf {
        self.config.project_directory.join(&self.config.asset_directory)
    }

    pub fn asset_registry_path(&self) -> PathBuf {
        self.config.project_directory.join(&self.config.asset_registry_path)
    }

    pub fn script_module_path(&self) -> PathBuf {
        self.config.project_directory.join(&self.config.script_module_path)
    }

    pub fn cache_directory(&self) -> PathBuf {
        self.config.project_directory.join("Cache")
    }
}

struct ActiveProject {
    project: Project,
    assets: AssetManager,
}

/// Session state owning at most one open project and its asset manager
#[derive(Default)]
pub struct ProjectContext {
    active: Option<ActiveProject>,
}

impl ProjectContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the current project, then open `project` if given.
    ///
    /// The previous project is saved and its assets are flushed before the
    /// new asset manager is initialized. A failure to save or flush the
    /// previous project is logged and does not stop the switch; the result
    /// reports the new project only. If the new project fails to open, no
    /// project is active afterwards.
    pub fn set_active(&mut self, project: Option<Project>) -> Result<()> {
        if let Err(e) = self.close() {
            tracing::error!(
                "[Project] Previous project did not close cleanly, opening {} anyway: {}",
                project.as_ref().map_or("nothing", Project::name),
                e
            );
        }

        let Some(project) = project else {
            return Ok(());
        };
        let mut assets = AssetManager::from_project(&project);
        assets.init()?;
        tracing::info!("[Project] '{}' is now active", project.name());
        self.active = Some(ActiveProject { project, assets });
        Ok(())
    }

    /// Save and shut down the active project, if any
    pub fn close(&mut self) -> Result<()> {
        let Some(mut previous) = self.active.take() else {
            return Ok(());
        };
        let saved = previous.project.save();
        let flushed = previous.assets.shutdown();
        tracing::info!("[Project] Closed '{}'", previous.project.name());
        saved.and(flushed)
    }

    pub fn active(&self) -> Option<&Project> {
        self.active.as_ref().map(|active| &active.project)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn assets(&self) -> Result<&AssetManager> {
        self.active
            .as_ref()
            .map(|active| &active.assets)
            .ok_or(AssetError::NoActiveProject)
    }

    pub fn assets_mut(&mut self) -> Result<&mut AssetManager> {
        self.active
            .as_mut()
            .map(|active| &mut active.assets)
            .ok_or(AssetError::NoActiveProject)
    }
}

impl Drop for ProjectContext {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!("[Project] Failed to close project on drop: {}", e);
        }
    }
}
