use crate::error::{ExplorerError, RegistryError};
use crate::model::ProjectHandle;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the registry location.
pub const REGISTRY_ENV: &str = "BIM_EXPLORER_REGISTRY";

/// Registry file looked up in the working directory by default.
pub const DEFAULT_REGISTRY_FILE: &str = "projects.toml";

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    projects: Vec<ProjectHandle>,
}

/// Known projects, in registration order. Names are unique.
#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    projects: Vec<ProjectHandle>,
}

impl ProjectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_handles(
        handles: impl IntoIterator<Item = ProjectHandle>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for handle in handles {
            registry.register(handle)?;
        }
        Ok(registry)
    }

    /// Parses a registry from TOML:
    ///
    /// ```toml
    /// [[projects]]
    /// name = "Revit Demo Haus"
    /// url = "https://app.speckle.systems/projects/xxx/models/xxx"
    /// ```
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(content).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_handles(file.projects)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_toml_str(&content, path)?;
        info!(path = %path.display(), projects = registry.len(), "loaded project registry");
        Ok(registry)
    }

    /// Loads the registry from, in order: `explicit`, the
    /// `BIM_EXPLORER_REGISTRY` variable, `projects.toml` in the working
    /// directory. Only a missing default file yields an empty registry.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, RegistryError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(env_path) = std::env::var(REGISTRY_ENV) {
            return Self::load(PathBuf::from(env_path));
        }
        let default = Path::new(DEFAULT_REGISTRY_FILE);
        if default.exists() {
            Self::load(default)
        } else {
            debug!("no {DEFAULT_REGISTRY_FILE}, using an empty registry");
            Ok(Self::new())
        }
    }

    pub fn register(&mut self, handle: ProjectHandle) -> Result<(), RegistryError> {
        if self.projects.iter().any(|p| p.name == handle.name) {
            return Err(RegistryError::DuplicateProject { name: handle.name });
        }
        self.projects.push(handle);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<ProjectHandle, ExplorerError> {
        self.projects
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| ExplorerError::UnknownProject {
                name: name.to_string(),
            })
    }

    /// First registered project.
    #[must_use]
    pub fn default_project(&self) -> Option<&ProjectHandle> {
        self.projects.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectHandle> {
        self.projects.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
