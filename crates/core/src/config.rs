use crate::extensions::{ExtensionSet, DEFAULT_IMAGE_EXTENSIONS};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_COLLISION_SUFFIX: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Extensions probed for embedded capture metadata.
    pub image_extensions: Vec<String>,
    pub recursive_default: bool,
    pub max_collision_suffix: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            recursive_default: false,
            max_collision_suffix: DEFAULT_MAX_COLLISION_SUFFIX,
        }
    }
}

impl AppConfig {
    pub fn image_extension_set(&self) -> ExtensionSet {
        ExtensionSet::new(&self.image_extensions)
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("org", "mediasort", "mediasort")
        .context("could not determine the platform config directory")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

/// Loads `explicit` when given (it must exist), otherwise the platform
/// default, falling back to built-in defaults when that file is absent.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let Ok(paths) = app_paths() else {
                return Ok(AppConfig::default());
            };
            if !paths.config_path.exists() {
                return Ok(AppConfig::default());
            }
            paths.config_path
        }
    };
    read_config(&path)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config = toml::from_str::<AppConfig>(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    if config.max_collision_suffix == 0 {
        anyhow::bail!(
            "max_collision_suffix must be at least 1: {}",
            path.display()
        );
    }
    Ok(config)
}
