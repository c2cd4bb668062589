use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{from_slice, to_string_pretty};
use thiserror::Error;

use super::types::Settings;

const SETTINGS_PATH: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not find a folder to save settings")]
    NoConfigDirectory,
    #[error("Could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load the settings at `path`, or from the platform config folder.
/// A missing file yields the defaults, which are then written out so there
/// is something to edit.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => data_directory()?.join(SETTINGS_PATH),
    };
    if let Some(settings) = read(&path)? {
        return Ok(settings);
    }
    let settings = Settings::default();
    if let Err(e) = write(&path, &settings) {
        log::error!("Could not save default settings: {e}");
    }
    Ok(settings)
}

fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SettingsError> {
    if !path.exists() {
        return Ok(None);
    };
    let data = std::fs::read(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let obj: T = from_slice(&data).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(obj))
}

fn write<T: Serialize>(path: &Path, value: &T) -> Result<(), SettingsError> {
    let data = to_string_pretty(&value).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn data_directory() -> Result<PathBuf, SettingsError> {
    use directories_next::ProjectDirs;
    let proj_dirs = ProjectDirs::from("com", "aleksandermaj", "podlej")
        .ok_or(SettingsError::NoConfigDirectory)?;
    let dirs = proj_dirs.config_dir().to_path_buf();
    if !dirs.exists() {
        std::fs::create_dir_all(&dirs).map_err(|source| SettingsError::Io {
            path: dirs.clone(),
            source,
        })?;
    }
    Ok(dirs)
}
