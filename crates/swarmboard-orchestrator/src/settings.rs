//! Persisted user settings

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use swarmboard_domain::budget::DEFAULT_MAX_SPECIALISTS;
use swarmboard_domain::{clamp_max_specialists, SettingsStore};
use tracing::{debug, warn};

/// Settings kept in memory only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InMemorySettings {
    max_specialists: u8,
}

impl InMemorySettings {
    /// Create settings with a clamped team size
    pub fn new(max_specialists: i64) -> Self {
        Self {
            max_specialists: clamp_max_specialists(max_specialists),
        }
    }
}

impl Default for InMemorySettings {
    fn default() -> Self {
        Self {
            max_specialists: DEFAULT_MAX_SPECIALISTS,
        }
    }
}

impl SettingsStore for InMemorySettings {
    type Error = std::convert::Infallible;

    fn max_specialists(&self) -> u8 {
        self.max_specialists
    }

    fn set_max_specialists(&mut self, value: u8) -> Result<(), Self::Error> {
        self.max_specialists = clamp_max_specialists(value as i64);
        Ok(())
    }
}

/// On-disk layout of the settings file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default = "default_max_specialists")]
    max_specialists: i64,
}

fn default_max_specialists() -> i64 {
    DEFAULT_MAX_SPECIALISTS as i64
}

/// Settings persisted as a TOML file
///
/// ```toml
/// max_specialists = 3
/// ```
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
    max_specialists: u8,
}

impl FileSettingsStore {
    /// Open the settings file at `path`
    ///
    /// A missing file yields the defaults; it is created on the first write.
    /// Out-of-range values are clamped.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let max_specialists = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let file: SettingsFile =
                toml::from_str(&contents).map_err(|e| SettingsError::Parse(e.to_string()))?;
            let clamped = clamp_max_specialists(file.max_specialists);
            if clamped as i64 != file.max_specialists {
                warn!(
                    "max_specialists = {} in {} clamped to {}",
                    file.max_specialists,
                    path.display(),
                    clamped
                );
            }
            clamped
        } else {
            debug!("No settings file at {}, using defaults", path.display());
            DEFAULT_MAX_SPECIALISTS
        };

        Ok(Self {
            path,
            max_specialists,
        })
    }

    /// Location of the settings file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = SettingsFile {
            max_specialists: self.max_specialists as i64,
        };
        let contents =
            toml::to_string_pretty(&file).map_err(|e| SettingsError::Serialize(e.to_string()))?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    type Error = SettingsError;

    fn max_specialists(&self) -> u8 {
        self.max_specialists
    }

    fn set_max_specialists(&mut self, value: u8) -> Result<(), Self::Error> {
        self.max_specialists = clamp_max_specialists(value as i64);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_clamps() {
        let mut settings = InMemorySettings::new(0);
        assert_eq!(settings.max_specialists(), 1);
        settings.set_max_specialists(42).unwrap();
        assert_eq!(settings.max_specialists(), 10);
        assert_eq!(InMemorySettings::default().max_specialists(), 3);
    }

    #[test]
    fn test_missing_file_uses_default() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::open(dir.path().join("settings.toml")).unwrap();
        assert_eq!(store.max_specialists(), 3);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut store = FileSettingsStore::open(&path).unwrap();
        store.set_max_specialists(5).unwrap();
        assert!(path.exists());

        let reopened = FileSettingsStore::open(&path).unwrap();
        assert_eq!(reopened.max_specialists(), 5);
    }

    #[test]
    fn test_out_of_range_file_is_clamped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "max_specialists = 25\n").unwrap();
        assert_eq!(FileSettingsStore::open(&path).unwrap().max_specialists(), 10);

        fs::write(&path, "max_specialists = -3\n").unwrap();
        assert_eq!(FileSettingsStore::open(&path).unwrap().max_specialists(), 1);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "max_specialists = \"many\"").unwrap();
        assert!(matches!(
            FileSettingsStore::open(&path),
            Err(SettingsError::Parse(_))
        ));
    }
}
