// src/settings.rs
//! Locally persisted user settings (currently just the RapidAPI key).
//!
//! Values saved here are picked up by `AppConfig::from_env` at the next start;
//! a running process never re-reads the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::errors::{ExecError, Result};

/// Keys this short or shorter are rejected as malformed.
pub const MIN_API_KEY_LEN: usize = 20;

// Serializes load-modify-save so concurrent updates cannot interleave.
static UPDATE_LOCK: Mutex<()> = Mutex::new(());

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rapidapi_key: Option<String>,
}

/// `<config dir>/codejudge/settings.toml`
pub fn default_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| ExecError::Config("Could not determine the user config directory".to_string()))?;
    Ok(base.join("codejudge").join("settings.toml"))
}

impl Settings {
    /// Reads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }
}

/// Basic shape check for a RapidAPI key.
pub fn validate_api_key(key: &str) -> Result<()> {
    if key.trim().len() <= MIN_API_KEY_LEN {
        return Err(ExecError::InvalidApiKey {
            min_len: MIN_API_KEY_LEN,
        });
    }
    Ok(())
}

/// Validates and persists `key`, keeping any other settings in the file.
pub fn store_api_key(path: &Path, key: &str) -> Result<()> {
    validate_api_key(key)?;
    let _guard = UPDATE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let mut settings = Settings::load(path)?;
    settings.rapidapi_key = Some(key.trim().to_string());
    settings.save(path)?;
    log::info!("Saved RapidAPI key to {}", path.display());
    Ok(())
}

pub fn clear_api_key(path: &Path) -> Result<()> {
    let _guard = UPDATE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let mut settings = Settings::load(path)?;
    if settings.rapidapi_key.take().is_some() {
        settings.save(path)?;
        log::info!("Removed RapidAPI key from {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("codejudge-test-{}", Uuid::new_v4()))
            .join("settings.toml")
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let settings = Settings::load(&scratch_path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_store_and_clear_api_key() {
        let path = scratch_path();

        store_api_key(&path, "  abcdefghijklmnopqrstuvwxyz  ").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.rapidapi_key.as_deref(), Some("abcdefghijklmnopqrstuvwxyz"));

        clear_api_key(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap().rapidapi_key, None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_concurrent_updates_leave_a_readable_file() {
        let path = scratch_path();
        let keys: Vec<String> = (0..8).map(|i| format!("concurrent-key-{:08}-abcdef", i)).collect();

        std::thread::scope(|scope| {
            for key in &keys {
                let path = &path;
                scope.spawn(move || {
                    store_api_key(path, key).unwrap();
                    clear_api_key(path).unwrap();
                    store_api_key(path, key).unwrap();
                });
            }
        });

        let stored = Settings::load(&path).unwrap().rapidapi_key.unwrap();
        assert!(keys.contains(&stored));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_short_key_is_rejected() {
        let path = scratch_path();
        let err = store_api_key(&path, "too-short").unwrap_err();
        assert!(matches!(err, ExecError::InvalidApiKey { min_len: 20 }));
        assert!(!path.exists());
    }

    #[test]
    fn test_key_of_exactly_min_len_is_rejected() {
        assert!(validate_api_key(&"k".repeat(MIN_API_KEY_LEN)).is_err());
        assert!(validate_api_key(&"k".repeat(MIN_API_KEY_LEN + 1)).is_ok());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = scratch_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "rapidapi_key = [unterminated").unwrap();

        assert!(matches!(Settings::load(&path), Err(ExecError::TomlParse(_))));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
