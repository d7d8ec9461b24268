// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration: where the bucket
//! lives, how the gallery behaves, and how to reach the admin API. It is
//! stored in a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use bucket_roster::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.gallery.folder = "lineup".to_string();
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_dir = PathBuf::from("./temp_config_dir");
//! std::fs::create_dir_all(&temp_dir).unwrap();
//! let temp_file = temp_dir.join("test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded_config = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded_config.gallery.folder, "lineup");
//! std::fs::remove_dir_all(&temp_dir).unwrap();
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "BucketRoster";

/// Environment variable overriding the config directory.
pub const ENV_CONFIG_DIR: &str = "BUCKET_ROSTER_CONFIG_DIR";

/// Environment variable carrying the API access token.
pub const ENV_ACCESS_TOKEN: &str = "BUCKET_ROSTER_ACCESS_TOKEN";

/// Environment variable carrying the API id token.
pub const ENV_ID_TOKEN: &str = "BUCKET_ROSTER_ID_TOKEN";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Where the bucket lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path-style API root (listings, tree leaf URLs).
    pub storage_root: String,
    pub bucket: String,
    /// Website URL objects are displayed from.
    pub public_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_root: DEFAULT_STORAGE_ROOT.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
        }
    }
}

impl StorageConfig {
    /// `<storage_root>/<bucket>`, the base of listing requests.
    #[must_use]
    pub fn bucket_api_url(&self) -> String {
        crate::domain::storage::join_url(&self.storage_root, &self.bucket)
    }
}

/// Slideshow behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Folder (first key segment) holding the images.
    pub folder: String,
    pub autoplay_delay_ms: u64,
    pub image_extensions: Vec<String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            folder: DEFAULT_GALLERY_FOLDER.to_string(),
            autoplay_delay_ms: DEFAULT_AUTOPLAY_DELAY_MS,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }
}

impl GalleryConfig {
    /// Listing prefix for the gallery folder (`<folder>/`).
    #[must_use]
    pub fn prefix(&self) -> String {
        format!("{}/", self.folder.trim_end_matches('/'))
    }

    /// Autoplay delay, clamped to the accepted range.
    #[must_use]
    pub fn autoplay_delay(&self) -> Duration {
        Duration::from_millis(
            self.autoplay_delay_ms
                .clamp(MIN_AUTOPLAY_DELAY_MS, MAX_AUTOPLAY_DELAY_MS),
        )
    }
}

/// Admin backend access.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend API; admin commands are unavailable without it.
    pub endpoint: Option<String>,
    /// Bearer token for delete and metadata calls.
    pub access_token: Option<String>,
    /// Bearer token for presigned-upload calls.
    pub id_token: Option<String>,
}

impl ApiConfig {
    /// Replaces tokens with the ones found in the environment, if any.
    pub fn apply_env_overrides(&mut self) {
        if let Some(token) = non_empty_env(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
        if let Some(token) = non_empty_env(ENV_ID_TOKEN) {
            self.id_token = Some(token);
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Default location of `settings.toml`.
///
/// `BUCKET_ROSTER_CONFIG_DIR` wins over the platform config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(dir) = non_empty_env(ENV_CONFIG_DIR) {
        return Some(PathBuf::from(dir).join(CONFIG_FILE));
    }
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Reads a config file. Unparsable content falls back to defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            warn!(path = %path.display(), "ignoring invalid settings file: {err}");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_sections() {
        let mut config = Config::default();
        config.storage.bucket = "photos.example.org".to_string();
        config.gallery.autoplay_delay_ms = 5000;
        config.api.endpoint = Some("https://api.example.org/prod".to_string());

        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[gallery]\nfolder = \"lineup\"\n")
            .expect("failed to write partial toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded.gallery.folder, "lineup");
        assert_eq!(loaded.gallery.autoplay_delay_ms, DEFAULT_AUTOPLAY_DELAY_MS);
        assert_eq!(loaded.storage, StorageConfig::default());
    }

    #[test]
    fn load_from_missing_path_is_an_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = load_from_path(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }

    #[test]
    fn gallery_prefix_has_single_trailing_slash() {
        let mut gallery = GalleryConfig::default();
        assert_eq!(gallery.prefix(), "roster/");
        gallery.folder = "lineup/".to_string();
        assert_eq!(gallery.prefix(), "lineup/");
    }

    #[test]
    fn autoplay_delay_is_clamped() {
        let mut gallery = GalleryConfig::default();
        assert_eq!(gallery.autoplay_delay(), Duration::from_millis(3000));
        gallery.autoplay_delay_ms = 1;
        assert_eq!(
            gallery.autoplay_delay(),
            Duration::from_millis(MIN_AUTOPLAY_DELAY_MS)
        );
    }

    #[test]
    fn bucket_api_url_joins_root_and_bucket() {
        let storage = StorageConfig::default();
        assert_eq!(
            storage.bucket_api_url(),
            "https://s3.amazonaws.com/tabs.14strings.com"
        );
    }
}
