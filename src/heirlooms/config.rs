//! # Configuration
//!
//! Configuration is managed by [`confique`], which handles layered loading
//! from a TOML file and environment variables. The resolved value is passed
//! explicitly into the store and client constructors; nothing reads it from
//! global state.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `HEIRLOOMS_ROOT`, `HEIRLOOMS_PORT`, etc.
//! 2. **Config file**: `--config <file>`, or `heirlooms.toml` in the OS config
//!    directory (via `directories` crate).
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `records_root` | OS data dir | Directory holding one sub-directory per heirloom |
//! | `url_prefix` | `""` | Path prefix for image links |
//! | `host` / `port` | `127.0.0.1` / `8080` | Address used in image links |
//! | `auth_file` | none | Credentials file; when set, every operation is gated |
//! | `id_min` / `id_max` | `10000000000` / `100000000000` | Id allocation range |
//! | `max_allocation_attempts` | `64` | Draws before allocation gives up |

use crate::error::{HeirloomError, Result};
use crate::model::HeirloomId;
use crate::store::allocator::{
    IdAllocator, DEFAULT_ID_MAX, DEFAULT_ID_MIN, DEFAULT_MAX_ATTEMPTS,
};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "heirlooms.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HeirloomsConfig {
    /// Directory holding the records. Defaults to the OS data directory.
    #[config(env = "HEIRLOOMS_ROOT")]
    pub records_root: Option<PathBuf>,

    /// Path prefix under which images are served (e.g. "/heirlooms").
    #[config(default = "", env = "HEIRLOOMS_URL_PREFIX")]
    pub url_prefix: String,

    #[config(default = "127.0.0.1", env = "HEIRLOOMS_HOST")]
    pub host: String,

    #[config(default = 8080, env = "HEIRLOOMS_PORT")]
    pub port: u16,

    /// Credentials file: username on the first line, password on the second.
    #[config(env = "HEIRLOOMS_AUTH_FILE")]
    pub auth_file: Option<PathBuf>,

    #[config(default = 10_000_000_000u64, env = "HEIRLOOMS_ID_MIN")]
    pub id_min: u64,

    #[config(default = 100_000_000_000u64, env = "HEIRLOOMS_ID_MAX")]
    pub id_max: u64,

    #[config(default = 64, env = "HEIRLOOMS_MAX_ALLOCATION_ATTEMPTS")]
    pub max_allocation_attempts: u32,
}

impl Default for HeirloomsConfig {
    fn default() -> Self {
        Self {
            records_root: None,
            url_prefix: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            auth_file: None,
            id_min: DEFAULT_ID_MIN,
            id_max: DEFAULT_ID_MAX,
            max_allocation_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl HeirloomsConfig {
    /// Load from the environment and a config file.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        match file {
            Some(path) => {
                if !path.is_file() {
                    return Err(HeirloomError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                builder = builder.file(path);
            }
            None => {
                if let Some(path) = default_config_file() {
                    builder = builder.file(path);
                }
            }
        }
        builder
            .load()
            .map_err(|e| HeirloomError::Config(e.to_string()))
    }

    /// Resolved records root.
    pub fn records_root(&self) -> PathBuf {
        self.records_root.clone().unwrap_or_else(|| {
            ProjectDirs::from("com", "heirlooms", "heirlooms")
                .map(|dirs| dirs.data_dir().join("heirlooms"))
                .unwrap_or_else(|| PathBuf::from("heirlooms"))
        })
    }

    pub fn allocator(&self) -> Result<IdAllocator> {
        IdAllocator::new(self.id_min, self.id_max, self.max_allocation_attempts)
    }

    /// URL prefix normalized to either "" or "/segment" without a trailing slash.
    pub fn url_prefix(&self) -> String {
        let trimmed = self.url_prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// Where a server built on this configuration serves the image of `id`.
    pub fn image_url(&self, id: &HeirloomId) -> String {
        format!("http://{}:{}{}/{}", self.host, self.port, self.url_prefix(), id)
    }
}

fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "heirlooms", "heirlooms")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = HeirloomsConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.id_min, DEFAULT_ID_MIN);
        assert!(config.auth_file.is_none());
    }

    #[test]
    fn test_url_prefix_normalization() {
        for (raw, expected) in [("", ""), ("/", ""), ("app", "/app"), ("/app/", "/app")] {
            let config = HeirloomsConfig {
                url_prefix: raw.to_string(),
                ..Default::default()
            };
            assert_eq!(config.url_prefix(), expected);
        }
    }

    #[test]
    fn test_image_url() {
        let config = HeirloomsConfig {
            url_prefix: "family/".to_string(),
            port: 9000,
            ..Default::default()
        };
        let id: HeirloomId = "4821093552".parse().unwrap();
        assert_eq!(
            config.image_url(&id),
            "http://127.0.0.1:9000/family/4821093552"
        );
    }

    #[test]
    fn test_explicit_root_wins() {
        let config = HeirloomsConfig {
            records_root: Some(PathBuf::from("/srv/heirlooms")),
            ..Default::default()
        };
        assert_eq!(config.records_root(), PathBuf::from("/srv/heirlooms"));
    }

    #[test]
    fn test_allocator_rejects_inverted_range() {
        let config = HeirloomsConfig {
            id_min: 10,
            id_max: 1,
            ..Default::default()
        };
        assert!(matches!(config.allocator(), Err(HeirloomError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "records_root = \"/data/heirlooms\"\nport = 9999\nmax_allocation_attempts = 8\n",
        )
        .unwrap();

        let config = HeirloomsConfig::load(Some(&path)).unwrap();
        assert_eq!(config.records_root, Some(PathBuf::from("/data/heirlooms")));
        assert_eq!(config.port, 9999);
        assert_eq!(config.max_allocation_attempts, 8);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.id_min, DEFAULT_ID_MIN);
        assert_eq!(config.id_max, DEFAULT_ID_MAX);
        assert!(config.allocator().is_ok());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = HeirloomsConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, HeirloomError::Config(_)));
    }
}
