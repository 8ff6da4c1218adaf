use crate::error::AppError;
use photo_upload::{PhotoUploadConfig, WebDavConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the configuration file
pub const CONFIG_FILE: &str = "photodrop.toml";

/// Where uploaded objects go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Plain directory, `<data_dir>/objects` unless `root` is set
    Local {
        #[serde(default)]
        root: Option<PathBuf>,
    },
    /// Nextcloud WebDAV
    Webdav(WebDavConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local { root: None }
    }
}

/// Application configuration, read from `photodrop.toml`
///
/// ```toml
/// data_dir = "./data"
///
/// [storage]
/// backend = "webdav"
/// server_url = "https://cloud.example.com"
/// username = "alice"
/// app_password = "xxxxx-xxxxx-xxxxx-xxxxx-xxxxx"
/// share_links = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub path_prefix: String,
    pub collection: String,
    pub storage: StorageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let upload = PhotoUploadConfig::default();
        Self {
            data_dir: PathBuf::from("./data"),
            path_prefix: upload.path_prefix,
            collection: upload.collection,
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration, falling back to defaults if the file is absent
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(s: &str) -> Result<Self, AppError> {
        let config: AppConfig = toml::from_str(s)?;
        if config.path_prefix.trim_matches('/').is_empty() {
            return Err(AppError::Config("path_prefix must not be empty".to_string()));
        }
        if config.collection.is_empty() {
            return Err(AppError::Config("collection must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("photodrop.db")
    }

    pub fn local_storage_root(&self) -> PathBuf {
        match &self.storage {
            StorageConfig::Local { root: Some(root) } => root.clone(),
            _ => self.data_dir.join("objects"),
        }
    }

    pub fn upload_config(&self) -> PhotoUploadConfig {
        PhotoUploadConfig {
            path_prefix: self.path_prefix.clone(),
            collection: self.collection.clone(),
            ..PhotoUploadConfig::default()
        }
    }
}
