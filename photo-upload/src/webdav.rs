//! Nextcloud WebDAV object store
//!
//! Objects are written below `remote_path` in the user's Nextcloud files.
//! URLs are either public link shares created through the OCS sharing API
//! or, with `share_links` off, the authenticated WebDAV URL of the object.

use crate::models::{ImageFile, StoredObject};
use crate::paths;
use crate::storage::{validate_path, StorageClient, StorageError, StorageResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for a WebDAV store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebDavConfig {
    pub server_url: String,
    pub username: String,
    pub app_password: String,
    /// Folder inside the user's files that receives all objects
    #[serde(default = "default_remote_path")]
    pub remote_path: String,
    /// Resolve objects to public share links instead of WebDAV URLs
    #[serde(default = "default_share_links")]
    pub share_links: bool,
}

fn default_remote_path() -> String {
    "PhotoDrop".to_string()
}

fn default_share_links() -> bool {
    true
}

impl WebDavConfig {
    /// `https://cloud.example.com/remote.php/dav/files/<user>`
    pub fn webdav_base(&self) -> String {
        format!(
            "{}/remote.php/dav/files/{}",
            self.server_url.trim_end_matches('/'),
            self.username
        )
    }

    /// Object path below the user's files root, without leading slash
    pub fn remote_object_path(&self, path: &str) -> String {
        let base = self.remote_path.trim_matches('/');
        if base.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }

    pub fn direct_url(&self, path: &str) -> String {
        format!("{}/{}", self.webdav_base(), self.remote_object_path(path))
    }

    fn shares_endpoint(&self) -> String {
        format!(
            "{}/ocs/v2.php/apps/files_sharing/api/v1/shares?format=json",
            self.server_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct OcsEnvelope {
    ocs: OcsBody,
}

#[derive(Debug, Deserialize)]
struct OcsBody {
    meta: OcsMeta,
    data: Option<OcsShare>,
}

#[derive(Debug, Deserialize)]
struct OcsMeta {
    statuscode: u16,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OcsShare {
    url: Option<String>,
}

/// Extracts the download URL from an OCS create-share response
fn parse_share_response(body: &str) -> StorageResult<String> {
    let envelope: OcsEnvelope = serde_json::from_str(body)
        .map_err(|e| StorageError::ResolveFailed(format!("Invalid share response: {}", e)))?;

    let meta = envelope.ocs.meta;
    if !(100..300).contains(&meta.statuscode) {
        let message = meta.message.unwrap_or_default();
        return Err(if meta.statuscode == 403 || meta.statuscode == 997 {
            StorageError::PermissionDenied(message)
        } else {
            StorageError::ResolveFailed(format!("OCS status {}: {}", meta.statuscode, message))
        });
    }

    let share_url = envelope
        .ocs
        .data
        .and_then(|d| d.url)
        .ok_or_else(|| StorageError::ResolveFailed("Share response without URL".to_string()))?;

    Ok(format!("{}/download", share_url.trim_end_matches('/')))
}

/// WebDAV-backed object store
pub struct WebDavStorage {
    config: WebDavConfig,
    client: reqwest_dav::Client,
    http: reqwest::Client,
}

impl WebDavStorage {
    pub fn new(config: WebDavConfig) -> StorageResult<Self> {
        if config.server_url.is_empty() || config.username.is_empty() {
            return Err(StorageError::Config(
                "WebDAV server URL and username are required".to_string(),
            ));
        }

        let client = reqwest_dav::ClientBuilder::new()
            .set_host(config.webdav_base())
            .set_auth(reqwest_dav::Auth::Basic(
                config.username.clone(),
                config.app_password.clone(),
            ))
            .build()
            .map_err(|e| StorageError::Config(format!("WebDAV client error: {:?}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("PhotoDrop/0.1.0")
            .build()
            .map_err(|e| StorageError::Config(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            config,
            client,
            http,
        })
    }

    pub fn config(&self) -> &WebDavConfig {
        &self.config
    }

    /// WebDAV cannot create nested collections in one call
    async fn ensure_collections(&self, remote: &str) {
        for dir in paths::parent_dirs(remote) {
            if let Err(e) = self.client.mkcol(&dir).await {
                // Usually 405: the collection already exists
                log::debug!("MKCOL '{}' note: {:?}", dir, e);
            }
        }
    }

    async fn create_public_share(&self, remote: &str) -> StorageResult<String> {
        let share_path = format!("/{}", remote);
        let response = self
            .http
            .post(self.config.shares_endpoint())
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .header("OCS-APIRequest", "true")
            .header("Accept", "application/json")
            .form(&[("path", share_path.as_str()), ("shareType", "3")])
            .send()
            .await
            .map_err(|e| StorageError::ResolveFailed(format!("Share request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(StorageError::PermissionDenied(format!(
                "Share creation returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StorageError::ResolveFailed(format!("Share response unreadable: {}", e)))?;

        parse_share_response(&body)
    }
}

#[async_trait]
impl StorageClient for WebDavStorage {
    async fn store(&self, path: &str, file: &ImageFile) -> StorageResult<StoredObject> {
        validate_path(path)?;
        let remote = self.config.remote_object_path(path);

        self.ensure_collections(&remote).await;

        self.client
            .put(&remote, file.bytes.clone())
            .await
            .map_err(|e| StorageError::UploadFailed(format!("PUT {}: {:?}", remote, e)))?;

        log::info!("Uploaded {} ({} bytes) via WebDAV", remote, file.size());
        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    async fn resolve_url(&self, object: &StoredObject) -> StorageResult<String> {
        let remote = self.config.remote_object_path(&object.path);
        if self.config.share_links {
            self.create_public_share(&remote).await
        } else {
            Ok(self.config.direct_url(&object.path))
        }
    }
}
