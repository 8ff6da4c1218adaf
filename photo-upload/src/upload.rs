//! Upload orchestration
//!
//! One upload runs: session check, object store, URL resolution, metadata
//! append, completion event. Each stage only starts after the previous one
//! has finished successfully. A failure stops the sequence and is reported
//! with the stage it happened in; nothing already stored is rolled back.

use crate::metadata::{MetadataClient, MetadataError};
use crate::models::{ImageFile, PhotoRecord, PhotoUploadConfig, Session, UploadEvent, UploadPhase};
use crate::paths;
use crate::session::SessionProvider;
use crate::storage::{StorageClient, StorageError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use uuid::Uuid;

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

/// Stage of the upload sequence an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Session,
    Store,
    Resolve,
    Metadata,
}

/// Errors that can end an upload
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No user is signed in")]
    AuthMissing,

    #[error("Storing {path} failed: {source}")]
    StoreFailed { path: String, source: StorageError },

    #[error("Resolving URL for {path} failed: {source}")]
    ResolveFailed { path: String, source: StorageError },

    #[error("Recording metadata for {path} failed: {source}")]
    MetadataFailed { path: String, source: MetadataError },
}

impl UploadError {
    pub fn stage(&self) -> UploadStage {
        match self {
            UploadError::AuthMissing => UploadStage::Session,
            UploadError::StoreFailed { .. } => UploadStage::Store,
            UploadError::ResolveFailed { .. } => UploadStage::Resolve,
            UploadError::MetadataFailed { .. } => UploadStage::Metadata,
        }
    }

    /// Path of an object that was stored but never recorded
    pub fn orphaned_object(&self) -> Option<&str> {
        match self {
            UploadError::ResolveFailed { path, .. } | UploadError::MetadataFailed { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}

/// Watches the `Idle`/`Uploading` phase of a service
#[derive(Debug, Clone)]
pub struct PhaseReceiver {
    rx: watch::Receiver<usize>,
}

impl PhaseReceiver {
    pub fn phase(&self) -> UploadPhase {
        phase_of(*self.rx.borrow())
    }

    /// Wait for the next change and return the new phase
    ///
    /// Errors once the service has been dropped.
    pub async fn changed(&mut self) -> Result<UploadPhase, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(phase_of(*self.rx.borrow_and_update()))
    }
}

fn phase_of(in_flight: usize) -> UploadPhase {
    if in_flight > 0 {
        UploadPhase::Uploading
    } else {
        UploadPhase::Idle
    }
}

/// Marks one upload as in flight until dropped
struct InFlightGuard {
    counter: Arc<watch::Sender<usize>>,
}

impl InFlightGuard {
    fn begin(counter: &Arc<watch::Sender<usize>>) -> Self {
        counter.send_modify(|n| *n += 1);
        Self {
            counter: counter.clone(),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Service that uploads images and records them
pub struct PhotoUploadService {
    config: PhotoUploadConfig,
    session: Arc<dyn SessionProvider>,
    storage: Arc<dyn StorageClient>,
    metadata: Arc<dyn MetadataClient>,
    in_flight: Arc<watch::Sender<usize>>,
    events: broadcast::Sender<UploadEvent>,
}

impl PhotoUploadService {
    /// Create a new upload service
    pub fn new(
        config: PhotoUploadConfig,
        session: Arc<dyn SessionProvider>,
        storage: Arc<dyn StorageClient>,
        metadata: Arc<dyn MetadataClient>,
    ) -> Self {
        let (in_flight, _) = watch::channel(0usize);
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            config,
            session,
            storage,
            metadata,
            in_flight: Arc::new(in_flight),
            events,
        }
    }

    pub fn config(&self) -> &PhotoUploadConfig {
        &self.config
    }

    /// The session the next upload would be attributed to
    pub fn current_session(&self) -> Option<Session> {
        self.session.current_session()
    }

    pub fn phase(&self) -> UploadPhase {
        phase_of(*self.in_flight.borrow())
    }

    pub fn watch_phase(&self) -> PhaseReceiver {
        PhaseReceiver {
            rx: self.in_flight.subscribe(),
        }
    }

    /// Subscribe to upload-completed notifications
    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.events.subscribe()
    }

    /// Upload one image and record it
    ///
    /// Without a session nothing is sent anywhere and the phase stays `Idle`.
    /// On success the new record is broadcast as [`UploadEvent::Completed`].
    pub async fn initiate_upload(&self, file: ImageFile) -> UploadResult<PhotoRecord> {
        let Some(session) = self.session.current_session() else {
            log::warn!("Upload of '{}' rejected: no user signed in", file.name);
            return Err(UploadError::AuthMissing);
        };

        let _in_flight = InFlightGuard::begin(&self.in_flight);

        match self.run_sequence(&session, &file).await {
            Ok(record) => {
                log::info!(
                    "Uploaded '{}' ({} bytes) for {}",
                    record.title,
                    file.size(),
                    record.owner_id
                );
                if self.events.send(UploadEvent::Completed(record.clone())).is_err() {
                    log::debug!("No subscribers for upload completion");
                }
                Ok(record)
            }
            Err(e) => {
                log::error!("Upload failed: {}", e);
                if let Some(orphan) = e.orphaned_object() {
                    log::warn!("Object {} remains in storage without a record", orphan);
                }
                Err(e)
            }
        }
    }

    async fn run_sequence(&self, session: &Session, file: &ImageFile) -> UploadResult<PhotoRecord> {
        let upload_id = Uuid::new_v4().to_string();
        let path = paths::object_path(&self.config.path_prefix, &session.user_id, &upload_id);

        let object = self
            .storage
            .store(&path, file)
            .await
            .map_err(|source| UploadError::StoreFailed {
                path: path.clone(),
                source,
            })?;

        let url = self
            .storage
            .resolve_url(&object)
            .await
            .map_err(|source| UploadError::ResolveFailed {
                path: object.path.clone(),
                source,
            })?;

        let record = PhotoRecord::new(session.user_id.as_str(), url, file.name.as_str());

        // The document id is not needed by anything downstream.
        let _document_id = self
            .metadata
            .append(&self.config.collection, &record)
            .await
            .map_err(|source| UploadError::MetadataFailed {
                path: object.path.clone(),
                source,
            })?;

        Ok(record)
    }
}
