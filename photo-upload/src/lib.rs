//! # Photo Upload
//!
//! Client-side image upload orchestration.
//!
//! This crate provides:
//! - The upload sequence: session gate, object storage, URL resolution and
//!   metadata append, in that order
//! - Tagged errors per failed stage
//! - An `Idle`/`Uploading` phase channel and an upload-completed event stream
//! - A filesystem object store and (feature `webdav`) a Nextcloud WebDAV store
//! - A SQLite-backed document store for photo records
//! - A Dioxus drop-zone widget (feature `components`)
//!
//! ## Separation of Concerns
//!
//! This crate does **not** authenticate users. The application injects a
//! [`SessionProvider`] that answers who is signed in, if anyone.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_upload::{FsStorage, PhotoUploadConfig, PhotoUploadService, SqliteMetadataStore};
//!
//! let service = PhotoUploadService::new(
//!     PhotoUploadConfig::default(),
//!     Arc::new(Some(Session::new("u1"))),
//!     Arc::new(FsStorage::new("./objects")),
//!     Arc::new(SqliteMetadataStore::open("./photodrop.db")?),
//! );
//! let record = service.initiate_upload(file).await?;
//! ```

pub mod metadata;
pub mod models;
pub mod paths;
pub mod selection;
pub mod session;
pub mod storage;
pub mod upload;

#[cfg(feature = "webdav")]
pub mod webdav;

#[cfg(feature = "components")]
pub mod components;

pub use metadata::{MetadataClient, MetadataError, MetadataResult, SqliteMetadataStore};
pub use models::{
    ImageFile, PhotoRecord, PhotoUploadConfig, Session, StoredObject, UploadEvent, UploadPhase,
};
pub use selection::{first_image, is_image_mime, DropZone};
pub use session::SessionProvider;
pub use storage::{FsStorage, StorageClient, StorageError, StorageResult};
pub use upload::{PhotoUploadService, UploadError, UploadResult, UploadStage};

#[cfg(feature = "webdav")]
pub use webdav::{WebDavConfig, WebDavStorage};

#[cfg(feature = "components")]
pub use components::{UploadContext, UploadLabels, UploadWidget};
