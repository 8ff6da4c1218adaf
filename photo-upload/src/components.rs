//! Dioxus drop-zone widget
//!
//! Accepts a dropped or browsed image and hands it to the
//! [`PhotoUploadService`] found in context. The widget owns only presentation
//! state: the hover overlay, the `Idle`/`Uploading` view mirrored from the
//! service, and the modal notice.

use crate::models::{ImageFile, PhotoRecord, UploadPhase};
use crate::selection::{guess_mime_type, DropZone};
use crate::upload::{PhotoUploadService, UploadError};
use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use std::sync::Arc;

/// Shared upload service for all widgets below the provider
#[derive(Clone)]
pub struct UploadContext {
    pub service: Arc<PhotoUploadService>,
}

impl UploadContext {
    pub fn new(service: Arc<PhotoUploadService>) -> Self {
        Self { service }
    }
}

/// Custom labels for the upload widget
#[derive(Clone, PartialEq)]
pub struct UploadLabels {
    pub drop_prompt: String,
    pub browse: String,
    pub hint: String,
    pub uploading: String,
    pub login_required: String,
    pub upload_failed: String,
    pub unreadable_file: String,
    pub dismiss: String,
}

impl Default for UploadLabels {
    fn default() -> Self {
        Self {
            drop_prompt: "Drag and drop your photos here, or".to_string(),
            browse: "browse to upload".to_string(),
            hint: "Supports: JPG, PNG, WebP • Max size: 10MB".to_string(),
            uploading: "Uploading your masterpiece...".to_string(),
            login_required: "Please log in to upload photos".to_string(),
            upload_failed: "Upload failed. Please try again.".to_string(),
            unreadable_file: "The selected file could not be read.".to_string(),
            dismiss: "OK".to_string(),
        }
    }
}

impl UploadLabels {
    /// The one notice shown for a failed upload
    pub fn notice_for(&self, error: &UploadError) -> String {
        match error {
            UploadError::AuthMissing => self.login_required.clone(),
            _ => self.upload_failed.clone(),
        }
    }
}

/// MIME type a dropped file declares; files without one are never images
fn declared_mime(file: &FileData) -> Option<String> {
    file.content_type()
}

/// Content type to upload with, guessed from the extension when undeclared
fn upload_mime(declared: Option<String>, name: &str) -> String {
    declared
        .filter(|mime| !mime.is_empty())
        .or_else(|| guess_mime_type(name).map(str::to_string))
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

async fn read_image_file(file: FileData) -> Option<ImageFile> {
    let name = file.name();
    let mime_type = upload_mime(file.content_type(), &name);

    match file.read_bytes().await {
        Ok(bytes) => Some(ImageFile::new(name, mime_type, bytes.to_vec())),
        Err(e) => {
            log::error!("Reading '{}' failed: {}", name, e);
            None
        }
    }
}

/// Drop-zone upload widget
///
/// Requires an [`UploadContext`] in context.
///
/// # Example
/// ```rust,ignore
/// UploadWidget {
///     on_uploaded: move |record: PhotoRecord| {
///         log::info!("{} uploaded", record.title);
///     },
/// }
/// ```
#[component]
pub fn UploadWidget(
    #[props(default)] labels: Option<UploadLabels>,
    #[props(default)] on_uploaded: Option<EventHandler<PhotoRecord>>,
) -> Element {
    let context = use_context::<UploadContext>();
    let labels = labels.unwrap_or_default();

    let mut phase = use_signal(|| context.service.phase());
    let mut drop_zone = use_signal(DropZone::default);
    let mut notice = use_signal(|| None::<String>);

    let watched = context.service.clone();
    use_future(move || {
        let service = watched.clone();
        async move {
            let mut rx = service.watch_phase();
            phase.set(rx.phase());
            while let Ok(next) = rx.changed().await {
                phase.set(next);
            }
        }
    });

    let start_upload = {
        let service = context.service.clone();
        let labels = labels.clone();
        move |file: ImageFile| {
            let service = service.clone();
            let labels = labels.clone();
            spawn(async move {
                match service.initiate_upload(file).await {
                    Ok(record) => {
                        if let Some(handler) = on_uploaded {
                            handler.call(record);
                        }
                    }
                    Err(e) => notice.set(Some(labels.notice_for(&e))),
                }
            });
        }
    };

    let read_and_upload = {
        let start_upload = start_upload.clone();
        let unreadable = labels.unreadable_file.clone();
        move |file: FileData| {
            let start_upload = start_upload.clone();
            let unreadable = unreadable.clone();
            spawn(async move {
                match read_image_file(file).await {
                    Some(image) => start_upload(image),
                    None => notice.set(Some(unreadable)),
                }
            });
        }
    };

    let on_drop = {
        let read_and_upload = read_and_upload.clone();
        move |evt: DragEvent| {
            evt.prevent_default();
            let picked = drop_zone.write().drop_files(evt.files(), declared_mime);
            match picked {
                Some(file) => read_and_upload(file),
                None => log::debug!("Drop contained no image files"),
            }
        }
    };

    let on_pick = move |evt: FormEvent| {
        if let Some(file) = evt.files().into_iter().next() {
            read_and_upload(file);
        }
    };

    rsx! {
        div {
            class: if drop_zone().is_active() { "upload-widget drag-active" } else { "upload-widget" },
            ondragenter: move |evt: DragEvent| {
                evt.prevent_default();
                drop_zone.write().hover();
            },
            ondragover: move |evt: DragEvent| {
                evt.prevent_default();
                drop_zone.write().hover();
            },
            ondragleave: move |_| drop_zone.write().leave(),
            ondrop: on_drop,

            match phase() {
                UploadPhase::Uploading => rsx! {
                    div { style: "display: flex; flex-direction: column; align-items: center; gap: 8px;",
                        div { style: "font-size: 48px; animation: spin 2s linear infinite;", "⏳" }
                        p { style: "margin: 0; font-size: 14px; color: #555;", "{labels.uploading}" }
                    }
                },
                UploadPhase::Idle => rsx! {
                    div {
                        div { style: "font-size: 48px; color: #0066cc;", "⬆️" }
                        p { style: "margin: 8px 0 0 0; font-size: 14px; color: #555;",
                            "{labels.drop_prompt}"
                        }
                        label { style: "display: inline-block; margin-top: 8px;",
                            input {
                                r#type: "file",
                                accept: "image/*",
                                style: "display: none;",
                                onchange: on_pick,
                            }
                            span { style: "cursor: pointer; color: #0066cc; font-weight: 600;",
                                "{labels.browse}"
                            }
                        }
                        p { style: "margin: 8px 0 0 0; font-size: 12px; color: #888;", "{labels.hint}" }
                    }
                },
            }

            if let Some(message) = notice() {
                div {
                    class: "upload-notice",
                    style: "position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.4); z-index: 100;",
                    div { style: "background: white; padding: 24px; border-radius: 8px; max-width: 320px; box-shadow: 0 4px 16px rgba(0,0,0,0.2);",
                        p { style: "margin: 0 0 16px 0; font-size: 15px; color: #333;", "{message}" }
                        button {
                            class: "btn-primary",
                            style: "width: 100%;",
                            onclick: move |_| notice.set(None),
                            "{labels.dismiss}"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataError;
    use crate::storage::StorageError;

    #[test]
    fn test_anonymous_upload_asks_to_log_in() {
        let labels = UploadLabels::default();
        assert_eq!(
            labels.notice_for(&UploadError::AuthMissing),
            labels.login_required
        );
    }

    #[test]
    fn test_stage_failures_share_one_notice() {
        let labels = UploadLabels::default();
        let failures = [
            UploadError::StoreFailed {
                path: "photos/u1/a".to_string(),
                source: StorageError::UploadFailed("disk full".to_string()),
            },
            UploadError::ResolveFailed {
                path: "photos/u1/a".to_string(),
                source: StorageError::ResolveFailed("gone".to_string()),
            },
            UploadError::MetadataFailed {
                path: "photos/u1/a".to_string(),
                source: MetadataError::Unavailable("offline".to_string()),
            },
        ];

        for error in &failures {
            assert_eq!(labels.notice_for(error), labels.upload_failed);
        }
    }

    #[test]
    fn test_custom_labels_are_used() {
        let labels = UploadLabels {
            login_required: "Bitte anmelden".to_string(),
            ..UploadLabels::default()
        };
        assert_eq!(labels.notice_for(&UploadError::AuthMissing), "Bitte anmelden");
    }

    #[test]
    fn test_upload_mime_prefers_declared_type() {
        assert_eq!(upload_mime(Some("image/webp".to_string()), "a.png"), "image/webp");
        assert_eq!(upload_mime(None, "a.png"), "image/png");
        assert_eq!(upload_mime(Some(String::new()), "a.JPG"), "image/jpeg");
        assert_eq!(upload_mime(None, "notes"), "application/octet-stream");
    }
}
