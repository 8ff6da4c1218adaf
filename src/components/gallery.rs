use crate::services::gallery_service::{self, GalleryItem};
use crate::{AppState, Screen};
use dioxus::prelude::*;
use photo_upload::{SessionProvider, UploadEvent, UploadWidget};
use tokio::sync::broadcast::error::RecvError;

#[component]
pub fn GalleryScreen(on_navigate: EventHandler<Screen>) -> Element {
    let state = use_context::<AppState>();
    let signed_in = state.session.current_session();
    let mut items = use_signal(Vec::<GalleryItem>::new);
    let mut load_error = use_signal(|| None::<String>);

    let load_items = {
        let state = state.clone();
        move || {
            let session = state.session.current_session();
            match gallery_service::load_gallery(
                &state.metadata,
                &state.config.collection,
                session.as_ref(),
            ) {
                Ok(list) => {
                    items.set(list);
                    load_error.set(None);
                }
                Err(e) => {
                    log::error!("Failed to load gallery: {}", e);
                    load_error.set(Some(e.user_message()));
                }
            }
        }
    };

    // Load on mount
    use_effect({
        let mut load_items = load_items.clone();
        move || load_items()
    });

    // Reload whenever an upload has been recorded
    use_future({
        let state = state.clone();
        move || {
            let mut rx = state.uploads.subscribe();
            let mut load_items = load_items.clone();
            async move {
                loop {
                    match rx.recv().await {
                        Ok(UploadEvent::Completed(record)) => {
                            log::debug!("Refreshing gallery after '{}'", record.title);
                            load_items();
                        }
                        Err(RecvError::Lagged(missed)) => {
                            log::debug!("Missed {} upload events, refreshing", missed);
                            load_items();
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }
    });

    rsx! {
        div { style: "padding: 16px; max-width: 900px; margin: 0 auto; min-height: 100vh; background: #f5f5f5;",
            h1 { style: "color: #0066cc; text-align: center; margin: 32px 0 24px 0; font-size: 28px; font-weight: 700;",
                "📷 PhotoDrop"
            }

            if let Some(session) = signed_in {
                p { style: "text-align: center; font-size: 13px; color: #666; margin: 0 0 16px 0;",
                    "Signed in as {session.user_id}"
                }
            } else {
                div { class: "card", style: "margin-bottom: 16px; text-align: center;",
                    p { style: "margin: 0 0 12px 0; font-size: 14px; color: #555;",
                        "Sign in to start uploading."
                    }
                    button {
                        class: "btn-primary",
                        onclick: move |_| on_navigate.call(Screen::Account),
                        "👤 Sign in"
                    }
                }
            }

            div { class: "card", style: "margin-bottom: 16px;",
                UploadWidget {}
            }

            if let Some(error) = load_error() {
                div { style: "padding: 12px; background: #f8d7da; border-radius: 4px; color: #721c24; margin-bottom: 16px;",
                    "{error}"
                }
            }

            if items().is_empty() {
                div { style: "text-align: center; padding: 40px; color: #999;", "No photos yet" }
            } else {
                div { class: "photo-grid",
                    for item in items() {
                        PhotoCard { key: "{item.record.url}", item: item.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn PhotoCard(item: GalleryItem) -> Element {
    let created = item
        .record
        .created_at
        .get(..10)
        .unwrap_or(&item.record.created_at)
        .to_string();

    rsx! {
        div { class: "photo-card",
            img {
                src: "{item.src}",
                alt: "{item.record.title}",
                style: "width: 100%; height: 160px; object-fit: cover; border-radius: 8px 8px 0 0; background: #f0f0f0;",
            }
            div { style: "padding: 8px;",
                p { style: "margin: 0; font-size: 13px; font-weight: 600; color: #333; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;",
                    "{item.record.title}"
                }
                p { style: "margin: 2px 0 0 0; font-size: 11px; color: #888;", "{created}" }
            }
        }
    }
}
