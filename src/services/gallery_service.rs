use crate::error::AppError;
use photo_upload::selection::guess_mime_type;
use photo_upload::{PhotoRecord, Session, SqliteMetadataStore};

/// A record plus the `src` the webview can display
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub record: PhotoRecord,
    pub src: String,
}

/// Photos of the signed-in user, newest first; empty when signed out
pub fn load_gallery(
    store: &SqliteMetadataStore,
    collection: &str,
    session: Option<&Session>,
) -> Result<Vec<GalleryItem>, AppError> {
    let Some(session) = session else {
        return Ok(Vec::new());
    };

    let records = store.list(collection, &session.user_id)?;
    log::debug!("Loaded {} photos for {}", records.len(), session.user_id);

    Ok(records
        .into_iter()
        .map(|record| GalleryItem {
            src: display_src(&record),
            record,
        })
        .collect())
}

/// Webviews refuse `file://` images, so local objects are inlined as data URLs
pub fn display_src(record: &PhotoRecord) -> String {
    use base64::{engine::general_purpose, Engine as _};

    if !record.url.starts_with("file://") {
        return record.url.clone();
    }
    let Some(local_path) = url::Url::parse(&record.url)
        .ok()
        .and_then(|url| url.to_file_path().ok())
    else {
        log::warn!("Malformed local photo URL {}", record.url);
        return record.url.clone();
    };

    match std::fs::read(&local_path) {
        Ok(bytes) => {
            let mime_type = guess_mime_type(&record.title).unwrap_or("image/jpeg");
            let encoded = general_purpose::STANDARD.encode(&bytes);
            format!("data:{};base64,{}", mime_type, encoded)
        }
        Err(e) => {
            log::warn!("Cannot read local photo {}: {}", local_path.display(), e);
            record.url.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_upload::MetadataClient;

    fn record(owner: &str, title: &str, url: &str) -> PhotoRecord {
        PhotoRecord {
            owner_id: owner.to_string(),
            url: url.to_string(),
            title: title.to_string(),
            created_at: "2025-03-01T08:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_remote_url_is_passed_through() {
        let r = record("u1", "cat.jpg", "https://cloud.example.com/s/abc/download");
        assert_eq!(display_src(&r), "https://cloud.example.com/s/abc/download");
    }

    #[test]
    fn test_local_file_becomes_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obj");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let url = url::Url::from_file_path(&path).unwrap();
        let r = record("u1", "dog.png", url.as_str());
        assert_eq!(display_src(&r), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_escaped_local_path_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("holiday pics #2");
        std::fs::create_dir_all(&folder).unwrap();
        let path = folder.join("obj");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let url = url::Url::from_file_path(&path).unwrap();
        assert!(url.as_str().contains("holiday%20pics%20%232"));
        let r = record("u1", "beach.jpg", url.as_str());
        assert_eq!(display_src(&r), "data:image/jpeg;base64,AQID");
    }

    #[test]
    fn test_missing_local_file_keeps_url() {
        let r = record("u1", "cat.jpg", "file:///definitely/not/here");
        assert_eq!(display_src(&r), "file:///definitely/not/here");
    }

    #[tokio::test]
    async fn test_load_gallery_requires_session() {
        let store = SqliteMetadataStore::open_in_memory().unwrap();
        store
            .append("photos", &record("u1", "cat.jpg", "https://x/1"))
            .await
            .unwrap();

        assert!(load_gallery(&store, "photos", None).unwrap().is_empty());

        let items = load_gallery(&store, "photos", Some(&Session::new("u1"))).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].record.title, "cat.jpg");
        assert_eq!(items[0].src, "https://x/1");

        let other = load_gallery(&store, "photos", Some(&Session::new("u2"))).unwrap();
        assert!(other.is_empty());
    }
}
