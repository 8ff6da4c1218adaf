//! Drop-target state and file filtering
//!
//! Kept free of any UI types so the widget logic can be tested without a
//! renderer.

/// True for MIME types the drop zone accepts (`image/*`)
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Picks the first file whose declared MIME type is an image
///
/// Every other file is discarded. Files without a declared type never match.
pub fn first_image<T, I, F>(files: I, mime_of: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Option<String>,
{
    files
        .into_iter()
        .find(|file| mime_of(file).is_some_and(|mime| is_image_mime(&mime)))
}

/// Best-effort MIME type from a file name, for pickers that report none
pub fn guess_mime_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "avif" => Some("image/avif"),
        "heic" => Some("image/heic"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Hover state of the drop target
///
/// Purely presentational: it never influences whether an upload starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropZone {
    active: bool,
}

impl DropZone {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// drag-enter and drag-over
    pub fn hover(&mut self) {
        self.active = true;
    }

    pub fn leave(&mut self) {
        self.active = false;
    }

    /// Ends the gesture and returns the file to upload, if any
    pub fn drop_files<T, I, F>(&mut self, files: I, mime_of: F) -> Option<T>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Option<String>,
    {
        self.active = false;
        first_image(files, mime_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mime(file: &(&'static str, Option<&'static str>)) -> Option<String> {
        file.1.map(str::to_string)
    }

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/jpeg"));
        assert!(is_image_mime("image/png"));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime(""));
        assert!(!is_image_mime("Image/png"));
    }

    #[test]
    fn test_non_images_are_never_selected() {
        let files = vec![
            ("notes.txt", Some("text/plain")),
            ("report.pdf", Some("application/pdf")),
            ("clip.mp4", Some("video/mp4")),
            ("unknown", None),
        ];
        assert_eq!(first_image(files, mime), None);
    }

    #[test]
    fn test_only_first_image_is_selected() {
        let files = vec![
            ("readme.md", Some("text/markdown")),
            ("cat.jpg", Some("image/jpeg")),
            ("dog.png", Some("image/png")),
        ];
        assert_eq!(first_image(files, mime).map(|f| f.0), Some("cat.jpg"));
    }

    #[test]
    fn test_undeclared_type_is_not_guessed_from_name() {
        let files = vec![("x.png", None), ("y.jpg", Some(""))];
        assert_eq!(first_image(files, mime), None);
    }

    #[test]
    fn test_drop_zone_hover_and_leave() {
        let mut zone = DropZone::default();
        assert!(!zone.is_active());
        zone.hover();
        zone.hover();
        assert!(zone.is_active());
        zone.leave();
        assert!(!zone.is_active());
    }

    #[test]
    fn test_drop_resets_hover_even_without_images() {
        let mut zone = DropZone::default();
        zone.hover();
        let picked = zone.drop_files(vec![("a.txt", Some("text/plain"))], mime);
        assert!(picked.is_none());
        assert!(!zone.is_active());
    }

    #[test]
    fn test_drop_returns_first_image() {
        let mut zone = DropZone::default();
        zone.hover();
        let picked = zone.drop_files(
            vec![("a.gif", Some("image/gif")), ("b.webp", Some("image/webp"))],
            mime,
        );
        assert_eq!(picked.map(|f| f.0), Some("a.gif"));
        assert!(!zone.is_active());
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("cat.JPG"), Some("image/jpeg"));
        assert_eq!(guess_mime_type("dog.png"), Some("image/png"));
        assert_eq!(guess_mime_type("archive.tar.gz"), None);
        assert_eq!(guess_mime_type("noext"), None);
    }
}
