/// Object path layout
///
/// ```text
/// <prefix>/              # "photos" by default
/// └── <user-id>/
///     └── <upload-uuid>  # original bytes, no extension
/// ```

/// Default first path segment
pub const PHOTOS_PREFIX: &str = "photos";

/// Build the storage path for one upload
pub fn object_path(prefix: &str, user_id: &str, upload_id: &str) -> String {
    format!("{}/{}/{}", prefix.trim_end_matches('/'), user_id, upload_id)
}

/// Build the directory holding all uploads of a user
pub fn user_dir(prefix: &str, user_id: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), user_id)
}

/// Every intermediate collection of `path`, shortest first
///
/// `a/b/c` yields `["a", "a/b"]`. Used by backends that cannot create nested
/// directories in one call.
pub fn parent_dirs(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    (1..segments.len())
        .map(|n| segments[..n].join("/"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path() {
        let path = object_path(PHOTOS_PREFIX, "u1", "0b7c");
        assert_eq!(path, "photos/u1/0b7c");
    }

    #[test]
    fn test_object_path_trims_prefix_slash() {
        assert_eq!(object_path("photos/", "u1", "x"), "photos/u1/x");
    }

    #[test]
    fn test_user_dir() {
        assert_eq!(user_dir(PHOTOS_PREFIX, "u1"), "photos/u1");
    }

    #[test]
    fn test_parent_dirs() {
        assert_eq!(parent_dirs("photos/u1/abc"), vec!["photos", "photos/u1"]);
        assert_eq!(parent_dirs("/base/photos/u1/abc"), vec!["base", "base/photos", "base/photos/u1"]);
        assert!(parent_dirs("abc").is_empty());
    }
}
