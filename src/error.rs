use photo_upload::{MetadataError, StorageError};
use thiserror::Error;

/// Central error types for the PhotoDrop app
#[derive(Debug, Error)]
pub enum AppError {
    /// Database error (rusqlite)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
    /// Validation error (e.g. invalid inputs)
    #[error("Validation error: {0}")]
    Validation(String),
    /// Storage backend could not be set up
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// Photo records could not be read
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

/// User-friendly error messages for UI
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Metadata(_) => {
                "A database error occurred. Please try again.".to_string()
            }
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::Config(msg) => format!("Invalid configuration: {}", msg),
            AppError::Validation(msg) => msg.clone(),
            AppError::Storage(_) => "The photo storage is not reachable.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = AppError::Validation("User name must not be empty".to_string());
        assert_eq!(err.user_message(), "User name must not be empty");
    }

    #[test]
    fn test_database_message_hides_details() {
        let err = AppError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(!err.user_message().contains("QueryReturnedNoRows"));
        assert!(err.to_string().starts_with("Database error"));
    }
}
