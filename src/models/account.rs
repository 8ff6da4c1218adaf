use photo_upload::Session;
use serde::{Deserialize, Serialize};

/// The locally signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub user_id: String,
    pub signed_in_at: String,
}

impl Account {
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            signed_in_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn session(&self) -> Session {
        Session::new(self.user_id.clone())
    }
}
