use crate::models::Session;
use std::sync::{Arc, RwLock};

/// Read-only access to the current session
///
/// Implementations answer who is signed in right now; they never create or
/// refresh sessions.
pub trait SessionProvider: Send + Sync {
    fn current_session(&self) -> Option<Session>;
}

/// A fixed session, e.g. for embedding or tests
impl SessionProvider for Option<Session> {
    fn current_session(&self) -> Option<Session> {
        self.clone()
    }
}

/// A session slot shared with whatever signs users in and out
impl SessionProvider for Arc<RwLock<Option<Session>>> {
    fn current_session(&self) -> Option<Session> {
        match self.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
