use crate::error::AppError;
use crate::models::Account;
use photo_upload::{Session, SessionProvider};
use rusqlite::Connection;
use std::sync::{Arc, RwLock};

/// Loads the signed-in account, if any
pub fn load_account(conn: &Connection) -> Result<Option<Account>, AppError> {
    let result = conn.query_row(
        "SELECT user_id, signed_in_at FROM account WHERE id = 1",
        [],
        |row| {
            Ok(Account {
                user_id: row.get(0)?,
                signed_in_at: row.get(1)?,
            })
        },
    );

    match result {
        Ok(account) => Ok(Some(account)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e)),
    }
}

/// Saves the account, replacing any previous one
pub fn save_account(conn: &Connection, account: &Account) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO account (id, user_id, signed_in_at) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET user_id = excluded.user_id, signed_in_at = excluded.signed_in_at",
        (&account.user_id, &account.signed_in_at),
    )?;
    Ok(())
}

/// Deletes the stored account
pub fn delete_account(conn: &Connection) -> Result<(), AppError> {
    conn.execute("DELETE FROM account", [])?;
    Ok(())
}

/// Checks a user id before it becomes part of storage paths
pub fn validate_user_id(raw: &str) -> Result<String, AppError> {
    let user_id = raw.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation("User name must not be empty".to_string()));
    }
    if user_id.len() > 64 {
        return Err(AppError::Validation(
            "User name must be at most 64 characters".to_string(),
        ));
    }
    if !user_id
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
        || user_id.starts_with('.')
    {
        return Err(AppError::Validation(
            "User name may only contain letters, digits, '-', '_', '.' and '@'".to_string(),
        ));
    }
    Ok(user_id.to_string())
}

/// Session accessor backed by the account table
///
/// Uploads read the cached session; sign-in and sign-out update both the
/// database and the cache.
#[derive(Clone, Default)]
pub struct AccountSession {
    current: Arc<RwLock<Option<Session>>>,
}

impl AccountSession {
    /// Restore the session stored in the database
    pub fn restore(conn: &Connection) -> Result<Self, AppError> {
        let session = load_account(conn)?.map(|account| account.session());
        match &session {
            Some(s) => log::info!("Restored session for {}", s.user_id),
            None => log::info!("No stored session"),
        }
        Ok(Self {
            current: Arc::new(RwLock::new(session)),
        })
    }

    pub fn sign_in(&self, conn: &Connection, raw_user_id: &str) -> Result<Account, AppError> {
        let account = Account::new(validate_user_id(raw_user_id)?);
        save_account(conn, &account)?;
        self.replace(Some(account.session()));
        log::info!("Signed in as {}", account.user_id);
        Ok(account)
    }

    pub fn sign_out(&self, conn: &Connection) -> Result<(), AppError> {
        delete_account(conn)?;
        self.replace(None);
        log::info!("Signed out");
        Ok(())
    }

    fn replace(&self, session: Option<Session>) {
        match self.current.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }
}

impl SessionProvider for AccountSession {
    fn current_session(&self) -> Option<Session> {
        self.current.current_session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::database::schema::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_save_and_load_account() {
        let conn = setup_test_db();
        assert!(load_account(&conn).unwrap().is_none());

        let account = Account::new("u1".to_string());
        save_account(&conn, &account).unwrap();
        assert_eq!(load_account(&conn).unwrap(), Some(account));
    }

    #[test]
    fn test_save_replaces_previous_account() {
        let conn = setup_test_db();
        save_account(&conn, &Account::new("u1".to_string())).unwrap();
        save_account(&conn, &Account::new("u2".to_string())).unwrap();

        let loaded = load_account(&conn).unwrap().unwrap();
        assert_eq!(loaded.user_id, "u2");

        let rows: i32 = conn
            .query_row("SELECT COUNT(*) FROM account", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_validate_user_id() {
        assert_eq!(validate_user_id("  u1 ").unwrap(), "u1");
        assert_eq!(validate_user_id("alice@example.com").unwrap(), "alice@example.com");
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("   ").is_err());
        assert!(validate_user_id("a/b").is_err());
        assert!(validate_user_id("..").is_err());
        assert!(validate_user_id(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_sign_in_and_out_updates_session() {
        let conn = setup_test_db();
        let session = AccountSession::restore(&conn).unwrap();
        assert!(session.current_session().is_none());

        session.sign_in(&conn, "u1").unwrap();
        assert_eq!(session.current_session(), Some(Session::new("u1")));
        assert!(load_account(&conn).unwrap().is_some());

        session.sign_out(&conn).unwrap();
        assert!(session.current_session().is_none());
        assert!(load_account(&conn).unwrap().is_none());
    }

    #[test]
    fn test_restore_picks_up_stored_account() {
        let conn = setup_test_db();
        save_account(&conn, &Account::new("u7".to_string())).unwrap();

        let session = AccountSession::restore(&conn).unwrap();
        assert_eq!(session.current_session(), Some(Session::new("u7")));
    }

    #[test]
    fn test_invalid_sign_in_keeps_session_empty() {
        let conn = setup_test_db();
        let session = AccountSession::restore(&conn).unwrap();

        let err = session.sign_in(&conn, "bad/name").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(session.current_session().is_none());
    }
}
