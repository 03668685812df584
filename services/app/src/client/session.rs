//! services/app/src/client/session.rs
//!
//! In-memory session state shared by every consumer, and its durable
//! counterpart in the key-value store.

use dashboard_core::domain::{Session, User};
use dashboard_core::ports::{KeyValueStore, PortError, PortResult};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

//=========================================================================================
// SessionHandle (Shared In-Memory State)
//=========================================================================================

/// Owns the current `Session` and notifies subscribers when it is replaced.
#[derive(Clone)]
pub struct SessionHandle {
    tx: Arc<watch::Sender<Session>>,
}

impl SessionHandle {
    pub fn new(initial: Session) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// A snapshot of the current session.
    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.tx.borrow().token().map(str::to_owned)
    }

    pub fn user(&self) -> Option<User> {
        self.tx.borrow().user().cloned()
    }

    /// A receiver that observes every later replacement.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    pub(crate) fn replace(&self, session: Session) {
        self.tx.send_replace(session);
    }
}

//=========================================================================================
// SessionStore (Durable State)
//=========================================================================================

/// Persists the session as two entries, `token` and `user` (JSON).
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Reads the stored session back.
    ///
    /// Anything short of a readable token *and* a parseable user yields
    /// `Session::Anonymous`; a leftover half is removed.
    pub fn load(&self) -> Session {
        let token = self.read(TOKEN_KEY).filter(|t| !t.is_empty());
        let user = self.read(USER_KEY);

        match (token, user) {
            (None, None) => Session::Anonymous,
            (Some(token), Some(raw_user)) => match serde_json::from_str::<User>(&raw_user) {
                Ok(user) => Session::authenticated(token, user),
                Err(e) => {
                    warn!(error = %e, "stored user is unreadable; discarding session");
                    self.discard();
                    Session::Anonymous
                }
            },
            (token, _) => {
                warn!(has_token = token.is_some(), "discarding partially stored session");
                self.discard();
                Session::Anonymous
            }
        }
    }

    /// Writes the session. Both entries land in one batch; an anonymous
    /// session clears them.
    pub fn save(&self, session: &Session) -> PortResult<()> {
        match session {
            Session::Anonymous => self.clear(),
            Session::Authenticated { token, user } => {
                let user_json =
                    serde_json::to_string(user).map_err(|e| PortError::Storage(e.to_string()))?;
                self.storage
                    .set_entries(&[(TOKEN_KEY, token.as_str()), (USER_KEY, user_json.as_str())])
            }
        }
    }

    pub fn clear(&self) -> PortResult<()> {
        self.storage.remove_entries(&[TOKEN_KEY, USER_KEY])
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage.get(key).unwrap_or_else(|e| {
            warn!(key, error = %e, "failed to read session storage");
            None
        })
    }

    fn discard(&self) {
        if let Err(e) = self.clear() {
            warn!(error = %e, "failed to discard stale session entries");
        }
    }
}
