//! services/app/src/client/context.rs
//!
//! The session context: one explicitly owned object, created at startup and
//! handed to every view, exposing the session state and the four session
//! operations.

use crate::client::protocol::{
    AuthPayload, CountryRequest, LoginRequest, RegisterResponse, COUNTRY_PATH, LOGIN_PATH,
    REGISTER_PATH,
};
use crate::client::request::RequestClient;
use crate::client::session::{SessionHandle, SessionStore};
use dashboard_core::domain::{Country, Session, User};
use dashboard_core::ports::{HttpTransport, KeyValueStore, PortError};
use dashboard_core::validation::RegistrationForm;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const UPDATE_FAILED: &str = "Update failed";

/// Why a session operation did not succeed. `Display` is the text shown
/// to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The server refused the request; holds its message or the
    /// operation's fallback.
    #[error("{0}")]
    Rejected(String),
    /// No usable response, or the result could not be stored.
    #[error("An unexpected error occurred")]
    Unexpected,
}

impl SessionError {
    fn from_port(err: PortError, fallback: &str) -> Self {
        match err {
            PortError::Rejected { message, .. } => {
                SessionError::Rejected(message.unwrap_or_else(|| fallback.to_string()))
            }
            PortError::Transport(_)
            | PortError::Encode(_)
            | PortError::Decode(_)
            | PortError::Storage(_) => {
                SessionError::Unexpected
            }
        }
    }
}

#[derive(Clone)]
pub struct SessionContext {
    client: RequestClient,
    store: SessionStore,
    session: SessionHandle,
}

impl SessionContext {
    /// Restores the persisted session and wires the request client to it.
    /// Lives for the rest of the process; there is no teardown.
    pub fn init(transport: Arc<dyn HttpTransport>, storage: Arc<dyn KeyValueStore>) -> Self {
        let store = SessionStore::new(storage);
        let restored = store.load();
        info!(
            authenticated = restored.is_authenticated(),
            user = restored.user().map(|u| u.username.as_str()),
            "session context initialized"
        );
        let session = SessionHandle::new(restored);
        let client = RequestClient::new(transport, session.clone());
        Self {
            client,
            store,
            session,
        }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    pub fn session(&self) -> Session {
        self.session.current()
    }

    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Exchanges credentials for a token and user and makes them current.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let payload: AuthPayload = self
            .client
            .post(LOGIN_PATH, &LoginRequest { username, password })
            .await
            .map_err(|e| {
                warn!(username, error = %e, "login failed");
                SessionError::from_port(e, LOGIN_FAILED)
            })?;
        self.establish(payload)?;
        info!(username, "logged in");
        Ok(())
    }

    /// Creates an account. Does not sign the new user in.
    ///
    /// Password confirmation is checked by the caller before this is invoked.
    pub async fn register(&self, form: &RegistrationForm) -> Result<RegisterResponse, SessionError> {
        let created: RegisterResponse = self
            .client
            .post(REGISTER_PATH, form)
            .await
            .map_err(|e| {
                warn!(username = %form.username, error = %e, "registration failed");
                SessionError::from_port(e, REGISTRATION_FAILED)
            })?;
        info!(username = %created.user.username, "account registered");
        Ok(created)
    }

    /// Forgets the session, both in memory and in storage. Never fails.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            error!(error = %e, "failed to clear stored session");
        }
        self.session.replace(Session::Anonymous);
        info!("logged out");
    }

    /// Changes the country preference. The server answers with a fresh token
    /// and user which replace the current pair.
    pub async fn update_country(&self, country: Country) -> Result<(), SessionError> {
        let payload: AuthPayload = self
            .client
            .post(COUNTRY_PATH, &CountryRequest { country })
            .await
            .map_err(|e| {
                warn!(%country, error = %e, "country update failed");
                SessionError::from_port(e, UPDATE_FAILED)
            })?;
        self.establish(payload)?;
        info!(%country, "country updated");
        Ok(())
    }

    /// Persists first, then publishes; a failed write leaves the previous
    /// session current.
    fn establish(&self, payload: AuthPayload) -> Result<(), SessionError> {
        let session = Session::authenticated(payload.token, payload.user);
        self.store.save(&session).map_err(|e| {
            error!(error = %e, "failed to persist session");
            SessionError::Unexpected
        })?;
        self.session.replace(session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::client::session::{TOKEN_KEY, USER_KEY};
    use crate::test_support::{auth_body, user, FailingStore, ScriptedTransport};
    use dashboard_core::domain::Role;
    use dashboard_core::ports::Method;
    use serde_json::json;
    use std::time::Duration;

    struct Harness {
        transport: Arc<ScriptedTransport>,
        storage: Arc<MemoryStore>,
        context: SessionContext,
    }

    fn harness() -> Harness {
        let transport = Arc::new(ScriptedTransport::new());
        let storage = Arc::new(MemoryStore::new());
        let context = SessionContext::init(transport.clone(), storage.clone());
        Harness { transport, storage, context }
    }

    #[tokio::test]
    async fn login_persists_and_publishes_token_with_user() {
        let h = harness();
        let alice = user("alice", Role::Admin, Some(Country::US));
        h.transport.respond(200, auth_body("tok-1", &alice));

        h.context.login("alice", "secret").await.unwrap();

        let sent = h.transport.requests();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].path, LOGIN_PATH);
        assert_eq!(sent[0].body, Some(json!({ "username": "alice", "password": "secret" })));

        assert_eq!(h.context.session(), Session::authenticated("tok-1", alice.clone()));
        assert_eq!(h.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        let stored: User = serde_json::from_str(&h.storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, alice);
    }

    #[tokio::test]
    async fn wrong_password_surfaces_server_message() {
        let h = harness();
        h.transport.respond(401, json!({ "error": "Invalid credentials" }));

        let err = h.context.login("alice", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(h.context.session(), Session::Anonymous);
        assert_eq!(h.storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn rejection_without_message_uses_fallbacks() {
        let h = harness();
        h.transport.respond_empty(500);
        h.transport.respond_empty(400);
        h.transport.respond_empty(403);

        assert_eq!(
            h.context.login("a", "b").await.unwrap_err(),
            SessionError::Rejected(LOGIN_FAILED.into())
        );
        let form = RegistrationForm::default();
        assert_eq!(
            h.context.register(&form).await.unwrap_err(),
            SessionError::Rejected(REGISTRATION_FAILED.into())
        );
        assert_eq!(
            h.context.update_country(Country::UK).await.unwrap_err(),
            SessionError::Rejected(UPDATE_FAILED.into())
        );
    }

    #[tokio::test]
    async fn network_failure_is_unexpected() {
        let h = harness();
        h.transport.fail(PortError::Transport("connection refused".into()));
        let err = h.context.login("alice", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "An unexpected error occurred");
    }

    #[tokio::test]
    async fn register_returns_created_user_without_signing_in() {
        let h = harness();
        let carol = user("carol", Role::Viewer, Some(Country::CA));
        h.transport.respond(201, json!({ "user": carol }));

        let form = RegistrationForm {
            username: "carol".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
            role: Role::Viewer,
            country: Some(Country::CA),
        };
        let created = h.context.register(&form).await.unwrap();

        assert_eq!(created.user, carol);
        assert_eq!(h.context.session(), Session::Anonymous);
        let body = h.transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["confirmPassword"], "pw");
        assert_eq!(body["role"], "Viewer");
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let h = harness();
        h.transport.respond(200, auth_body("tok", &user("alice", Role::Admin, None)));
        h.context.login("alice", "pw").await.unwrap();

        h.context.logout();
        let after_once = (h.context.session(), h.storage.get(TOKEN_KEY).unwrap());
        h.context.logout();
        let after_twice = (h.context.session(), h.storage.get(TOKEN_KEY).unwrap());

        assert_eq!(after_once, (Session::Anonymous, None));
        assert_eq!(after_once, after_twice);
    }

    #[tokio::test]
    async fn country_update_replaces_token_and_user() {
        let h = harness();
        let before = user("alice", Role::Admin, Some(Country::US));
        h.transport.respond(200, auth_body("old-token", &before));
        h.context.login("alice", "pw").await.unwrap();

        let after = user("alice", Role::Admin, Some(Country::UK));
        h.transport.respond(200, auth_body("new-token", &after));
        h.transport.respond(200, json!({ "data": [] }));
        h.context.update_country(Country::UK).await.unwrap();

        assert_eq!(h.context.token().as_deref(), Some("new-token"));
        assert_eq!(h.context.user(), Some(after));
        assert_eq!(h.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("new-token"));

        // The country request itself still carried the old credential.
        let sent = h.transport.requests();
        assert_eq!(sent[1].bearer.as_deref(), Some("old-token"));
        assert_eq!(sent[1].body, Some(json!({ "country": "UK" })));

        let _: serde_json::Value = h.context.client().get("/data").await.unwrap();
        assert_eq!(h.transport.requests()[2].bearer.as_deref(), Some("new-token"));
    }

    #[tokio::test]
    async fn failed_persist_keeps_previous_session() {
        let transport = Arc::new(ScriptedTransport::new());
        let context = SessionContext::init(transport.clone(), Arc::new(FailingStore));
        transport.respond(200, auth_body("tok", &user("alice", Role::Admin, None)));

        let err = context.login("alice", "pw").await.unwrap_err();
        assert_eq!(err, SessionError::Unexpected);
        assert_eq!(context.session(), Session::Anonymous);

        // Logout still succeeds in memory.
        context.logout();
        assert_eq!(context.session(), Session::Anonymous);
    }

    #[tokio::test]
    async fn init_restores_persisted_session() {
        let storage = Arc::new(MemoryStore::new());
        let bob = user("bob", Role::Viewer, Some(Country::AU));
        SessionStore::new(storage.clone())
            .save(&Session::authenticated("persisted", bob.clone()))
            .unwrap();

        let context = SessionContext::init(Arc::new(ScriptedTransport::new()), storage);
        assert_eq!(context.session(), Session::authenticated("persisted", bob));
    }

    #[tokio::test]
    async fn logout_during_pending_login_loses_to_the_later_completion() {
        let h = harness();
        h.transport.set_delay(Duration::from_millis(50));
        h.transport.respond(200, auth_body("late", &user("alice", Role::Admin, None)));

        let ctx = h.context.clone();
        let pending = tokio::spawn(async move { ctx.login("alice", "pw").await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.context.logout();
        pending.await.unwrap().unwrap();

        // Last write wins: the login completed after the logout.
        assert_eq!(h.context.token().as_deref(), Some("late"));
        assert!(h.context.session().user().is_some());
    }

    #[tokio::test]
    async fn abandoned_login_leaves_session_untouched() {
        let h = harness();
        h.transport.set_delay(Duration::from_millis(200));
        h.transport.respond(200, auth_body("tok", &user("alice", Role::Admin, None)));

        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), h.context.login("alice", "pw")).await;
        assert!(abandoned.is_err());
        assert_eq!(h.context.session(), Session::Anonymous);
        assert_eq!(h.storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(h.storage.get(USER_KEY).unwrap(), None);
    }
}
