//! Test doubles shared by the unit tests of this crate.

use async_trait::async_trait;
use dashboard_core::domain::{Country, Role, User};
use dashboard_core::ports::{
    ApiRequest, ApiResponse, HttpTransport, KeyValueStore, PortError, PortResult, Prompt,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub fn user(username: &str, role: Role, country: Option<Country>) -> User {
    User {
        id: format!("id-{}", username),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        country,
        role,
        extra: Default::default(),
    }
}

pub fn auth_body(token: &str, user: &User) -> Value {
    json!({ "token": token, "user": user })
}

pub fn item_json(id: &str, name: &str, creator: Option<&str>) -> Value {
    json!({
        "_id": id,
        "name": name,
        "createdBy": creator.map(|username| json!({ "username": username })),
        "createdAt": "2024-05-01T12:00:00Z"
    })
}

//=========================================================================================
// ScriptedTransport
//=========================================================================================

/// Answers requests from a queue and records everything it was asked.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<PortResult<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.push(Ok(ApiResponse { status, body: Some(body) }));
    }

    pub fn respond_empty(&self, status: u16) {
        self.push(Ok(ApiResponse { status, body: None }));
    }

    pub fn fail(&self, err: PortError) {
        self.push(Err(err));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, response: PortResult<ApiResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> PortResult<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PortError::Transport("no scripted response".into())))
    }
}

//=========================================================================================
// FailingStore
//=========================================================================================

/// Storage whose every operation fails, as with a full or locked disk.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> PortResult<Option<String>> {
        Err(PortError::Storage("unavailable".into()))
    }

    fn set_entries(&self, _entries: &[(&str, &str)]) -> PortResult<()> {
        Err(PortError::Storage("quota exceeded".into()))
    }

    fn remove_entries(&self, _keys: &[&str]) -> PortResult<()> {
        Err(PortError::Storage("unavailable".into()))
    }
}

//=========================================================================================
// RecordingPrompt
//=========================================================================================

/// Gives a fixed answer to confirmations and keeps every dialog shown.
pub struct RecordingPrompt {
    answer: bool,
    pub confirms: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            confirms: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }
}

impl Prompt for RecordingPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.answer
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
