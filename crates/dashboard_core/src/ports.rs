//! crates/dashboard_core/src/ports.rs
//!
//! Defines the service contracts (traits) the client core depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! session and dashboard logic independent of a concrete HTTP library,
//! storage medium or user-interaction surface.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// The server answered with a non-2xx status.
    #[error("Request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },
    /// The request never produced a response (connection refused, DNS, TLS...).
    #[error("Transport failure: {0}")]
    Transport(String),
    /// The request body could not be serialized; nothing was sent.
    #[error("Unserializable request body: {0}")]
    Encode(String),
    /// A response arrived but its body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
    /// The durable key-value storage could not be read or written.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl PortError {
    /// The message the server supplied with a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            PortError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// HTTP Transport
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// A single outbound API call. `path` is relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// The raw outcome of an API call; `body` is `None` when the response was
/// empty or not JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs the request. Non-2xx statuses are returned as responses,
    /// not errors; only a failure to get any response is an `Err`.
    async fn execute(&self, request: ApiRequest) -> PortResult<ApiResponse>;
}

//=========================================================================================
// Durable Key-Value Storage
//=========================================================================================

/// Persistent string storage that survives process restarts.
///
/// Batch operations are all-or-nothing: either every entry is written (or
/// removed) or the storage is left as it was.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    fn set_entries(&self, entries: &[(&str, &str)]) -> PortResult<()>;

    fn remove_entries(&self, keys: &[&str]) -> PortResult<()>;
}

//=========================================================================================
// User Interaction
//=========================================================================================

/// Blocking dialogs shown to the user.
pub trait Prompt: Send + Sync {
    /// Asks a yes/no question. `false` means the user declined.
    fn confirm(&self, message: &str) -> bool;

    /// Shows a message the user must acknowledge.
    fn alert(&self, message: &str);
}
