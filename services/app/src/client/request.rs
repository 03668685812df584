//! services/app/src/client/request.rs
//!
//! The request client every view goes through. It attaches the current
//! session token as a bearer credential and turns non-2xx responses into
//! `PortError::Rejected`, carrying the server's message when there is one.

use crate::client::session::SessionHandle;
use dashboard_core::ports::{ApiRequest, ApiResponse, HttpTransport, Method, PortError, PortResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct RequestClient {
    transport: Arc<dyn HttpTransport>,
    session: SessionHandle,
}

impl RequestClient {
    pub fn new(transport: Arc<dyn HttpTransport>, session: SessionHandle) -> Self {
        Self { transport, session }
    }

    /// Sends one request and returns the raw response if its status is 2xx.
    pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> PortResult<ApiResponse> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            bearer: self.session.token(),
            body,
        };
        debug!(%method, path, authenticated = request.bearer.is_some(), "sending request");

        let response = self.transport.execute(request).await?;
        if response.is_success() {
            return Ok(response);
        }
        Err(PortError::Rejected {
            status: response.status,
            message: server_message(response.body.as_ref()),
        })
    }

    /// Like `send`, with a typed body.
    pub async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> PortResult<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(|e| PortError::Encode(e.to_string()))?;
        self.send(method, path, Some(body)).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> PortResult<T> {
        decode(self.send(Method::Get, path, None).await?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> PortResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.send_json(Method::Post, path, body).await?)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> PortResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.send_json(Method::Put, path, body).await?)
    }

    pub async fn delete(&self, path: &str) -> PortResult<()> {
        self.send(Method::Delete, path, None).await.map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(response: ApiResponse) -> PortResult<T> {
    serde_json::from_value(response.body.unwrap_or(Value::Null))
        .map_err(|e| PortError::Decode(e.to_string()))
}

/// Pulls a human readable message out of an error body.
fn server_message(body: Option<&Value>) -> Option<String> {
    let body = body?;
    ["error", "message"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}
