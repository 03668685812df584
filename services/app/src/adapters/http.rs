//! services/app/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, the concrete implementation of the
//! `HttpTransport` port from the `core` crate. It performs the actual network
//! calls with `reqwest`.

use async_trait::async_trait;
use dashboard_core::ports::{ApiRequest, ApiResponse, HttpTransport, Method, PortError, PortResult};
use std::time::Duration;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `HttpTransport` port on top of `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a new `ReqwestTransport` rooted at `base_url`.
    ///
    /// Without a `timeout` the request waits as long as reqwest's default allows.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

//=========================================================================================
// `HttpTransport` Trait Implementation
//=========================================================================================

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> PortResult<ApiResponse> {
        let url = self.url(&request.path);
        let mut builder = self.client.request(to_reqwest(request.method), &url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        debug!(method = %request.method, %url, status, "response received");

        // Error pages are often HTML; only JSON bodies are of interest.
        let body = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };
        Ok(ApiResponse { status, body })
    }
}
