//! Transport collaborator contract.
//!
//! The runtime never performs network I/O itself; handlers that call out
//! do so through this trait. Failures must arrive in the categorized shape
//! below so error-to-action conversion has a stable payload to carry.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Categorized transport failure.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// None when the request never reached a server.
    pub status_code: Option<u16>,
    pub request_url: String,
    pub response_body: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, request_url: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            request_url: request_url.into(),
            response_body: None,
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.response_body = Some(body);
        self
    }
}

/// Network layer the effect handlers call out through.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request. `path_template` uses `:name` segments filled from
    /// `path_params` (see [`fill_path`]).
    async fn call(
        &self,
        method: &str,
        path_template: &str,
        path_params: &HashMap<String, String>,
        body: Value,
    ) -> Result<Value, ApiError>;
}

/// Substitute `:name` segments in a path template.
/// Unmatched segments are left as-is.
pub fn fill_path(pattern: &str, params: &HashMap<String, String>) -> String {
    let mut path = pattern.to_string();
    for (name, value) in params {
        path = path.replace(&format!(":{name}"), value);
    }
    path
}
