//! In-memory [`Fetcher`] for tests. Enabled by the `testing` feature.

use crate::client::Fetcher;
use crate::error::{EodError, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// A canned response served by [`CannedFetcher`].
#[derive(Debug, Clone)]
pub enum CannedResponse {
    Body(String),
    Status(u16),
}

/// In-memory fetcher that serves fixed bodies and records every request.
///
/// Requests are keyed by [`request_key`]. Unknown keys answer HTTP 404.
#[derive(Debug, Default)]
pub struct CannedFetcher {
    responses: HashMap<String, CannedResponse>,
    requests: Mutex<Vec<String>>,
}

impl CannedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, key: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .insert(key.into(), CannedResponse::Body(body.into()));
        self
    }

    pub fn with_status(mut self, key: impl Into<String>, status: u16) -> Self {
        self.responses
            .insert(key.into(), CannedResponse::Status(status));
        self
    }

    /// Request keys in the order they were fetched.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Fetcher for CannedFetcher {
    fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let key = request_key(path, params);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(key.clone());
        }

        match self.responses.get(&key) {
            Some(CannedResponse::Body(body)) => Ok(body.clone()),
            Some(CannedResponse::Status(status)) => Err(EodError::Status {
                status: *status,
                path: path.to_string(),
            }),
            None => Err(EodError::Status {
                status: 404,
                path: path.to_string(),
            }),
        }
    }
}

/// `path` or `path?k=v&k=v`, unencoded. Used to key canned responses.
pub fn request_key(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{path}?{}", query.join("&"))
}
