//! Scripted transport for tests
//!
//! Responses are queued per (method, path) route so interleaved pollers each
//! consume their own script regardless of tick ordering. Every request is
//! recorded for assertions about call counts and replay fidelity.

use async_trait::async_trait;
use reqwest::Method;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, ApiResponse, Transport};

type Route = (Method, String);

#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<Route, VecDeque<Result<ApiResponse>>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn enqueue(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Ok(ApiResponse { status, body }));
    }

    pub fn enqueue_err(&self, method: Method, path: &str, err: ClientError) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Err(err));
    }

    /// All requests seen so far, in arrival order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// How many requests hit the given route
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(req.clone());

        let scripted = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&(req.method.clone(), req.path.clone()))
            .and_then(|queue| queue.pop_front());

        scripted.unwrap_or_else(|| {
            Err(ClientError::Network(format!(
                "no scripted response for {} {}",
                req.method, req.path
            )))
        })
    }
}
