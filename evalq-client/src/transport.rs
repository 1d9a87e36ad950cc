//! Transport layer
//!
//! A small seam between the client and the wire. [`Transport`] is the trait
//! everything above talks to; [`HttpTransport`] is the reqwest-backed
//! implementation, and [`AuthenticatedTransport`] wraps any transport with
//! the refresh-and-replay protocol for expired sessions.

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Credential refresh endpoint, called by [`AuthenticatedTransport`] only
pub const REFRESH_PATH: &str = "/api/v1/refresh-token";

/// One request to the gateway
///
/// Cheap to clone, so a replay after a session refresh is byte-for-byte the
/// original request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn post_empty(path: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: None,
        }
    }
}

/// Status and decoded JSON body of a gateway response
///
/// Non-2xx responses are data here, not errors: the components above decide
/// what a given status means for their operation.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Transport abstraction over the gateway API
///
/// Trait-based to enable testing with a scripted transport, the same way the
/// repository layer is mocked elsewhere in the workspace.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns its status and body.
    ///
    /// Only transport-level failures are `Err`; any HTTP status comes back
    /// as an `Ok` response.
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse>;
}

/// HTTP implementation of [`Transport`]
///
/// The reqwest client is built with a cookie store: session credentials are
/// ambient, attached by the cookie jar, never constructed by this client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// Create a transport for the given gateway base URL
    ///
    /// # Arguments
    /// * `base_url` - e.g. "http://localhost:8080"
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a transport with a custom reqwest client
    ///
    /// The caller is responsible for enabling a cookie store if the gateway
    /// requires authenticated sessions.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, req.path);

        let mut builder = self.client.request(req.method.clone(), &url);
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        // Empty and non-JSON bodies are fine for some endpoints (e.g. the
        // refresh endpoint); the status alone carries the outcome there.
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);

        debug!(method = %req.method, path = %req.path, status, "gateway response");

        Ok(ApiResponse { status, body })
    }
}

/// Hook invoked when the session is unrecoverably expired
///
/// The browser original redirected to the login page here; the CLI points
/// the user at `evalq login` instead.
pub type SessionExpiredHook = Box<dyn Fn() + Send + Sync>;

/// Transport wrapper implementing refresh-and-replay for expired sessions
///
/// On a 401 it performs exactly one `POST /refresh-token` through the inner
/// transport and, if that succeeds, re-sends the original request once. The
/// refresh call never goes through `self`, so a refresh can never trigger
/// another refresh; a replay that comes back 401 again is returned as-is.
pub struct AuthenticatedTransport {
    inner: Arc<dyn Transport>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl AuthenticatedTransport {
    pub fn new(inner: Arc<dyn Transport>) -> Self {
        Self {
            inner,
            on_session_expired: None,
        }
    }

    /// Register a hook fired once per unrecoverable refresh failure
    pub fn with_session_expired_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Box::new(hook));
        self
    }

    async fn refresh(&self) -> Result<ApiResponse> {
        self.inner.send(ApiRequest::post_empty(REFRESH_PATH)).await
    }
}

#[async_trait]
impl Transport for AuthenticatedTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse> {
        let response = self.inner.send(req.clone()).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        debug!(path = %req.path, "unauthorized, refreshing session");

        match self.refresh().await {
            Ok(refresh) if refresh.is_success() => {
                // One replay of the unchanged request; its outcome is final,
                // even if it is unauthorized again.
                self.inner.send(req).await
            }
            outcome => {
                match outcome {
                    Ok(refresh) => warn!(status = refresh.status, "session refresh rejected"),
                    Err(err) => warn!(%err, "session refresh failed"),
                }
                if let Some(hook) = &self.on_session_expired {
                    hook();
                }
                Err(ClientError::SessionExpired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PATH: &str = "/api/v1/expressions/7";

    #[tokio::test]
    async fn passes_through_non_unauthorized_responses() {
        let mock = MockTransport::new();
        mock.enqueue(Method::GET, PATH, 200, json!({"status": "done"}));

        let transport = AuthenticatedTransport::new(mock.clone());
        let response = transport.send(ApiRequest::get(PATH)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(mock.count(Method::GET, PATH), 1);
        assert_eq!(mock.count(Method::POST, REFRESH_PATH), 0);
    }

    #[tokio::test]
    async fn refresh_success_replays_exactly_once() {
        let mock = MockTransport::new();
        mock.enqueue(Method::GET, PATH, 401, json!({}));
        mock.enqueue(Method::GET, PATH, 200, json!({"status": "done", "result": "6"}));
        mock.enqueue(Method::POST, REFRESH_PATH, 200, json!({}));

        let transport = AuthenticatedTransport::new(mock.clone());
        let response = transport.send(ApiRequest::get(PATH)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body["result"], "6");
        assert_eq!(mock.count(Method::GET, PATH), 2);
        assert_eq!(mock.count(Method::POST, REFRESH_PATH), 1);
    }

    #[tokio::test]
    async fn replay_preserves_the_original_request() {
        let mock = MockTransport::new();
        let body = json!({"expression": "2+2*2"});
        mock.enqueue(Method::POST, "/api/v1/calculate", 401, json!({}));
        mock.enqueue(Method::POST, REFRESH_PATH, 200, json!({}));
        mock.enqueue(Method::POST, "/api/v1/calculate", 201, json!({"id": 7}));

        let transport = AuthenticatedTransport::new(mock.clone());
        transport
            .send(ApiRequest::post("/api/v1/calculate", body.clone()))
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].body, Some(body.clone()));
        assert_eq!(requests[2].path, requests[0].path);
        assert_eq!(requests[2].body, Some(body));
    }

    #[tokio::test]
    async fn refresh_failure_surfaces_session_expired_without_replay() {
        let mock = MockTransport::new();
        mock.enqueue(Method::GET, PATH, 401, json!({}));
        mock.enqueue(Method::POST, REFRESH_PATH, 500, json!({}));

        let fired = Arc::new(AtomicUsize::new(0));
        let hook_fired = fired.clone();
        let transport = AuthenticatedTransport::new(mock.clone())
            .with_session_expired_hook(move || {
                hook_fired.fetch_add(1, Ordering::SeqCst);
            });

        let err = transport.send(ApiRequest::get(PATH)).await.unwrap_err();

        assert!(matches!(err, ClientError::SessionExpired));
        assert_eq!(mock.count(Method::GET, PATH), 1, "no replay may happen");
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_network_failure_also_expires_the_session() {
        let mock = MockTransport::new();
        mock.enqueue(Method::GET, PATH, 401, json!({}));
        mock.enqueue_err(
            Method::POST,
            REFRESH_PATH,
            ClientError::Network("connection refused".into()),
        );

        let transport = AuthenticatedTransport::new(mock.clone());
        let err = transport.send(ApiRequest::get(PATH)).await.unwrap_err();

        assert!(matches!(err, ClientError::SessionExpired));
        assert_eq!(mock.count(Method::GET, PATH), 1);
    }

    #[tokio::test]
    async fn replayed_unauthorized_is_returned_without_second_refresh() {
        let mock = MockTransport::new();
        mock.enqueue(Method::GET, PATH, 401, json!({}));
        mock.enqueue(Method::GET, PATH, 401, json!({}));
        mock.enqueue(Method::POST, REFRESH_PATH, 200, json!({}));

        let transport = AuthenticatedTransport::new(mock.clone());
        let response = transport.send(ApiRequest::get(PATH)).await.unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(mock.count(Method::POST, REFRESH_PATH), 1);
        assert_eq!(mock.count(Method::GET, PATH), 2);
    }

    #[tokio::test]
    async fn network_failure_on_original_request_propagates() {
        let mock = MockTransport::new();
        mock.enqueue_err(Method::GET, PATH, ClientError::Network("timeout".into()));

        let transport = AuthenticatedTransport::new(mock.clone());
        let err = transport.send(ApiRequest::get(PATH)).await.unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
        assert_eq!(mock.count(Method::POST, REFRESH_PATH), 0);
    }

    #[test]
    fn http_transport_trims_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:8080/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080");
    }
}
