//! HTTP client for the portal's REST API.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use campus_core::error::{Error, HttpError, TransportError};
use campus_core::{ApiUrl, Result, SessionHandle};

/// Timeout applied to every request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Settings fixed when the client is created.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: ApiUrl,
    pub timeout: Duration,
    pub default_headers: HeaderMap,
}

impl ClientConfig {
    /// Ten second timeout and a JSON content type.
    pub fn new(base_url: ApiUrl) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            default_headers,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }
}

/// Per-call additions to the client defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    /// Replaces the configured timeout for this call only.
    pub timeout: Option<Duration>,
}

/// A request relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub options: RequestOptions,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.options.headers.insert(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }
}

/// A successful response. An empty body reads as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Decode the body into `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.body)?)
    }
}

/// The configured HTTP client.
///
/// Each call reads the credential from the session it was created with and,
/// when one is held, sends it as a bearer token. Failure statuses come back
/// as [`Error::Http`]; the client itself never touches the session.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: ClientConfig,
    session: SessionHandle,
}

impl HttpClient {
    pub fn create(config: ClientConfig, session: SessionHandle) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("campus/", env!("CARGO_PKG_VERSION")))
            .default_headers(config.default_headers.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Request {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(Request::new(Method::GET, path)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.send(Request::new(Method::POST, path).body(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse> {
        self.send(Request::new(Method::POST, path)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.send(Request::new(Method::PUT, path).body(body)).await
    }

    pub async fn put_empty(&self, path: &str) -> Result<ApiResponse> {
        self.send(Request::new(Method::PUT, path)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(Request::new(Method::DELETE, path)).await
    }

    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: Request) -> Result<ApiResponse> {
        let url = self.config.base_url.endpoint(&request.path);
        let timeout = request.options.timeout.unwrap_or(self.config.timeout);

        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(request.options.headers)
            .timeout(timeout);
        match self.session.credential() {
            Some(token) => builder = builder.bearer_auth(token.as_str()),
            None => trace!("No credential held, sending unauthenticated"),
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(%url, "Sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        self.handle_response(response, timeout).await
    }

    async fn handle_response(&self, response: reqwest::Response, timeout: Duration) -> Result<ApiResponse> {
        let status = response.status();
        trace!(status = %status, "Response");

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout))?;
        let body = parse_body(&bytes);

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            let err = HttpError::new(status.as_u16(), body);
            if status == StatusCode::UNAUTHORIZED {
                debug!("Server rejected credential");
            } else {
                warn!(error = %err, "Request failed");
            }
            Err(err.into())
        }
    }
}

/// JSON when it parses, a string when it doesn't, `null` when empty.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: timeout.as_millis() as u64,
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Request {
            message: err.to_string(),
        }
    };
    err.into()
}
