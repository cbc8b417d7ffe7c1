//! Mock implementations for testing.
//!
//! Provides a scripted transport and a recording log sink so retry behaviour
//! can be exercised without real API calls or real waiting.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::observability::RetryLogger;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

impl RecordedRequest {
    /// Returns the body as text.
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Body GitHub sends with a rate limited response.
    pub const RATE_LIMIT_BODY: &'static str = r#"{"message":"API rate limit exceeded","documentation_url":"https://docs.github.com/rest/overview/resources-in-the-rest-api#rate-limiting"}"#;

    /// Creates a response with the given status and raw body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Creates a 201 Created response, as returned for a new status.
    pub fn created() -> Self {
        Self::new(201, r#"{"state":"success"}"#).with_header("content-type", "application/json")
    }

    /// Creates an error response carrying a GitHub style message.
    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({
            "message": message,
            "documentation_url": "https://docs.github.com/rest"
        });
        Self::new(status, body.to_string()).with_header("content-type", "application/json")
    }

    /// Creates a primary rate limit response.
    pub fn primary_rate_limited(retry_after_secs: u64) -> Self {
        Self::new(429, Self::RATE_LIMIT_BODY)
            .with_header("x-ratelimit-limit", "5000")
            .with_header("x-ratelimit-remaining", "0")
            .with_header("retry-after", &retry_after_secs.to_string())
    }

    /// Creates a secondary rate limit response.
    pub fn secondary_rate_limited(retry_after_secs: u64) -> Self {
        Self::new(429, Self::RATE_LIMIT_BODY).with_header("retry-after", &retry_after_secs.to_string())
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

enum Scripted {
    Response(MockResponse),
    Failure(String),
}

/// Mock HTTP transport for testing.
///
/// Responses are served in the order they were queued; once the queue is
/// empty the default response is served.
pub struct MockTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted::Response(response));
    }

    /// Queues a connection failure.
    pub fn queue_failure(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(message.to_string()));
    }

    /// Sets the default response.
    pub fn set_default(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next_response(&self) -> Scripted {
        if let Some(scripted) = self.responses.lock().unwrap().pop_front() {
            return scripted;
        }

        Scripted::Response(
            self.default_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| MockResponse::error(500, "No mock response configured")),
        )
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            path: request.path,
            body: request.body,
            headers: request.headers,
        });

        match self.next_response() {
            Scripted::Response(response) => Ok(HttpResponse {
                status: response.status,
                headers: response.headers,
                body: response.body,
            }),
            Scripted::Failure(message) => Err(TransportError::Connection { message }),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Log level of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Informational.
    Info,
    /// Warning.
    Warn,
}

/// [`RetryLogger`] that records every message in order.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogger {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages, in order.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().unwrap().clone()
    }

    /// Recorded info messages.
    pub fn infos(&self) -> Vec<String> {
        self.at_level(LogLevel::Info)
    }

    /// Recorded warnings.
    pub fn warnings(&self) -> Vec<String> {
        self.at_level(LogLevel::Warn)
    }

    fn at_level(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn record(&self, level: LogLevel, message: &str) {
        self.entries.lock().unwrap().push((level, message.to_string()));
    }
}

impl RetryLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(LogLevel::Warn, message);
    }
}
