//! HTTP transport seam
//!
//! The core builds `HttpRequest` values and hands them to an `HttpClient`.
//! The browser implementation lives in the frontend crate; tests use
//! `MockHttpClient` or, for the multipart wire format, reqwest against a
//! local socket.
//!
//! Timeouts are raced against a `Sleeper` so the same code runs under
//! `gloo-timers` in the browser and tokio's paused clock in tests.

use crate::error::{ClientError, ClientResult};
use futures::future::Either;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::pin;
use std::time::Duration;

pub use futures::future::LocalBoxFuture;
pub use medscore_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

// =========================================================
// HTTP interface abstraction
// =========================================================

/// A document picked by the user, held in memory until upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let content_type = content_type.into();
        Self {
            name: name.into(),
            content_type: if content_type.is_empty() {
                "application/octet-stream".to_string()
            } else {
                content_type
            },
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartField {
    pub name: String,
    pub file: DocumentFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HttpBody {
    #[default]
    Empty,
    Json(String),
    Multipart(Vec<MultipartField>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: HttpBody,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: HttpBody::Empty,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_json<T: serde::Serialize>(mut self, body: &T) -> ClientResult<Self> {
        self.body = HttpBody::Json(serde_json::to_string(body)?);
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        Ok(self)
    }

    /// The multipart boundary header is left to the transport.
    pub fn with_multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = HttpBody::Multipart(fields);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_str(&self.body).map_err(ClientError::from)
    }
}

/// HTTP client trait.
/// `?Send` because browser futures hold JS values.
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;
}

// =========================================================
// Timeouts
// =========================================================

/// Timer source, so the core stays runtime-agnostic.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Races `fut` against `limit`; the loser is dropped.
pub async fn with_timeout<S, F, T>(
    sleeper: &S,
    limit: Duration,
    operation: &str,
    fut: F,
) -> ClientResult<T>
where
    S: Sleeper + ?Sized,
    F: Future<Output = ClientResult<T>>,
{
    let fut = pin!(fut);
    match futures::future::select(fut, sleeper.sleep(limit)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(ClientError::timeout(format!(
            "{} got no response within {}s",
            operation,
            limit.as_secs()
        ))),
    }
}

// =========================================================
// Test tools
// =========================================================

#[cfg(test)]
#[derive(Debug, Clone)]
pub enum MockReply {
    Status(u16, String),
    /// Transport failure before any response.
    Fail,
    /// Never settles.
    Hang,
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: HttpBody,
}

#[cfg(test)]
impl RecordedRequest {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
pub struct MockHttpClient {
    responses: RefCell<HashMap<String, MockReply>>,
    pub requests: RefCell<Vec<RecordedRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.mock_reply(url, MockReply::Status(status, body.to_string()));
    }

    pub fn mock_reply(&self, url: &str, reply: MockReply) {
        self.responses.borrow_mut().insert(url.to_string(), reply);
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: req.url.clone(),
            method: req.method,
            headers: req.headers.clone(),
            body: req.body.clone(),
        });

        let reply = self.responses.borrow().get(&req.url).cloned();
        match reply {
            Some(MockReply::Status(status, body)) => Ok(HttpResponse { status, body }),
            Some(MockReply::Fail) => Err(ClientError::network("connection refused")),
            Some(MockReply::Hang) => futures::future::pending().await,
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
pub struct TokioSleeper;

#[cfg(test)]
impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

#[cfg(test)]
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(test)]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }

        builder = match req.body {
            HttpBody::Empty => builder,
            HttpBody::Json(body) => builder.body(body),
            HttpBody::Multipart(fields) => {
                let mut form = reqwest::multipart::Form::new();
                for field in fields {
                    let part = reqwest::multipart::Part::bytes(field.file.bytes)
                        .file_name(field.file.name)
                        .mime_str(&field.file.content_type)
                        .map_err(|e| ClientError::network(format!("Reqwest Part Error: {}", e)))?;
                    form = form.part(field.name, part);
                }
                builder.multipart(form)
            }
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| ClientError::network(format!("Reqwest Error: {}", e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::network(format!("Reqwest Body Error: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
