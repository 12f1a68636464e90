use crate::{
    ClassificationResult, ReportRecord, ReportSummary, SigninRequest, SigninResponse,
    SignupRequest, SignupResponse, UserProfile,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type carried by this endpoint.
    type Response: DeserializeOwned;
    /// The URL path (or its prefix for parameterized paths).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// Concrete request path.
    fn path(&self) -> String {
        Self::PATH.to_string()
    }
}

// =========================================================
// Request Definitions
// =========================================================

/// Current user's profile, used to validate a persisted session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = UserProfile;
    const PATH: &'static str = "/profile";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Prior reports of the signed-in user, most recent first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportHistoryRequest;

impl ApiRequest for ReportHistoryRequest {
    type Response = Vec<ReportSummary>;
    const PATH: &'static str = "/report-history-list";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Multipart upload of the resume and credential documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunAgentRequest;

impl ApiRequest for RunAgentRequest {
    type Response = ClassificationResult;
    const PATH: &'static str = "/run-agent";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// A single stored report.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub report_id: String,
}

impl ApiRequest for ReportRequest {
    type Response = ReportRecord;
    const PATH: &'static str = "/report";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, encode_path_segment(&self.report_id))
    }
}

// Sign-in and sign-up answer with top-level fields instead of the
// `{success, result}` envelope.
impl ApiRequest for SigninRequest {
    type Response = SigninResponse;
    const PATH: &'static str = "/signin";
    const METHOD: HttpMethod = HttpMethod::Post;
}

impl ApiRequest for SignupRequest {
    type Response = SignupResponse;
    const PATH: &'static str = "/signup";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn encode_path_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
