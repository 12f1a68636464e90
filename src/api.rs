//! Typed backend client
//!
//! One method per endpoint. Each call picks its timeout, attaches the
//! bearer token where the endpoint needs one, and decodes into the
//! endpoint's `ApiRequest::Response`:
//! - data endpoints answer `{success, message, result}`; `result` is the
//!   payload
//! - sign-in and sign-up answer with top-level fields
//!
//! Non-2xx answers become a `ClientError` whose category follows the HTTP
//! status and whose message is the backend's own, when it sent one.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientErrorStatus, ClientResult};
use crate::request::{
    DocumentFile, HttpClient, HttpRequest, HttpResponse, MultipartField, Sleeper, with_timeout,
};
use medscore_shared::protocol::{
    ApiRequest, ProfileRequest, ReportHistoryRequest, ReportRequest, RunAgentRequest,
};
use medscore_shared::{
    ApiEnvelope, ClassificationResult, FIELD_CREDENTIAL, FIELD_RESUME, HEADER_AUTHORIZATION,
    ReportDetail, ReportSummary, SigninRequest, SigninResponse, SignupRequest, SignupResponse,
    UserProfile,
};
use std::rc::Rc;
use std::time::Duration;

/// Typed client for the classification/credibility backend.
///
/// Generic over the transport so the browser uses `fetch` while tests use
/// a recording mock.
pub struct MedScoreApi<C> {
    base_url: String,
    client: C,
    sleeper: Rc<dyn Sleeper>,
    fetch_timeout: Duration,
    submit_timeout: Duration,
}

impl<C: HttpClient> MedScoreApi<C> {
    pub fn new(config: &ClientConfig, client: C, sleeper: Rc<dyn Sleeper>) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
            sleeper,
            fetch_timeout: config.fetch_timeout,
            submit_timeout: config.submit_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request<R: ApiRequest>(&self, req: &R) -> HttpRequest {
        HttpRequest::new(&self.url(&req.path()), R::METHOD)
    }

    // An absent token still produces the header; the backend answers 401.
    fn authorized<R: ApiRequest>(&self, req: &R, token: &str) -> HttpRequest {
        self.request(req)
            .with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token))
    }

    async fn execute(
        &self,
        http: HttpRequest,
        limit: Duration,
        operation: &str,
    ) -> ClientResult<HttpResponse> {
        with_timeout(self.sleeper.as_ref(), limit, operation, self.client.send(http))
            .await
            .map_err(|e| e.in_op(operation.to_string()))
    }

    /// Current user's profile.
    pub async fn profile(&self, token: &str) -> ClientResult<UserProfile> {
        let http = self.authorized(&ProfileRequest, token);
        let resp = self.execute(http, self.fetch_timeout, "api.profile").await?;
        decode_envelope::<ProfileRequest>(resp).map_err(|e| e.in_op("api.profile"))
    }

    /// Report history, in backend order.
    pub async fn report_history(&self, token: &str) -> ClientResult<Vec<ReportSummary>> {
        let http = self.authorized(&ReportHistoryRequest, token);
        let resp = self
            .execute(http, self.fetch_timeout, "api.report_history")
            .await?;
        decode_envelope::<ReportHistoryRequest>(resp).map_err(|e| e.in_op("api.report_history"))
    }

    /// Uploads both documents under the fixed field names.
    pub async fn run_agent(
        &self,
        token: &str,
        resume: &DocumentFile,
        credential: &DocumentFile,
    ) -> ClientResult<ClassificationResult> {
        let http = self
            .authorized(&RunAgentRequest, token)
            .with_multipart(vec![
                MultipartField {
                    name: FIELD_RESUME.to_string(),
                    file: resume.clone(),
                },
                MultipartField {
                    name: FIELD_CREDENTIAL.to_string(),
                    file: credential.clone(),
                },
            ]);
        let resp = self
            .execute(http, self.submit_timeout, "api.run_agent")
            .await?;
        decode_envelope::<RunAgentRequest>(resp).map_err(|e| e.in_op("api.run_agent"))
    }

    pub async fn report(&self, token: &str, report_id: &str) -> ClientResult<ReportDetail> {
        let req = ReportRequest {
            report_id: report_id.to_string(),
        };
        let http = self.authorized(&req, token);
        let resp = self
            .execute(http, self.fetch_timeout, "api.report")
            .await
            .map_err(|e| e.in_op_with("api.report", report_id))?;
        let record = decode_envelope::<ReportRequest>(resp)
            .map_err(|e| e.in_op_with("api.report", report_id))?;
        Ok(ReportDetail::from_record(report_id, record))
    }

    pub async fn signin(&self, req: &SigninRequest) -> ClientResult<SigninResponse> {
        let http = self.request(req).with_json(req)?;
        let resp = self.execute(http, self.fetch_timeout, "api.signin").await?;
        let body = decode_plain::<SigninRequest>(resp).map_err(|e| e.in_op("api.signin"))?;
        if !body.success {
            return Err(rejected(body.message, "Sign in failed").in_op("api.signin"));
        }
        Ok(body)
    }

    pub async fn signup(&self, req: &SignupRequest) -> ClientResult<SignupResponse> {
        let http = self.request(req).with_json(req)?;
        let resp = self.execute(http, self.fetch_timeout, "api.signup").await?;
        let body = decode_plain::<SignupRequest>(resp).map_err(|e| e.in_op("api.signup"))?;
        if !body.success {
            return Err(rejected(body.message, "Sign up failed").in_op("api.signup"));
        }
        Ok(body)
    }
}

// =========================================================
// Decoding
// =========================================================

fn rejected(message: Option<String>, fallback: &str) -> ClientError {
    ClientError::rejected(message.unwrap_or_else(|| fallback.to_string()))
}

/// Human-readable text of an error body.
///
/// `message` wins over `detail`. FastAPI validation errors (422) carry
/// `detail` as a list of `{loc, msg, type}`; the first `msg` is used.
fn error_message(body: &serde_json::Value) -> Option<String> {
    if let Some(message) = body.get("message").and_then(|m| m.as_str()) {
        return Some(message.to_string());
    }
    match body.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|m| m.as_str())
            .map(str::to_string),
        _ => None,
    }
}

fn http_error(resp: &HttpResponse) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(&resp.body)
        .ok()
        .and_then(|v| error_message(&v))
        .unwrap_or_else(|| format!("HTTP {}", resp.status));
    ClientError::new(ClientErrorStatus::from_http_status(resp.status), message)
}

fn decode_envelope<R: ApiRequest>(resp: HttpResponse) -> ClientResult<R::Response> {
    if !resp.is_success() {
        return Err(http_error(&resp));
    }
    let envelope: ApiEnvelope<R::Response> = resp.json()?;
    if !envelope.success {
        return Err(rejected(envelope.message, "request was not successful"));
    }
    envelope
        .result
        .ok_or_else(|| ClientError::rejected("response carried no result"))
}

fn decode_plain<R: ApiRequest>(resp: HttpResponse) -> ClientResult<R::Response> {
    if !resp.is_success() {
        return Err(http_error(&resp));
    }
    resp.json()
}
