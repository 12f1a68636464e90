//! Wire and domain models shared by the MedScore client core and the
//! browser frontend.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod date;
pub mod protocol;

pub use date::Timestamp;

// =========================================================
// Constants
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const FIELD_RESUME: &str = "resume";
pub const FIELD_CREDENTIAL: &str = "credential";
pub const SCORE_MAX: u8 = 100;

// =========================================================
// Session
// =========================================================

/// Client-held authentication state.
///
/// `is_authenticated == false` is expected to come with empty identity
/// fields; the store never fills identity without also authenticating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_identity(&self) -> bool {
        !(self.user_id.is_empty() && self.name.is_empty() && self.email.is_empty())
    }

    /// Merges the provided fields; absent fields are left untouched.
    pub fn merge(&mut self, patch: SessionPatch) {
        if let Some(v) = patch.is_authenticated {
            self.is_authenticated = v;
        }
        if let Some(v) = patch.user_id {
            self.user_id = v;
        }
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
    }
}

/// Partial session update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub is_authenticated: Option<bool>,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl SessionPatch {
    /// Patch that marks the session authenticated as the given user.
    pub fn authenticated(profile: &UserProfile) -> Self {
        Self {
            is_authenticated: Some(true),
            user_id: Some(profile.id.clone()),
            name: Some(profile.name.clone()),
            email: Some(profile.email.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id", alias = "user_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

// =========================================================
// Classification & credibility
// =========================================================

/// Tri-state credibility indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Red,
    Yellow,
    Green,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Red => "red",
            Flag::Yellow => "yellow",
            Flag::Green => "green",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "red" => Some(Flag::Red),
            "yellow" => Some(Flag::Yellow),
            "green" => Some(Flag::Green),
            _ => None,
        }
    }

    /// Upper-case label used by the result views.
    pub fn label(&self) -> &'static str {
        match self {
            Flag::Red => "RED",
            Flag::Yellow => "YELLOW",
            Flag::Green => "GREEN",
        }
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Flag::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown credibility flag: {}", raw)))
    }
}

/// Backend scores arrive as JSON numbers (integer or float); they are
/// rounded and clamped into `0..=100`.
fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Err(serde::de::Error::custom("credibility score is NaN"));
    }
    Ok(raw.round().clamp(0.0, SCORE_MAX as f64) as u8)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredibilityResult {
    #[serde(rename = "credibility_score", deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub flag: Option<Flag>,
    #[serde(default)]
    pub discrepancies: Vec<String>,
}

/// Result of one successful `/run-agent` submission.
///
/// The backend spells the credibility key `credebility_result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "classifier_result")]
    pub classifier_label: String,
    #[serde(rename = "credebility_result")]
    pub credibility: CredibilityResult,
}

// =========================================================
// Reports
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportStatus {
    Pending,
    Completed,
    Failed,
    #[default]
    Unknown,
}

impl ReportStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => ReportStatus::Pending,
            "completed" => ReportStatus::Completed,
            "failed" => ReportStatus::Failed,
            _ => ReportStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Completed => "completed",
            ReportStatus::Failed => "failed",
            ReportStatus::Unknown => "unknown",
        }
    }
}

impl Serialize for ReportStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(ReportStatus::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub report_id: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub status: ReportStatus,
}

/// Body of `GET /report/{id}`: the stored result plus its creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub created_at: Timestamp,
    pub result: ClassificationResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDetail {
    pub report_id: String,
    pub created_at: Timestamp,
    pub classifier_label: String,
    pub credibility: CredibilityResult,
}

impl ReportDetail {
    pub fn from_record(report_id: impl Into<String>, record: ReportRecord) -> Self {
        Self {
            report_id: report_id.into(),
            created_at: record.created_at,
            classifier_label: record.result.classifier_label,
            credibility: record.result.credibility,
        }
    }
}

// =========================================================
// Authentication payloads
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tokens: Option<AuthTokens>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub navigate: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

// =========================================================
// Envelope
// =========================================================

/// Standard `{success, message, result}` response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "none")]
    pub result: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classification_result_reads_backend_spelling() {
        let raw = json!({
            "classifier_result": "high_risk",
            "credebility_result": {
                "credibility_score": 42,
                "summary": "...",
                "flag": "yellow",
                "discrepancies": ["x"]
            }
        });
        let result: ClassificationResult = serde_json::from_value(raw).unwrap();
        assert_eq!(result.classifier_label, "high_risk");
        assert_eq!(result.credibility.score, 42);
        assert_eq!(result.credibility.flag, Some(Flag::Yellow));
        assert_eq!(result.credibility.discrepancies, vec!["x".to_string()]);
    }

    #[test]
    fn score_is_rounded_and_clamped() {
        let raw = json!({ "credibility_score": 142.7 });
        let c: CredibilityResult = serde_json::from_value(raw).unwrap();
        assert_eq!(c.score, 100);

        let raw = json!({ "credibility_score": 41.6, "flag": "Green" });
        let c: CredibilityResult = serde_json::from_value(raw).unwrap();
        assert_eq!(c.score, 42);
        assert_eq!(c.flag, Some(Flag::Green));
        assert!(c.discrepancies.is_empty());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let raw = json!({ "credibility_score": 1, "flag": "purple" });
        assert!(serde_json::from_value::<CredibilityResult>(raw).is_err());
    }

    #[test]
    fn report_status_falls_back_to_unknown() {
        let raw = json!([
            { "report_id": "a", "created_at": "2025-05-01T12:00:00", "status": "completed" },
            { "report_id": "b", "created_at": "2025-05-01T12:00:00", "status": "processing" },
            { "report_id": "c", "created_at": "2025-05-01T12:00:00" }
        ]);
        let list: Vec<ReportSummary> = serde_json::from_value(raw).unwrap();
        assert_eq!(list[0].status, ReportStatus::Completed);
        assert_eq!(list[1].status, ReportStatus::Unknown);
        assert_eq!(list[2].status, ReportStatus::Unknown);
    }

    #[test]
    fn session_merge_only_touches_given_fields() {
        let mut session = Session {
            is_authenticated: true,
            user_id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };
        session.merge(SessionPatch {
            name: Some("Ada L.".into()),
            ..Default::default()
        });
        assert!(session.is_authenticated);
        assert_eq!(session.name, "Ada L.");
        assert_eq!(session.email, "ada@example.com");
    }

    #[test]
    fn session_uses_camel_case_layout() {
        let session = Session {
            is_authenticated: true,
            user_id: "u1".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["isAuthenticated"], json!(true));
        assert_eq!(value["userId"], json!("u1"));
    }

    #[test]
    fn profile_accepts_mongo_id() {
        let p: UserProfile =
            serde_json::from_value(json!({ "_id": "abc", "name": "N", "email": "e" })).unwrap();
        assert_eq!(p.id, "abc");
    }
}
