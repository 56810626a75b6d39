//! Response Normalization
//!
//! The backend does not pin down its response schemas; the same information
//! may arrive under several field names. Each operation has a fixed list of
//! candidate fields probed in priority order, and the outcome is a [`Reply`]:
//! either the structured field that matched, or the raw payload as text.
//!
//! A candidate matches when its value is "truthy": a non-empty string, a
//! non-zero number, `true`, or a non-empty array/object. Strings are taken
//! verbatim; other values are rendered as compact JSON.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Candidate fields for the login token
pub const TOKEN_FIELDS: &[&str] = &["token", "access_token"];
/// Candidate fields for a prediction label
pub const PREDICTION_FIELDS: &[&str] = &["prediction", "risk", "result"];
/// Candidate fields for a chat answer
pub const CHAT_FIELDS: &[&str] = &["reply", "answer", "response", "content"];
/// Candidate fields for a report summary
pub const SUMMARY_FIELDS: &[&str] = &["summary", "message", "result"];

/// Summary used when an upload response carries none
pub const DEFAULT_REPORT_SUMMARY: &str = "Report analyzed successfully.";

/// Normalized text extracted from a response payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    /// A known field carried the text
    Structured { field: &'static str, text: String },
    /// No known field matched; the whole payload as text
    Raw { text: String },
}

impl Reply {
    /// Probe `fields` in order, falling back to the raw payload
    pub fn probe(payload: &Value, fields: &[&'static str]) -> Self {
        if let Some((field, text)) = probe_field(payload, fields) {
            return Reply::Structured { field, text };
        }

        let text = match payload {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Reply::Raw { text }
    }

    pub fn text(&self) -> &str {
        match self {
            Reply::Structured { text, .. } | Reply::Raw { text } => text,
        }
    }

    /// Field that matched, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Reply::Structured { field, .. } => Some(field),
            Reply::Raw { .. } => None,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Reply::Structured { .. })
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// First truthy candidate field of an object payload
pub fn probe_field(payload: &Value, fields: &[&'static str]) -> Option<(&'static str, String)> {
    let object = payload.as_object()?;
    fields
        .iter()
        .find_map(|&field| object.get(field).and_then(truthy_text).map(|text| (field, text)))
}

/// Text of a value that counts as present; falsy values yield `None`
pub(crate) fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

// ============================================
// Login
// ============================================

/// Token extracted from a login response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginReply {
    token: Option<String>,
}

impl LoginReply {
    pub fn from_value(payload: &Value) -> Self {
        Self {
            token: probe_field(payload, TOKEN_FIELDS).map(|(_, token)| token),
        }
    }

    /// `token` if present, else `access_token`
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

// ============================================
// Prediction
// ============================================

/// Risk band derived from a prediction label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Classify a free-form label; anything not high or moderate is low
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("high") {
            RiskLevel::High
        } else if lower.contains("moderate") || lower.contains("medium") {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    /// Display color as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "#10B981",
            RiskLevel::Moderate => "#F59E0B",
            RiskLevel::High => "#DC2626",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Moderate => write!(f, "moderate"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Normalized prediction result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub display: Reply,
    pub risk: RiskLevel,
}

impl Prediction {
    pub fn from_value(payload: &Value) -> Self {
        let display = Reply::probe(payload, PREDICTION_FIELDS);
        let risk = RiskLevel::from_label(display.text());
        Self { display, risk }
    }
}

// ============================================
// Chat
// ============================================

/// Normalized assistant answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub reply: Reply,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
}

impl ChatReply {
    pub fn from_value(payload: &Value) -> Self {
        let disclaimer = payload
            .get("disclaimer")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            reply: Reply::probe(payload, CHAT_FIELDS),
            disclaimer,
        }
    }

    pub fn text(&self) -> &str {
        self.reply.text()
    }
}

// ============================================
// Report upload
// ============================================

/// Normalized report analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportAnalysis {
    pub summary: String,
    /// Field the summary came from; `None` when the default was used
    #[serde(skip)]
    pub summary_field: Option<&'static str>,
    pub abnormal_markers: Vec<String>,
}

impl ReportAnalysis {
    pub fn from_value(payload: &Value) -> Self {
        let (summary_field, summary) = match probe_field(payload, SUMMARY_FIELDS) {
            Some((field, text)) => (Some(field), text),
            None => (None, DEFAULT_REPORT_SUMMARY.to_string()),
        };

        let abnormal_markers = payload
            .get("abnormalMarkers")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            summary,
            summary_field,
            abnormal_markers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_probe_respects_priority() {
        let payload = json!({"content": "c", "answer": "a", "reply": ""});
        let reply = Reply::probe(&payload, CHAT_FIELDS);
        assert_eq!(
            reply,
            Reply::Structured {
                field: "answer",
                text: "a".to_string()
            }
        );
    }

    #[test]
    fn test_probe_falls_back_to_raw_json() {
        let payload = json!({"unexpected": 1});
        let reply = Reply::probe(&payload, CHAT_FIELDS);
        assert_eq!(
            reply,
            Reply::Raw {
                text: r#"{"unexpected":1}"#.to_string()
            }
        );
        assert_eq!(reply.field(), None);
    }

    #[test]
    fn test_string_payload_is_the_text() {
        let reply = Reply::probe(&json!("High Risk"), PREDICTION_FIELDS);
        assert_eq!(reply.text(), "High Risk");
        assert!(!reply.is_structured());
    }

    #[test]
    fn test_falsy_values_skipped() {
        let payload = json!({"prediction": 0, "risk": null, "result": 1});
        let reply = Reply::probe(&payload, PREDICTION_FIELDS);
        assert_eq!(reply.field(), Some("result"));
        assert_eq!(reply.text(), "1");

        let payload = json!({"reply": false, "answer": [], "response": {}, "content": {"a": 1}});
        assert_eq!(Reply::probe(&payload, CHAT_FIELDS).text(), r#"{"a":1}"#);
    }

    #[test]
    fn test_login_token_field_order() {
        let both = json!({"token": "t", "access_token": "a"});
        assert_eq!(LoginReply::from_value(&both).token(), Some("t"));

        let access = json!({"access_token": "a"});
        assert_eq!(LoginReply::from_value(&access).token(), Some("a"));

        assert_eq!(LoginReply::from_value(&json!({"ok": true})).token(), None);
    }

    #[test]
    fn test_low_risk_prediction() {
        let prediction = Prediction::from_value(&json!({"prediction": "Low Risk"}));
        assert_eq!(prediction.display.text(), "Low Risk");
        assert_eq!(prediction.risk, RiskLevel::Low);
        assert_eq!(prediction.risk.color(), "#10B981");
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(RiskLevel::from_label("HIGH risk"), RiskLevel::High);
        assert_eq!(RiskLevel::from_label("Moderate"), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_label("medium"), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_label("unknown"), RiskLevel::Low);
        assert_eq!(RiskLevel::High.color(), "#DC2626");
        assert_eq!(RiskLevel::Moderate.color(), "#F59E0B");
    }

    #[test]
    fn test_prediction_raw_payload_classified() {
        let prediction = Prediction::from_value(&json!({"probability": 0.9, "label": "high"}));
        assert!(!prediction.display.is_structured());
        assert_eq!(prediction.risk, RiskLevel::High);
    }

    #[test]
    fn test_chat_reply_with_disclaimer() {
        let reply = ChatReply::from_value(&json!({
            "response": "Drink water.",
            "disclaimer": "Not a diagnosis."
        }));
        assert_eq!(reply.text(), "Drink water.");
        assert_eq!(reply.disclaimer.as_deref(), Some("Not a diagnosis."));
    }

    #[test]
    fn test_report_analysis_defaults() {
        let analysis = ReportAnalysis::from_value(&json!({"status": "analyzed"}));
        assert_eq!(analysis.summary, DEFAULT_REPORT_SUMMARY);
        assert_eq!(analysis.summary_field, None);
        assert!(analysis.abnormal_markers.is_empty());
    }

    #[test]
    fn test_report_analysis_markers() {
        let analysis = ReportAnalysis::from_value(&json!({
            "message": "Report uploaded successfully.",
            "summary": "WBC elevated",
            "abnormalMarkers": ["WBC > 11.0", 42, "CRP high"]
        }));
        assert_eq!(analysis.summary, "WBC elevated");
        assert_eq!(analysis.summary_field, Some("summary"));
        assert_eq!(analysis.abnormal_markers, vec!["WBC > 11.0", "CRP high"]);
    }
}
