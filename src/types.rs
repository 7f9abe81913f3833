//! Wire types for the Gemini `generateContent` / `streamGenerateContent` API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub safety_settings: Vec<SafetySetting>,
    pub system_instruction: RequestContent,
    pub contents: Vec<RequestContent>,
    /// Kept as an open map: base `temperature`/`topP` entries plus whatever
    /// extra options the configuration injects (thinking config or raw
    /// request arguments, latter wins on key collision).
    pub generation_config: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RequestContent {
    pub role: &'static str,
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RequestPart {
    pub text: String,
}

/// Response document, shared by the buffered body and each streamed record.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<CandidateContent>,
    /// Incremental-update shape some gateways emit instead of full parts.
    pub delta: Option<CandidateDelta>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CandidateDelta {
    #[serde(rename = "textDelta")]
    pub text_delta: Option<TextDelta>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TextDelta {
    pub text: Option<String>,
}

impl Candidate {
    /// Non-empty text of the first content part, if any.
    pub fn part_text(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// Non-empty text of the delta-style incremental field, if any.
    pub fn delta_text(&self) -> Option<&str> {
        self.delta
            .as_ref()
            .and_then(|d| d.text_delta.as_ref())
            .and_then(|d| d.text.as_deref())
            .filter(|t| !t.is_empty())
    }
}
