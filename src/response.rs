//! Buffered response parsing.

use crate::error::TranslateError;
use crate::types::GenerateContentResponse;

/// Extract the translated text from a complete `generateContent` response.
///
/// The first candidate's first content part carries the translation; it is
/// returned trimmed. Any other shape fails with
/// [`TranslateError::ResponseFormat`] carrying the raw body.
pub(crate) fn parse_buffered(body: &str) -> Result<String, TranslateError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|_| TranslateError::ResponseFormat {
            body: body.to_string(),
        })?;

    response
        .candidates
        .first()
        .and_then(|candidate| candidate.part_text())
        .map(|text| text.trim().to_string())
        .ok_or_else(|| TranslateError::ResponseFormat {
            body: body.to_string(),
        })
}
