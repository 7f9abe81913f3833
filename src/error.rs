//! Error types for the translation adapter.
//!
//! One variant per failure class the adapter can surface. The two tolerated
//! conditions (malformed `requestArguments` JSON, malformed stream lines) are
//! deliberately not represented here; they are logged and skipped.

use thiserror::Error;

/// Errors surfaced by [`translate`](crate::translate) and
/// [`GeminiTranslator::translate`](crate::GeminiTranslator::translate).
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Required configuration is missing or empty. Raised before any network
    /// I/O happens.
    #[error("{0}")]
    Config(String),

    /// The server answered with a non-success HTTP status.
    #[error("Http Request Error\nHttp Status: {status}\n{body}")]
    Http {
        /// HTTP status code returned by the server.
        status: u16,
        /// Raw response body text, verbatim.
        body: String,
    },

    /// A buffered response did not match the expected
    /// `candidates[0].content.parts[0].text` shape.
    #[error("unable to parse Gemini API response: {body}")]
    ResponseFormat {
        /// The raw JSON body, kept for diagnosis.
        body: String,
    },

    /// Reading or decoding the live response stream failed. Partial
    /// accumulated text is discarded.
    #[error("streaming response processing error: {0}")]
    Stream(#[source] reqwest::Error),

    /// The request could not be sent or the response body could not be read.
    #[error("http transport error: {0}")]
    Network(#[from] reqwest::Error),
}

impl TranslateError {
    /// Convenience constructor mirroring the HTTP failure path.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }
}
