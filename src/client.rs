//! Translation client: transport and mode dispatch.

use crate::config::{ResolvedConfig, TranslationConfig};
use crate::error::TranslateError;
use crate::request::build_request;
use crate::response::parse_buffered;
use crate::streaming::assemble_stream;

/// Per-call options accompanying the text and language pair.
#[derive(Default)]
pub struct TranslateOptions<'a> {
    /// Language code detected by the host, substituted for `$detect`.
    pub detected_lang: &'a str,
    /// Sink invoked with the cumulative translated text after each streamed
    /// fragment. Each invocation is a full replacement, not a delta. Ignored
    /// in buffered mode.
    pub on_update: Option<&'a mut (dyn FnMut(&str) + Send)>,
}

impl std::fmt::Debug for TranslateOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslateOptions")
            .field("detected_lang", &self.detected_lang)
            .field("on_update_present", &self.on_update.is_some())
            .finish()
    }
}

/// Gemini translation client.
///
/// Holds the HTTP client and the raw configuration record; the record is
/// validated and resolved on every call so a host may rewrite it between
/// calls.
#[derive(Debug, Clone)]
pub struct GeminiTranslator {
    http_client: reqwest::Client,
    config: TranslationConfig,
}

impl GeminiTranslator {
    /// Create a translator with a default HTTP client.
    pub fn new(config: TranslationConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Create a translator reusing an existing HTTP client.
    pub fn with_http_client(config: TranslationConfig, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Translate `text` from `source_lang` (or `"auto"`) to `target_lang`.
    ///
    /// Issues a single POST with no retries. In streaming mode the sink in
    /// `options` receives the cumulative text after every fragment; the final
    /// accumulated text is returned either way.
    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        options: TranslateOptions<'_>,
    ) -> Result<String, TranslateError> {
        let config = ResolvedConfig::resolve(&self.config)?;
        let request = build_request(
            text,
            source_lang,
            target_lang,
            options.detected_lang,
            &config,
        );

        let response = self
            .http_client
            .post(&request.url)
            .headers(request.headers)
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::debug!(status = status.as_u16(), "Gemini request failed");
            return Err(TranslateError::Http {
                status: status.as_u16(),
                body,
            });
        }

        if config.use_stream {
            assemble_stream(response, options.on_update).await
        } else {
            let body = response.text().await?;
            parse_buffered(&body)
        }
    }
}

/// One-shot convenience wrapper around [`GeminiTranslator::translate`].
///
/// Builds a fresh HTTP client per call; hosts issuing repeated translations
/// should hold a [`GeminiTranslator`] instead.
pub async fn translate(
    text: &str,
    source_lang: &str,
    target_lang: &str,
    config: &TranslationConfig,
    options: TranslateOptions<'_>,
) -> Result<String, TranslateError> {
    GeminiTranslator::new(config.clone())
        .translate(text, source_lang, target_lang, options)
        .await
}
