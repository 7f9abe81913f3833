//! gemini-translate
//!
//! Translation adapter for the Google Gemini generative-language API, for use
//! by host translation applications. One call builds the request from the
//! host's configuration record, issues a single POST, and either parses a
//! buffered JSON response or incrementally assembles a streamed one, pushing
//! cumulative updates to a sink.
//!
//! ```rust,ignore
//! use gemini_translate::{GeminiTranslator, TranslateOptions, TranslationConfig};
//!
//! let translator = GeminiTranslator::new(TranslationConfig {
//!     api_key: Some("...".into()),
//!     api_base_url: Some(gemini_translate::DEFAULT_BASE_URL.into()),
//!     ..Default::default()
//! });
//!
//! let mut show = |partial: &str| println!("{partial}");
//! let result = translator
//!     .translate("Hello", "auto", "fr", TranslateOptions {
//!         detected_lang: "en",
//!         on_update: Some(&mut show),
//!     })
//!     .await?;
//! ```
#![deny(unsafe_code)]

mod client;
mod config;
mod error;
mod request;
mod response;
mod streaming;
mod types;

pub use client::{GeminiTranslator, TranslateOptions, translate};
pub use config::{DEFAULT_BASE_URL, DEFAULT_MODEL, TranslationConfig};
pub use error::TranslateError;
