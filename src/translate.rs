//! Translation — external service client and fallback adapter.
//!
//! Translation failures never block the pipeline: the adapter logs the
//! failure and hands back the original, untranslated text. Output
//! quality degrades; liveness does not.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;

use crate::error::TranslateError;

/// Timeout for a single translation request.
const TRANSLATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for translation services.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `dest` (ISO 639-1 codes).
    async fn translate(
        &self,
        text: &str,
        source: &str,
        dest: &str,
    ) -> Result<String, TranslateError>;
}

// ── HTTP client ─────────────────────────────────────────────────────

/// Client for a LibreTranslate-compatible `/translate` endpoint.
pub struct HttpTranslator {
    endpoint: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl HttpTranslator {
    /// `endpoint` is the service base URL, e.g. `https://libretranslate.com`.
    pub fn new(endpoint: impl Into<String>, api_key: Option<SecretString>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        dest: &str,
    ) -> Result<String, TranslateError> {
        let mut body = serde_json::json!({
            "q": text,
            "source": source,
            "target": dest,
            "format": "text",
        });
        if let Some(key) = &self.api_key {
            body["api_key"] = serde_json::Value::from(key.expose_secret());
        }

        let resp = self
            .client
            .post(format!("{}/translate", self.endpoint))
            .timeout(TRANSLATE_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslateError::RequestFailed {
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(TranslateError::RequestFailed {
                reason: format!("HTTP {status}: {detail}"),
            });
        }

        let parsed: TranslateResponse =
            resp.json()
                .await
                .map_err(|e| TranslateError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        Ok(parsed.translated_text)
    }
}

// ── Fallback adapter ────────────────────────────────────────────────

/// Wraps a [`Translator`] with the configured language pair and the
/// fallback-to-original policy.
#[derive(Clone)]
pub struct TranslationAdapter {
    inner: Arc<dyn Translator>,
    source_lang: String,
    dest_lang: String,
}

impl TranslationAdapter {
    pub fn new(inner: Arc<dyn Translator>, source_lang: &str, dest_lang: &str) -> Self {
        Self {
            inner,
            source_lang: source_lang.to_string(),
            dest_lang: dest_lang.to_string(),
        }
    }

    /// Translate `text`, or return it unchanged if the service fails.
    pub async fn translate_or_original(&self, text: &str) -> String {
        match self
            .inner
            .translate(text, &self.source_lang, &self.dest_lang)
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                warn!(error = %e, "translation failed, keeping original text");
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingTranslator;

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate(&self, _: &str, _: &str, _: &str) -> Result<String, TranslateError> {
            Err(TranslateError::RequestFailed {
                reason: "service unreachable".into(),
            })
        }
    }

    struct TaggingTranslator;

    #[async_trait]
    impl Translator for TaggingTranslator {
        async fn translate(
            &self,
            text: &str,
            _source: &str,
            dest: &str,
        ) -> Result<String, TranslateError> {
            Ok(format!("[{dest}] {text}"))
        }
    }

    #[tokio::test]
    async fn failure_falls_back_to_original_text() {
        let adapter = TranslationAdapter::new(Arc::new(FailingTranslator), "en", "vi");
        let out = adapter.translate_or_original("need help with small job").await;
        assert_eq!(out, "need help with small job");
    }

    #[tokio::test]
    async fn success_uses_configured_language_pair() {
        let adapter = TranslationAdapter::new(Arc::new(TaggingTranslator), "en", "vi");
        let out = adapter.translate_or_original("hello").await;
        assert_eq!(out, "[vi] hello");
    }
}
