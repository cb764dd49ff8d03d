//! Azure Translator client: language detection and translation
//!
//! Both calls post `[{"Text": ...}]` to the Translator v3 REST API with the
//! subscription key and region headers.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use polyfaq_core::{
    DetectedLanguage, Error, LanguageCode, LanguageDetector, Result, Translation, Translator,
};

use crate::config::AzureConfig;
use crate::http::{self, SUBSCRIPTION_KEY_HEADER, SUBSCRIPTION_REGION_HEADER};

const SERVICE: &str = "translator";
const API_VERSION: &str = "3.0";

/// Translator REST client
pub struct TranslatorClient {
    endpoint: Url,
    key: String,
    region: String,
    client: Client,
}

#[derive(Serialize)]
pub(crate) struct TextItem<'a> {
    #[serde(rename = "Text")]
    pub(crate) text: &'a str,
}

#[derive(Deserialize)]
struct DetectResult {
    language: String,
}

#[derive(Deserialize)]
struct TranslateResult {
    translations: Vec<TranslationItem>,
}

#[derive(Deserialize)]
struct TranslationItem {
    text: String,
}

impl TranslatorClient {
    /// Create a client with its own connection pool
    pub fn new(config: &AzureConfig) -> Result<Self> {
        let client = http::build_client(config.request_timeout)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a client that shares an existing connection pool
    pub fn with_client(config: &AzureConfig, client: Client) -> Self {
        Self {
            endpoint: config.translator_endpoint.clone(),
            key: config.translator_key.clone(),
            region: config.translator_region.clone(),
            client,
        }
    }

    /// `POST /detect?api-version=3.0`
    pub fn detect_url(&self) -> Result<Url> {
        let mut url = self.route("detect")?;
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }

    /// `POST /translate?api-version=3.0&to=<code>`
    pub fn translate_url(&self, to: &LanguageCode) -> Result<Url> {
        let mut url = self.route("translate")?;
        url.query_pairs_mut()
            .append_pair("api-version", API_VERSION)
            .append_pair("to", to.as_str());
        Ok(url)
    }

    fn route(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| Error::Configuration(format!("invalid translator route '{}': {}", path, e)))
    }

    async fn post(&self, url: Url, text: &str) -> Result<String> {
        let trace_id = Uuid::new_v4();
        debug!(%url, %trace_id, "calling translator");

        let request = self
            .client
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .header(SUBSCRIPTION_REGION_HEADER, &self.region)
            .header("X-ClientTraceId", trace_id.to_string());

        http::send_json(SERVICE, request, &[TextItem { text }]).await
    }
}

#[async_trait]
impl LanguageDetector for TranslatorClient {
    async fn detect(&self, text: &str) -> Result<DetectedLanguage> {
        let body = self.post(self.detect_url()?, text).await?;
        parse_detect_response(&body)
    }
}

#[async_trait]
impl Translator for TranslatorClient {
    async fn translate(&self, text: &str, to: &LanguageCode) -> Result<Translation> {
        let body = self.post(self.translate_url(to)?, text).await?;
        parse_translate_response(&body, to)
    }
}

/// Pull `[0].language` out of a detect response
pub fn parse_detect_response(body: &str) -> Result<DetectedLanguage> {
    let results: Vec<DetectResult> = serde_json::from_str(body)
        .map_err(|e| Error::UnexpectedResponse(format!("detect response: {}", e)))?;

    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| Error::UnexpectedResponse("detect response contained no results".to_string()))?;

    let code = LanguageCode::parse(&first.language).map_err(|_| {
        Error::UnexpectedResponse(format!("detect returned an invalid language '{}'", first.language))
    })?;

    Ok(DetectedLanguage { code })
}

/// Pull `[0].translations[0].text` out of a translate response
pub fn parse_translate_response(body: &str, to: &LanguageCode) -> Result<Translation> {
    let results: Vec<TranslateResult> = serde_json::from_str(body)
        .map_err(|e| Error::UnexpectedResponse(format!("translate response: {}", e)))?;

    let text = results
        .into_iter()
        .next()
        .and_then(|r| r.translations.into_iter().next())
        .map(|t| t.text)
        .ok_or_else(|| Error::UnexpectedResponse("translate response contained no translations".to_string()))?;

    Ok(Translation { text, to: to.clone() })
}
