//! Azure service configuration
//!
//! Settings come from built-in defaults, then an `appsettings.json` style file,
//! then environment variables (with `.env` loaded through dotenvy). The result
//! is an immutable [`AzureConfig`] handed to each client at startup.

use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

use polyfaq_core::{Error, Result};

pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";
pub const DEFAULT_TRANSLATOR_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";
pub const DEFAULT_PROJECT_NAME: &str = "LearnFAQ";
pub const DEFAULT_DEPLOYMENT_NAME: &str = "production";
pub const DEFAULT_TOP: u32 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw contents of the JSON settings file. Every key is optional here;
/// required ones are checked once all sources are merged.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SettingsFile {
    #[serde(rename = "AZURE_QNA_ENDPOINT")]
    pub qna_endpoint: Option<String>,
    #[serde(rename = "AZURE_QNA_KEY")]
    pub qna_key: Option<String>,
    #[serde(rename = "CognitiveServiceKey")]
    pub translator_key: Option<String>,
    #[serde(rename = "CognitiveServiceRegion")]
    pub translator_region: Option<String>,
    #[serde(rename = "QnaProjectName")]
    pub project_name: Option<String>,
    #[serde(rename = "QnaDeploymentName")]
    pub deployment_name: Option<String>,
    #[serde(rename = "TranslatorEndpoint")]
    pub translator_endpoint: Option<String>,
    #[serde(rename = "QnaTop")]
    pub top: Option<u32>,
    #[serde(rename = "QnaConfidenceThreshold")]
    pub confidence_threshold: Option<f32>,
    #[serde(rename = "RequestTimeoutSecs")]
    pub request_timeout_secs: Option<u64>,
}

impl SettingsFile {
    /// Read a settings file. When `required` is false a missing file yields
    /// empty settings.
    pub fn read(path: &Path, required: bool) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Configuration(format!(
                    "cannot read settings file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&contents).map_err(|e| {
            Error::Configuration(format!("invalid settings file {}: {}", path.display(), e))
        })
    }
}

/// Configuration for the question answering and translator clients
#[derive(Clone)]
pub struct AzureConfig {
    pub qna_endpoint: Url,
    pub qna_key: String,
    pub project_name: String,
    pub deployment_name: String,
    pub top: u32,
    pub confidence_threshold: Option<f32>,
    pub translator_endpoint: Url,
    pub translator_key: String,
    pub translator_region: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("qna_endpoint", &self.qna_endpoint.as_str())
            .field("qna_key", &"<redacted>")
            .field("project_name", &self.project_name)
            .field("deployment_name", &self.deployment_name)
            .field("top", &self.top)
            .field("confidence_threshold", &self.confidence_threshold)
            .field("translator_endpoint", &self.translator_endpoint.as_str())
            .field("translator_key", &"<redacted>")
            .field("translator_region", &self.translator_region)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl AzureConfig {
    /// Load configuration from the settings file and the environment.
    ///
    /// With `settings_path` unset the default `appsettings.json` is used if
    /// it exists.
    pub fn load(settings_path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = match settings_path {
            Some(path) => SettingsFile::read(path, true)?,
            None => SettingsFile::read(Path::new(DEFAULT_SETTINGS_FILE), false)?,
        };

        Self::from_sources(file, |name| env::var(name).ok())
    }

    /// Merge a settings file with an environment lookup. Environment values win.
    pub fn from_sources<F>(file: SettingsFile, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |name: &str, fallback: Option<String>| {
            lookup(name).filter(|v| !v.trim().is_empty()).or(fallback)
        };

        let qna_endpoint = pick("AZURE_QNA_ENDPOINT", file.qna_endpoint)
            .ok_or_else(|| missing("AZURE_QNA_ENDPOINT"))?;
        let qna_key = pick("AZURE_QNA_KEY", file.qna_key).ok_or_else(|| missing("AZURE_QNA_KEY"))?;
        let translator_key = pick("COGNITIVE_SERVICE_KEY", file.translator_key)
            .ok_or_else(|| missing("CognitiveServiceKey / COGNITIVE_SERVICE_KEY"))?;
        let translator_region = pick("COGNITIVE_SERVICE_REGION", file.translator_region)
            .ok_or_else(|| missing("CognitiveServiceRegion / COGNITIVE_SERVICE_REGION"))?;

        let translator_endpoint = pick("TRANSLATOR_ENDPOINT", file.translator_endpoint)
            .unwrap_or_else(|| DEFAULT_TRANSLATOR_ENDPOINT.to_string());
        let project_name = pick("QNA_PROJECT_NAME", file.project_name)
            .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
        let deployment_name = pick("QNA_DEPLOYMENT_NAME", file.deployment_name)
            .unwrap_or_else(|| DEFAULT_DEPLOYMENT_NAME.to_string());

        let top = match lookup("QNA_TOP") {
            Some(raw) => parse_number("QNA_TOP", &raw)?,
            None => file.top.unwrap_or(DEFAULT_TOP),
        };
        if top == 0 {
            return Err(Error::Configuration("QnaTop must be at least 1".to_string()));
        }

        let confidence_threshold = match lookup("QNA_CONFIDENCE_THRESHOLD") {
            Some(raw) => Some(parse_number::<f32>("QNA_CONFIDENCE_THRESHOLD", &raw)?),
            None => file.confidence_threshold,
        };
        if let Some(threshold) = confidence_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::Configuration(format!(
                    "QnaConfidenceThreshold must be between 0 and 1, got {}",
                    threshold
                )));
            }
        }

        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => parse_number("REQUEST_TIMEOUT_SECS", &raw)?,
            None => file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(Error::Configuration("RequestTimeoutSecs must be at least 1".to_string()));
        }

        Ok(Self {
            qna_endpoint: parse_base_url("AZURE_QNA_ENDPOINT", &qna_endpoint)?,
            qna_key,
            project_name,
            deployment_name,
            top,
            confidence_threshold,
            translator_endpoint: parse_base_url("TRANSLATOR_ENDPOINT", &translator_endpoint)?,
            translator_key,
            translator_region,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create configuration with explicit values and defaults for the rest
    pub fn new(
        qna_endpoint: &str,
        qna_key: impl Into<String>,
        translator_key: impl Into<String>,
        translator_region: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            qna_endpoint: parse_base_url("AZURE_QNA_ENDPOINT", qna_endpoint)?,
            qna_key: qna_key.into(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            deployment_name: DEFAULT_DEPLOYMENT_NAME.to_string(),
            top: DEFAULT_TOP,
            confidence_threshold: None,
            translator_endpoint: parse_base_url("TRANSLATOR_ENDPOINT", DEFAULT_TRANSLATOR_ENDPOINT)?,
            translator_key: translator_key.into(),
            translator_region: translator_region.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Point the translator client somewhere other than the public endpoint
    pub fn with_translator_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.translator_endpoint = parse_base_url("TRANSLATOR_ENDPOINT", endpoint)?;
        Ok(self)
    }
}

fn missing(name: &str) -> Error {
    Error::Configuration(format!("{} is not set in the settings file or environment", name))
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Configuration(format!("{} is not a valid number: '{}'", name, raw)))
}

/// Parse an endpoint and make sure its path ends with `/` so relative
/// joins append to it instead of replacing the last segment.
fn parse_base_url(name: &str, raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| Error::Configuration(format!("{} is not a valid URL '{}': {}", name, raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Configuration(format!(
            "{} must be an http(s) URL, got '{}'",
            name, raw
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
