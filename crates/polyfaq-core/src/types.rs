//! Domain types shared by the service clients and the assistant loop

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::{Error, Result};

/// Language the knowledge base answers in.
pub const NATIVE_LANGUAGE: &str = "en";

fn language_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("language tag pattern is valid")
    })
}

/// A language tag such as `en`, `fr` or `zh-Hans`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse a language tag, rejecting anything that is not shaped like one
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        if language_tag_pattern().is_match(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(Error::InvalidInput(format!("not a language code: '{}'", code)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether answers in this language can be shown without translation
    pub fn is_native(&self) -> bool {
        self.0 == NATIVE_LANGUAGE
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate answer returned by the knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub confidence: f32,
    pub source: Option<String>,
}

impl Answer {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
            source: None,
        }
    }
}

/// Result of a language detection call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    pub code: LanguageCode,
}

/// Text rendered into a target language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    pub to: LanguageCode,
}
