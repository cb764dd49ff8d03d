//! Azure service clients for polyfaq
//!
//! Implements the core service traits against Azure AI Language question
//! answering and Azure Translator.

mod config;
mod http;
mod qna;
mod translator;


pub use config::{AzureConfig, SettingsFile, DEFAULT_SETTINGS_FILE};
pub use qna::{parse_answers_response, QuestionAnsweringClient};
pub use translator::{parse_detect_response, parse_translate_response, TranslatorClient};

// Re-export core types for convenience
pub use polyfaq_core::{
    Answer, DetectedLanguage, Error, KnowledgeBase, LanguageCode, LanguageDetector, Result,
    Translation, Translator,
};

/// Build both clients for a configuration on one shared connection pool
pub fn connect(config: &AzureConfig) -> Result<(QuestionAnsweringClient, TranslatorClient)> {
    let client = http::build_client(config.request_timeout)?;
    let knowledge_base = QuestionAnsweringClient::with_client(config, client.clone());
    let translator = TranslatorClient::with_client(config, client);
    Ok((knowledge_base, translator))
}
