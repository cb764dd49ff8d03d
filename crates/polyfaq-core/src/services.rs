//! Service traits for the three remote collaborators of the assistant
//!
//! Each trait is one HTTP capability. The Azure crate implements them against
//! the real services; tests implement them with in-memory fakes.

use async_trait::async_trait;

use crate::{Answer, DetectedLanguage, LanguageCode, Result, Translation};

/// A question answering service backed by a knowledge base
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Ranked candidate answers for a question. May be empty.
    async fn answers(&self, question: &str) -> Result<Vec<Answer>>;
}

/// Best-guess language detection for free text
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<DetectedLanguage>;
}

/// Machine translation into a target language
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, to: &LanguageCode) -> Result<Translation>;
}

#[async_trait]
impl<T: KnowledgeBase + ?Sized> KnowledgeBase for std::sync::Arc<T> {
    async fn answers(&self, question: &str) -> Result<Vec<Answer>> {
        (**self).answers(question).await
    }
}

#[async_trait]
impl<T: LanguageDetector + ?Sized> LanguageDetector for std::sync::Arc<T> {
    async fn detect(&self, text: &str) -> Result<DetectedLanguage> {
        (**self).detect(text).await
    }
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for std::sync::Arc<T> {
    async fn translate(&self, text: &str, to: &LanguageCode) -> Result<Translation> {
        (**self).translate(text, to).await
    }
}
