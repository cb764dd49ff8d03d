//! Core traits and types for polyfaq
//!
//! This crate defines the error taxonomy, the domain types passed between the
//! assistant loop and its remote services, and the service traits themselves.
//! Keeping the traits here lets the loop be driven by fakes in tests.

pub mod error;
pub mod services;
pub mod types;

pub use error::{Error, Result};
pub use services::{KnowledgeBase, LanguageDetector, Translator};
pub use types::*;
