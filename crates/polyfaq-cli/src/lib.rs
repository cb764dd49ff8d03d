//! Console front end for polyfaq

mod assistant;
mod ui;

#[cfg(test)]
mod tests;

pub use assistant::{
    request_error_line, Assistant, Command, ALREADY_NATIVE_NOTICE, EXIT_COMMAND, PROMPT,
};
pub use ui::{display_banner, write_help};

// Re-export core types
pub use polyfaq_core::{Error, Result};
