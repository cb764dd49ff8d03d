//! The question/answer loop
//!
//! Reads a question, asks the knowledge base, and for every candidate answer
//! detects the question's language and translates the answer when that
//! language is not the knowledge base's own.

use colored::*;
use std::io::{BufRead, Write};
use tracing::{debug, info};

use polyfaq_core::{Error, KnowledgeBase, LanguageDetector, Result, Translator};

use crate::ui;

pub const EXIT_COMMAND: &str = "exit";
pub const HELP_COMMAND: &str = "help";
pub const PROMPT: &str = "Question: ";
pub const ALREADY_NATIVE_NOTICE: &str = "The input text is already in language of original answer.";

pub fn request_error_line(err: &Error) -> String {
    format!("Request error: {}", err)
}

/// What a line of console input asks the loop to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    Blank,
    Ask(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Blank;
        }

        match trimmed.to_lowercase().as_str() {
            EXIT_COMMAND => Command::Exit,
            HELP_COMMAND => Command::Help,
            _ => Command::Ask(trimmed.to_string()),
        }
    }
}

/// Console assistant over a knowledge base, a language detector and a translator
pub struct Assistant<K, D, T> {
    knowledge_base: K,
    detector: D,
    translator: T,
}

impl<K, D, T> Assistant<K, D, T>
where
    K: KnowledgeBase,
    D: LanguageDetector,
    T: Translator,
{
    pub fn new(knowledge_base: K, detector: D, translator: T) -> Self {
        Self {
            knowledge_base,
            detector,
            translator,
        }
    }

    /// Run the prompt loop until `exit` or end of input.
    ///
    /// Failures of a single question are printed as `Request error: ..` and
    /// the loop continues. Only console I/O errors end it early.
    pub async fn run<R, W>(&self, mut input: R, out: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        info!("assistant loop started");
        writeln!(out, "Ask a question, type '{}' to quit.", EXIT_COMMAND)?;

        loop {
            write!(out, "{}", PROMPT.green().bold())?;
            out.flush()?;

            // Bytes that are not UTF-8 are replaced rather than ending the loop.
            let mut raw = Vec::new();
            if input.read_until(b'\n', &mut raw)? == 0 {
                writeln!(out)?;
                debug!("end of input");
                break;
            }
            let line = String::from_utf8_lossy(&raw);

            match Command::parse(&line) {
                Command::Exit => break,
                Command::Blank => continue,
                Command::Help => ui::write_help(out)?,
                Command::Ask(question) => {
                    self.ask(&question, out).await?;
                }
            }
        }

        info!("assistant loop finished");
        Ok(())
    }

    /// Answer one question, reporting a failed round trip as
    /// `Request error: ..` instead of returning it.
    ///
    /// Returns whether the question was answered without error. Console I/O
    /// errors are still returned.
    pub async fn ask<W: Write>(&self, question: &str, out: &mut W) -> Result<bool> {
        match self.answer(question, out).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_request_error() => {
                writeln!(out, "{}", request_error_line(&e).red())?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Answer one question and print every candidate answer.
    ///
    /// Returns how many answers were printed. Stops at the first failure;
    /// answers printed before it stay on screen.
    pub async fn answer<W: Write>(&self, question: &str, out: &mut W) -> Result<usize> {
        let answers = self.knowledge_base.answers(question).await?;
        debug!(count = answers.len(), "knowledge base answered");

        if answers.is_empty() {
            writeln!(out, "{}", "No answer found in the knowledge base.".dimmed())?;
            return Ok(0);
        }

        for answer in &answers {
            // Detection runs per answer, not once per question.
            let language = self.detector.detect(question).await?.code;

            writeln!(out, "\n{} {}\n", "Question language:".cyan(), language)?;
            writeln!(out, "{} {}\n", "Question:".bold(), question)?;
            writeln!(out, "{} {}", "Answer:".bold(), answer.text)?;
            writeln!(out, "{}\n", format!("Confidence: {:.0}%", answer.confidence * 100.0).dimmed())?;

            if language.is_native() {
                writeln!(out, "{}\n", ALREADY_NATIVE_NOTICE)?;
            } else {
                let translation = self.translator.translate(&answer.text, &language).await?;
                writeln!(
                    out,
                    "\n{} {}\n",
                    format!("Translation to {}:", translation.to).green(),
                    translation.text
                )?;
            }
        }

        Ok(answers.len())
    }
}
