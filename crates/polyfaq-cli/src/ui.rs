//! UI utilities for the CLI

use colored::*;
use crossterm::terminal::size;
use std::io::{self, Write};

const TITLE: &str = "polyfaq - multilingual FAQ assistant";

/// Display startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = banner_width(terminal_width);

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));
    let empty_line = format!("│{}│", " ".repeat(banner_width - 2));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());
    println!(
        "{}{}{}",
        "│  ".blue(),
        TITLE.blue().bold(),
        format!("{}│", " ".repeat(padding(banner_width, TITLE))).blue()
    );
    println!("{}", empty_line.blue());

    let feature_lines = [
        "Ask in any language, answers come from the knowledge base",
        "and are translated back to the language you asked in.",
        "",
        concat!("v", env!("CARGO_PKG_VERSION"), " • Azure AI Language + Translator"),
    ];

    for line in feature_lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
            continue;
        }
        let fill = " ".repeat(padding(banner_width, line));
        let text = if line.starts_with('v') {
            line.dimmed()
        } else {
            line.normal()
        };
        println!("{}{}{}", "│  ".blue(), text, format!("{}│", fill).blue());
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!("{}", "💡 Tip: type 'help' for commands".dimmed());
    println!();
}

/// Print the list of loop commands
pub fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "Available commands:".bold())?;
    writeln!(out, "  {} - Ask the knowledge base, in any language", "<question>".green())?;
    writeln!(out, "  {} - Show this help message", "help".green())?;
    writeln!(out, "  {} - Exit the application", "exit".green())?;
    Ok(())
}

fn banner_width(terminal_width: usize) -> usize {
    let widest = TITLE.chars().count().max(62) + 6;
    widest.min(terminal_width.saturating_sub(4)).max(widest.min(40))
}

/// Spaces needed after `text` to reach the right border
fn padding(banner_width: usize, text: &str) -> usize {
    banner_width.saturating_sub(text.chars().count() + 4)
}
