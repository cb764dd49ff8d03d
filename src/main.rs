use anyhow::Result;
use clap::Parser;
use colored::*;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use polyfaq_azure::AzureConfig;
use polyfaq_cli::{display_banner, Assistant};

mod logging;

#[derive(Parser)]
#[command(name = "polyfaq")]
#[command(about = "Ask a knowledge base questions in any language", long_about = None)]
struct Cli {
    /// Ask a single question and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Settings file, defaults to ./appsettings.json when present
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Skip the startup banner
    #[arg(long)]
    no_banner: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let config = AzureConfig::load(cli.settings.as_deref())?;
    info!(?config, "configuration loaded");

    // Detection and translation are the same service; one client serves both.
    let (knowledge_base, translator) = polyfaq_azure::connect(&config)?;
    let translator = Arc::new(translator);
    let assistant = Assistant::new(knowledge_base, translator.clone(), translator);

    let mut stdout = io::stdout();

    // One-shot mode prints request errors like the loop does, then fails.
    if let Some(question) = cli.question {
        let answered = assistant.ask(&question, &mut stdout).await?;
        return Ok(if answered { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    if !cli.no_banner {
        display_banner();
    }

    assistant.run(io::stdin().lock(), &mut stdout).await?;
    println!("{}", "👋 Goodbye!".green());

    Ok(ExitCode::SUCCESS)
}
