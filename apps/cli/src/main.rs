//! StudyBuddy CLI: an AI study companion for your course materials.
//!
//! Extracts text from PDF and Word documents, summarizes a syllabus, drafts a
//! study roadmap and answers questions from the uploaded material.

mod chat;
mod commands;
mod terminal;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
