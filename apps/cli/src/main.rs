//! WonderChat CLI — interactive admin client for a WonderChat chatbot.
//!
//! Chat with the configured chatbot and manage the URLs it is trained on
//! from a numbered terminal menu.

mod commands;
mod console;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
