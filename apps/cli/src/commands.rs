//! CLI flags, tracing setup, and the entry into the interactive menu.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use url::Url;

use wonderchat_client::{ApiClient, ClientSettings, DEFAULT_API_BASE};
use wonderchat_core::run_menu;
use wonderchat_shared::{ConfigStore, DEFAULT_CONFIG_FILE};

use crate::console::TerminalConsole;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// WonderChat — chat with your chatbot and manage its trained URLs.
#[derive(Parser)]
#[command(
    name = "wonderchat",
    version,
    about = "Chat with a WonderChat chatbot and add, remove, or reindex its trained URLs.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// JSON file holding api_token, chatbot_id and debug.
    #[arg(long, env = "WONDERCHAT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// API origin the endpoint paths are joined onto.
    #[arg(long, env = "WONDERCHAT_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: Url,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr; stdout carries the interactive transcript.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "wonderchat=warn",
        1 => "wonderchat=info",
        2 => "wonderchat=debug",
        _ => "wonderchat=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// Build the store and client from flags and run the menu.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let store = ConfigStore::new(cli.config);
    let settings = ClientSettings::new(cli.api_base);
    info!(
        config = %store.path().display(),
        api_base = %settings.api_base,
        "starting"
    );

    let api = ApiClient::new(settings).wrap_err("failed to set up the API client")?;
    let mut console = TerminalConsole::new();

    let exit = run_menu(&store, &api, &mut console)
        .await
        .wrap_err_with(|| format!("menu aborted (config: {})", store.path().display()))?;
    info!(?exit, "menu closed");

    Ok(())
}
