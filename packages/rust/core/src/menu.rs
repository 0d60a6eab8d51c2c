//! Top-level numbered menu.
//!
//! The configuration is reloaded from disk at the top of every iteration and
//! handed to the chosen operation as a value, so an edit takes effect once
//! control comes back here.

use std::str::FromStr;

use tracing::{debug, info};

use wonderchat_client::ApiClient;
use wonderchat_shared::{ConfigStore, Result};

use crate::batch::{BatchMode, run_batch};
use crate::console::Console;
use crate::conversation::run_chat;
use crate::settings::{edit_configuration, show_configuration};

const MENU_OPTIONS: [&str; 6] = [
    "1. Chat with Bot",
    "2. Add URLs",
    "3. Remove URLs",
    "4. Reindex URLs",
    "5. Edit Configuration",
    "6. Quit",
];

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Chat,
    AddUrls,
    RemoveUrls,
    ReindexUrls,
    EditConfiguration,
    Quit,
}

impl FromStr for MenuChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Chat),
            "2" => Ok(Self::AddUrls),
            "3" => Ok(Self::RemoveUrls),
            "4" => Ok(Self::ReindexUrls),
            "5" => Ok(Self::EditConfiguration),
            "6" => Ok(Self::Quit),
            other => Err(format!("unknown menu choice: {other:?}")),
        }
    }
}

/// Why the menu loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// The operator chose quit, or input ended.
    Quit,
    /// The stored configuration lacks a token or chatbot id.
    Unconfigured,
}

/// Run the menu until the operator quits.
pub async fn run_menu(
    store: &ConfigStore,
    api: &ApiClient,
    console: &mut dyn Console,
) -> Result<MenuExit> {
    loop {
        let config = store.load()?;

        if !config.is_complete() {
            info!(path = ?store.path(), "configuration incomplete");
            console.say(
                "Please configure your API token and chatbot ID using the 'Edit Configuration' option.",
            );
            return Ok(MenuExit::Unconfigured);
        }

        console.say("");
        console.say("Welcome to the WonderChat.ai Tool!");
        show_configuration(console, &config);
        console.say("");
        console.say("Select an option:");
        for option in MENU_OPTIONS {
            console.say(option);
        }

        let Some(input) = console.read_line("Enter your choice: ")? else {
            console.say("Goodbye!");
            return Ok(MenuExit::Quit);
        };

        let choice = match input.parse::<MenuChoice>() {
            Ok(choice) => choice,
            Err(e) => {
                debug!(error = %e, "rejected menu input");
                console.say("Invalid choice. Please try again.");
                continue;
            }
        };
        debug!(?choice, "menu choice");

        match choice {
            MenuChoice::Chat => run_chat(&config, api, console).await?,
            MenuChoice::AddUrls => {
                run_batch(BatchMode::Add, &config, api, console).await?;
            }
            MenuChoice::RemoveUrls => {
                run_batch(BatchMode::Remove, &config, api, console).await?;
            }
            MenuChoice::ReindexUrls => {
                run_batch(BatchMode::Reindex, &config, api, console).await?;
            }
            MenuChoice::EditConfiguration => {
                edit_configuration(store, console)?;
            }
            MenuChoice::Quit => {
                console.say("Goodbye!");
                return Ok(MenuExit::Quit);
            }
        }
    }
}
