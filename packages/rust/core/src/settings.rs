//! Interactive configuration editor.

use tracing::info;

use wonderchat_shared::{ConfigStore, Configuration, Result};

use crate::console::Console;

/// Print the three settings, one per line.
pub fn show_configuration(console: &mut dyn Console, config: &Configuration) {
    console.say(&format!("API Token: {}", config.api_token));
    console.say(&format!("Chatbot ID: {}", config.chatbot_id));
    console.say(&format!("Debug Mode: {}", config.debug));
}

/// Answer to the debug-mode prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebugAnswer {
    Keep,
    Set(bool),
    Invalid,
}

fn parse_debug_answer(answer: &str) -> DebugAnswer {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => DebugAnswer::Keep,
        "true" => DebugAnswer::Set(true),
        "false" => DebugAnswer::Set(false),
        _ => DebugAnswer::Invalid,
    }
}

/// Read a trimmed answer; end of input reads as blank.
fn ask(console: &mut dyn Console, prompt: &str) -> Result<String> {
    Ok(console
        .read_line(prompt)?
        .map(|line| line.trim().to_string())
        .unwrap_or_default())
}

/// Show the stored configuration, prompt for replacements, and save.
///
/// Blank answers keep the current value. The debug prompt repeats until it
/// gets `true`, `false`, or blank. Returns the saved configuration.
pub fn edit_configuration(store: &ConfigStore, console: &mut dyn Console) -> Result<Configuration> {
    let mut config = store.load()?;

    console.say("");
    console.say("Current Configuration:");
    show_configuration(console, &config);

    let api_token = ask(
        console,
        "\nEnter new API Token (leave blank to keep current value): ",
    )?;
    let chatbot_id = ask(
        console,
        "Enter new Chatbot ID (leave blank to keep current value): ",
    )?;

    let debug = loop {
        let answer = ask(
            console,
            "Enter new Debug Mode (True/False, leave blank to keep current value): ",
        )?;
        match parse_debug_answer(&answer) {
            DebugAnswer::Invalid => {
                console.say("Invalid input. Please enter 'True', 'False' or leave blank.")
            }
            DebugAnswer::Keep => break None,
            DebugAnswer::Set(value) => break Some(value),
        }
    };

    if !api_token.is_empty() {
        config.api_token = api_token;
    }
    if !chatbot_id.is_empty() {
        config.chatbot_id = chatbot_id;
    }
    if let Some(debug) = debug {
        config.debug = debug;
    }

    store.save(&config)?;
    info!(path = ?store.path(), "configuration updated");

    console.say("");
    console.say("New Configuration Saved:");
    show_configuration(console, &config);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedConsole;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_store(initial: &Configuration) -> (PathBuf, ConfigStore) {
        let dir = std::env::temp_dir().join(format!("wonderchat-edit-test-{}", Uuid::now_v7()));
        let store = ConfigStore::new(dir.join(".env"));
        store.save(initial).unwrap();
        (dir, store)
    }

    fn initial() -> Configuration {
        Configuration {
            api_token: "old-token".into(),
            chatbot_id: "old-bot".into(),
            debug: false,
        }
    }

    #[test]
    fn debug_answers() {
        assert_eq!(parse_debug_answer(""), DebugAnswer::Keep);
        assert_eq!(parse_debug_answer("True"), DebugAnswer::Set(true));
        assert_eq!(parse_debug_answer(" FALSE "), DebugAnswer::Set(false));
        assert_eq!(parse_debug_answer("yes"), DebugAnswer::Invalid);
    }

    #[test]
    fn blank_answers_keep_values() {
        let (dir, store) = temp_store(&initial());
        let mut console = ScriptedConsole::new([Some("new-token"), Some(""), Some("maybe"), Some("TRUE")]);

        let saved = edit_configuration(&store, &mut console).unwrap();

        assert_eq!(
            saved,
            Configuration {
                api_token: "new-token".into(),
                chatbot_id: "old-bot".into(),
                debug: true,
            }
        );
        assert_eq!(store.load().unwrap(), saved);
        assert!(console.said("Invalid input."));
        assert!(console.said("API Token: old-token"));
        assert!(console.said("API Token: new-token"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn end_of_input_keeps_everything() {
        let (dir, store) = temp_store(&initial());
        let mut console = ScriptedConsole::new([None]);

        let saved = edit_configuration(&store, &mut console).unwrap();
        assert_eq!(saved, initial());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn editing_fills_empty_identifiers() {
        let mut empty = initial();
        empty.api_token.clear();
        let (dir, store) = temp_store(&empty);
        let mut console = ScriptedConsole::new([Some("  fresh  "), Some(""), Some("")]);

        let saved = edit_configuration(&store, &mut console).unwrap();
        assert_eq!(saved.api_token, "fresh");
        assert!(saved.is_complete());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
