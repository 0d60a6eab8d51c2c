//! Interactive flows for the WonderChat CLI.
//!
//! This crate ties the config store and the API client together into the
//! operator-facing workflows:
//! - [`conversation`] — multi-turn chat with continuation-token threading
//! - [`batch`] — add/remove/reindex of trained page URLs
//! - [`settings`] — interactive configuration editor
//! - [`menu`] — the top-level numbered menu
//!
//! All terminal I/O goes through the [`Console`] trait.

pub mod batch;
pub mod console;
pub mod conversation;
pub mod menu;
pub mod settings;
pub mod trace;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchMode, BatchReport, StepOutcome, UrlBatch, run_batch};
pub use console::Console;
pub use conversation::{ConversationSession, SessionState, run_chat};
pub use menu::{MenuChoice, MenuExit, run_menu};
pub use settings::edit_configuration;
