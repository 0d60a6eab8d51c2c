//! Shared types, error model, and configuration for the WonderChat CLI.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`WonderchatError`] — the unified error type
//! - [`Configuration`] and [`ConfigStore`] — the persisted settings file
//! - [`validate_page_url`] — the URL check applied to every batch entry
//! - [`ApiCallRecord`] — a fully-built outbound request

pub mod config;
pub mod error;
pub mod types;
pub mod validate;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ConfigStore, Configuration, DEFAULT_CONFIG_FILE, PLACEHOLDER_API_TOKEN,
    PLACEHOLDER_CHATBOT_ID,
};
pub use error::{Result, WonderchatError};
pub use types::ApiCallRecord;
pub use validate::validate_page_url;
