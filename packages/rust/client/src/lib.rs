//! HTTP client for the WonderChat API.
//!
//! This crate provides:
//! - [`wire`] — request/response bodies for the chat and page endpoints
//! - [`ApiClient`] — builds [`ApiCallRecord`]s and sends them
//! - [`retry`] — the bounded-retry executor used by conversations
//!
//! Page mutations are sent once via [`ApiClient::send_once`]; only chat
//! calls go through [`ApiClient::execute_with_retry`].
//!
//! [`ApiCallRecord`]: wonderchat_shared::ApiCallRecord

pub mod client;
pub mod retry;
pub mod wire;

pub use client::{
    ApiClient, CHAT_PATH, ClientSettings, DEFAULT_API_BASE, PageCallOutcome, PageEndpoint,
    REQUEST_TIMEOUT,
};
pub use retry::{AttemptFailure, CallOutcome, RetryObserver, RetryPolicy, SilentRetry};
pub use wire::{ChatRequest, ChatResponse, PageRequest};
