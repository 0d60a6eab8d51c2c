//! Bounded retry for conversational API calls.
//!
//! A call is attempted up to [`RetryPolicy::max_attempts`] times with a fixed
//! sleep between attempts. Every failure class is retried the same way: no
//! exponential growth, no jitter, no status-based short-circuit. Running out
//! of attempts yields [`CallOutcome::Exhausted`], which is a value and not an
//! error.

use std::fmt;
use std::time::Duration;

/// Attempt budget and fixed delay for [`crate::ApiClient::execute_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per logical call, including the first.
    pub max_attempts: u32,
    /// Sleep between consecutive attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Policy with the given budget. At least one attempt is always made.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(1))
    }
}

/// Why a single attempt did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The server answered with something other than 200.
    Status { status: u16, body: String },
    /// Timeout, connection failure, or an unreadable response.
    Transport(String),
    /// 200, but the body did not match the expected shape.
    Malformed(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, body } => {
                write!(f, "Status code: {status}. Error in API response: {body}")
            }
            Self::Transport(e) => write!(f, "An error occurred: {e}"),
            Self::Malformed(e) => write!(f, "Malformed API response: {e}"),
        }
    }
}

/// Result of a retried call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    /// A 200 response parsed into `T`.
    Success(T),
    /// Every attempt failed.
    Exhausted { attempts: u32 },
}

impl<T> CallOutcome<T> {
    /// The payload, or `None` when exhausted.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Receives per-attempt progress from the executor.
pub trait RetryObserver {
    /// Attempt `attempt` (1-based) of `max_attempts` failed.
    fn attempt_failed(&mut self, attempt: u32, max_attempts: u32, failure: &AttemptFailure);
    /// All `attempts` failed; the executor is about to return.
    fn exhausted(&mut self, attempts: u32);
}

/// No-op observer for headless/test usage.
pub struct SilentRetry;

impl RetryObserver for SilentRetry {
    fn attempt_failed(&mut self, _attempt: u32, _max_attempts: u32, _failure: &AttemptFailure) {}
    fn exhausted(&mut self, _attempts: u32) {}
}
