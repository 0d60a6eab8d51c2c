//! Debug-mode request trace.
//!
//! With `debug` set in the configuration, every request is printed in full
//! and the operator must acknowledge it before it is sent. This is an
//! interactive pause, not a log sink.

use wonderchat_shared::{ApiCallRecord, Result};

use crate::console::Console;

/// Prompt shown while waiting for acknowledgment.
pub const CONTINUE_PROMPT: &str = "\nPress Enter to continue...";

/// Print `call` under `title` and block until the operator presses Enter.
/// End of input counts as acknowledgment.
pub fn trace_call(console: &mut dyn Console, title: &str, call: &ApiCallRecord) -> Result<()> {
    console.say("");
    console.say(&format!("{title}:"));
    console.say(&format!("Endpoint: {}", call.endpoint));
    console.say(&format!("Headers: {}", call.headers_display()));
    console.say(&format!("Data: {}", call.payload_pretty()));

    tracing::debug!(endpoint = %call.endpoint, "waiting for debug acknowledgment");
    console.read_line(CONTINUE_PROMPT)?;
    Ok(())
}
