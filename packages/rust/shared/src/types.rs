//! Request types shared between the HTTP client and the interactive flows.

use serde::Serialize;

/// A fully-constructed outbound API call.
///
/// The same record is echoed in debug mode and then sent, so the trace shows
/// exactly what goes on the wire. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiCallRecord {
    /// Absolute endpoint URL.
    pub endpoint: String,
    /// Request headers, in send order.
    pub headers: Vec<(String, String)>,
    /// JSON request body.
    pub payload: serde_json::Value,
}

impl ApiCallRecord {
    /// Render the headers the way the debug trace prints them.
    pub fn headers_display(&self) -> String {
        let pairs: Vec<String> = self
            .headers
            .iter()
            .map(|(key, value)| format!("'{key}': '{value}'"))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }

    /// Pretty-printed JSON body.
    pub fn payload_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.payload).unwrap_or_else(|_| self.payload.to_string())
    }
}
