//! Test doubles shared by the flow tests.

use std::collections::VecDeque;
use std::time::Duration;

use url::Url;
use wiremock::MockServer;
use wonderchat_client::{ApiClient, ClientSettings, RetryPolicy};
use wonderchat_shared::{Configuration, Result};

use crate::console::Console;

/// Console fed from a queue of lines. `None` entries are end-of-input; an
/// empty queue keeps returning end-of-input.
pub(crate) struct ScriptedConsole {
    inputs: VecDeque<Option<String>>,
    pub output: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<'a>(inputs: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        Self {
            inputs: inputs.into_iter().map(|i| i.map(String::from)).collect(),
            output: Vec::new(),
            prompts: Vec::new(),
        }
    }

    /// Any printed line contains `needle`.
    pub fn said(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    /// Lines still queued.
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.inputs.pop_front().flatten())
    }

    fn say(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}

/// Client against `server` with a fast, small retry budget.
pub(crate) fn client_for(server: &MockServer, max_attempts: u32) -> ApiClient {
    let base = Url::parse(&server.uri()).unwrap();
    let settings = ClientSettings::new(base)
        .with_retry(RetryPolicy::new(max_attempts, Duration::from_millis(1)));
    ApiClient::new(settings).unwrap()
}

pub(crate) fn test_config(debug: bool) -> Configuration {
    Configuration {
        api_token: "T".into(),
        chatbot_id: "B".into(),
        debug,
    }
}

/// JSON bodies of every request `server` received, in arrival order.
pub(crate) async fn request_bodies(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

/// Paths of every request `server` received, in arrival order.
pub(crate) async fn request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}
