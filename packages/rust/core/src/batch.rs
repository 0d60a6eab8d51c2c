//! Batch add/remove/reindex of the URLs a chatbot is trained on.
//!
//! All three modes share one workflow: collect lines until end of input,
//! keep the valid URLs, echo them, require an explicit `yes`, then send.
//! Reindex is a delete-pages call followed by an add-pages call with the
//! same batch; the second step runs whatever the first one returned.
//!
//! Page calls are sent once. There is no retry and no rollback.

use tracing::{debug, info, instrument};

use wonderchat_client::{ApiClient, PageCallOutcome, PageEndpoint, PageRequest};
use wonderchat_shared::{Configuration, Result, validate_page_url};

use crate::console::Console;
use crate::trace::trace_call;

// ---------------------------------------------------------------------------
// Modes and steps
// ---------------------------------------------------------------------------

/// Which mutation to apply to the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    Add,
    Remove,
    Reindex,
}

/// One API call of a batch mode, with its operator messages.
#[derive(Debug, Clone, Copy)]
pub struct BatchStep {
    pub endpoint: PageEndpoint,
    trace_title: &'static str,
    success: &'static str,
    failure: &'static str,
}

const ADD_STEPS: [BatchStep; 1] = [BatchStep {
    endpoint: PageEndpoint::AddPages,
    trace_title: "API Call Details",
    success: "URLs added successfully.",
    failure: "Error in API response: ",
}];

const REMOVE_STEPS: [BatchStep; 1] = [BatchStep {
    endpoint: PageEndpoint::DeletePages,
    trace_title: "API Call Details",
    success: "URLs removed successfully.",
    failure: "Error in API response: ",
}];

const REINDEX_STEPS: [BatchStep; 2] = [
    BatchStep {
        endpoint: PageEndpoint::DeletePages,
        trace_title: "API Call Details for Remove",
        success: "Pages removed successfully.",
        failure: "Error in API response while removing pages: ",
    },
    BatchStep {
        endpoint: PageEndpoint::AddPages,
        trace_title: "API Call Details for Add",
        success: "Pages reindexed successfully.",
        failure: "Error in API response while reindexing pages: ",
    },
];

impl BatchMode {
    /// Calls issued for this mode, in order.
    pub fn steps(&self) -> &'static [BatchStep] {
        match self {
            Self::Add => &ADD_STEPS,
            Self::Remove => &REMOVE_STEPS,
            Self::Reindex => &REINDEX_STEPS,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Reindex => "reindex",
        }
    }

    fn gerund(&self) -> &'static str {
        match self {
            Self::Add => "adding",
            Self::Remove => "removing",
            Self::Reindex => "reindexing",
        }
    }

    fn participle(&self) -> &'static str {
        match self {
            Self::Add => "added",
            Self::Remove => "removed",
            Self::Reindex => "reindexed",
        }
    }
}

// ---------------------------------------------------------------------------
// UrlBatch
// ---------------------------------------------------------------------------

/// Validated URLs in entry order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlBatch {
    urls: Vec<String>,
}

impl UrlBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `line` and append it. Returns the operator-facing reason on
    /// rejection; the batch is unchanged in that case.
    pub fn offer(&mut self, line: &str) -> std::result::Result<(), String> {
        let candidate = line.trim();
        match validate_page_url(candidate) {
            Ok(_) => {
                self.urls.push(candidate.to_string());
                Ok(())
            }
            Err(e) => {
                debug!(candidate, "skipping invalid url");
                Err(e.to_string())
            }
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Read URL lines until end of input, reporting and dropping invalid ones.
pub fn collect_urls(console: &mut dyn Console, mode: BatchMode) -> Result<UrlBatch> {
    console.say("");
    console.say(&format!(
        "Enter URLs to {} (one URL per line, end with Ctrl+D):",
        mode.verb()
    ));

    let mut batch = UrlBatch::new();
    while let Some(line) = console.read_line("")? {
        if let Err(reason) = batch.offer(&line) {
            console.say(&reason);
        }
    }
    Ok(batch)
}

/// Only `yes`, ignoring case and surrounding whitespace, confirms.
pub fn is_confirmation(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

// ---------------------------------------------------------------------------
// Running a batch
// ---------------------------------------------------------------------------

/// Outcome of one step of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub endpoint: PageEndpoint,
    pub outcome: PageCallOutcome,
}

/// How a batch operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchReport {
    /// No valid URL was entered. The operator is never asked to confirm and
    /// nothing is sent.
    Empty,
    /// The operator did not confirm; nothing was sent.
    Cancelled,
    /// Every step was sent, in order.
    Submitted(Vec<StepOutcome>),
}

/// Collect, confirm, and submit a URL batch in `mode`.
#[instrument(skip_all, fields(mode = ?mode, chatbot_id = %config.chatbot_id))]
pub async fn run_batch(
    mode: BatchMode,
    config: &Configuration,
    api: &ApiClient,
    console: &mut dyn Console,
) -> Result<BatchReport> {
    if let Err(e) = config.ensure_complete() {
        console.say(&e.to_string());
        return Ok(BatchReport::Cancelled);
    }

    let batch = collect_urls(console, mode)?;
    if batch.is_empty() {
        console.say("");
        console.say("No valid URLs entered.");
        return Ok(BatchReport::Empty);
    }

    console.say("");
    console.say(&format!("URLs to be {}:", mode.participle()));
    for url in batch.urls() {
        console.say(url);
    }

    let prompt = format!("\nDo you confirm {} these URLs? (yes/no): ", mode.gerund());
    let answer = console.read_line(&prompt)?.unwrap_or_default();
    if !is_confirmation(&answer) {
        info!("batch cancelled by operator");
        console.say("Operation cancelled.");
        return Ok(BatchReport::Cancelled);
    }

    let request = PageRequest {
        api_key: config.api_token.clone(),
        chatbot_id: config.chatbot_id.clone(),
        urls: batch.urls().to_vec(),
    };

    let mut outcomes = Vec::with_capacity(mode.steps().len());
    for step in mode.steps() {
        let call = api.page_call(step.endpoint, &request)?;
        if config.debug {
            trace_call(console, step.trace_title, &call)?;
        }

        console.busy("Sending...");
        let outcome = api.send_once(&call).await;
        console.idle();

        match outcome.failure_detail() {
            None => console.say(step.success),
            Some(detail) => {
                console.say("");
                console.say(&format!("{}{detail}", step.failure));
            }
        }

        outcomes.push(StepOutcome {
            endpoint: step.endpoint,
            outcome,
        });
    }

    info!(urls = batch.len(), steps = outcomes.len(), "batch submitted");
    Ok(BatchReport::Submitted(outcomes))
}
