//! Multi-turn conversation with a chatbot.
//!
//! The server threads follow-ups into one conversation through an opaque
//! `chatlogId`. The session holds the most recent one and forwards it
//! verbatim; `n` drops it to start over and `q` ends the session.

use tracing::{debug, info, instrument};

use wonderchat_client::{
    ApiClient, AttemptFailure, CallOutcome, ChatRequest, ChatResponse, RetryObserver,
};
use wonderchat_shared::{Configuration, Result};

use crate::console::Console;
use crate::trace::trace_call;

const FIRST_QUESTION_PROMPT: &str =
    "Enter your question ('q' to quit, 'n' to start a new conversation): ";
const FOLLOW_UP_PROMPT: &str =
    "Enter your follow-up question ('q' to quit, 'n' to start a new conversation): ";

// ---------------------------------------------------------------------------
// Session state machine
// ---------------------------------------------------------------------------

/// Where the session is in its conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No continuation token; the next question opens a conversation.
    AwaitingFirstQuestion,
    /// The next question is a follow-up carrying this token.
    AwaitingFollowUp(String),
    /// The operator quit.
    Terminated,
}

/// A chat session with one chatbot.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    chatbot_id: String,
    state: SessionState,
}

impl ConversationSession {
    pub fn new(chatbot_id: impl Into<String>) -> Self {
        Self {
            chatbot_id: chatbot_id.into(),
            state: SessionState::AwaitingFirstQuestion,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Token the next follow-up will carry, if any.
    pub fn continuation_token(&self) -> Option<&str> {
        match &self.state {
            SessionState::AwaitingFollowUp(token) => Some(token),
            _ => None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.state == SessionState::Terminated
    }

    /// Prompt matching the current state.
    pub fn prompt(&self) -> &'static str {
        match self.state {
            SessionState::AwaitingFollowUp(_) => FOLLOW_UP_PROMPT,
            _ => FIRST_QUESTION_PROMPT,
        }
    }

    /// Apply one line of operator input.
    ///
    /// `q` and `n` (any case) change state and return `None`. Anything else,
    /// a blank line included, is a question: the returned request carries the
    /// current token, and the state is left for [`Self::record_answer`].
    pub fn submit(&mut self, input: &str) -> Option<ChatRequest> {
        if self.is_terminated() {
            return None;
        }

        if input.eq_ignore_ascii_case("q") {
            self.terminate();
            return None;
        }
        if input.eq_ignore_ascii_case("n") {
            debug!("starting a new conversation");
            self.state = SessionState::AwaitingFirstQuestion;
            return None;
        }
        Some(match &self.state {
            SessionState::AwaitingFollowUp(token) => {
                ChatRequest::follow_up(&self.chatbot_id, input, token)
            }
            _ => ChatRequest::opening(&self.chatbot_id, input),
        })
    }

    /// Adopt the token from a successful answer.
    pub fn record_answer(&mut self, response: &ChatResponse) {
        if !self.is_terminated() {
            self.state = SessionState::AwaitingFollowUp(response.chatlog_id.clone());
        }
    }

    /// End the session, discarding any token.
    pub fn terminate(&mut self) {
        self.state = SessionState::Terminated;
    }
}

// ---------------------------------------------------------------------------
// Retry progress on the console
// ---------------------------------------------------------------------------

/// Prints each failed attempt and the exhaustion notice.
struct ConsoleRetryObserver<'a> {
    console: &'a mut dyn Console,
}

impl RetryObserver for ConsoleRetryObserver<'_> {
    fn attempt_failed(&mut self, attempt: u32, max_attempts: u32, failure: &AttemptFailure) {
        self.console.say("");
        self.console.say(&failure.to_string());
        if attempt < max_attempts {
            self.console
                .say(&format!("Attempt {attempt} of {max_attempts}. Retrying..."));
        } else {
            self.console
                .say(&format!("Attempt {attempt} of {max_attempts}."));
        }
    }

    fn exhausted(&mut self, attempts: u32) {
        self.console.say(&format!(
            "Failed to get a response after {attempts} retries. Returning to question prompt."
        ));
    }
}

// ---------------------------------------------------------------------------
// Chat loop
// ---------------------------------------------------------------------------

/// Run an interactive chat until the operator quits or input ends.
///
/// A turn whose retries are exhausted leaves the session as it was and goes
/// back to the prompt.
#[instrument(skip_all, fields(chatbot_id = %config.chatbot_id))]
pub async fn run_chat(
    config: &Configuration,
    api: &ApiClient,
    console: &mut dyn Console,
) -> Result<()> {
    if let Err(e) = config.ensure_complete() {
        console.say(&e.to_string());
        return Ok(());
    }

    let mut session = ConversationSession::new(config.chatbot_id.as_str());
    info!("chat session started");

    while !session.is_terminated() {
        let Some(input) = console.read_line(session.prompt())? else {
            session.terminate();
            break;
        };
        let Some(request) = session.submit(&input) else {
            continue;
        };

        let call = api.chat_call(&config.api_token, &request)?;
        if config.debug {
            trace_call(console, "API Query", &call)?;
        }

        console.busy("Waiting for the chatbot...");
        let outcome: CallOutcome<ChatResponse> = {
            let mut observer = ConsoleRetryObserver {
                console: &mut *console,
            };
            api.execute_with_retry(&call, &mut observer).await
        };
        console.idle();

        if let CallOutcome::Success(response) = outcome {
            console.say(&format!("Response: {}", response.response));
            session.record_answer(&response);
        }
    }

    info!("chat session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedConsole, client_for, request_bodies, test_config};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn answer(text: &str, chatlog_id: &str) -> ChatResponse {
        ChatResponse {
            response: text.into(),
            chatlog_id: chatlog_id.into(),
        }
    }

    fn chat_ok(text: &str, chatlog_id: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": text,
            "chatlogId": chatlog_id,
        }))
    }

    // -----------------------------------------------------------------------
    // State machine
    // -----------------------------------------------------------------------

    #[test]
    fn first_question_has_no_token() {
        let mut session = ConversationSession::new("bot");
        let request = session.submit("hello").unwrap();
        assert_eq!(request.chatlog_id, None);
        assert_eq!(session.state(), &SessionState::AwaitingFirstQuestion);
    }

    #[test]
    fn answer_moves_to_follow_up() {
        let mut session = ConversationSession::new("bot");
        session.submit("hello");
        session.record_answer(&answer("hi", "abc"));

        assert_eq!(session.continuation_token(), Some("abc"));
        assert_eq!(session.prompt(), FOLLOW_UP_PROMPT);
        let request = session.submit("and then?").unwrap();
        assert_eq!(request.chatlog_id.as_deref(), Some("abc"));
    }

    #[test]
    fn later_answer_replaces_token() {
        let mut session = ConversationSession::new("bot");
        session.record_answer(&answer("one", "abc"));
        session.record_answer(&answer("two", "def"));
        assert_eq!(session.continuation_token(), Some("def"));
    }

    #[test]
    fn new_conversation_discards_token() {
        let mut session = ConversationSession::new("bot");
        session.record_answer(&answer("hi", "abc"));

        assert!(session.submit("n").is_none());
        assert_eq!(session.state(), &SessionState::AwaitingFirstQuestion);
        assert_eq!(session.submit("again").unwrap().chatlog_id, None);
    }

    #[test]
    fn new_conversation_without_token_is_noop() {
        let mut session = ConversationSession::new("bot");
        assert!(session.submit("N").is_none());
        assert_eq!(session.state(), &SessionState::AwaitingFirstQuestion);
    }

    #[test]
    fn quit_terminates_from_any_state() {
        let mut session = ConversationSession::new("bot");
        assert!(session.submit("q").is_none());
        assert!(session.is_terminated());

        let mut session = ConversationSession::new("bot");
        session.record_answer(&answer("hi", "abc"));
        assert!(session.submit("Q").is_none());
        assert!(session.is_terminated());
        assert_eq!(session.continuation_token(), None);
    }

    #[test]
    fn blank_input_is_a_question() {
        let mut session = ConversationSession::new("bot");
        session.record_answer(&answer("hi", "abc"));
        let request = session.submit("").unwrap();
        assert_eq!(request.question, "");
        assert_eq!(request.chatlog_id.as_deref(), Some("abc"));
    }

    // -----------------------------------------------------------------------
    // Chat loop against a mock server
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn follow_up_forwards_returned_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .and(header("Authorization", "Bearer T"))
            .respond_with(chat_ok("Hello!", "abc"))
            .expect(2)
            .mount(&server)
            .await;

        let api = client_for(&server, 3);
        let mut console = ScriptedConsole::new([Some("hi"), Some("tell me more"), Some("q")]);
        run_chat(&test_config(false), &api, &mut console).await.unwrap();

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0]["chatbotId"], "B");
        assert_eq!(bodies[0]["question"], "hi");
        assert!(bodies[0].get("chatlogId").is_none());
        assert_eq!(bodies[1]["question"], "tell me more");
        assert_eq!(bodies[1]["chatlogId"], "abc");
        assert!(console.said("Response: Hello!"));
        assert_eq!(console.prompts[1], FOLLOW_UP_PROMPT);
    }

    #[tokio::test]
    async fn blank_question_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(chat_ok("Ask me anything.", "abc"))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server, 3);
        let mut console = ScriptedConsole::new([Some(""), Some("q")]);
        run_chat(&test_config(false), &api, &mut console).await.unwrap();

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["question"], "");
        assert!(console.said("Response: Ask me anything."));
    }

    #[tokio::test]
    async fn new_conversation_drops_token_from_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(chat_ok("Hello!", "abc"))
            .mount(&server)
            .await;

        let api = client_for(&server, 3);
        let mut console =
            ScriptedConsole::new([Some("hi"), Some("n"), Some("fresh start"), Some("q")]);
        run_chat(&test_config(false), &api, &mut console).await.unwrap();

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[1]["question"], "fresh start");
        assert!(bodies[1].get("chatlogId").is_none());
    }

    #[tokio::test]
    async fn follow_up_uses_most_recent_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(chat_ok("first", "abc"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(chat_ok("later", "def"))
            .mount(&server)
            .await;

        let api = client_for(&server, 3);
        let mut console = ScriptedConsole::new([Some("a"), Some("b"), Some("c"), Some("q")]);
        run_chat(&test_config(false), &api, &mut console).await.unwrap();

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies[1]["chatlogId"], "abc");
        assert_eq!(bodies[2]["chatlogId"], "def");
    }

    #[tokio::test]
    async fn exhausted_turn_returns_to_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .expect(3)
            .mount(&server)
            .await;

        let api = client_for(&server, 3);
        let mut console = ScriptedConsole::new([Some("hello?"), Some("q")]);
        run_chat(&test_config(false), &api, &mut console).await.unwrap();

        assert!(console.said("Status code: 500. Error in API response: overloaded"));
        assert!(console.said("Attempt 1 of 3. Retrying..."));
        assert!(console.said("Failed to get a response after 3 retries."));
        // The session asked again after exhaustion and consumed the quit.
        assert_eq!(console.prompts.len(), 2);
        assert_eq!(console.prompts[1], FIRST_QUESTION_PROMPT);
    }

    #[tokio::test]
    async fn exhausted_follow_up_keeps_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(chat_ok("first", "abc"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let api = client_for(&server, 2);
        let mut console = ScriptedConsole::new([Some("a"), Some("b"), Some("c"), Some("q")]);
        run_chat(&test_config(false), &api, &mut console).await.unwrap();

        let bodies = request_bodies(&server).await;
        // 1 success, then 2 failed attempts for "b", then 2 for "c".
        assert_eq!(bodies.len(), 5);
        assert_eq!(bodies[4]["question"], "c");
        assert_eq!(bodies[4]["chatlogId"], "abc");
        assert_eq!(console.prompts[2], FOLLOW_UP_PROMPT);
    }

    #[tokio::test]
    async fn debug_mode_traces_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(chat_ok("traced", "abc"))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server, 3);
        let mut console = ScriptedConsole::new([Some("hi"), Some(""), Some("q")]);
        run_chat(&test_config(true), &api, &mut console).await.unwrap();

        assert!(console.said("API Query:"));
        assert!(console.said("/api/v1/chat"));
        assert!(console.said("Bearer T"));
        assert_eq!(console.prompts[1], crate::trace::CONTINUE_PROMPT);
        assert_eq!(console.remaining(), 0);
    }

    #[tokio::test]
    async fn end_of_input_ends_session() {
        let server = MockServer::start().await;
        let api = client_for(&server, 3);
        let mut console = ScriptedConsole::new([None]);

        run_chat(&test_config(false), &api, &mut console).await.unwrap();
        assert!(request_bodies(&server).await.is_empty());
    }

    #[tokio::test]
    async fn incomplete_config_sends_nothing() {
        let server = MockServer::start().await;
        let api = client_for(&server, 3);
        let mut console = ScriptedConsole::new([Some("hi")]);
        let mut config = test_config(false);
        config.chatbot_id.clear();

        run_chat(&config, &api, &mut console).await.unwrap();
        assert!(console.said("must be valid"));
        assert!(console.prompts.is_empty());
        assert!(request_bodies(&server).await.is_empty());
    }
}
