//! Retrieval-augmented conversation with the document service.

use crate::backend::{ApiError, AskRequest, AskResponse, DocumentApi, HistoryTurn};
use crate::session::types::{ChatTurn, HISTORY_WINDOW, TOP_K};

const RESPONSE_FAILED: &str = "Failed to get response";

/// Conversation log plus input line for one session.
///
/// The user turn is appended as soon as a question is submitted. Exactly one assistant turn
/// follows each request: the answer, or an error-flagged turn. Turns are never edited or
/// removed. Outcomes of overlapping requests are appended in arrival order.
#[derive(Debug, Default)]
pub struct ChatController {
    turns: Vec<ChatTurn>,
    input: String,
    in_flight: usize,
}

/// Question issued by [`ChatController::begin_ask`].
#[derive(Debug, Clone)]
pub struct PendingAsk {
    request: AskRequest,
}

/// Response (or failure) for one [`PendingAsk`].
#[derive(Debug)]
pub struct AskOutcome {
    result: Result<AskResponse, ApiError>,
}

impl PendingAsk {
    /// Request body that will be sent.
    pub fn request(&self) -> &AskRequest {
        &self.request
    }

    /// Issue the question request.
    pub async fn execute<A>(self, api: &A) -> AskOutcome
    where
        A: DocumentApi + ?Sized,
    {
        AskOutcome {
            result: api.ask(&self.request).await,
        }
    }
}

impl ChatController {
    /// Empty conversation, idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full conversation log, oldest first.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Current contents of the question input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the question input.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether any question is awaiting its answer.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Submit the current input as a question.
    ///
    /// Returns `None` without touching state when the input is blank. Otherwise the history
    /// window is captured from the turns that existed before this submission, the user turn is
    /// appended, and the input is cleared.
    pub fn begin_ask(&mut self) -> Option<PendingAsk> {
        if self.input.trim().is_empty() {
            return None;
        }

        let query = std::mem::take(&mut self.input);
        let conversation_history = history_window(&self.turns);
        self.turns.push(ChatTurn::user(query.clone()));
        self.in_flight += 1;

        Some(PendingAsk {
            request: AskRequest {
                query,
                top_k: TOP_K,
                conversation_history,
            },
        })
    }

    /// Append the assistant turn for a finished request.
    pub fn finish(&mut self, outcome: AskOutcome) {
        let turn = match outcome.result {
            Ok(response) => {
                tracing::debug!(
                    sources = response.sources.as_ref().map_or(0, Vec::len),
                    "Answer received"
                );
                ChatTurn::answer(response.answer, response.sources)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Question failed");
                if error.is_transport() {
                    ChatTurn::error(format!("Error: {error}"))
                } else {
                    ChatTurn::error(format!(
                        "Error: {}",
                        error.detail().unwrap_or(RESPONSE_FAILED)
                    ))
                }
            }
        };
        self.turns.push(turn);
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Ask the current input and append the answer. Returns `false` when the input was blank.
    pub async fn submit<A>(&mut self, api: &A) -> bool
    where
        A: DocumentApi + ?Sized,
    {
        let Some(pending) = self.begin_ask() else {
            return false;
        };
        let outcome = pending.execute(api).await;
        self.finish(outcome);
        true
    }
}

/// Trailing [`HISTORY_WINDOW`] turns in original order.
pub fn history_window(turns: &[ChatTurn]) -> Vec<HistoryTurn> {
    let start = turns.len().saturating_sub(HISTORY_WINDOW);
    turns[start..].iter().map(HistoryTurn::from).collect()
}
