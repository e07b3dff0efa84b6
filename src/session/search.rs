//! Single-query semantic search over the indexed corpus.

use crate::backend::{ApiError, DocumentApi, SearchRequest, SearchResult};
use crate::session::types::TOP_K;

/// Search state for one session: the input line, the current result list, and the in-flight flag.
///
/// A submission is split in two phases so the request can run without borrowing the
/// controller: [`SearchController::begin_search`] updates state and returns a [`PendingSearch`],
/// and [`SearchController::apply`] installs the outcome. Every submission takes a new ticket;
/// outcomes for anything but the newest ticket are dropped, so a slow response can never
/// overwrite the results of a later query.
#[derive(Debug, Default)]
pub struct SearchController {
    input: String,
    results: Vec<SearchResult>,
    searching: bool,
    last_submitted: Option<String>,
    latest_ticket: u64,
}

/// A search request issued by [`SearchController::begin_search`].
#[derive(Debug, Clone)]
pub struct PendingSearch {
    ticket: u64,
    request: SearchRequest,
}

/// Response (or failure) for one [`PendingSearch`].
#[derive(Debug)]
pub struct SearchOutcome {
    ticket: u64,
    result: Result<Vec<SearchResult>, ApiError>,
}

impl PendingSearch {
    /// Request body that will be sent.
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    /// Issue the retrieval request.
    pub async fn execute<A>(self, api: &A) -> SearchOutcome
    where
        A: DocumentApi + ?Sized,
    {
        let result = api.semantic_search(&self.request).await;
        SearchOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

impl SearchController {
    /// Empty input, no results, idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of the query input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the query input.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Ranked results of the latest applied search, in server order.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Whether the newest submission is still awaiting its response.
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Query text of the newest submission.
    pub fn last_submitted(&self) -> Option<&str> {
        self.last_submitted.as_deref()
    }

    /// Whether the empty-state message applies: a real query was submitted, it has settled,
    /// and it produced nothing.
    pub fn shows_no_results(&self) -> bool {
        self.results.is_empty()
            && !self.searching
            && self
                .last_submitted
                .as_deref()
                .is_some_and(|query| !query.trim().is_empty())
    }

    /// Start a search for the current input.
    ///
    /// Returns `None` without touching any state when the input is blank. Otherwise clears the
    /// result list, enters the searching state, and hands back the request to execute.
    pub fn begin_search(&mut self) -> Option<PendingSearch> {
        if self.input.trim().is_empty() {
            return None;
        }

        self.latest_ticket += 1;
        self.results.clear();
        self.searching = true;
        self.last_submitted = Some(self.input.clone());

        Some(PendingSearch {
            ticket: self.latest_ticket,
            request: SearchRequest {
                query: self.input.clone(),
                top_k: TOP_K,
            },
        })
    }

    /// Install an outcome. Returns `false` when it belongs to a superseded submission.
    ///
    /// Failures are logged and leave an empty result list; nothing else is surfaced.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.ticket < self.latest_ticket {
            tracing::debug!(
                ticket = outcome.ticket,
                latest = self.latest_ticket,
                "Discarding superseded search response"
            );
            return false;
        }

        self.results = match outcome.result {
            Ok(results) => {
                tracing::debug!(results = results.len(), "Search completed");
                results
            }
            Err(error) => {
                tracing::warn!(error = %error, "Search error");
                Vec::new()
            }
        };
        self.searching = false;
        true
    }

    /// Run a full search for the current input. Returns `false` when the input was blank.
    pub async fn submit<A>(&mut self, api: &A) -> bool
    where
        A: DocumentApi + ?Sized,
    {
        let Some(pending) = self.begin_search() else {
            return false;
        };
        let outcome = pending.execute(api).await;
        self.apply(outcome)
    }
}
