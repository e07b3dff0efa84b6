//! Session root: owns every controller and the active-view selector.

use crate::backend::DocumentApi;
use crate::session::{
    chat::ChatController,
    search::SearchController,
    stats::StatsSync,
    types::UploadStatus,
    upload::{BatchSummary, SelectedFile, UploadOrchestrator},
};

/// Workflow currently presented. Switching never touches controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveView {
    /// Document upload and recent uploads.
    #[default]
    Upload,
    /// Semantic search.
    Search,
    /// Question answering.
    Chat,
}

impl ActiveView {
    /// Short label used in prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Search => "search",
            Self::Chat => "chat",
        }
    }
}

/// All client-held state for one session, built fresh per session.
///
/// The controllers share nothing except the document service handle; the upload orchestrator
/// drives the stats refresh after each successful file. The convenience methods below hold the
/// whole session for the duration of a request. Callers that run workflows side by side borrow
/// the parts separately through [`Session::split_mut`].
pub struct Session<A> {
    api: A,
    view: ActiveView,
    stats: StatsSync,
    uploads: UploadOrchestrator,
    search: SearchController,
    chat: ChatController,
}

/// Disjoint borrows of a [`Session`], one per workflow plus the shared service handle.
pub struct Workflows<'a, A> {
    /// Document service handle.
    pub api: &'a A,
    /// Corpus stats state.
    pub stats: &'a mut StatsSync,
    /// Upload log and status.
    pub uploads: &'a mut UploadOrchestrator,
    /// Search state.
    pub search: &'a mut SearchController,
    /// Conversation state.
    pub chat: &'a mut ChatController,
}

impl<A> Session<A>
where
    A: DocumentApi,
{
    /// Create a session on top of a document service handle.
    pub fn new(api: A) -> Self {
        Self {
            api,
            view: ActiveView::default(),
            stats: StatsSync::new(),
            uploads: UploadOrchestrator::new(),
            search: SearchController::new(),
            chat: ChatController::new(),
        }
    }

    /// Initial load: fetch the corpus stats once.
    pub async fn mount(&mut self) {
        self.stats.refresh(&self.api).await;
    }

    /// Document service handle.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Currently presented workflow.
    pub fn active_view(&self) -> ActiveView {
        self.view
    }

    /// Present another workflow.
    pub fn select(&mut self, view: ActiveView) {
        tracing::debug!(view = view.label(), "Switched view");
        self.view = view;
    }

    /// Corpus stats state.
    pub fn stats(&self) -> &StatsSync {
        &self.stats
    }

    /// Upload log and status.
    pub fn uploads(&self) -> &UploadOrchestrator {
        &self.uploads
    }

    /// Search state.
    pub fn search(&self) -> &SearchController {
        &self.search
    }

    /// Mutable search state, for callers driving the two-phase API.
    pub fn search_mut(&mut self) -> &mut SearchController {
        &mut self.search
    }

    /// Conversation state.
    pub fn chat(&self) -> &ChatController {
        &self.chat
    }

    /// Mutable conversation state, for callers driving the two-phase API.
    pub fn chat_mut(&mut self) -> &mut ChatController {
        &mut self.chat
    }

    /// Borrow every workflow at once so they can progress independently.
    pub fn split_mut(&mut self) -> Workflows<'_, A> {
        Workflows {
            api: &self.api,
            stats: &mut self.stats,
            uploads: &mut self.uploads,
            search: &mut self.search,
            chat: &mut self.chat,
        }
    }

    /// Upload a batch sequentially; see [`UploadOrchestrator::upload_batch`].
    pub async fn upload<I, F>(&mut self, files: I, on_status: F) -> BatchSummary
    where
        I: IntoIterator,
        I::Item: Into<SelectedFile>,
        F: FnMut(&UploadStatus),
    {
        self.uploads
            .upload_batch(&self.api, &mut self.stats, files, on_status)
            .await
    }

    /// Type `query` into the search input and submit it.
    pub async fn run_search(&mut self, query: &str) -> bool {
        self.search.set_input(query);
        self.search.submit(&self.api).await
    }

    /// Type `question` into the chat input and submit it.
    pub async fn ask(&mut self, question: &str) -> bool {
        self.chat.set_input(question);
        self.chat.submit(&self.api).await
    }
}
