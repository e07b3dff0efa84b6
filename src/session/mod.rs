//! Client-side orchestration of the upload, search, and chat workflows.

pub mod chat;
pub mod search;
pub mod stats;
pub mod types;
pub mod upload;
mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::{AskOutcome, ChatController, PendingAsk, history_window};
pub use search::{PendingSearch, SearchController, SearchOutcome};
pub use stats::StatsSync;
pub use types::{
    ChatTurn, HISTORY_WINDOW, RECENT_UPLOADS, TOP_K, UploadStatus, UploadStatusKind,
};
pub use upload::{
    BatchSummary, PendingUpload, SUPPORTED_EXTENSIONS, SelectedFile, UploadOrchestrator,
    UploadOutcome, is_supported_file,
};
pub use view::{ActiveView, Session, Workflows};
