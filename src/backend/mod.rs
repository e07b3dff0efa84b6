//! Document service integration: wire types and the HTTP client.

pub mod client;
pub mod types;

pub use client::{DocumentApi, DocumentApiClient};
pub use types::{
    ApiError, AskRequest, AskResponse, CorpusStats, HealthReport, HistoryTurn, Role,
    SearchRequest, SearchResult, SourceRef, UploadFile, UploadedFileRecord,
};
