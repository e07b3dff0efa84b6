//! Scripted `DocumentApi` used by the controller tests.

use crate::backend::{
    ApiError, AskRequest, AskResponse, CorpusStats, DocumentApi, HealthReport, SearchRequest,
    SearchResult, SourceRef, UploadFile, UploadedFileRecord,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Map;
use std::collections::VecDeque;
use tokio::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Upload(String),
    Stats,
    Search(SearchRequest),
    Ask(AskRequest),
    Health,
}

/// Replays queued responses per endpoint and records every call in order.
///
/// Empty queues fall back to a benign success so tests only script what they assert on.
#[derive(Default)]
pub(crate) struct StubApi {
    uploads: Mutex<VecDeque<Result<UploadedFileRecord, ApiError>>>,
    stats: Mutex<VecDeque<Result<CorpusStats, ApiError>>>,
    searches: Mutex<VecDeque<Result<Vec<SearchResult>, ApiError>>>,
    answers: Mutex<VecDeque<Result<AskResponse, ApiError>>>,
    calls: Mutex<Vec<Call>>,
}

impl StubApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn unreachable() -> ApiError {
        ApiError::Io {
            path: "stub".into(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        }
    }

    pub(crate) fn rejected(detail: &str) -> ApiError {
        ApiError::Application {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: Some(detail.to_string()),
        }
    }

    pub(crate) fn record(filename: &str, chunks_created: u64) -> UploadedFileRecord {
        UploadedFileRecord {
            filename: filename.to_string(),
            chunks_created,
            size_bytes: 2048,
            file_type: "markdown".into(),
        }
    }

    pub(crate) fn hit(filename: &str, chunk_index: u64, score: f64) -> SearchResult {
        SearchResult {
            filename: filename.to_string(),
            chunk_index,
            relevance_score: score,
            text_preview: format!("{filename} chunk {chunk_index}..."),
        }
    }

    pub(crate) fn source(filename: &str, chunk_index: u64) -> SourceRef {
        SourceRef {
            filename: filename.to_string(),
            chunk_index,
        }
    }

    pub(crate) async fn push_upload(&self, result: Result<UploadedFileRecord, ApiError>) {
        self.uploads.lock().await.push_back(result);
    }

    pub(crate) async fn push_stats(&self, result: Result<u64, ApiError>) {
        let result = result.map(|total_chunks| CorpusStats {
            total_chunks,
            collection_name: Some("documents".into()),
            extra: Map::new(),
        });
        self.stats.lock().await.push_back(result);
    }

    pub(crate) async fn push_search(&self, result: Result<Vec<SearchResult>, ApiError>) {
        self.searches.lock().await.push_back(result);
    }

    pub(crate) async fn push_answer(&self, result: Result<AskResponse, ApiError>) {
        self.answers.lock().await.push_back(result);
    }

    pub(crate) async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn log(&self, call: Call) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl DocumentApi for StubApi {
    async fn upload_document(&self, file: &UploadFile) -> Result<UploadedFileRecord, ApiError> {
        self.log(Call::Upload(file.filename.clone())).await;
        self.uploads
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Self::record(&file.filename, 1)))
    }

    async fn fetch_stats(&self) -> Result<CorpusStats, ApiError> {
        self.log(Call::Stats).await;
        self.stats.lock().await.pop_front().unwrap_or_else(|| {
            Ok(CorpusStats {
                total_chunks: 0,
                collection_name: None,
                extra: Map::new(),
            })
        })
    }

    async fn semantic_search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchResult>, ApiError> {
        self.log(Call::Search(request.clone())).await;
        self.searches
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ApiError> {
        self.log(Call::Ask(request.clone())).await;
        self.answers.lock().await.pop_front().unwrap_or_else(|| {
            Ok(AskResponse {
                answer: "ok".into(),
                sources: None,
            })
        })
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        self.log(Call::Health).await;
        Ok(HealthReport {
            status: "healthy".into(),
            ollama_available: true,
            indexed_chunks: Some(0),
            embedding_model: None,
        })
    }
}
