//! Wire types and errors shared by the document service client and its callers.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned while talking to the document service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before a usable response arrived (connect, send, or body decode).
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    /// A selected local file could not be read, so no request was sent.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// The service completed the request but reported a failure.
    #[error("Unexpected response ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Application {
        /// HTTP status returned by the service.
        status: StatusCode,
        /// Contents of the `detail` field, when the body carried one.
        detail: Option<String>,
    },
}

impl ApiError {
    /// Whether the request never completed (as opposed to a server-reported failure).
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Application { .. })
    }

    /// Server-supplied failure detail, only present for application errors.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Application { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// A document ready to be sent to the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name reported in the multipart part.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Build an upload from in-memory contents.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a local file, using its final path component as the upload name.
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            filename: file_name_of(path),
            bytes,
        })
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Successful ingestion result, kept as an immutable record of the upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFileRecord {
    /// Name the service recorded for the document.
    pub filename: String,
    /// Number of chunks the service produced.
    pub chunks_created: u64,
    /// Size of the uploaded document in bytes.
    #[serde(rename = "size")]
    pub size_bytes: u64,
    /// Document type detected by the service.
    pub file_type: String,
}

/// Aggregate counters describing the indexed corpus.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CorpusStats {
    /// Number of chunks currently indexed.
    pub total_chunks: u64,
    /// Backing collection name, when reported.
    #[serde(default)]
    pub collection_name: Option<String>,
    /// Any further counters the service includes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /search/semantic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Free-text query, sent as typed.
    pub query: String,
    /// Maximum number of ranked results.
    pub top_k: usize,
}

/// One ranked passage returned by semantic search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    /// Source document name.
    pub filename: String,
    /// Index of the chunk within its document.
    pub chunk_index: u64,
    /// Similarity in `[0, 1]`; lists arrive sorted descending.
    pub relevance_score: f64,
    /// Leading excerpt of the chunk text.
    pub text_preview: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) results: Vec<SearchResult>,
}

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Turn typed by the person using the client.
    User,
    /// Turn produced from a service response or failure.
    Assistant,
}

/// Prior turn transmitted as conversational context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryTurn {
    /// Speaker of the turn.
    pub role: Role,
    /// Turn text.
    pub content: String,
}

/// Body of `POST /search/ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    /// Question text.
    pub query: String,
    /// Maximum number of passages retrieved for the answer.
    pub top_k: usize,
    /// Trailing window of turns that preceded this question.
    pub conversation_history: Vec<HistoryTurn>,
}

/// Citation attached to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceRef {
    /// Cited document.
    pub filename: String,
    /// Cited chunk within the document.
    pub chunk_index: u64,
}

/// Answer returned by `POST /search/ask`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AskResponse {
    /// Generated answer text.
    pub answer: String,
    /// Ordered citations backing the answer.
    #[serde(default)]
    pub sources: Option<Vec<SourceRef>>,
}

/// Readiness of the retrieval and generation stack.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    /// `healthy` or `degraded`.
    pub status: String,
    /// Whether the generation backend answered its probe.
    #[serde(default)]
    pub ollama_available: bool,
    /// Chunk count seen by the search service.
    #[serde(default)]
    pub indexed_chunks: Option<u64>,
    /// Embedding model in use.
    #[serde(default)]
    pub embedding_model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) detail: Option<Value>,
}

impl ErrorBody {
    /// Validation failures carry a structured `detail`; keep those as compact JSON.
    pub(crate) fn into_detail(self) -> Option<String> {
        match self.detail? {
            Value::String(text) => Some(text),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
