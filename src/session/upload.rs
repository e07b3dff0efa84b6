//! Sequential upload of user-selected documents.
//!
//! Files are pushed through the ingestion endpoint one at a time, in selection order. The
//! single-slot [`UploadStatus`] therefore always describes exactly one file, and the stats
//! refresh triggered by each success happens in completion order. A batch takes the sum of the
//! per-file latencies.

use crate::backend::{
    ApiError, DocumentApi, UploadFile, UploadedFileRecord, types::file_name_of,
};
use crate::session::stats::StatsSync;
use crate::session::types::{RECENT_UPLOADS, UploadStatus};
use std::path::{Path, PathBuf};

/// Extensions offered by the file picker. Advisory only; the service decides acceptance.
pub const SUPPORTED_EXTENSIONS: [&str; 14] = [
    "md", "txt", "pdf", "py", "js", "ts", "tsx", "jsx", "java", "go", "rs", "cpp", "c", "h",
];

const UPLOAD_FAILED: &str = "Upload failed";

/// Whether `path` carries one of the [`SUPPORTED_EXTENSIONS`] (case-insensitive).
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// A file chosen for upload, either still on disk or already in memory.
#[derive(Debug, Clone)]
pub enum SelectedFile {
    /// Read lazily when its turn in the batch comes up.
    Path(PathBuf),
    /// Contents already loaded.
    Loaded(UploadFile),
}

impl SelectedFile {
    /// Name shown in status messages.
    pub fn display_name(&self) -> String {
        match self {
            Self::Path(path) => file_name_of(path),
            Self::Loaded(file) => file.filename.clone(),
        }
    }

    async fn load(self) -> Result<UploadFile, ApiError> {
        match self {
            Self::Path(path) => UploadFile::from_path(&path).await,
            Self::Loaded(file) => Ok(file),
        }
    }
}

impl From<PathBuf> for SelectedFile {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<UploadFile> for SelectedFile {
    fn from(file: UploadFile) -> Self {
        Self::Loaded(file)
    }
}

/// Counters describing one processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files taken from the selection.
    pub attempted: usize,
    /// Files the service ingested.
    pub succeeded: usize,
    /// Files that ended in a transport or service error.
    pub failed: usize,
}

/// Owns the upload log and the current status banner for one session.
#[derive(Debug, Default)]
pub struct UploadOrchestrator {
    records: Vec<UploadedFileRecord>,
    status: Option<UploadStatus>,
    uploading: bool,
}

impl UploadOrchestrator {
    /// Start with an empty log and no status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every successful upload of the session, oldest first.
    pub fn records(&self) -> &[UploadedFileRecord] {
        &self.records
    }

    /// The last [`RECENT_UPLOADS`] records, most recent first.
    pub fn recent(&self) -> impl Iterator<Item = &UploadedFileRecord> {
        self.records.iter().rev().take(RECENT_UPLOADS)
    }

    /// Status of the most recently attempted file.
    pub fn status(&self) -> Option<&UploadStatus> {
        self.status.as_ref()
    }

    /// Whether a file request is currently in flight.
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Start uploading one file: enter the loading state and hand back the request to execute.
    pub fn begin_upload(&mut self, file: impl Into<SelectedFile>) -> PendingUpload {
        let file = file.into();
        let name = file.display_name();
        self.uploading = true;
        self.status = Some(UploadStatus::loading(&name));
        PendingUpload { name, file }
    }

    /// Record the outcome of one file. Returns `true` when the service ingested it.
    ///
    /// Successes are appended to the log; failures only replace the status.
    pub fn finish_upload(&mut self, outcome: UploadOutcome) -> bool {
        let UploadOutcome { name, result } = outcome;
        self.uploading = false;

        match result {
            Ok(record) => {
                tracing::info!(
                    filename = %name,
                    chunks = record.chunks_created,
                    size = record.size_bytes,
                    "Document uploaded"
                );
                self.status = Some(UploadStatus::success(&name, record.chunks_created));
                self.records.push(record);
                true
            }
            Err(error) => {
                tracing::warn!(filename = %name, error = %error, "Document upload failed");
                let message = if error.is_transport() {
                    format!("✗ Upload failed: {error}")
                } else {
                    format!("✗ Error: {}", error.detail().unwrap_or(UPLOAD_FAILED))
                };
                self.status = Some(UploadStatus::error(message));
                false
            }
        }
    }

    /// Upload `files` one at a time, in order.
    ///
    /// `on_status` observes every status transition as it happens. Successful uploads are
    /// appended to the log and followed by a stats refresh; failures only update the status
    /// and the batch moves on to the next file.
    pub async fn upload_batch<A, I, F>(
        &mut self,
        api: &A,
        stats: &mut StatsSync,
        files: I,
        mut on_status: F,
    ) -> BatchSummary
    where
        A: DocumentApi + ?Sized,
        I: IntoIterator,
        I::Item: Into<SelectedFile>,
        F: FnMut(&UploadStatus),
    {
        let mut summary = BatchSummary::default();

        for file in files {
            summary.attempted += 1;
            let pending = self.begin_upload(file);
            self.notify(&mut on_status);

            let outcome = pending.execute(api).await;
            let succeeded = self.finish_upload(outcome);
            self.notify(&mut on_status);

            if succeeded {
                summary.succeeded += 1;
                stats.refresh(api).await;
            } else {
                summary.failed += 1;
            }
        }

        tracing::debug!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Upload batch finished"
        );
        summary
    }

    fn notify<F>(&self, on_status: &mut F)
    where
        F: FnMut(&UploadStatus),
    {
        if let Some(status) = self.status.as_ref() {
            on_status(status);
        }
    }
}

/// One file issued by [`UploadOrchestrator::begin_upload`].
#[derive(Debug, Clone)]
pub struct PendingUpload {
    name: String,
    file: SelectedFile,
}

/// Service response (or failure) for one [`PendingUpload`].
#[derive(Debug)]
pub struct UploadOutcome {
    name: String,
    result: Result<UploadedFileRecord, ApiError>,
}

impl PendingUpload {
    /// Name shown in status messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load the file if needed and send it to the ingestion endpoint.
    ///
    /// A file that cannot be read never reaches the service.
    pub async fn execute<A>(self, api: &A) -> UploadOutcome
    where
        A: DocumentApi + ?Sized,
    {
        let result = match self.file.load().await {
            Ok(upload) => api.upload_document(&upload).await,
            Err(error) => Err(error),
        };
        UploadOutcome {
            name: self.name,
            result,
        }
    }
}

impl UploadOutcome {
    /// Whether the service ingested the file.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
