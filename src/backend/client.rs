//! HTTP client wrapper for the DocuMind document service.

use crate::backend::types::{
    ApiError, AskRequest, AskResponse, CorpusStats, ErrorBody, HealthReport, SearchRequest,
    SearchResponse, SearchResult, UploadFile, UploadedFileRecord,
};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::{
    Client, Method,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;

/// Operations the orchestration core needs from the document service.
///
/// Controllers only ever see this trait, so tests can substitute a scripted implementation
/// while the terminal shell uses [`DocumentApiClient`].
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Submit one file to `POST /documents/upload`.
    async fn upload_document(&self, file: &UploadFile) -> Result<UploadedFileRecord, ApiError>;

    /// Fetch the corpus summary from `GET /documents/stats`.
    async fn fetch_stats(&self) -> Result<CorpusStats, ApiError>;

    /// Run a ranked retrieval through `POST /search/semantic`.
    async fn semantic_search(&self, request: &SearchRequest)
    -> Result<Vec<SearchResult>, ApiError>;

    /// Ask a retrieval-augmented question through `POST /search/ask`.
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ApiError>;

    /// Probe `GET /search/health`.
    async fn health(&self) -> Result<HealthReport, ApiError>;
}

/// Lightweight HTTP client for the document service.
#[derive(Clone)]
pub struct DocumentApiClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
}

impl DocumentApiClient {
    /// Construct a client for the configured service URL.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        let base_url = normalize_base_url(&config.api_url).map_err(ApiError::InvalidUrl)?;
        tracing::debug!(url = %base_url, "Initialized document service client");

        Ok(Self { client, base_url })
    }

    /// Normalized base URL every endpoint is joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format_endpoint(&self.base_url, path);
        self.client.request(method, url)
    }

    async fn read_json<T>(&self, response: reqwest::Response, endpoint: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        if response.status().is_success() {
            return Ok(response.json().await?);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_detail);
        let error = ApiError::Application { status, detail };
        tracing::debug!(endpoint, error = %error, "Document service rejected request");
        Err(error)
    }
}

#[async_trait]
impl DocumentApi for DocumentApiClient {
    async fn upload_document(&self, file: &UploadFile) -> Result<UploadedFileRecord, ApiError> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.filename.clone());
        let form = Form::new().part("file", part);

        tracing::debug!(
            filename = %file.filename,
            bytes = file.bytes.len(),
            "Uploading document"
        );
        let response = self
            .request(Method::POST, "documents/upload")
            .multipart(form)
            .send()
            .await?;

        self.read_json(response, "documents/upload").await
    }

    async fn fetch_stats(&self) -> Result<CorpusStats, ApiError> {
        let response = self.request(Method::GET, "documents/stats").send().await?;
        self.read_json(response, "documents/stats").await
    }

    async fn semantic_search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchResult>, ApiError> {
        let response = self
            .request(Method::POST, "search/semantic")
            .json(request)
            .send()
            .await?;

        let SearchResponse { results } = self.read_json(response, "search/semantic").await?;
        Ok(results)
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ApiError> {
        tracing::debug!(
            history = request.conversation_history.len(),
            top_k = request.top_k,
            "Submitting question"
        );
        let response = self
            .request(Method::POST, "search/ask")
            .json(request)
            .send()
            .await?;

        self.read_json(response, "search/ask").await
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        let response = self.request(Method::GET, "search/health").send().await?;
        self.read_json(response, "search/health").await
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
