//! Async client for the Aura Hub partnership API.
//!
//! All calls go against a base URL injected at construction time; the
//! client itself never reads the environment. Errors collapse into a flat
//! [`ApiError`] — the UI layer maps every variant to one short message per
//! operation, so no richer taxonomy is exposed.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::Settings;
use crate::models::{ExtractionSuggestions, NewParceria, ParceriaDetail, SearchResults};

const SEARCH_PATH: &str = "/api/v1/parcerias/busca";
const SEMANTIC_SEARCH_PATH: &str = "/api/v1/parcerias/semantic-busca";
const PARCERIAS_PATH: &str = "/api/v1/parcerias";
const PROCESS_DOCUMENT_PATH: &str = "/api/v1/processar-documento";

/// Errors that can occur while talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the server.
    #[error("connection error: {0}")]
    Connection(String),
    /// Server answered with a non-success status.
    #[error("API error: {0}")]
    Api(String),
    /// Response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Client for the Aura Hub API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the configured base URL.
    pub fn new(settings: &Settings) -> Self {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: settings.api_base_url.clone(),
        }
    }

    /// Keyword search. Callers reject blank terms before calling.
    pub async fn search_keyword(
        &self,
        termo: &str,
        skip: u64,
        limit: u64,
    ) -> Result<SearchResults, ApiError> {
        self.search(SEARCH_PATH, termo, skip, limit).await
    }

    /// Semantic (embedding-ranked) search; items may carry a similarity score.
    pub async fn search_semantic(
        &self,
        termo: &str,
        skip: u64,
        limit: u64,
    ) -> Result<SearchResults, ApiError> {
        self.search(SEMANTIC_SEARCH_PATH, termo, skip, limit).await
    }

    async fn search(
        &self,
        path: &str,
        termo: &str,
        skip: u64,
        limit: u64,
    ) -> Result<SearchResults, ApiError> {
        let url = self.search_url(path, termo, skip, limit);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let resp = check_status(resp).await?;

        resp.json::<SearchResults>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Fetch one record by id.
    pub async fn get_detail(&self, id: i64) -> Result<ParceriaDetail, ApiError> {
        let url = format!("{}{}/{}", self.base_url, PARCERIAS_PATH, id);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let resp = check_status(resp).await?;

        resp.json::<ParceriaDetail>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Submit a PDF for AI field extraction.
    ///
    /// The file is opaque to the client; type enforcement is the backend's.
    pub async fn process_document(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<ExtractionSuggestions, ApiError> {
        let url = format!("{}{}", self.base_url, PROCESS_DOCUMENT_PATH);
        debug!("POST {} ({} bytes)", url, content.len());

        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ApiError::Api(e.to_string()))?;
        let form = Form::new().part("file", part);

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let resp = check_status(resp).await?;

        resp.json::<ExtractionSuggestions>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Register a new partnership record.
    pub async fn create_parceria(&self, body: &NewParceria) -> Result<ParceriaDetail, ApiError> {
        let url = format!("{}{}", self.base_url, PARCERIAS_PATH);
        debug!("POST {}", url);

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let resp = check_status(resp).await?;

        resp.json::<ParceriaDetail>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn search_url(&self, path: &str, termo: &str, skip: u64, limit: u64) -> String {
        format!(
            "{}{}?termo={}&skip={}&limit={}",
            self.base_url,
            path,
            urlencoding::encode(termo),
            skip,
            limit
        )
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Api(format!("HTTP {}: {}", status, body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&Settings::default())
    }

    #[test]
    fn search_url_encodes_term_and_pagination() {
        let url = client().search_url(SEARCH_PATH, "educação infantil", 20, 10);
        assert_eq!(
            url,
            "http://localhost:8001/api/v1/parcerias/busca\
             ?termo=educa%C3%A7%C3%A3o%20infantil&skip=20&limit=10"
        );
    }

    #[test]
    fn semantic_search_uses_its_own_path() {
        let url = client().search_url(SEMANTIC_SEARCH_PATH, "saude", 0, 10);
        assert!(url.starts_with("http://localhost:8001/api/v1/parcerias/semantic-busca?"));
        assert!(url.ends_with("termo=saude&skip=0&limit=10"));
    }

    #[test]
    fn base_url_from_settings_is_respected() {
        let settings = Settings::default().with_base_url("https://hub.example.org/");
        let client = ApiClient::new(&settings);
        let url = client.search_url(SEARCH_PATH, "x", 0, 10);
        assert!(url.starts_with("https://hub.example.org/api/v1/"));
    }
}
