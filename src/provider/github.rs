//! GitHub REST API content provider
//!
//! Listings come from the contents endpoint as JSON; file bodies and README
//! text are requested with the raw media type so no base64 decoding is needed.

use super::{ContentEntry, EntryKind, ProviderError, RepositoryContentProvider, RepositoryMetadata};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

#[derive(Debug, Deserialize)]
struct GitHubEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: EntryKind,
    #[serde(default)]
    size: u64,
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    #[serde(default)]
    size: u64,
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
}

/// Content provider backed by the GitHub REST API
pub struct GitHubProvider {
    api_url: Url,
    token: Option<String>,
    http_client: Client,
}

impl GitHubProvider {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self, ProviderError> {
        Self::with_timeout(api_url, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        api_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| ProviderError::Network(format!("Invalid API URL {}: {}", api_url, e)))?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_url,
            token,
            http_client,
        })
    }

    fn endpoint(&self, repository: &str, tail: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ProviderError::Network(format!("API URL cannot be a base: {}", self.api_url))
            })?;
            segments.pop_if_empty().push("repos");
            segments.extend(repository.split('/'));
            segments.extend(tail.iter().flat_map(|part| part.split('/')).filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    fn contents_url(&self, repository: &str, path: &str) -> Result<Url, ProviderError> {
        self.endpoint(repository, &["contents", path])
    }

    fn request(&self, url: Url, media_type: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .get(url)
            .header(USER_AGENT, concat!("podsmith/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, media_type);
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, ProviderError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Network(format!("Request for {} timed out", what))
            } else {
                ProviderError::Network(format!("Request for {} failed: {}", what, e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GitHub API returned {} for {}", status, what);
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl RepositoryContentProvider for GitHubProvider {
    async fn fetch_file(
        &self,
        repository: &str,
        path: &str,
        branch: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        debug!("Fetching {}:{} from {}", branch, path, repository);
        let url = self.contents_url(repository, path)?;
        let builder = self.request(url, RAW_MEDIA_TYPE).query(&[("ref", branch)]);
        let response = self.send(builder, path).await?;

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::Decode(format!("{}: {}", path, e)))
    }

    async fn list_directory(
        &self,
        repository: &str,
        path: &str,
        branch: &str,
    ) -> Result<Vec<ContentEntry>, ProviderError> {
        debug!("Listing {}:{}/ in {}", branch, path, repository);
        let url = self.contents_url(repository, path)?;
        let builder = self.request(url, JSON_MEDIA_TYPE).query(&[("ref", branch)]);
        let what = if path.is_empty() { "/" } else { path };
        let response = self.send(builder, what).await?;

        let entries: Vec<GitHubEntry> = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(format!("listing of {}: {}", what, e)))?;

        Ok(entries
            .into_iter()
            .map(|entry| ContentEntry {
                name: entry.name,
                path: entry.path,
                kind: entry.kind,
                size: entry.size,
            })
            .collect())
    }

    async fn fetch_readme(&self, repository: &str) -> Result<String, ProviderError> {
        let url = self.endpoint(repository, &["readme"])?;
        let response = self
            .send(self.request(url, RAW_MEDIA_TYPE), "README")
            .await?;

        response
            .text()
            .await
            .map_err(|e| ProviderError::Decode(format!("README: {}", e)))
    }

    async fn fetch_metadata(&self, repository: &str) -> Result<RepositoryMetadata, ProviderError> {
        let url = self.endpoint(repository, &[])?;
        let response = self
            .send(self.request(url, JSON_MEDIA_TYPE), repository)
            .await?;

        let repo: GitHubRepository = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(format!("repository {}: {}", repository, e)))?;

        Ok(RepositoryMetadata {
            size: repo.size,
            language: repo.language,
            topics: repo.topics,
        })
    }
}
