use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{
    errors::ContentError,
    repositories::content_store::{ContentStore, QueryParams},
    settings::AppConfig,
};

#[derive(Debug, Clone)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
    pub api_host: Option<String>,
    pub timeout_secs: u64,
}

impl From<&AppConfig> for SanityConfig {
    fn from(config: &AppConfig) -> Self {
        SanityConfig {
            project_id: config.sanity_project_id.clone(),
            dataset: config.sanity_dataset.clone(),
            api_version: config.sanity_api_version.clone(),
            use_cdn: config.sanity_use_cdn,
            token: config.sanity_token.clone(),
            api_host: config.sanity_api_host.clone(),
            timeout_secs: config.request_timeout_secs,
        }
    }
}

impl SanityConfig {
    /// `https://<project>.api.sanity.io/v<version>/data/query/<dataset>`,
    /// or the CDN / overridden host.
    pub fn query_endpoint(&self) -> Result<Url, ContentError> {
        let host = match &self.api_host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None if self.use_cdn => format!("https://{}.apicdn.sanity.io", self.project_id),
            None => format!("https://{}.api.sanity.io", self.project_id),
        };
        let version = self.api_version.trim_start_matches('v');

        Ok(Url::parse(&format!(
            "{}/v{}/data/query/{}",
            host, version, self.dataset
        ))?)
    }
}

/// HTTP client for the CMS query API.
pub struct SanityClient {
    endpoint: Url,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    description: Option<String>,
}

impl SanityClient {
    pub fn new(config: &SanityConfig) -> Result<Self, ContentError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ContentError::InvalidConfig("API token is not a valid header value".into()))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ContentError::InvalidConfig(e.to_string()))?;

        Ok(SanityClient {
            endpoint: config.query_endpoint()?,
            client,
        })
    }

    pub fn query_url(&self, query: &str, params: &QueryParams) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (name, value) in params {
                pairs.append_pair(&format!("${}", name), &value.to_string());
            }
        }
        url
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, ContentError> {
        let url = self.query_url(query, params);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.description)
                .unwrap_or(body);
            return Err(ContentError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: QueryResponse = response.json().await?;
        debug!(server_ms = ?body.ms, "Content query answered");

        Ok(body.result)
    }
}
