use crate::traits::SearchBackend;
use crate::types::{AggregatorError, ClientConfig, PageMode, Result, SearchRequest, SearchResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use url::Url;

pub struct Fetcher {
    client: Client,
    base_url: Url,
}

impl Fetcher {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = directory_url(Url::parse(&config.base_url)?);
        let client = Self::build_client(&config)?;

        Ok(Self { client, base_url })
    }

    fn build_client(config: &ClientConfig) -> Result<Client> {
        let redirect_policy = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(redirect_policy)
            .build()?;
        Ok(client)
    }

    /// Endpoints hang off the base URL, path prefix included.
    pub fn endpoint_url(&self, mode: PageMode) -> Result<Url> {
        Ok(self.base_url.join(mode.endpoint().trim_start_matches('/'))?)
    }

    pub async fn post_search(&self, mode: PageMode, request: &SearchRequest) -> Result<SearchResponse> {
        let start_time = Instant::now();
        let url = self.endpoint_url(mode)?;

        debug!("Posting {:?} search to {}", mode, url);

        let response = self
            .client
            .post(url.clone())
            .form(&request.form_fields())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let elapsed_ms = start_time.elapsed().as_millis() as u64;

        if !status.is_success() {
            let message = failure_message(mode, status, &body);
            error!("Search request to {} failed after {}ms: {}", url, elapsed_ms, message);
            return Err(AggregatorError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        info!(
            "Search response from {} in {}ms ({} bytes, {} sources)",
            url,
            elapsed_ms,
            body.len(),
            parsed.results.len()
        );
        Ok(parsed)
    }
}

#[async_trait]
impl SearchBackend for Fetcher {
    fn backend_name(&self) -> String {
        format!("http ({})", self.base_url)
    }

    async fn search(&self, mode: PageMode, request: &SearchRequest) -> Result<SearchResponse> {
        self.post_search(mode, request).await
    }
}

/// Prefer the backend's own `error` field, fall back to the status reason.
pub fn failure_message(mode: PageMode, status: reqwest::StatusCode, body: &str) -> String {
    let backend_error = serde_json::from_str::<SearchResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .filter(|message| !message.trim().is_empty());

    backend_error.unwrap_or_else(|| {
        format!(
            "{} request failed: {}",
            mode.request_label(),
            status.canonical_reason().unwrap_or("Unknown")
        )
    })
}

// `http://host/api` and `http://host/api/` both become `http://host/api/`.
fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
