use crate::types::{PageMode, Result, SearchRequest, SearchResponse};
use async_trait::async_trait;

/// Anything that can answer a search request for a page mode (the HTTP
/// backend, a recorded response, a test double).
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Human-readable name for logs
    fn backend_name(&self) -> String;

    /// Send one request and return the parsed response.
    /// Any transport failure or non-success status is an error; there is no
    /// partial result.
    async fn search(&self, mode: PageMode, request: &SearchRequest) -> Result<SearchResponse>;
}
