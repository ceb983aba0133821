use serde::{Deserialize, Serialize};
// Use the interfaces crate for the wire contract
pub use interfaces::defs::{LocationMention, PageMode, SearchRequest, SearchResponse, SearchResultItem};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            user_agent: "Search-Aggregator/1.0".to_string(),
            timeout_seconds: 60,
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `SEARCH_BACKEND_URL`, `SEARCH_USER_AGENT` and
    /// `SEARCH_TIMEOUT_SECONDS` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("SEARCH_BACKEND_URL") {
            config.base_url = base_url;
        }
        if let Ok(user_agent) = std::env::var("SEARCH_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(timeout) = std::env::var("SEARCH_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
        {
            config.timeout_seconds = timeout;
        }

        config
    }
}

/// User-facing search inputs that are not part of the date-range state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchForm {
    pub query: String,
    pub negative_query: String,
    pub language: String,
}

impl SearchForm {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_negative_query(mut self, negative_query: impl Into<String>) -> Self {
        self.negative_query = negative_query.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("General error: {0}")]
    General(String),
}

impl AggregatorError {
    /// Text for the single error banner shown when a search fails.
    pub fn user_message(&self) -> String {
        format!("An error occurred: {}", self)
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
