use crate::sentiment::SentimentPolicy;
use crate::types::PageMode;
use serde::Serialize;

/// One entry of a priority list: the source key in the response and how its
/// section is labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpec {
    pub key: String,
    pub label: String,
    pub icon: String,
}

impl SourceSpec {
    pub fn new(key: &str, label: &str, icon: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            icon: icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationConfig {
    pub mode: PageMode,
    pub heading: String,
    pub priority_list: Vec<SourceSpec>,
    pub default_expanded_key: String,
    pub show_map: bool,
    pub sentiment_policy: SentimentPolicy,
}

fn source_for(key: &str) -> SourceSpec {
    match key {
        "wikipedia" => SourceSpec::new(key, "Wikipedia", "fa-brands fa-wikipedia-w"),
        "news_everything" => SourceSpec::new(key, "Comprehensive News Coverage", "fa-regular fa-newspaper"),
        "news_top_headlines" => SourceSpec::new(key, "Breaking News (Headlines)", "fa-solid fa-bolt-lightning"),
        "rss_news" => SourceSpec::new(key, "RSS News Feeds", "fa-solid fa-rss"),
        "gnews" => SourceSpec::new(key, "Global News", "fa-regular fa-newspaper"),
        "gdelt" => SourceSpec::new(key, "GDELT Global Events", "fa-solid fa-globe"),
        "mediastack" => SourceSpec::new(key, "MediaStack News", "fa-solid fa-newspaper"),
        "current_news" => SourceSpec::new(key, "Current News", "fa-solid fa-hourglass-half"),
        "google" => SourceSpec::new(key, "Google Search", "fa-brands fa-google"),
        "semantic_scholar" => SourceSpec::new(key, "Semantic Scholar", "fa-solid fa-graduation-cap"),
        "wolfram_alpha" => SourceSpec::new(key, "Wolfram Alpha", "fa-solid fa-calculator"),
        _ => SourceSpec::new(key, key, "fa-solid fa-circle-info"),
    }
}

fn priority(keys: &[&str]) -> Vec<SourceSpec> {
    keys.iter().map(|key| source_for(key)).collect()
}

impl PresentationConfig {
    pub fn general() -> Self {
        Self {
            mode: PageMode::General,
            heading: "General Knowledge Results".to_string(),
            priority_list: priority(&[
                "wikipedia",
                "news_everything",
                "news_top_headlines",
                "rss_news",
                "gnews",
                "gdelt",
                "mediastack",
                "current_news",
                "google",
                "semantic_scholar",
                "wolfram_alpha",
            ]),
            default_expanded_key: "wikipedia".to_string(),
            show_map: false,
            sentiment_policy: SentimentPolicy::ThreeBucket,
        }
    }

    pub fn news() -> Self {
        Self {
            mode: PageMode::News,
            heading: "News Monitoring Results".to_string(),
            priority_list: priority(&[
                "news_top_headlines",
                "rss_news",
                "gdelt",
                "gnews",
                "mediastack",
                "current_news",
                "news_everything",
                "wikipedia",
                "google",
                "semantic_scholar",
                "wolfram_alpha",
            ]),
            default_expanded_key: "news_top_headlines".to_string(),
            show_map: false,
            sentiment_policy: SentimentPolicy::ThreeBucket,
        }
    }

    pub fn geolocation() -> Self {
        Self {
            mode: PageMode::Geolocation,
            heading: "Search Results".to_string(),
            priority_list: priority(&[
                "gdelt",
                "news_top_headlines",
                "rss_news",
                "gnews",
                "mediastack",
                "current_news",
                "news_everything",
                "wikipedia",
                "google",
                "semantic_scholar",
                "wolfram_alpha",
            ]),
            default_expanded_key: "gdelt".to_string(),
            show_map: true,
            sentiment_policy: SentimentPolicy::ThreeBucket,
        }
    }

    pub fn for_mode(mode: PageMode) -> Self {
        match mode {
            PageMode::General => Self::general(),
            PageMode::News => Self::news(),
            PageMode::Geolocation => Self::geolocation(),
        }
    }

    pub fn with_sentiment_policy(mut self, policy: SentimentPolicy) -> Self {
        self.sentiment_policy = policy;
        self
    }

    pub fn source(&self, key: &str) -> Option<&SourceSpec> {
        self.priority_list.iter().find(|source| source.key == key)
    }
}
