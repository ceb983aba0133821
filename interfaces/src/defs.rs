use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The page variant a search is issued from. Each variant talks to its own
/// backend endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    General,
    News,
    Geolocation,
}

impl PageMode {
    pub fn endpoint(&self) -> &'static str {
        match self {
            PageMode::General => "/search",
            PageMode::News => "/news_search",
            PageMode::Geolocation => "/geo_search",
        }
    }

    /// Prefix used when a request for this mode fails.
    pub fn request_label(&self) -> &'static str {
        match self {
            PageMode::General => "Search",
            PageMode::News => "News search",
            PageMode::Geolocation => "Geolocation search",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "general" | "gk" => Some(PageMode::General),
            "news" => Some(PageMode::News),
            "geolocation" | "geo" => Some(PageMode::Geolocation),
            _ => None,
        }
    }
}

/// Form body sent to the backend. Every field is a plain string and the
/// empty string means "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub negative_query: String,
    pub from_date: String,
    pub to_date: String,
    pub from_year: String,
    pub to_year: String,
    pub language: String,
}

impl SearchRequest {
    pub fn form_fields(&self) -> [(&'static str, &str); 7] {
        [
            ("query", self.query.as_str()),
            ("negative_query", self.negative_query.as_str()),
            ("from_date", self.from_date.as_str()),
            ("to_date", self.to_date.as_str()),
            ("from_year", self.from_year.as_str()),
            ("to_year", self.to_year.as_str()),
            ("language", self.language.as_str()),
        ]
    }
}

/// A coordinate pair attached to a result. Either half may be missing or
/// non-numeric in the payload, in which case it is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationMention {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl LocationMention {
    pub fn from_value(value: &Value) -> Self {
        Self {
            lat: value.get("lat").and_then(Value::as_f64),
            lng: value.get("lng").and_then(Value::as_f64),
        }
    }
}

/// One result as produced by the backend. Immutable once received.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResultItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec<LocationMention>>,
}

impl SearchResultItem {
    /// Builds an item from any JSON value. Fields of the wrong type are
    /// dropped rather than failing the whole payload.
    pub fn from_value(value: &Value) -> Self {
        let location = match value.get("location") {
            Some(Value::Array(mentions)) => {
                Some(mentions.iter().map(LocationMention::from_value).collect())
            }
            _ => None,
        };

        Self {
            title: string_field(value.get("title")),
            snippet: string_field(value.get("snippet")),
            description: string_field(value.get("description")),
            summary: string_field(value.get("summary")),
            url: string_field(value.get("url")),
            source: string_field(value.get("source")),
            sentiment_score: value.get("sentiment_score").and_then(Value::as_f64),
            location,
        }
    }
}

impl<'de> Deserialize<'de> for SearchResultItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// JSON body returned by every search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub cross_references: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_results")]
    pub results: BTreeMap<String, Vec<SearchResultItem>>,
    /// Set by the backend alongside non-success statuses.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn string_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(string_field(Some(&value)))
}

fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(tags) => tags.iter().filter_map(|tag| string_field(Some(tag))).collect(),
        _ => Vec::new(),
    })
}

fn lenient_results<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<SearchResultItem>>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Value::Object(sources) = value else {
        return Ok(BTreeMap::new());
    };

    Ok(sources
        .iter()
        .map(|(key, items)| {
            // A source whose payload is not a list contributes no items.
            let items = match items {
                Value::Array(items) => items.iter().map(SearchResultItem::from_value).collect(),
                _ => Vec::new(),
            };
            (key.clone(), items)
        })
        .collect())
}

// Contract note:
// The backend is an external collaborator. Nothing in this module validates
// business rules; it only guarantees that any JSON the backend sends can be
// turned into these types without failing on a single bad field.
