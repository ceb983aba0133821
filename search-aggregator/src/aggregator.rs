use crate::geo::{GeoExtractor, LocationPoint};
use crate::presentation::{PresentationConfig, SourceSpec};
use crate::sentiment::{AggregateSentiment, SentimentBadge};
use crate::types::{PageMode, SearchResponse, SearchResultItem};
use crate::utils::text::first_non_empty;
use crate::utils::url::safe_link;
use serde::Serialize;
use tracing::{debug, info};

pub const UNTITLED: &str = "Untitled";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_RESULTS: &str = "No search results found.";
pub const NO_SUMMARY: &str = "No summary available.";
pub const NO_INSIGHTS: &str = "No insights available.";
pub const NO_CROSS_REFERENCES: &str = "No cross-references available.";
pub const READ_MORE: &str = "Read More";
pub const HAS_LOCATION: &str = "Has Location";
pub const SHOW_ON_MAP: &str = "Show on Map";

/// Backend-written panels shown above the results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub summary: String,
    pub insights: String,
    pub cross_references: String,
    pub tags: Vec<String>,
}

/// One result as it will be displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub sentiment_score: Option<f64>,
    pub badge: Option<SentimentBadge>,
    /// First usable coordinate, target of "Show on Map". Always `None` on
    /// pages without a map.
    pub location: Option<(f64, f64)>,
}

impl ResultRecord {
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// Visible text of the record, one entry per text node, in display order.
    pub fn text_nodes(&self) -> Vec<&str> {
        let mut nodes = vec![self.title.as_str()];
        if self.has_location() {
            nodes.push(HAS_LOCATION);
        }
        if let Some(badge) = &self.badge {
            nodes.push(badge.text.as_str());
        }
        nodes.push(self.description.as_str());
        if self.url.is_some() {
            nodes.push(READ_MORE);
        }
        if self.has_location() {
            nodes.push(SHOW_ON_MAP);
        }
        nodes
    }

    pub fn visible_text(&self) -> String {
        self.text_nodes().join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceBucket {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub item_count: usize,
    pub sentiment: AggregateSentiment,
    pub items: Vec<ResultRecord>,
    pub initially_expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsView {
    Sources { heading: String, buckets: Vec<SourceBucket> },
    /// Explicit no-results state, distinct from a failed request.
    Empty { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapRegion {
    /// The page variant has no map.
    Hidden,
    /// Map-enabled variant, but nothing to place.
    NoLocationData,
    Shown {
        points: Vec<LocationPoint>,
        event_count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub mode: PageMode,
    pub overview: Overview,
    pub results: ResultsView,
    pub map: MapRegion,
}

impl RenderModel {
    pub fn buckets(&self) -> &[SourceBucket] {
        match &self.results {
            ResultsView::Sources { buckets, .. } => buckets,
            ResultsView::Empty { .. } => &[],
        }
    }

    pub fn bucket(&self, key: &str) -> Option<&SourceBucket> {
        self.buckets().iter().find(|bucket| bucket.key == key)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.results, ResultsView::Empty { .. })
    }

    pub fn map_points(&self) -> &[LocationPoint] {
        match &self.map {
            MapRegion::Shown { points, .. } => points,
            _ => &[],
        }
    }
}

/// Merges per-source result lists into the prioritized view model of one
/// page variant.
pub struct ResultAggregator {
    config: PresentationConfig,
    geo: GeoExtractor,
}

impl ResultAggregator {
    pub fn new(config: PresentationConfig) -> Self {
        Self {
            config,
            geo: GeoExtractor::default(),
        }
    }

    pub fn with_geo_extractor(mut self, geo: GeoExtractor) -> Self {
        self.geo = geo;
        self
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    pub fn geo(&self) -> &GeoExtractor {
        &self.geo
    }

    pub fn aggregate(&self, response: &SearchResponse) -> RenderModel {
        let overview = build_overview(response);

        let mut buckets = Vec::new();
        let mut rendered_items: Vec<&SearchResultItem> = Vec::new();

        for source in &self.config.priority_list {
            let Some(items) = response.results.get(&source.key) else {
                continue;
            };
            if items.is_empty() {
                continue;
            }

            let bucket = self.build_bucket(source, items);
            debug!(
                "Source {}: {} items ({}% positive, {}% negative, {}% neutral)",
                bucket.key,
                bucket.item_count,
                bucket.sentiment.positive_percent,
                bucket.sentiment.negative_percent,
                bucket.sentiment.neutral_percent
            );
            rendered_items.extend(items.iter());
            buckets.push(bucket);
        }

        let skipped: Vec<&str> = response
            .results
            .keys()
            .filter(|key| self.config.source(key).is_none())
            .map(String::as_str)
            .collect();
        if !skipped.is_empty() {
            debug!("Ignoring sources outside the priority list: {:?}", skipped);
        }

        let map = self.build_map_region(&rendered_items);

        let results = if buckets.is_empty() {
            ResultsView::Empty {
                message: NO_RESULTS.to_string(),
            }
        } else {
            ResultsView::Sources {
                heading: self.config.heading.clone(),
                buckets,
            }
        };

        info!(
            "Aggregated {:?} response: {} sections, {} items, map {}",
            self.config.mode,
            match &results {
                ResultsView::Sources { buckets, .. } => buckets.len(),
                ResultsView::Empty { .. } => 0,
            },
            rendered_items.len(),
            match &map {
                MapRegion::Hidden => "hidden".to_string(),
                MapRegion::NoLocationData => "empty".to_string(),
                MapRegion::Shown { points, .. } => format!("{} points", points.len()),
            }
        );

        RenderModel {
            mode: self.config.mode,
            overview,
            results,
            map,
        }
    }

    fn build_bucket(&self, source: &SourceSpec, items: &[SearchResultItem]) -> SourceBucket {
        let records: Vec<ResultRecord> = items.iter().map(|item| self.build_record(item)).collect();

        SourceBucket {
            key: source.key.clone(),
            label: source.label.clone(),
            icon: source.icon.clone(),
            item_count: items.len(),
            sentiment: AggregateSentiment::from_scores(items.iter().map(|item| item.sentiment_score)),
            items: records,
            initially_expanded: source.key == self.config.default_expanded_key,
        }
    }

    fn build_record(&self, item: &SearchResultItem) -> ResultRecord {
        let title = first_non_empty(&[item.title.as_deref()]).unwrap_or(UNTITLED);
        let description = first_non_empty(&[
            item.snippet.as_deref(),
            item.summary.as_deref(),
            item.description.as_deref(),
        ])
        .unwrap_or(NO_DESCRIPTION);

        ResultRecord {
            title: title.to_string(),
            description: description.to_string(),
            url: safe_link(item.url.as_deref()),
            sentiment_score: item.sentiment_score,
            badge: self.config.sentiment_policy.badge(item.sentiment_score),
            // Only the map page offers "Show on Map".
            location: if self.config.show_map {
                self.geo.first_usable(item)
            } else {
                None
            },
        }
    }

    fn build_map_region(&self, rendered_items: &[&SearchResultItem]) -> MapRegion {
        if !self.config.show_map {
            return MapRegion::Hidden;
        }
        if !self.geo.has_usable_location(rendered_items.iter().copied()) {
            return MapRegion::NoLocationData;
        }

        MapRegion::Shown {
            points: self.geo.extract(rendered_items.iter().copied()),
            event_count: rendered_items.len(),
        }
    }
}

fn build_overview(response: &SearchResponse) -> Overview {
    let or_default = |value: &Option<String>, fallback: &str| {
        first_non_empty(&[value.as_deref()]).unwrap_or(fallback).to_string()
    };

    Overview {
        summary: or_default(&response.summary, NO_SUMMARY),
        insights: or_default(&response.insights, NO_INSIGHTS),
        cross_references: or_default(&response.cross_references, NO_CROSS_REFERENCES),
        tags: response
            .tags
            .iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect(),
    }
}
