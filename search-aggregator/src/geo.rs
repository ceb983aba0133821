use crate::types::{LocationMention, SearchResultItem};
use crate::utils::text::first_non_empty;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a coordinate of exactly `0.0` is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroCoordinatePolicy {
    /// Any finite number is a coordinate, the equator and prime meridian included.
    #[default]
    Accept,
    /// Legacy behaviour: `0.0` on either axis drops the mention.
    Reject,
}

/// A location ready to be placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationPoint {
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub description: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeoExtractor {
    zero_coordinates: ZeroCoordinatePolicy,
}

impl GeoExtractor {
    pub fn new(zero_coordinates: ZeroCoordinatePolicy) -> Self {
        Self { zero_coordinates }
    }

    pub fn zero_coordinates(&self) -> ZeroCoordinatePolicy {
        self.zero_coordinates
    }

    /// Coordinates of a mention when it is usable under this extractor's policy.
    pub fn coordinates(&self, mention: &LocationMention) -> Option<(f64, f64)> {
        let (lat, lng) = (mention.lat?, mention.lng?);
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        if self.zero_coordinates == ZeroCoordinatePolicy::Reject && (lat == 0.0 || lng == 0.0) {
            return None;
        }
        Some((lat, lng))
    }

    /// One point per usable mention, in item order. Unusable mentions are
    /// skipped one at a time.
    pub fn extract<'a, I>(&self, items: I) -> Vec<LocationPoint>
    where
        I: IntoIterator<Item = &'a SearchResultItem>,
    {
        let mut points = Vec::new();
        let mut skipped = 0usize;

        for item in items {
            let Some(mentions) = &item.location else {
                continue;
            };

            for mention in mentions {
                match self.coordinates(mention) {
                    Some((lat, lng)) => points.push(LocationPoint {
                        lat,
                        lng,
                        title: item.title.clone().unwrap_or_default(),
                        description: first_non_empty(&[
                            item.snippet.as_deref(),
                            item.description.as_deref(),
                        ])
                        .map(str::to_string),
                        source: item.source.clone(),
                        url: item.url.clone(),
                    }),
                    None => skipped += 1,
                }
            }
        }

        if skipped > 0 {
            debug!("Skipped {} unusable location mentions", skipped);
        }

        points
    }

    /// First usable coordinate of a single item.
    pub fn first_usable(&self, item: &SearchResultItem) -> Option<(f64, f64)> {
        item.location
            .as_ref()?
            .iter()
            .find_map(|mention| self.coordinates(mention))
    }

    pub fn has_usable_location<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a SearchResultItem>,
    {
        items.into_iter().any(|item| self.first_usable(item).is_some())
    }
}
