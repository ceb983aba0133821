//! Plain-text rendering of a session, used by the command line front end.

use crate::aggregator::{MapRegion, RenderModel, ResultRecord, ResultsView, SourceBucket};
use crate::filter::{HighlightedText, NO_MATCHES};
use crate::session::{AggregationSession, SessionPhase};
use std::ops::Range;

pub const HIGHLIGHT_OPEN: &str = "[[";
pub const HIGHLIGHT_CLOSE: &str = "]]";
pub const NO_TAGS: &str = "No tags available.";
pub const NO_LOCATION_DATA: &str = "No location data available for these results.";

pub fn render_page(session: &AggregationSession) -> String {
    let mut page = String::new();

    if let Some(summary) = session.dates().summary() {
        page.push_str(&format!("Filters: {}\n", summary));
    }

    match session.phase() {
        SessionPhase::Idle => page.push_str("Enter a query to search.\n"),
        SessionPhase::Loading => page.push_str("Loading...\n"),
        SessionPhase::Failed { message } => page.push_str(&format!("{}\n", message)),
        SessionPhase::Ready => {
            if let Some(model) = session.model() {
                render_model(&mut page, session, model);
            }
        }
    }

    page
}

fn render_model(page: &mut String, session: &AggregationSession, model: &RenderModel) {
    let overview = &model.overview;
    page.push_str(&format!("Summary: {}\n", overview.summary));
    page.push_str(&format!("Insights: {}\n", overview.insights));
    page.push_str(&format!("Cross-references: {}\n", overview.cross_references));
    if overview.tags.is_empty() {
        page.push_str(&format!("Tags: {}\n", NO_TAGS));
    } else {
        let tags: Vec<String> = overview.tags.iter().map(|tag| format!("#{}", tag)).collect();
        page.push_str(&format!("Tags: {}\n", tags.join(" ")));
    }

    if let Some(indicator) = session.filter().indicator() {
        page.push_str(&format!("{}\n", indicator));
    }
    if session.filter().no_matches() {
        page.push_str(&format!("{}\n", NO_MATCHES));
    }

    page.push('\n');
    match &model.results {
        ResultsView::Empty { message } => page.push_str(&format!("{}\n", message)),
        ResultsView::Sources { heading, buckets } => {
            page.push_str(&format!("== {} ==\n", heading));
            for (index, bucket) in buckets.iter().enumerate() {
                render_bucket(page, session, index, bucket);
            }
        }
    }

    render_map(page, session, &model.map);
}

fn render_bucket(page: &mut String, session: &AggregationSession, index: usize, bucket: &SourceBucket) {
    let state = session.disclosure().state(&bucket.key);
    let indicator = state.map(|state| state.indicator()).unwrap_or_default();
    let sentiment = &bucket.sentiment;

    page.push_str(&format!(
        "[{}] {} ({}) {}% positive, {}% negative, {}% neutral\n",
        indicator,
        bucket.label,
        bucket.item_count,
        sentiment.positive_percent,
        sentiment.negative_percent,
        sentiment.neutral_percent
    ));

    if !state.is_some_and(|state| state.is_expanded()) {
        return;
    }

    for (item, record) in bucket.items.iter().enumerate() {
        if session.filter().is_visible(index, item) {
            render_record(page, record, session.filter().highlights(index, item));
        }
    }
}

fn render_record(page: &mut String, record: &ResultRecord, highlights: &[Vec<Range<usize>>]) {
    let marked: Vec<String> = record
        .text_nodes()
        .into_iter()
        .enumerate()
        .map(|(node, text)| {
            let spans = highlights.get(node).cloned().unwrap_or_default();
            HighlightedText { text, spans }.render_with(HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE)
        })
        .collect();

    // title, optional location flag, optional badge, then the description.
    let description_index = 1 + usize::from(record.has_location()) + usize::from(record.badge.is_some());
    let (head, rest) = marked.split_at(description_index.min(marked.len()));

    page.push_str(&format!("  - {}\n", head.join(" | ")));
    if let Some((description, actions)) = rest.split_first() {
        page.push_str(&format!("    {}\n", description));
        for action in actions {
            page.push_str(&format!("    > {}\n", action));
        }
    }
    if let Some(url) = &record.url {
        page.push_str(&format!("    {}\n", url));
    }
}

fn render_map(page: &mut String, session: &AggregationSession, region: &MapRegion) {
    let (points, event_count) = match region {
        MapRegion::Hidden => return,
        MapRegion::NoLocationData => {
            page.push_str(&format!("\nGeolocation Analysis: {}\n", NO_LOCATION_DATA));
            return;
        }
        MapRegion::Shown { points, event_count } => (points, event_count),
    };

    page.push_str(&format!(
        "\nGeolocation Analysis: {} locations across {} events\n",
        points.len(),
        event_count
    ));

    let Some(canvas) = session.map().canvas() else {
        return;
    };
    let (lat, lng) = canvas.viewport.center;
    page.push_str(&format!("Map centre ({:.4}, {:.4}) zoom {}\n", lat, lng, canvas.viewport.zoom));

    for marker in &canvas.markers {
        page.push_str(&format!(
            "  {} ({:.4}, {:.4}) {}\n",
            if marker.popup_open { "*" } else { "o" },
            marker.lat,
            marker.lng,
            marker.popup.title
        ));
        if !marker.popup_open {
            continue;
        }
        if !marker.popup.description.is_empty() {
            page.push_str(&format!("      {}\n", marker.popup.description));
        }
        if let Some(source_line) = &marker.popup.source_line {
            page.push_str(&format!("      {}\n", source_line));
        }
        if let Some(link) = &marker.popup.link {
            page.push_str(&format!("      {}\n", link));
        }
    }
}
