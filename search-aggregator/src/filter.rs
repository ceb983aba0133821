//! Tag filtering over the rendered results.
//!
//! Highlighting is a pure function of the stored text: a filter produces
//! highlight spans next to the untouched original, and clearing the filter
//! simply drops the spans. Rendered text is therefore identical before a tag
//! is applied and after it is cleared.

use crate::aggregator::RenderModel;
use crate::disclosure::DisclosureController;
use crate::utils::text::{contains_case_insensitive, find_case_insensitive};
use serde::Serialize;
use std::ops::Range;
use tracing::{debug, info};

pub const NO_MATCHES: &str = "No results match the selected tag.";

/// Text plus the byte ranges to be shown highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedText<'a> {
    pub text: &'a str,
    pub spans: Vec<Range<usize>>,
}

impl<'a> HighlightedText<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            spans: Vec::new(),
        }
    }

    /// Consecutive `(fragment, highlighted)` pieces covering the whole text.
    pub fn segments(&self) -> Vec<(&'a str, bool)> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for span in &self.spans {
            if span.start > cursor {
                segments.push((&self.text[cursor..span.start], false));
            }
            segments.push((&self.text[span.clone()], true));
            cursor = span.end;
        }
        if cursor < self.text.len() {
            segments.push((&self.text[cursor..], false));
        }

        segments
    }

    /// Wrap every highlighted piece with the given markers.
    pub fn render_with(&self, open: &str, close: &str) -> String {
        self.segments()
            .into_iter()
            .map(|(fragment, highlighted)| {
                if highlighted {
                    format!("{}{}{}", open, fragment, close)
                } else {
                    fragment.to_string()
                }
            })
            .collect()
    }
}

/// Byte ranges of every case-insensitive occurrence of `tag`, without overlap.
pub fn find_matches(text: &str, tag: &str) -> Vec<Range<usize>> {
    find_case_insensitive(text, tag)
}

pub fn highlight<'a>(text: &'a str, tag: &str) -> HighlightedText<'a> {
    HighlightedText {
        text,
        spans: find_matches(text, tag),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagFilterState {
    pub active_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub visible: bool,
    /// Highlight spans per text node of the record.
    pub highlights: Vec<Vec<Range<usize>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOutcome {
    pub tag: String,
    pub matched: usize,
    pub hidden: usize,
    /// Sections that were collapsed and had to be opened to show a match.
    pub expanded_sections: Vec<String>,
}

impl FilterOutcome {
    pub fn no_matches(&self) -> bool {
        self.matched == 0
    }
}

#[derive(Debug, Default)]
pub struct TagFilterEngine {
    state: TagFilterState,
    views: Vec<Vec<ItemView>>,
    no_matches: bool,
}

impl TagFilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tag(&self) -> Option<&str> {
        self.state.active_tag.as_deref()
    }

    /// Floating indicator text while a filter is active.
    pub fn indicator(&self) -> Option<String> {
        self.active_tag().map(|tag| format!("Filter: {}", tag))
    }

    pub fn no_matches(&self) -> bool {
        self.no_matches
    }

    /// Show matching items (highlighted), hide the rest, and open any
    /// collapsed section holding a match. A blank tag clears the filter.
    pub fn apply_tag(
        &mut self,
        model: &RenderModel,
        disclosure: &mut DisclosureController,
        tag: &str,
    ) -> Option<FilterOutcome> {
        let tag = tag.trim();
        if tag.is_empty() {
            self.clear_tag();
            return None;
        }

        let mut matched = 0;
        let mut hidden = 0;
        let mut expanded_sections = Vec::new();
        let mut views = Vec::with_capacity(model.buckets().len());

        for bucket in model.buckets() {
            let mut bucket_views = Vec::with_capacity(bucket.items.len());
            let mut bucket_matched = false;

            for record in &bucket.items {
                let visible = contains_case_insensitive(&record.visible_text(), tag);
                let highlights = if visible {
                    record
                        .text_nodes()
                        .into_iter()
                        .map(|node| find_case_insensitive(node, tag))
                        .collect()
                } else {
                    Vec::new()
                };

                if visible {
                    matched += 1;
                    bucket_matched = true;
                } else {
                    hidden += 1;
                }
                bucket_views.push(ItemView { visible, highlights });
            }

            if bucket_matched && disclosure.expand(&bucket.key) {
                debug!("Expanded section {} to reveal matches for {:?}", bucket.key, tag);
                expanded_sections.push(bucket.key.clone());
            }
            views.push(bucket_views);
        }

        self.state.active_tag = Some(tag.to_string());
        self.views = views;
        self.no_matches = matched == 0;

        info!("Tag filter {:?}: {} shown, {} hidden", tag, matched, hidden);

        Some(FilterOutcome {
            tag: tag.to_string(),
            matched,
            hidden,
            expanded_sections,
        })
    }

    /// Show every item again and drop all highlights and indicators.
    pub fn clear_tag(&mut self) {
        if let Some(tag) = self.state.active_tag.take() {
            debug!("Cleared tag filter {:?}", tag);
        }
        self.views.clear();
        self.no_matches = false;
    }

    pub fn is_visible(&self, bucket: usize, item: usize) -> bool {
        self.view(bucket, item).map_or(true, |view| view.visible)
    }

    pub fn highlights(&self, bucket: usize, item: usize) -> &[Vec<Range<usize>>] {
        self.view(bucket, item)
            .map(|view| view.highlights.as_slice())
            .unwrap_or(&[])
    }

    fn view(&self, bucket: usize, item: usize) -> Option<&ItemView> {
        self.views.get(bucket)?.get(item)
    }
}
