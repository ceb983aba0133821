//! The page controller: one session per page load, reset on every search.

use crate::aggregator::{RenderModel, ResultAggregator};
use crate::date_range::DateRangeState;
use crate::disclosure::{Disclosure, DisclosureController};
use crate::filter::{FilterOutcome, TagFilterEngine};
use crate::geo::{GeoExtractor, LocationPoint};
use crate::map::MapProjector;
use crate::presentation::PresentationConfig;
use crate::traits::SearchBackend;
use crate::types::{AggregatorError, PageMode, Result, SearchForm, SearchRequest, SearchResponse};
use crate::utils::text::escape_markup;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

/// A submission that has been validated and is waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub ticket: Uuid,
    pub mode: PageMode,
    pub request: SearchRequest,
}

pub struct AggregationSession {
    aggregator: ResultAggregator,
    dates: DateRangeState,
    map: MapProjector,
    model: Option<RenderModel>,
    disclosure: DisclosureController,
    filter: TagFilterEngine,
    phase: SessionPhase,
    current_submission: Option<Uuid>,
}

impl AggregationSession {
    pub fn new(config: PresentationConfig) -> Self {
        Self {
            aggregator: ResultAggregator::new(config),
            dates: DateRangeState::new(),
            map: MapProjector::new(),
            model: None,
            disclosure: DisclosureController::new(),
            filter: TagFilterEngine::new(),
            phase: SessionPhase::Idle,
            current_submission: None,
        }
    }

    pub fn with_geo_extractor(mut self, geo: GeoExtractor) -> Self {
        self.aggregator = ResultAggregator::new(self.aggregator.config().clone()).with_geo_extractor(geo);
        self
    }

    pub fn config(&self) -> &PresentationConfig {
        self.aggregator.config()
    }

    pub fn mode(&self) -> PageMode {
        self.config().mode
    }

    /// Drop the view model and every piece of state derived from it. The map
    /// canvas and the date filter survive.
    pub fn reset(&mut self) {
        self.clear_view();
        self.phase = SessionPhase::Idle;
        self.current_submission = None;
    }

    fn clear_view(&mut self) {
        self.model = None;
        self.disclosure.clear();
        self.filter.clear_tag();
        self.map.clear();
    }

    /// Validate the form, wipe the previous results and issue a ticket.
    /// A blank query is rejected without touching any state.
    pub fn begin_submission(&mut self, form: &SearchForm) -> Result<PendingSearch> {
        if form.query.trim().is_empty() {
            return Err(AggregatorError::EmptyQuery);
        }

        if let Some(previous) = self.current_submission {
            if self.phase == SessionPhase::Loading {
                debug!("Submission {} superseded before its response arrived", previous);
            }
        }

        self.clear_view();
        self.phase = SessionPhase::Loading;

        let ticket = Uuid::new_v4();
        self.current_submission = Some(ticket);

        let (from_date, to_date, from_year, to_year) = self.dates.request_fields();
        let request = SearchRequest {
            query: form.query.clone(),
            negative_query: form.negative_query.clone(),
            from_date,
            to_date,
            from_year,
            to_year,
            language: form.language.clone(),
        };

        info!("Submitting {:?} search {} for {:?}", self.mode(), ticket, request.query);
        Ok(PendingSearch {
            ticket,
            mode: self.mode(),
            request,
        })
    }

    /// Land a response. Whatever arrives last wins, even for an outdated
    /// ticket. A failure leaves no results behind, only the banner.
    pub fn complete(&mut self, ticket: Uuid, outcome: Result<SearchResponse>) -> Result<()> {
        if self.current_submission != Some(ticket) {
            warn!(
                "Response for submission {} arrived after {:?}; it overwrites the newer results",
                ticket, self.current_submission
            );
        }

        match outcome {
            Ok(response) => {
                self.render(&response);
                Ok(())
            }
            Err(e) => {
                self.clear_view();
                let message = e.user_message();
                error!("Search {} failed: {}", ticket, message);
                self.phase = SessionPhase::Failed { message };
                Err(e)
            }
        }
    }

    /// Build the view for a response. All previous view state is gone before
    /// the new model is built.
    pub fn render(&mut self, response: &SearchResponse) -> &RenderModel {
        self.clear_view();

        let model = self.aggregator.aggregate(response);
        self.disclosure = DisclosureController::from_model(&model);

        let points: Vec<LocationPoint> = model.map_points().iter().map(sanitized_point).collect();
        if !points.is_empty() {
            self.map.project(&points);
        }

        self.phase = SessionPhase::Ready;
        self.model.insert(model)
    }

    pub async fn submit<B>(&mut self, backend: &B, form: &SearchForm) -> Result<()>
    where
        B: SearchBackend + ?Sized,
    {
        let pending = self.begin_submission(form)?;
        debug!("Dispatching {} to {}", pending.ticket, backend.backend_name());
        let outcome = backend.search(pending.mode, &pending.request).await;
        self.complete(pending.ticket, outcome)
    }

    /// `None` when there is nothing rendered to filter, or the tag is blank.
    pub fn apply_tag(&mut self, tag: &str) -> Option<FilterOutcome> {
        let Some(model) = self.model.as_ref() else {
            debug!("Ignoring tag {:?}: no results rendered", tag);
            return None;
        };
        self.filter.apply_tag(model, &mut self.disclosure, tag)
    }

    pub fn clear_tag(&mut self) {
        self.filter.clear_tag();
    }

    pub fn toggle_section(&mut self, key: &str) -> Option<Disclosure> {
        self.disclosure.toggle(key)
    }

    /// "Show on Map" for a coordinate. Returns the number of popups opened.
    pub fn locate_on_map(&mut self, lat: f64, lng: f64) -> usize {
        let opened = self.map.focus(lat, lng);
        debug!("Located ({}, {}) on the map, {} popups opened", lat, lng, opened);
        opened
    }

    pub fn dates(&self) -> &DateRangeState {
        &self.dates
    }

    pub fn dates_mut(&mut self) -> &mut DateRangeState {
        &mut self.dates
    }

    pub fn model(&self) -> Option<&RenderModel> {
        self.model.as_ref()
    }

    pub fn disclosure(&self) -> &DisclosureController {
        &self.disclosure
    }

    pub fn filter(&self) -> &TagFilterEngine {
        &self.filter
    }

    pub fn map(&self) -> &MapProjector {
        &self.map
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }

    pub fn current_submission(&self) -> Option<Uuid> {
        self.current_submission
    }
}

// Popup text ends up in markup.
fn sanitized_point(point: &LocationPoint) -> LocationPoint {
    LocationPoint {
        lat: point.lat,
        lng: point.lng,
        title: escape_markup(&point.title),
        description: point.description.as_deref().map(escape_markup),
        source: point.source.as_deref().map(escape_markup),
        url: point.url.clone(),
    }
}
