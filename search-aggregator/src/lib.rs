pub mod types;
pub mod traits;
pub mod fetcher;
pub mod utils;
pub mod date_range;
pub mod sentiment;
pub mod geo;
pub mod map;
pub mod presentation;
pub mod aggregator;
pub mod disclosure;
pub mod filter;
pub mod session;
pub mod display;

pub use types::*;
pub use traits::SearchBackend;
pub use fetcher::Fetcher;
pub use date_range::{DatePreset, DateRangeState};
pub use sentiment::{AggregateSentiment, SentimentPolicy};
pub use geo::{GeoExtractor, LocationPoint, ZeroCoordinatePolicy};
pub use map::MapProjector;
pub use presentation::PresentationConfig;
pub use aggregator::{RenderModel, ResultAggregator};
pub use disclosure::{Disclosure, DisclosureController};
pub use filter::TagFilterEngine;
pub use session::{AggregationSession, SessionPhase};
pub use display::render_page;
