use search_aggregator::{
    disclosure::Disclosure,
    display::render_page,
    filter::{find_matches, highlight, HighlightedText},
    types::*,
    AggregationSession, DisclosureController, PresentationConfig, ResultAggregator,
    TagFilterEngine,
};
use serde_json::json;
use std::sync::Once;
use tracing::info;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

fn climate_response() -> Result<SearchResponse> {
    Ok(serde_json::from_value(json!({
        "summary": "Climate coverage",
        "tags": ["Climate", "Energy"],
        "results": {
            "wikipedia": [
                {"title": "Climate change", "snippet": "Long-term shifts in climate patterns", "sentiment_score": 0.0},
                {"title": "Solar power", "snippet": "Energy from the sun", "sentiment_score": 0.4}
            ],
            "news_everything": [
                {"title": "Energy prices", "snippet": "Markets react", "sentiment_score": -0.3},
                {"title": "CLIMATE summit opens", "snippet": "Leaders meet", "url": "https://example.com/summit"}
            ],
            "google": [
                {"title": "Cooking tips", "snippet": "Pasta at home"}
            ]
        }
    }))?)
}

#[test]
fn test_pure_highlight() {
    assert_eq!(find_matches("Climate and climate", "CLIMATE"), vec![0..7, 12..19]);
    assert!(find_matches("anything", "").is_empty());
    assert_eq!(find_matches("aaaa", "aa"), vec![0..2, 2..4]);

    let marked = highlight("Über über", "über");
    assert_eq!(marked.spans.len(), 2);
    assert_eq!(marked.render_with("[[", "]]"), "[[Über]] [[über]]");

    let plain = HighlightedText::plain("no marks");
    assert_eq!(plain.segments(), vec![("no marks", false)]);
    assert_eq!(plain.render_with("<", ">"), "no marks");
}

#[test]
fn test_apply_tag_shows_matches_and_expands_sections() -> Result<()> {
    init_tracing();
    info!("Filtering the general page by a tag");

    let response = climate_response()?;
    let model = ResultAggregator::new(PresentationConfig::general()).aggregate(&response);
    let mut disclosure = DisclosureController::from_model(&model);
    let mut engine = TagFilterEngine::new();

    assert_eq!(disclosure.state("wikipedia"), Some(Disclosure::Expanded));
    assert_eq!(disclosure.state("news_everything"), Some(Disclosure::Collapsed));

    let outcome = engine
        .apply_tag(&model, &mut disclosure, "climate")
        .expect("tag applied");

    assert_eq!(outcome.matched, 2);
    assert_eq!(outcome.hidden, 3);
    assert!(!outcome.no_matches());
    assert_eq!(outcome.expanded_sections, vec!["news_everything".to_string()]);

    assert_eq!(disclosure.state("news_everything"), Some(Disclosure::Expanded));
    assert_eq!(disclosure.state("google"), Some(Disclosure::Collapsed));

    // Bucket order: wikipedia, news_everything, google.
    assert!(engine.is_visible(0, 0));
    assert!(!engine.is_visible(0, 1));
    assert!(!engine.is_visible(1, 0));
    assert!(engine.is_visible(1, 1));
    assert!(!engine.is_visible(2, 0));

    let spans = engine.highlights(0, 0);
    assert_eq!(spans[0], vec![0..7]);
    assert_eq!(engine.indicator().as_deref(), Some("Filter: climate"));
    assert_eq!(engine.active_tag(), Some("climate"));

    Ok(())
}

#[test]
fn test_no_matches_indicator() -> Result<()> {
    init_tracing();

    let response = climate_response()?;
    let model = ResultAggregator::new(PresentationConfig::general()).aggregate(&response);
    let mut disclosure = DisclosureController::from_model(&model);
    let mut engine = TagFilterEngine::new();

    let outcome = engine
        .apply_tag(&model, &mut disclosure, "volcano")
        .expect("tag applied");
    assert!(outcome.no_matches());
    assert!(engine.no_matches());
    assert!(outcome.expanded_sections.is_empty());
    assert_eq!(disclosure.state("news_everything"), Some(Disclosure::Collapsed));

    engine.clear_tag();
    assert!(!engine.no_matches());
    assert!(engine.indicator().is_none());

    Ok(())
}

#[test]
fn test_blank_tag_clears_filter() -> Result<()> {
    let response = climate_response()?;
    let model = ResultAggregator::new(PresentationConfig::general()).aggregate(&response);
    let mut disclosure = DisclosureController::from_model(&model);
    let mut engine = TagFilterEngine::new();

    engine.apply_tag(&model, &mut disclosure, "energy");
    assert!(!engine.is_visible(0, 0));

    assert!(engine.apply_tag(&model, &mut disclosure, "   ").is_none());
    assert!(engine.is_visible(0, 0));
    assert!(engine.active_tag().is_none());

    Ok(())
}

#[tokio::test]
async fn test_apply_then_clear_restores_rendering() -> Result<()> {
    init_tracing();

    let mut session = AggregationSession::new(PresentationConfig::general());
    session.render(&climate_response()?);
    // Open every section so all items are part of the output.
    session.toggle_section("news_everything");
    session.toggle_section("google");

    let before = render_page(&session);
    assert!(!before.contains("[["));

    let outcome = session.apply_tag("Climate").expect("tag applied");
    assert_eq!(outcome.matched, 2);

    let filtered = render_page(&session);
    assert!(filtered.contains("Filter: Climate"));
    assert!(filtered.contains("[[Climate]] change"));
    assert!(filtered.contains("[[CLIMATE]] summit opens"));
    assert!(!filtered.contains("Cooking tips"));

    // Re-applying highlights from the stored text, never nested.
    session.apply_tag("Climate");
    assert!(!render_page(&session).contains("[[[["));

    session.clear_tag();
    assert_eq!(render_page(&session), before);

    Ok(())
}

#[test]
fn test_sections_stay_expanded_after_clear() -> Result<()> {
    let mut session = AggregationSession::new(PresentationConfig::general());
    session.render(&climate_response()?);

    session.apply_tag("summit");
    assert!(session.disclosure().is_expanded("news_everything"));

    session.clear_tag();
    assert!(session.disclosure().is_expanded("news_everything"));
    assert!(session.filter().active_tag().is_none());

    Ok(())
}

#[test]
fn test_disclosure_toggling() -> Result<()> {
    let response = climate_response()?;
    let model = ResultAggregator::new(PresentationConfig::general()).aggregate(&response);
    let mut disclosure = DisclosureController::from_model(&model);

    assert_eq!(disclosure.sections().len(), 3);
    assert_eq!(
        disclosure.sections().iter().filter(|s| s.state.is_expanded()).count(),
        1
    );

    assert_eq!(disclosure.toggle("google"), Some(Disclosure::Expanded));
    assert_eq!(Disclosure::Expanded.indicator(), "fa-chevron-up");
    assert_eq!(disclosure.toggle("google"), Some(Disclosure::Collapsed));
    assert_eq!(Disclosure::Collapsed.indicator(), "fa-chevron-down");
    assert_eq!(disclosure.toggle("not_rendered"), None);

    // Forced expansion only reports sections it actually opened.
    assert!(!disclosure.expand("wikipedia"));
    assert!(disclosure.expand("google"));
    assert!(!disclosure.expand("google"));

    Ok(())
}

#[test]
fn test_location_text_only_on_map_page() -> Result<()> {
    init_tracing();

    let response: SearchResponse = serde_json::from_value(json!({
        "results": {
            "wikipedia": [
                {"title": "Paris", "snippet": "Capital of France", "location": [{"lat": 48.85, "lng": 2.35}]},
                {"title": "Rome", "snippet": "Capital of Italy"}
            ]
        }
    }))?;

    let mut session = AggregationSession::new(PresentationConfig::general());
    session.render(&response);

    let paris = &session.model().expect("model").buckets()[0].items[0];
    assert!(!paris.has_location());
    assert_eq!(paris.text_nodes(), vec!["Paris", "0.00", "Capital of France"]);

    let page = render_page(&session);
    assert!(!page.contains("Has Location"));
    assert!(!page.contains("Show on Map"));

    for tag in ["map", "location"] {
        let outcome = session.apply_tag(tag).expect("tag applied");
        assert_eq!(outcome.matched, 0, "{} matched hidden text", tag);
        assert_eq!(outcome.hidden, 2);
    }

    // The geolocation page keeps the location actions.
    let mut geo = AggregationSession::new(PresentationConfig::geolocation());
    geo.render(&response);
    let outcome = geo.apply_tag("map").expect("tag applied");
    assert_eq!(outcome.matched, 1);
    assert!(render_page(&geo).contains("[[Map]]"));

    Ok(())
}
