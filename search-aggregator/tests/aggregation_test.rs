use search_aggregator::{
    aggregator::{MapRegion, ResultsView, NO_DESCRIPTION, NO_RESULTS, NO_SUMMARY, UNTITLED},
    sentiment::{classify, classify_five, SentimentBucket, SentimentGrade},
    types::*,
    AggregateSentiment, GeoExtractor, PresentationConfig, ResultAggregator, SentimentPolicy,
    ZeroCoordinatePolicy,
};
use serde_json::json;
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

fn parse(value: serde_json::Value) -> Result<SearchResponse> {
    Ok(serde_json::from_value(value)?)
}

fn sample_response() -> Result<SearchResponse> {
    parse(json!({
        "results": {
            "wikipedia": [{"title": "A", "sentiment_score": 0.1}],
            "gdelt": [{"title": "B", "sentiment_score": -0.2, "location": [{"lat": 10, "lng": 20}]}]
        }
    }))
}

#[test]
fn test_end_to_end_two_sources() -> Result<()> {
    init_tracing();
    info!("Aggregating the two-source sample for the geolocation page");

    let response = sample_response()?;
    let model = ResultAggregator::new(PresentationConfig::geolocation()).aggregate(&response);

    let keys: Vec<&str> = model.buckets().iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["gdelt", "wikipedia"]);

    let wikipedia = model.bucket("wikipedia").expect("wikipedia bucket");
    let badge = wikipedia.items[0].badge.as_ref().expect("badge");
    assert_eq!(badge.label, "Positive");
    assert_eq!(badge.text, "0.10");

    let gdelt = model.bucket("gdelt").expect("gdelt bucket");
    assert_eq!(gdelt.items[0].badge.as_ref().expect("badge").label, "Negative");
    assert_eq!(gdelt.items[0].location, Some((10.0, 20.0)));
    assert!(gdelt.initially_expanded);
    assert!(!wikipedia.initially_expanded);

    let points = model.map_points();
    assert_eq!(points.len(), 1);
    assert_eq!((points[0].lat, points[0].lng), (10.0, 20.0));
    assert_eq!(points[0].title, "B");
    match &model.map {
        MapRegion::Shown { event_count, .. } => assert_eq!(*event_count, 2),
        other => panic!("expected a shown map, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_general_page_order_and_hidden_map() -> Result<()> {
    init_tracing();

    let response = sample_response()?;
    let model = ResultAggregator::new(PresentationConfig::general()).aggregate(&response);

    match &model.results {
        ResultsView::Sources { heading, buckets } => {
            assert_eq!(heading, "General Knowledge Results");
            assert_eq!(buckets[0].key, "wikipedia");
            assert_eq!(buckets[1].key, "gdelt");
            assert!(buckets[0].initially_expanded);
            assert!(!buckets[1].initially_expanded);
        }
        other => panic!("expected sources, got {:?}", other),
    }
    assert_eq!(model.map, MapRegion::Hidden);
    assert_eq!(model.overview.summary, NO_SUMMARY);

    Ok(())
}

#[test]
fn test_empty_results_yield_no_results_state() -> Result<()> {
    init_tracing();

    let response = parse(json!({"summary": "Nothing today", "results": {}}))?;
    let model = ResultAggregator::new(PresentationConfig::news()).aggregate(&response);

    assert!(model.is_empty());
    assert!(model.buckets().is_empty());
    assert_eq!(
        model.results,
        ResultsView::Empty {
            message: NO_RESULTS.to_string()
        }
    );
    assert_eq!(model.overview.summary, "Nothing today");

    // Sources that exist but hold nothing are omitted the same way.
    let response = parse(json!({"results": {"wikipedia": [], "gdelt": []}}))?;
    let model = ResultAggregator::new(PresentationConfig::geolocation()).aggregate(&response);
    assert!(model.is_empty());
    assert_eq!(model.map, MapRegion::NoLocationData);

    Ok(())
}

#[test]
fn test_unknown_source_is_never_rendered() -> Result<()> {
    init_tracing();

    let response = parse(json!({
        "results": {
            "my_private_feed": [{"title": "secret"}],
            "google": [{"title": "public"}]
        }
    }))?;
    let model = ResultAggregator::new(PresentationConfig::general()).aggregate(&response);

    assert_eq!(model.buckets().len(), 1);
    assert_eq!(model.buckets()[0].key, "google");
    assert!(model.bucket("my_private_feed").is_none());

    // Only unknown sources means the empty state.
    let response = parse(json!({"results": {"my_private_feed": [{"title": "secret"}]}}))?;
    let model = ResultAggregator::new(PresentationConfig::general()).aggregate(&response);
    assert!(model.is_empty());

    Ok(())
}

#[test]
fn test_bucket_percentages() -> Result<()> {
    init_tracing();

    let response = parse(json!({
        "results": {
            "rss_news": [
                {"title": "up", "sentiment_score": 0.7},
                {"title": "down", "sentiment_score": -0.7},
                {"title": "flat"}
            ]
        }
    }))?;
    let model = ResultAggregator::new(PresentationConfig::news()).aggregate(&response);
    let sentiment = &model.bucket("rss_news").expect("rss bucket").sentiment;

    assert_eq!(sentiment.total, 3);
    assert_eq!((sentiment.positive, sentiment.negative, sentiment.neutral), (1, 1, 1));
    assert_eq!(sentiment.positive_percent, 33);
    assert_eq!(sentiment.negative_percent, 33);
    assert_eq!(sentiment.neutral_percent, 33);

    let two_thirds = AggregateSentiment::from_scores(vec![Some(0.2), Some(0.3), Some(-0.3)]);
    assert_eq!(two_thirds.positive_percent, 67);
    assert_eq!(two_thirds.negative_percent, 33);
    assert_eq!(two_thirds.neutral_percent, 0);

    let empty = AggregateSentiment::from_scores(Vec::new());
    assert_eq!(empty.total, 0);
    assert_eq!(empty.positive_percent, 0);

    Ok(())
}

#[test]
fn test_three_bucket_boundaries() {
    assert_eq!(classify(Some(0.05)).bucket, SentimentBucket::Neutral);
    assert_eq!(classify(Some(-0.05)).bucket, SentimentBucket::Neutral);
    assert_eq!(classify(Some(0.0501)).bucket, SentimentBucket::Positive);
    assert_eq!(classify(Some(-0.0501)).bucket, SentimentBucket::Negative);
    assert_eq!(classify(None).bucket, SentimentBucket::Neutral);
    assert_eq!(classify(Some(f64::NAN)).bucket, SentimentBucket::Neutral);
    assert_eq!(classify(Some(0.3)).icon, "fa-smile");
}

#[test]
fn test_five_bucket_boundaries() {
    assert_eq!(classify_five(0.5), SentimentGrade::Positive);
    assert_eq!(classify_five(0.49), SentimentGrade::SlightlyPositive);
    assert_eq!(classify_five(0.05), SentimentGrade::SlightlyPositive);
    assert_eq!(classify_five(0.0), SentimentGrade::Neutral);
    assert_eq!(classify_five(-0.05), SentimentGrade::SlightlyNegative);
    assert_eq!(classify_five(-0.5), SentimentGrade::SlightlyNegative);
    assert_eq!(classify_five(-0.51), SentimentGrade::Negative);
    assert_eq!(classify_five(f64::NAN), SentimentGrade::Neutral);
}

#[test]
fn test_policies_disagree_on_absent_and_small_scores() {
    let three = SentimentPolicy::ThreeBucket;
    let five = SentimentPolicy::FiveBucket;

    let absent = three.badge(None).expect("three-bucket always badges");
    assert_eq!(absent.label, "Neutral");
    assert_eq!(absent.text, "0.00");
    assert!(five.badge(None).is_none());

    let zero = five.badge(Some(0.0)).expect("explicit zero gets a badge");
    assert_eq!(zero.label, "Neutral");

    // 0.03 is neutral in three buckets but slightly positive in five.
    assert_eq!(three.badge(Some(0.03)).expect("badge").label, "Neutral");
    assert_eq!(five.badge(Some(0.03)).expect("badge").label, "Slightly Positive");
}

#[test]
fn test_five_bucket_presentation() -> Result<()> {
    init_tracing();

    let response = parse(json!({
        "results": {"gnews": [{"title": "no score"}, {"title": "scored", "sentiment_score": -0.9}]}
    }))?;
    let config = PresentationConfig::news().with_sentiment_policy(SentimentPolicy::FiveBucket);
    let model = ResultAggregator::new(config).aggregate(&response);
    let bucket = model.bucket("gnews").expect("gnews bucket");

    assert!(bucket.items[0].badge.is_none());
    assert_eq!(bucket.items[1].badge.as_ref().expect("badge").text, "Negative");
    // Distributions always use the three-bucket rule.
    assert_eq!(bucket.sentiment.neutral, 1);
    assert_eq!(bucket.sentiment.negative, 1);

    Ok(())
}

#[test]
fn test_zero_coordinate_policies() -> Result<()> {
    init_tracing();

    let response = parse(json!({
        "results": {
            "gdelt": [
                {"title": "equator", "location": [{"lat": 0, "lng": 32.5}]},
                {"title": "nairobi", "location": [{"lat": -1.29, "lng": 36.82}]}
            ]
        }
    }))?;
    let items = &response.results["gdelt"];

    let accepting = GeoExtractor::default();
    assert_eq!(accepting.zero_coordinates(), ZeroCoordinatePolicy::Accept);
    assert_eq!(accepting.extract(items).len(), 2);

    let legacy = GeoExtractor::new(ZeroCoordinatePolicy::Reject);
    let points = legacy.extract(items);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].title, "nairobi");

    let model = ResultAggregator::new(PresentationConfig::geolocation())
        .with_geo_extractor(legacy)
        .aggregate(&response);
    let gdelt = model.bucket("gdelt").expect("gdelt bucket");
    assert!(!gdelt.items[0].has_location());
    assert!(gdelt.items[1].has_location());

    Ok(())
}

#[test]
fn test_malformed_items_degrade_gracefully() -> Result<()> {
    init_tracing();
    info!("Aggregating a payload with broken fields");

    let response = parse(json!({
        "tags": ["climate", 42, null, "  "],
        "results": {
            "gdelt": [
                "not an object",
                {"title": 7, "sentiment_score": "high", "location": "somewhere"},
                {"title": "", "summary": "from summary", "url": "javascript:alert(1)",
                 "location": [{"lat": "x", "lng": 3}, {"lat": 5, "lng": 6}, null]},
                {"title": "kept", "snippet": "  ", "description": "from description",
                 "url": "https://example.com/a", "location": []}
            ],
            "wikipedia": {"oops": true}
        }
    }))?;
    let model = ResultAggregator::new(PresentationConfig::geolocation()).aggregate(&response);

    assert_eq!(model.overview.tags, vec!["climate".to_string(), "42".to_string()]);
    assert!(model.bucket("wikipedia").is_none());

    let gdelt = model.bucket("gdelt").expect("gdelt bucket");
    assert_eq!(gdelt.item_count, 4);

    assert_eq!(gdelt.items[0].title, UNTITLED);
    assert_eq!(gdelt.items[0].description, NO_DESCRIPTION);
    assert_eq!(gdelt.items[1].title, "7");
    assert_eq!(gdelt.items[1].sentiment_score, None);
    assert!(!gdelt.items[1].has_location());

    assert_eq!(gdelt.items[2].title, UNTITLED);
    assert_eq!(gdelt.items[2].description, "from summary");
    assert_eq!(gdelt.items[2].url, None);
    assert_eq!(gdelt.items[2].location, Some((5.0, 6.0)));

    assert_eq!(gdelt.items[3].description, "from description");
    assert_eq!(gdelt.items[3].url.as_deref(), Some("https://example.com/a"));
    assert!(!gdelt.items[3].has_location());

    let points = model.map_points();
    assert_eq!(points.len(), 1);
    assert_eq!((points[0].lat, points[0].lng), (5.0, 6.0));

    Ok(())
}

#[test]
fn test_record_text_nodes() -> Result<()> {
    let response = parse(json!({
        "results": {"gdelt": [{"title": "Quake", "snippet": "Strong quake",
            "url": "https://example.com/q", "sentiment_score": -0.4,
            "location": [{"lat": 35.6, "lng": 139.7}]}]}
    }))?;
    let model = ResultAggregator::new(PresentationConfig::geolocation()).aggregate(&response);
    let record = &model.bucket("gdelt").expect("gdelt bucket").items[0];

    assert_eq!(
        record.text_nodes(),
        vec!["Quake", "Has Location", "-0.40", "Strong quake", "Read More", "Show on Map"]
    );
    assert_eq!(record.visible_text(), "Quake Has Location -0.40 Strong quake Read More Show on Map");

    Ok(())
}
