use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use clap::Parser;
use search_aggregator::{
    render_page, AggregationSession, ClientConfig, DatePreset, Fetcher, GeoExtractor, PageMode,
    PresentationConfig, SearchBackend, SearchForm, SearchRequest, SearchResponse, SentimentPolicy,
    ZeroCoordinatePolicy,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Multi-source search aggregator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Page variant: general, news or geolocation
    #[arg(short, long, default_value = "general")]
    mode: String,

    /// Backend base URL (overrides SEARCH_BACKEND_URL)
    #[arg(short, long)]
    backend: Option<String>,

    #[arg(short, long)]
    query: String,

    #[arg(long, default_value = "")]
    negative_query: String,

    #[arg(long, default_value = "")]
    language: String,

    /// Date preset: none, today, past-week, past-month, past-year, custom
    #[arg(long, value_parser = parse_preset)]
    preset: Option<DatePreset>,

    #[arg(long, requires = "to_date")]
    from_date: Option<NaiveDate>,

    #[arg(long, requires = "from_date")]
    to_date: Option<NaiveDate>,

    #[arg(long)]
    from_year: Option<i32>,

    #[arg(long)]
    to_year: Option<i32>,

    /// Render a saved backend response instead of calling the backend
    #[arg(long)]
    response_file: Option<PathBuf>,

    /// Filter the rendered results by a tag
    #[arg(long)]
    tag: Option<String>,

    /// Toggle a source section, may be repeated
    #[arg(long)]
    toggle: Vec<String>,

    /// Centre the map on LAT,LNG and open its popups
    #[arg(long, value_parser = parse_coordinate)]
    locate: Option<(f64, f64)>,

    #[arg(long, value_parser = parse_policy)]
    sentiment_policy: Option<SentimentPolicy>,

    /// Treat 0.0 latitudes/longitudes as missing
    #[arg(long)]
    reject_zero_coordinates: bool,
}

fn parse_preset(value: &str) -> std::result::Result<DatePreset, String> {
    DatePreset::parse(value).ok_or_else(|| format!("unknown date preset: {}", value))
}

fn parse_policy(value: &str) -> std::result::Result<SentimentPolicy, String> {
    SentimentPolicy::parse(value).ok_or_else(|| format!("unknown sentiment policy: {}", value))
}

fn parse_coordinate(value: &str) -> std::result::Result<(f64, f64), String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {}", value))?;
    let lat = lat.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let lng = lng.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((lat, lng))
}

/// A backend response previously saved to disk.
struct RecordedBackend {
    path: PathBuf,
}

#[async_trait]
impl SearchBackend for RecordedBackend {
    fn backend_name(&self) -> String {
        format!("file ({})", self.path.display())
    }

    async fn search(
        &self,
        _mode: PageMode,
        _request: &SearchRequest,
    ) -> search_aggregator::Result<SearchResponse> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mode = PageMode::parse(&args.mode).ok_or_else(|| anyhow!("unknown mode: {}", args.mode))?;
    let config = PresentationConfig::for_mode(mode)
        .with_sentiment_policy(args.sentiment_policy.unwrap_or_default());
    let zero_coordinates = if args.reject_zero_coordinates {
        ZeroCoordinatePolicy::Reject
    } else {
        ZeroCoordinatePolicy::Accept
    };

    let mut session = AggregationSession::new(config).with_geo_extractor(GeoExtractor::new(zero_coordinates));

    let dates = session.dates_mut();
    if let Some(preset) = args.preset {
        dates.apply_preset_today(preset);
    }
    if let (Some(from), Some(to)) = (args.from_date, args.to_date) {
        dates.on_picker_change(&[from, to]);
    }
    dates.set_years(args.from_year, args.to_year);

    let form = SearchForm::new(args.query)
        .with_negative_query(args.negative_query)
        .with_language(args.language);

    let backend: Box<dyn SearchBackend> = match args.response_file {
        Some(path) => Box::new(RecordedBackend { path }),
        None => {
            let mut client_config = ClientConfig::from_env();
            if let Some(base_url) = args.backend {
                client_config.base_url = base_url;
            }
            Box::new(Fetcher::new(client_config)?)
        }
    };

    info!("Starting {:?} search via {}", mode, backend.backend_name());
    let outcome = session.submit(backend.as_ref(), &form).await;

    if outcome.is_ok() {
        for key in &args.toggle {
            if session.toggle_section(key).is_none() {
                warn!("No rendered section named {}", key);
            }
        }
        if let Some(tag) = &args.tag {
            session.apply_tag(tag);
        }
        if let Some((lat, lng)) = args.locate {
            session.locate_on_map(lat, lng);
        }
    }

    print!("{}", render_page(&session));
    outcome?;
    Ok(())
}
