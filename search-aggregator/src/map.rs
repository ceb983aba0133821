//! Map placement for extracted locations.
//!
//! The canvas is built lazily on the first non-empty projection and then kept
//! for the lifetime of the projector; later searches only swap its markers.
//! Popup text is taken verbatim, callers sanitize before projecting.

use crate::geo::LocationPoint;
use crate::utils::url::safe_link;
use serde::Serialize;
use tracing::{debug, info};

pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const INITIAL_CENTER: (f64, f64) = (20.0, 0.0);
pub const INITIAL_ZOOM: u8 = 2;
pub const FOCUS_ZOOM: u8 = 10;
/// Margin added on every side of the fitted bounds, in degrees.
pub const BOUNDS_PADDING_DEGREES: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub description: String,
    pub source_line: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub popup: Popup,
    pub popup_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south && lat <= self.north && lng >= self.west && lng <= self.east
    }

    pub fn padded(&self, margin: f64) -> Self {
        Self {
            south: (self.south - margin).max(-90.0),
            west: (self.west - margin).max(-180.0),
            north: (self.north + margin).min(90.0),
            east: (self.east + margin).min(180.0),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: (f64, f64),
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapCanvas {
    pub tile_url: &'static str,
    pub attribution: &'static str,
    pub viewport: Viewport,
    pub fitted_bounds: Option<Bounds>,
    pub markers: Vec<Marker>,
}

impl MapCanvas {
    fn new() -> Self {
        Self {
            tile_url: TILE_URL_TEMPLATE,
            attribution: TILE_ATTRIBUTION,
            viewport: Viewport {
                center: INITIAL_CENTER,
                zoom: INITIAL_ZOOM,
            },
            fitted_bounds: None,
            markers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub markers: Vec<Marker>,
    pub bounds: Bounds,
}

/// Smallest rectangle holding every point, before padding.
pub fn bounds_of(points: &[LocationPoint]) -> Option<Bounds> {
    let first = points.first()?;
    let start = Bounds {
        south: first.lat,
        west: first.lng,
        north: first.lat,
        east: first.lng,
    };

    Some(points.iter().skip(1).fold(start, |bounds, point| Bounds {
        south: bounds.south.min(point.lat),
        west: bounds.west.min(point.lng),
        north: bounds.north.max(point.lat),
        east: bounds.east.max(point.lng),
    }))
}

pub fn marker_for(point: &LocationPoint) -> Marker {
    Marker {
        lat: point.lat,
        lng: point.lng,
        popup: Popup {
            title: point.title.clone(),
            description: point.description.clone().unwrap_or_default(),
            source_line: point
                .source
                .as_deref()
                .filter(|source| !source.trim().is_empty())
                .map(|source| format!("Source: {}", source)),
            link: safe_link(point.url.as_deref()),
        },
        popup_open: false,
    }
}

#[derive(Debug, Default)]
pub struct MapProjector {
    canvas: Option<MapCanvas>,
    padding_degrees: f64,
}

impl MapProjector {
    pub fn new() -> Self {
        Self::with_padding(BOUNDS_PADDING_DEGREES)
    }

    pub fn with_padding(padding_degrees: f64) -> Self {
        Self {
            canvas: None,
            padding_degrees,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn canvas(&self) -> Option<&MapCanvas> {
        self.canvas.as_ref()
    }

    pub fn markers(&self) -> &[Marker] {
        self.canvas
            .as_ref()
            .map(|canvas| canvas.markers.as_slice())
            .unwrap_or(&[])
    }

    /// Replace the markers with one per point and fit the viewport to them.
    /// With no points nothing happens and no canvas is built.
    pub fn project(&mut self, points: &[LocationPoint]) -> Option<Projection> {
        let bounds = bounds_of(points)?.padded(self.padding_degrees);
        let markers: Vec<Marker> = points.iter().map(marker_for).collect();

        let canvas = self.canvas.get_or_insert_with(|| {
            debug!("Initializing map canvas");
            MapCanvas::new()
        });
        canvas.markers = markers.clone();
        canvas.fitted_bounds = Some(bounds);
        canvas.viewport.center = bounds.center();

        info!("Projected {} markers", markers.len());
        Some(Projection { markers, bounds })
    }

    /// Drop every marker, keep the canvas.
    pub fn clear(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.markers.clear();
            canvas.fitted_bounds = None;
        }
    }

    /// Centre on a coordinate and open the popup of every marker placed
    /// exactly there. Returns how many popups were opened.
    pub fn focus(&mut self, lat: f64, lng: f64) -> usize {
        let Some(canvas) = self.canvas.as_mut() else {
            return 0;
        };
        if !lat.is_finite() || !lng.is_finite() {
            return 0;
        }

        canvas.viewport = Viewport {
            center: (lat, lng),
            zoom: FOCUS_ZOOM,
        };

        let mut opened = 0;
        for marker in canvas.markers.iter_mut() {
            marker.popup_open = marker.lat == lat && marker.lng == lng;
            if marker.popup_open {
                opened += 1;
            }
        }
        opened
    }
}
