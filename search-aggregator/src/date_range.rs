//! Temporal filter state behind the search form.
//!
//! Holds an explicit date range, a year range and the active preset pill.
//! Nothing here can fail: picker output that does not carry exactly two dates
//! is ignored.

use crate::utils::time::{format_date, local_today};
use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatePreset {
    #[default]
    None,
    Today,
    PastWeek,
    PastMonth,
    PastYear,
    Custom,
}

impl DatePreset {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "none" => Some(DatePreset::None),
            "today" => Some(DatePreset::Today),
            "past-week" => Some(DatePreset::PastWeek),
            "past-month" => Some(DatePreset::PastMonth),
            "past-year" => Some(DatePreset::PastYear),
            "custom" => Some(DatePreset::Custom),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DatePreset::None => "none",
            DatePreset::Today => "today",
            DatePreset::PastWeek => "past-week",
            DatePreset::PastMonth => "past-month",
            DatePreset::PastYear => "past-year",
            DatePreset::Custom => "custom",
        }
    }

    /// `[today - Δ, today]` for the presets that define a window.
    pub fn window(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let from = match self {
            DatePreset::Today => today,
            DatePreset::PastWeek => today - Duration::days(7),
            DatePreset::PastMonth => today.checked_sub_months(Months::new(1))?,
            DatePreset::PastYear => today.checked_sub_months(Months::new(12))?,
            DatePreset::None | DatePreset::Custom => return None,
        };
        Some((from, today))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeState {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
    pub active_preset: DatePreset,
}

impl DateRangeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_preset(&mut self, preset: DatePreset, today: NaiveDate) {
        self.active_preset = preset;

        match preset {
            DatePreset::None => self.clear_fields(),
            // The picker owns the dates from here on.
            DatePreset::Custom => {}
            _ => {
                if let Some((from, to)) = preset.window(today) {
                    self.from_date = Some(from);
                    self.to_date = Some(to);
                }
            }
        }

        debug!("Applied date preset {}: {:?}", preset.name(), self.summary());
    }

    pub fn apply_preset_today(&mut self, preset: DatePreset) {
        self.apply_preset(preset, local_today());
    }

    /// Both ends chosen in the picker.
    pub fn set_explicit_dates(&mut self, start: NaiveDate, end: NaiveDate) {
        self.from_date = Some(start);
        self.to_date = Some(end);
        self.active_preset = DatePreset::Custom;
    }

    /// Picker change callback. Anything other than a complete pair is ignored.
    pub fn on_picker_change(&mut self, selected: &[NaiveDate]) -> bool {
        match selected {
            [start, end] => {
                self.set_explicit_dates(*start, *end);
                true
            }
            _ => {
                debug!("Ignoring picker output with {} dates", selected.len());
                false
            }
        }
    }

    pub fn set_years(&mut self, from_year: Option<i32>, to_year: Option<i32>) {
        self.from_year = from_year;
        self.to_year = to_year;
    }

    pub fn clear(&mut self) {
        self.clear_fields();
        self.active_preset = DatePreset::None;
    }

    fn clear_fields(&mut self) {
        self.from_date = None;
        self.to_date = None;
        self.from_year = None;
        self.to_year = None;
    }

    pub fn is_picker_visible(&self) -> bool {
        self.active_preset == DatePreset::Custom
    }

    /// Composite filter summary, `None` when nothing is active.
    pub fn summary(&self) -> Option<String> {
        let mut facets = Vec::new();

        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from == to {
                facets.push(format!("Date: {}", format_date(from)));
            } else {
                facets.push(format!("Date range: {} to {}", format_date(from), format_date(to)));
            }
        }

        match (self.from_year, self.to_year) {
            (Some(from), Some(to)) if from == to => facets.push(format!("Year: {}", from)),
            (Some(from), Some(to)) => facets.push(format!("Year range: {} to {}", from, to)),
            (Some(from), None) => facets.push(format!("From year: {}", from)),
            (None, Some(to)) => facets.push(format!("To year: {}", to)),
            (None, None) => {}
        }

        if facets.is_empty() {
            None
        } else {
            Some(facets.join(" • "))
        }
    }

    /// `(from_date, to_date, from_year, to_year)` as form strings, empty when unset.
    pub fn request_fields(&self) -> (String, String, String, String) {
        (
            self.from_date.map(format_date).unwrap_or_default(),
            self.to_date.map(format_date).unwrap_or_default(),
            self.from_year.map(|year| year.to_string()).unwrap_or_default(),
            self.to_year.map(|year| year.to_string()).unwrap_or_default(),
        )
    }
}
