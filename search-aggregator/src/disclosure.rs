use crate::aggregator::RenderModel;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disclosure {
    Expanded,
    Collapsed,
}

impl Disclosure {
    pub fn toggled(self) -> Self {
        match self {
            Disclosure::Expanded => Disclosure::Collapsed,
            Disclosure::Collapsed => Disclosure::Expanded,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == Disclosure::Expanded
    }

    /// Directional icon shown in the section header.
    pub fn indicator(self) -> &'static str {
        match self {
            Disclosure::Expanded => "fa-chevron-up",
            Disclosure::Collapsed => "fa-chevron-down",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionState {
    pub key: String,
    pub state: Disclosure,
}

/// Expanded/collapsed state of every rendered source section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisclosureController {
    sections: Vec<SectionState>,
}

impl DisclosureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_model(model: &RenderModel) -> Self {
        let sections = model
            .buckets()
            .iter()
            .map(|bucket| SectionState {
                key: bucket.key.clone(),
                state: if bucket.initially_expanded {
                    Disclosure::Expanded
                } else {
                    Disclosure::Collapsed
                },
            })
            .collect();
        Self { sections }
    }

    pub fn sections(&self) -> &[SectionState] {
        &self.sections
    }

    pub fn state(&self, key: &str) -> Option<Disclosure> {
        self.sections.iter().find(|section| section.key == key).map(|section| section.state)
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.state(key).is_some_and(Disclosure::is_expanded)
    }

    /// Header click. Returns the new state, `None` for an unknown section.
    pub fn toggle(&mut self, key: &str) -> Option<Disclosure> {
        let section = self.sections.iter_mut().find(|section| section.key == key)?;
        section.state = section.state.toggled();
        debug!("Section {} is now {:?}", key, section.state);
        Some(section.state)
    }

    /// Forced expansion. Returns true when the section was collapsed before.
    pub fn expand(&mut self, key: &str) -> bool {
        match self.sections.iter_mut().find(|section| section.key == key) {
            Some(section) if section.state == Disclosure::Collapsed => {
                section.state = Disclosure::Expanded;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }
}
