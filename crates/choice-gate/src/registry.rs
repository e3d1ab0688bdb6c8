//! Gated resource discovery
//!
//! Elements opt in with `data-cookiecategory` (and optionally
//! `data-cookieconsent`). Per-element processing state is kept here, keyed by
//! element handle, so repeated scans never double-activate anything.

use std::collections::HashMap;

use choice_page::{ElementId, Page};

use crate::category::{ConsentCategory, ConsentRecord};

pub const CATEGORY_ATTR: &str = "data-cookiecategory";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Script,
    Iframe,
}

impl ResourceKind {
    fn from_tag(tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case("script") {
            Some(ResourceKind::Script)
        } else if tag.eq_ignore_ascii_case("iframe") {
            Some(ResourceKind::Iframe)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Processing {
    #[default]
    NotProcessed,
    Activated,
    Neutralized,
}

/// Progress of an external script request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    InFlight,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagState {
    pub processing: Processing,
    /// Stamped on activation; dropped on neutralization unless already loaded
    pub accepted: bool,
    /// Load-once guard: set when an inline script ran or an external one loaded
    pub loaded: bool,
    pub fetch: FetchState,
}

/// One gated element as seen by a single scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTag {
    pub element: ElementId,
    pub kind: ResourceKind,
    pub category: String,
    pub consent: String,
    /// Deferred locator (`data-src`)
    pub stored_locator: Option<String>,
    /// Live locator (`src`), absent when empty
    pub live_locator: Option<String>,
    pub state: TagState,
}

impl ResourceTag {
    pub fn mentions(&self, category: ConsentCategory) -> bool {
        category.mentioned_in(&self.category) || category.mentioned_in(&self.consent)
    }

    /// Whether the annotation names any known category; other tags are ignored
    pub fn is_gated(&self) -> bool {
        ConsentCategory::ALL.iter().any(|c| self.mentions(*c))
    }

    pub fn is_authorized(&self, record: &ConsentRecord) -> bool {
        ConsentCategory::ALL
            .iter()
            .any(|c| self.mentions(*c) && record.get(*c).is_granted())
    }

    /// First mentioned category that is not granted
    pub fn refused_category(&self, record: &ConsentRecord) -> Option<ConsentCategory> {
        ConsentCategory::ALL
            .into_iter()
            .find(|c| self.mentions(*c) && !record.get(*c).is_granted())
    }

    /// Deferred locator first, then the live one
    pub fn locator(&self) -> Option<&str> {
        self.stored_locator
            .as_deref()
            .or(self.live_locator.as_deref())
    }

    pub fn is_inline_script(&self) -> bool {
        self.kind == ResourceKind::Script && self.locator().is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    states: HashMap<ElementId, TagState>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh view of every gated script/iframe on the page, in document order.
    ///
    /// Each call re-queries the page; nothing is mutated.
    pub fn scan<'a>(&'a self, page: &'a Page) -> impl Iterator<Item = ResourceTag> + 'a {
        page.elements_with_attr(CATEGORY_ATTR)
            .into_iter()
            .filter_map(move |element| {
                let kind = ResourceKind::from_tag(page.tag_name(element))?;
                Some(ResourceTag {
                    element,
                    kind,
                    category: page.data(element, "cookiecategory").unwrap_or_default().to_string(),
                    consent: page.data(element, "cookieconsent").unwrap_or_default().to_string(),
                    stored_locator: non_empty(page.data(element, "src")),
                    live_locator: non_empty(page.attr(element, "src")),
                    state: self.state(element),
                })
            })
    }

    pub fn state(&self, element: ElementId) -> TagState {
        self.states.get(&element).copied().unwrap_or_default()
    }

    pub fn state_mut(&mut self, element: ElementId) -> &mut TagState {
        self.states.entry(element).or_default()
    }

    /// Number of elements that have been processed at least once
    pub fn tracked(&self) -> usize {
        self.states.len()
    }
}
