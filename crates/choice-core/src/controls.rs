//! Notice controls
//!
//! Maps control ids to user actions and reflects the stored consent onto the
//! buttons' visual state.

use serde::{Deserialize, Serialize};

use choice_gate::{ConsentCategory, ConsentRecord};
use choice_page::{ElementId, Page};

use crate::error::CoreError;
use crate::Result;

pub const CONTAINER: &str = "cookie-container";
pub const BAR: &str = "cookie-frame";
pub const MODAL: &str = "cookie-modal";
pub const REOPEN: &str = "cookie-button";
pub const MAIN_FRAME: &str = "main-frame";
pub const CLOSE_MODAL: &str = "close-modal-button";
pub const CUSTOM: &str = "cookie-custom";
pub const PERFORMANCE_ACCEPT: &str = "cookie-perf";
pub const PERFORMANCE_DENY: &str = "cookie-cancel-perf";
pub const TARGETING_ACCEPT: &str = "cookie-pub";
pub const TARGETING_DENY: &str = "cookie-cancel-pub";
pub const MODAL_ACCEPT_ALL: &str = "accept-all";
pub const MODAL_DENY_ALL: &str = "deny-all";
pub const BAR_ACCEPT_ALL: &str = "cookie-accept-all";
pub const BAR_DENY_ALL: &str = "cookie-cancel-all";

pub const ACTION_CLASS: &str = "btn-cookie-action";
pub const ACCEPTED_CLASS: &str = "cookie-accepted";
pub const REFUSED_CLASS: &str = "cookie-refused";
pub const INERT_CLASS: &str = "unreadable-display";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    /// "Accept all" on the compact bar
    BarAcceptAll,
    /// "Refuse all" on the compact bar
    BarDenyAll,
    ModalAcceptAll,
    ModalDenyAll,
    AcceptPerformance,
    AcceptTargeting,
    DenyPerformance,
    DenyTargeting,
    OpenCustomSettings,
    CloseModal,
    /// The persistent button that brings the modal back
    ReopenModal,
}

impl UserAction {
    pub fn from_control_id(id: &str) -> Option<Self> {
        match id {
            BAR_ACCEPT_ALL => Some(UserAction::BarAcceptAll),
            BAR_DENY_ALL => Some(UserAction::BarDenyAll),
            MODAL_ACCEPT_ALL => Some(UserAction::ModalAcceptAll),
            MODAL_DENY_ALL => Some(UserAction::ModalDenyAll),
            PERFORMANCE_ACCEPT => Some(UserAction::AcceptPerformance),
            TARGETING_ACCEPT => Some(UserAction::AcceptTargeting),
            PERFORMANCE_DENY => Some(UserAction::DenyPerformance),
            TARGETING_DENY => Some(UserAction::DenyTargeting),
            CUSTOM => Some(UserAction::OpenCustomSettings),
            CLOSE_MODAL => Some(UserAction::CloseModal),
            REOPEN => Some(UserAction::ReopenModal),
            _ => None,
        }
    }

    /// Consent writes this action performs
    pub fn writes(&self) -> Vec<(ConsentCategory, bool)> {
        use ConsentCategory::{Performance, Targeting};

        match self {
            UserAction::BarAcceptAll | UserAction::ModalAcceptAll => {
                vec![(Performance, true), (Targeting, true)]
            }
            UserAction::BarDenyAll | UserAction::ModalDenyAll => {
                vec![(Performance, false), (Targeting, false)]
            }
            UserAction::AcceptPerformance => vec![(Performance, true)],
            UserAction::AcceptTargeting => vec![(Targeting, true)],
            UserAction::DenyPerformance => vec![(Performance, false)],
            UserAction::DenyTargeting => vec![(Targeting, false)],
            UserAction::OpenCustomSettings | UserAction::CloseModal | UserAction::ReopenModal => {
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlVisual {
    Neutral,
    Accepted,
    Refused,
}

impl ControlVisual {
    pub fn read(page: &Page, control: ElementId) -> Self {
        if page.has_class(control, ACCEPTED_CLASS) {
            ControlVisual::Accepted
        } else if page.has_class(control, REFUSED_CLASS) {
            ControlVisual::Refused
        } else {
            ControlVisual::Neutral
        }
    }

    pub fn apply(&self, page: &mut Page, control: ElementId) {
        page.toggle_class(control, ACCEPTED_CLASS, *self == ControlVisual::Accepted);
        page.toggle_class(control, REFUSED_CLASS, *self == ControlVisual::Refused);
    }
}

/// Every element the manager drives, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub container: ElementId,
    pub bar: ElementId,
    pub modal: ElementId,
    pub reopen: ElementId,
    pub main_frame: ElementId,
    pub close_modal: ElementId,
    pub custom: ElementId,
    pub performance_accept: ElementId,
    pub performance_deny: ElementId,
    pub targeting_accept: ElementId,
    pub targeting_deny: ElementId,
    pub modal_accept_all: ElementId,
    pub modal_deny_all: ElementId,
    pub bar_accept_all: ElementId,
    pub bar_deny_all: ElementId,
}

impl Controls {
    /// Look every control up, failing on the first one that is missing.
    ///
    /// Notice controls are only searched inside the container, so page content
    /// that happens to reuse one of their ids is never mistaken for them.
    pub fn resolve(page: &Page) -> Result<Self> {
        let missing = |id: &str| CoreError::MissingCollaborator(id.to_string());
        let find = |id: &str| page.element_by_id(id).ok_or_else(|| missing(id));

        let container = find(CONTAINER)?;
        let notice = page.descendants(container);
        let within = |id: &str| {
            notice
                .iter()
                .copied()
                .find(|el| page.attr(*el, "id") == Some(id))
                .ok_or_else(|| missing(id))
        };

        Ok(Self {
            container,
            bar: within(BAR)?,
            modal: within(MODAL)?,
            reopen: find(REOPEN)?,
            main_frame: find(MAIN_FRAME)?,
            close_modal: within(CLOSE_MODAL)?,
            custom: within(CUSTOM)?,
            performance_accept: within(PERFORMANCE_ACCEPT)?,
            performance_deny: within(PERFORMANCE_DENY)?,
            targeting_accept: within(TARGETING_ACCEPT)?,
            targeting_deny: within(TARGETING_DENY)?,
            modal_accept_all: within(MODAL_ACCEPT_ALL)?,
            modal_deny_all: within(MODAL_DENY_ALL)?,
            bar_accept_all: within(BAR_ACCEPT_ALL)?,
            bar_deny_all: within(BAR_DENY_ALL)?,
        })
    }

    /// Whether clicks on `el` may trigger a consent action
    pub fn owns(&self, page: &Page, el: ElementId) -> bool {
        el == self.reopen || page.contains(self.container, el)
    }

    fn accept_control(&self, category: ConsentCategory) -> ElementId {
        match category {
            ConsentCategory::Performance => self.performance_accept,
            ConsentCategory::Targeting => self.targeting_accept,
        }
    }

    fn deny_control(&self, category: ConsentCategory) -> ElementId {
        match category {
            ConsentCategory::Performance => self.performance_deny,
            ConsentCategory::Targeting => self.targeting_deny,
        }
    }

    /// Bring every action button in line with `record`.
    ///
    /// Under partial consent the modal's "accept all" shows refused and its
    /// "deny all" shows neutral, so neither claims a choice the user did not make.
    pub fn reconcile(&self, page: &mut Page, record: &ConsentRecord) {
        for button in page.descendants(self.container) {
            if page.has_class(button, ACTION_CLASS) {
                ControlVisual::Neutral.apply(page, button);
            }
        }

        if record.all_granted() {
            ControlVisual::Accepted.apply(page, self.modal_accept_all);
            ControlVisual::Accepted.apply(page, self.bar_accept_all);
        } else if record.all_denied() {
            for control in [
                self.modal_deny_all,
                self.bar_deny_all,
                self.modal_accept_all,
                self.bar_accept_all,
            ] {
                ControlVisual::Refused.apply(page, control);
            }
        }

        for category in ConsentCategory::ALL {
            let value = record.get(category);
            if value.is_granted() {
                ControlVisual::Accepted.apply(page, self.accept_control(category));
            } else if value.is_denied() {
                ControlVisual::Refused.apply(page, self.deny_control(category));
            }
        }

        if record.is_partial() {
            ControlVisual::Refused.apply(page, self.modal_accept_all);
            ControlVisual::Neutral.apply(page, self.modal_deny_all);
        }
    }
}
