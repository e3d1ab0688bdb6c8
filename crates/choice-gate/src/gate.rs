//! Resource gate
//!
//! Decides, for every gated element, whether it may run under the current
//! consent record. Evaluation is idempotent: an element is activated at most
//! once and neutralized at most once per distinct consent value, so calling
//! [`ResourceGate::evaluate`] again with the same record does nothing.

use url::Url;

use choice_page::{ElementId, Page};

use crate::activation::{InlineActivator, InlineScript, ScriptLoader, ScriptRequest};
use crate::category::ConsentRecord;
use crate::error::GateError;
use crate::hasher::fingerprint;
use crate::registry::{FetchState, Processing, ResourceKind, ResourceRegistry, ResourceTag};
use crate::signal::{SignalBus, TrackerSignal};
use crate::substitution::IframeSubstitution;
use crate::Result;

const INERT_SCRIPT_TYPE: &str = "text/plain";

/// What a single evaluation pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    pub activated: Vec<ElementId>,
    pub neutralized: Vec<ElementId>,
    pub executed: Vec<ElementId>,
    pub load_requests: Vec<ElementId>,
}

impl EvaluationReport {
    pub fn is_empty(&self) -> bool {
        self.activated.is_empty()
            && self.neutralized.is_empty()
            && self.executed.is_empty()
            && self.load_requests.is_empty()
    }
}

pub struct ResourceGate {
    registry: ResourceRegistry,
    substitution: IframeSubstitution,
    loader: Box<dyn ScriptLoader>,
    activator: Box<dyn InlineActivator>,
    signals: SignalBus,
    base_url: Option<Url>,
}

impl ResourceGate {
    pub fn new(
        substitution: IframeSubstitution,
        loader: Box<dyn ScriptLoader>,
        activator: Box<dyn InlineActivator>,
        signals: SignalBus,
    ) -> Self {
        Self {
            registry: ResourceRegistry::new(),
            substitution,
            loader,
            activator,
            signals,
            base_url: None,
        }
    }

    /// Resolve relative script locators against this URL
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn substitution(&self) -> &IframeSubstitution {
        &self.substitution
    }

    /// Record the deferred locator of every gated iframe currently on the page
    pub fn observe_page(&mut self, page: &Page) {
        let locators: Vec<String> = self
            .registry
            .scan(page)
            .filter(|tag| tag.kind == ResourceKind::Iframe)
            .filter_map(|tag| tag.stored_locator)
            .collect();

        for locator in locators {
            self.substitution.observe(&locator);
        }
    }

    pub fn evaluate(&mut self, page: &mut Page, record: &ConsentRecord) -> EvaluationReport {
        let mut report = EvaluationReport::default();
        let tags: Vec<ResourceTag> = self.registry.scan(page).collect();

        for tag in tags {
            if !tag.is_gated() {
                continue;
            }
            let authorized = tag.is_authorized(record);

            if authorized {
                if tag.state.processing != Processing::Activated {
                    self.activate(page, &tag, &mut report);
                }
                if tag.is_inline_script() {
                    self.run_inline(page, &tag, &mut report);
                }
            } else if tag.state.processing != Processing::Neutralized {
                match self.neutralize(page, &tag, record) {
                    Ok(()) => report.neutralized.push(tag.element),
                    Err(e) => {
                        tracing::warn!(element = %tag.element, error = %e, "Failed to neutralize resource")
                    }
                }
            }
        }

        if !report.is_empty() {
            tracing::debug!(
                activated = report.activated.len(),
                neutralized = report.neutralized.len(),
                executed = report.executed.len(),
                load_requests = report.load_requests.len(),
                "Gate evaluation"
            );
        }

        report
    }

    fn activate(&mut self, page: &mut Page, tag: &ResourceTag, report: &mut EvaluationReport) {
        match tag.kind {
            ResourceKind::Script => {
                if let Some(locator) = tag.locator() {
                    self.request_load(tag.element, locator, report);
                }
            }
            ResourceKind::Iframe => {
                if let Some(stored) = tag.stored_locator.as_deref() {
                    let src = self
                        .substitution
                        .observed(fingerprint(stored))
                        .unwrap_or(stored)
                        .to_string();
                    page.set_attr(tag.element, "src", &src);
                }
                self.substitution.restore_original(page, tag.element);
            }
        }

        let state = self.registry.state_mut(tag.element);
        state.processing = Processing::Activated;
        state.accepted = true;

        tracing::debug!(element = %tag.element, category = %tag.category, "Activated resource");
        report.activated.push(tag.element);
    }

    fn request_load(&mut self, element: ElementId, locator: &str, report: &mut EvaluationReport) {
        let state = self.registry.state_mut(element);
        match state.fetch {
            FetchState::Idle => {}
            FetchState::InFlight | FetchState::Done => return,
            FetchState::Failed => {
                tracing::debug!(element = %element, "Not retrying failed script load");
                return;
            }
        }

        let resolved = match &self.base_url {
            Some(base) => match base.join(locator) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    state.fetch = FetchState::Failed;
                    let err = GateError::ResourceLoad {
                        locator: locator.to_string(),
                        reason: e.to_string(),
                    };
                    tracing::warn!(element = %element, error = %err, "Script load not started");
                    return;
                }
            },
            None => locator.to_string(),
        };

        state.fetch = FetchState::InFlight;
        self.loader.request(ScriptRequest {
            element,
            locator: resolved,
        });
        report.load_requests.push(element);
    }

    fn run_inline(&mut self, page: &Page, tag: &ResourceTag, report: &mut EvaluationReport) {
        let state = self.registry.state(tag.element);
        if !state.accepted || state.loaded {
            return;
        }

        let script = InlineScript {
            element: tag.element,
            name: page.data(tag.element, "activation").map(str::to_string),
            body: page.text_content(tag.element),
        };

        // The guard is set whatever the outcome; inline scripts never retry
        self.registry.state_mut(tag.element).loaded = true;
        report.executed.push(tag.element);

        if let Err(e) = self.activator.activate(&script) {
            tracing::warn!(element = %tag.element, error = %e, "Inline script failed");
        }
    }

    fn neutralize(&mut self, page: &mut Page, tag: &ResourceTag, record: &ConsentRecord) -> Result<()> {
        if let Some(live) = tag.live_locator.as_deref() {
            page.set_data(tag.element, "src", live);
            self.substitution.observe(live);
        }

        match tag.kind {
            ResourceKind::Script => page.set_attr(tag.element, "type", INERT_SCRIPT_TYPE),
            ResourceKind::Iframe => {
                if let Some(category) = tag.refused_category(record) {
                    self.substitution
                        .show_placeholder(page, tag.element, category)?;
                }
                page.set_attr(tag.element, "src", "");
            }
        }

        let state = self.registry.state_mut(tag.element);
        state.processing = Processing::Neutralized;
        if state.accepted && !state.loaded {
            state.accepted = false;
        }

        tracing::debug!(element = %tag.element, category = %tag.category, "Neutralized resource");
        Ok(())
    }

    /// Report the outcome of a load started by the gate.
    ///
    /// A successful load raises the tracker-enabled signal even if consent was
    /// revoked meanwhile; it never re-runs gating.
    pub fn complete_script_load(&mut self, element: ElementId, outcome: std::result::Result<(), String>) {
        let state = self.registry.state_mut(element);
        if state.fetch != FetchState::InFlight {
            tracing::warn!(element = %element, "Ignoring completion for a load that is not in flight");
            return;
        }

        match outcome {
            Ok(()) => {
                state.fetch = FetchState::Done;
                state.loaded = true;
                tracing::info!(element = %element, "Gated script loaded");
                self.signals.emit(TrackerSignal::EnableTracker);
            }
            Err(reason) => {
                state.fetch = FetchState::Failed;
                let err = GateError::ResourceLoad {
                    locator: element.to_string(),
                    reason,
                };
                tracing::warn!(element = %element, error = %err, "Gated script failed to load");
            }
        }
    }
}
