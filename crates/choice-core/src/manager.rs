//! Consent manager
//!
//! The single context object for a page: it owns the document, the consent
//! store, the resource gate, the tracker signal bus and the banner state.
//! Every UI event runs to completion before the next one is dispatched, so
//! the manager takes `&mut self` and needs no locking.

use std::sync::Arc;
use tokio::sync::broadcast;

use choice_gate::{
    ConsentCategory, ConsentRecord, ConsentStore, EvaluationReport, InlineActivator,
    IframeSubstitution, ResourceGate, ScriptLoader, SignalBus, TrackerSignal, OPEN_MODAL_CLASS,
};
use choice_page::{ElementId, Page};
use choice_storage::CookieJar;

use crate::config::Config;
use crate::controls::{self, Controls, UserAction, INERT_CLASS};
use crate::error::CoreError;
use crate::visibility::BannerState;
use crate::Result;

pub struct ConsentManager {
    config: Config,
    page: Page,
    store: ConsentStore,
    gate: ResourceGate,
    signals: SignalBus,
    controls: Option<Controls>,
    state: BannerState,
}

impl ConsentManager {
    pub fn new(
        config: Config,
        page: Page,
        jar: Arc<dyn CookieJar>,
        loader: Box<dyn ScriptLoader>,
        activator: Box<dyn InlineActivator>,
    ) -> Result<Self> {
        let store = ConsentStore::new(jar, config.expiry()).with_path(&config.cookie_path);
        let signals = SignalBus::new();
        let substitution = IframeSubstitution::new(config.labels.clone(), config.notice.clone());

        let mut gate = ResourceGate::new(substitution, loader, activator, signals.clone());
        if let Some(base_url) = config.base_url()? {
            gate = gate.with_base_url(base_url);
        }

        Ok(Self {
            config,
            page,
            store,
            gate,
            signals,
            controls: None,
            state: BannerState::Unset,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Mutable page access for hosts that insert content; call
    /// [`ConsentManager::refresh`] afterwards so new gated elements are handled.
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn store(&self) -> &ConsentStore {
        &self.store
    }

    pub fn gate(&self) -> &ResourceGate {
        &self.gate
    }

    pub fn state(&self) -> BannerState {
        self.state
    }

    pub fn controls(&self) -> Result<Controls> {
        self.controls.ok_or(CoreError::NotInitialized)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerSignal> {
        self.signals.subscribe()
    }

    /// Current consent; storage faults read as Unset
    pub fn record(&self) -> ConsentRecord {
        self.store.record().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read consent, treating as unset");
            ConsentRecord::default()
        })
    }

    // === Startup ===

    /// Inject the notice markup into `#cookie-container`, move the container to
    /// the end of `<body>` and initialize.
    ///
    /// Returns `false` when the page has no real content; the notice is then
    /// skipped entirely and only the reopen button is hidden.
    pub fn install_template(&mut self, template: &str) -> Result<bool> {
        if self.is_empty_page()? {
            if let Some(reopen) = self.page.element_by_id(controls::REOPEN) {
                self.page.hide(reopen);
            }
            tracing::info!("Empty page, consent notice not installed");
            return Ok(false);
        }

        let container = self
            .page
            .element_by_id(controls::CONTAINER)
            .ok_or_else(|| CoreError::MissingCollaborator(controls::CONTAINER.to_string()))?;
        self.page.set_inner_html(container, template);
        if let Some(body) = self.page.body() {
            self.page.append_child(body, container)?;
        }

        self.initialize()?;
        Ok(true)
    }

    fn is_empty_page(&self) -> Result<bool> {
        let mains = self.page.elements_by_tag("main");
        if mains.is_empty() {
            let frame = self
                .page
                .element_by_id(controls::MAIN_FRAME)
                .ok_or_else(|| CoreError::MissingCollaborator(controls::MAIN_FRAME.to_string()))?;
            return Ok(!self.page.has_child_nodes(frame));
        }

        Ok(mains
            .into_iter()
            .all(|main| self.page.text_content(main).trim().is_empty()))
    }

    /// Validate the controls, pick the initial banner state and run a first
    /// gating pass.
    pub fn initialize(&mut self) -> Result<()> {
        let controls = Controls::resolve(&self.page)?;
        self.controls = Some(controls);

        self.gate.observe_page(&self.page);
        self.page.hide(controls.modal);

        if self.record().is_unset() {
            self.enable_bar_behavior(&controls)?;
        } else {
            self.enable_modal_behavior(&controls)?;
        }

        self.check_cookies_choice();

        tracing::info!(state = %self.state, "Consent manager initialized");
        Ok(())
    }

    fn enable_bar_behavior(&mut self, controls: &Controls) -> Result<()> {
        self.transition(BannerState::BarShown)?;
        self.page.add_class(controls.main_frame, INERT_CLASS);
        self.page.hide(controls.reopen);
        self.page.show(controls.bar);
        Ok(())
    }

    fn enable_modal_behavior(&mut self, controls: &Controls) -> Result<()> {
        self.transition(BannerState::ModalResolved)?;
        self.page.hide(controls.bar);
        self.page.remove_class(controls.main_frame, INERT_CLASS);
        self.page.show(controls.reopen);
        Ok(())
    }

    fn transition(&mut self, target: BannerState) -> Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(CoreError::InvalidTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }

        if self.state != target {
            tracing::info!(from = %self.state, to = %target, "Banner state transition");
        }
        self.state = target;
        Ok(())
    }

    // === Events ===

    /// Route a click on `target` (or one of its ancestors) to its action.
    ///
    /// Only the notice's own controls and the reopen button carry actions;
    /// page content reusing a control id is ignored. Returns whether the click
    /// was handled.
    pub fn handle_click(&mut self, target: ElementId) -> Result<bool> {
        let controls = self.controls()?;

        if self.page.closest_with_class(target, OPEN_MODAL_CLASS).is_some() {
            self.display_modal()?;
            return Ok(true);
        }

        let mut current = Some(target);
        while let Some(el) = current {
            if controls.owns(&self.page, el) {
                if let Some(action) = self.page.attr(el, "id").and_then(UserAction::from_control_id) {
                    self.dispatch(action)?;
                    return Ok(true);
                }
            }
            current = self.page.parent(el);
        }

        Ok(false)
    }

    pub fn dispatch(&mut self, action: UserAction) -> Result<()> {
        let controls = self.controls()?;
        tracing::debug!(?action, state = %self.state, "Handling consent action");

        match action {
            UserAction::BarAcceptAll | UserAction::BarDenyAll => {
                self.page.hide(controls.bar);
                self.resolve(&controls, action)?;
            }
            UserAction::ModalAcceptAll | UserAction::ModalDenyAll => {
                self.page.hide(controls.modal);
                self.resolve(&controls, action)?;
            }
            UserAction::AcceptPerformance
            | UserAction::AcceptTargeting
            | UserAction::DenyPerformance
            | UserAction::DenyTargeting => {
                self.persist(&action.writes());
                self.enter_resolved(&controls)?;
                self.check_cookies_choice();
                if action == UserAction::AcceptPerformance {
                    self.signals.emit(TrackerSignal::EnableTracker);
                }
            }
            UserAction::OpenCustomSettings | UserAction::ReopenModal => self.display_modal()?,
            UserAction::CloseModal => {
                if self.state.blocks_main_content() {
                    tracing::debug!("Close ignored until a choice is made");
                    return Ok(());
                }
                self.page.hide(controls.modal);
                self.page.remove_class(controls.main_frame, INERT_CLASS);
                self.page.show(controls.reopen);
            }
        }

        Ok(())
    }

    /// Accept-all / deny-all from either surface
    fn resolve(&mut self, controls: &Controls, action: UserAction) -> Result<()> {
        let writes = action.writes();
        let granted = writes.iter().all(|(_, granted)| *granted);

        self.persist(&writes);
        self.enter_resolved(controls)?;
        self.check_cookies_choice();

        self.signals.emit(if granted {
            TrackerSignal::EnableTracker
        } else {
            TrackerSignal::DisableTracker
        });

        Ok(())
    }

    fn enter_resolved(&mut self, controls: &Controls) -> Result<()> {
        self.transition(BannerState::ModalResolved)?;
        self.page.hide(controls.bar);
        self.page.remove_class(controls.main_frame, INERT_CLASS);
        self.page.show(controls.reopen);
        Ok(())
    }

    fn persist(&self, writes: &[(ConsentCategory, bool)]) {
        if let Err(e) = self.store.set_all(writes.iter().copied()) {
            tracing::warn!(error = %e, "Could not persist consent");
        }
    }

    pub fn display_modal(&mut self) -> Result<()> {
        let controls = self.controls()?;
        self.update_close_button(&controls);
        self.page.show(controls.modal);
        self.page.hide(controls.bar);
        Ok(())
    }

    fn update_close_button(&mut self, controls: &Controls) {
        if self.record().is_unset() {
            self.page.hide(controls.close_modal);
        } else {
            self.page.show(controls.close_modal);
        }
    }

    /// Reflect stored consent onto the controls and re-run the gate
    fn check_cookies_choice(&mut self) -> EvaluationReport {
        let record = self.record();
        let Some(controls) = self.controls else {
            return EvaluationReport::default();
        };

        controls.reconcile(&mut self.page, &record);
        let report = self.gate.evaluate(&mut self.page, &record);
        self.update_close_button(&controls);

        report
    }

    /// Re-run reconciliation and gating, e.g. after the host changed the page
    pub fn refresh(&mut self) -> Result<EvaluationReport> {
        self.controls()?;
        self.gate.observe_page(&self.page);
        Ok(self.check_cookies_choice())
    }

    /// Report the outcome of a script load requested by the gate
    pub fn complete_script_load(&mut self, element: ElementId, outcome: std::result::Result<(), String>) {
        self.gate.complete_script_load(element, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::tests::TEMPLATE;
    use crate::controls::{ControlVisual, ACCEPTED_CLASS};
    use choice_gate::{fingerprint, ActivationList, ConsentValue, PendingLoads, PLACEHOLDER_PREFIX};
    use choice_storage::{Database, MemoryJar};
    use std::cell::Cell;
    use std::rc::Rc;

    const PAGE: &str = r#"<!DOCTYPE html>
        <html><body>
            <div id="main-frame">
                <main>
                    <p>Article body</p>
                    <div style="text-align:center">
                        <iframe id="video" data-cookiecategory="performance" width="560" height="315"
                                data-src="https://video.example/embed/42"></iframe>
                    </div>
                    <iframe id="video-copy" data-cookiecategory="performance"
                            data-src="https://video.example/embed/42"></iframe>
                    <iframe id="ads" data-cookiecategory="targeting"
                            data-src="https://ads.example/slot"></iframe>
                </main>
            </div>
            <div id="cookie-container"></div>
            <button id="cookie-button">Cookies</button>
            <script id="analytics" type="text/plain" data-cookiecategory="performance"
                    data-src="https://cdn.example/analytics.js"></script>
            <script id="pixel" type="text/plain" data-cookiecategory="targeting"
                    data-activation="ads-pixel">fbq('init');</script>
        </body></html>"#;

    struct Harness {
        manager: ConsentManager,
        loads: PendingLoads,
        pixel_runs: Rc<Cell<u32>>,
        signals: broadcast::Receiver<TrackerSignal>,
    }

    impl Harness {
        fn el(&self, id: &str) -> ElementId {
            self.manager.page().element_by_id(id).unwrap()
        }

        fn click(&mut self, id: &str) {
            let el = self.el(id);
            assert!(self.manager.handle_click(el).unwrap());
        }

        fn drain_signals(&mut self) -> Vec<TrackerSignal> {
            let mut out = Vec::new();
            while let Ok(signal) = self.signals.try_recv() {
                out.push(signal);
            }
            out
        }

        fn placeholders(&self) -> Vec<ElementId> {
            let page = self.manager.page();
            page.elements_by_tag("div")
                .into_iter()
                .filter(|el| {
                    page.attr(*el, "id")
                        .map(|id| id.starts_with(PLACEHOLDER_PREFIX))
                        .unwrap_or(false)
                })
                .collect()
        }

        fn visual(&self, id: &str) -> ControlVisual {
            ControlVisual::read(self.manager.page(), self.el(id))
        }
    }

    fn harness_with(jar: Arc<dyn CookieJar>) -> Harness {
        let loads = PendingLoads::new();
        let pixel_runs = Rc::new(Cell::new(0));
        let counter = pixel_runs.clone();
        let activations = ActivationList::new().with("ads-pixel", move || {
            counter.set(counter.get() + 1);
            Ok(())
        });

        let mut manager = ConsentManager::new(
            Config::default(),
            Page::parse(PAGE),
            jar,
            Box::new(loads.clone()),
            Box::new(activations),
        )
        .unwrap();
        let signals = manager.subscribe();

        assert!(manager.install_template(TEMPLATE).unwrap());

        Harness {
            manager,
            loads,
            pixel_runs,
            signals,
        }
    }

    fn harness() -> Harness {
        harness_with(Arc::new(MemoryJar::new()))
    }

    #[test]
    fn test_fresh_visitor_sees_bar() {
        let mut h = harness();
        let page = h.manager.page();

        assert_eq!(h.manager.state(), BannerState::BarShown);
        assert!(page.has_class(h.el("main-frame"), INERT_CLASS));
        assert!(!page.is_hidden(h.el("cookie-frame")));
        assert!(page.is_hidden(h.el("cookie-modal")));
        assert!(page.is_hidden(h.el("cookie-button")));
        assert!(page.is_hidden(h.el("close-modal-button")));

        // The container ends up last in <body>
        let body = page.body().unwrap();
        assert_eq!(page.children(body).last().copied(), Some(h.el("cookie-container")));

        assert!(h.loads.is_empty());
        assert_eq!(h.pixel_runs.get(), 0);
        assert_ne!(
            h.manager.gate().registry().state(h.el("video")).processing,
            choice_gate::Processing::Activated
        );
        assert!(h.drain_signals().is_empty());
    }

    #[test]
    fn test_accept_all_from_bar() {
        let mut h = harness();
        h.click("cookie-accept-all");

        let record = h.manager.record();
        assert_eq!(
            record,
            ConsentRecord::new(ConsentValue::Granted, ConsentValue::Granted)
        );
        assert_eq!(h.manager.state(), BannerState::ModalResolved);

        let page = h.manager.page();
        assert!(!page.has_class(h.el("main-frame"), INERT_CLASS));
        assert!(page.is_hidden(h.el("cookie-frame")));
        assert!(!page.is_hidden(h.el("cookie-button")));
        assert_eq!(h.visual("accept-all"), ControlVisual::Accepted);
        assert_eq!(h.visual("cookie-accept-all"), ControlVisual::Accepted);
        assert_eq!(h.visual("cookie-perf"), ControlVisual::Accepted);
        assert_eq!(h.visual("cookie-pub"), ControlVisual::Accepted);

        // Every gated resource activated exactly once
        let requests = h.loads.take();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].locator, "https://cdn.example/analytics.js");
        assert_eq!(h.pixel_runs.get(), 1);
        let video = h.el("video");
        assert_eq!(page.attr(video, "src"), Some("https://video.example/embed/42"));
        assert!(!page.is_hidden(video));

        assert_eq!(h.drain_signals(), vec![TrackerSignal::EnableTracker]);

        // Later completion of the analytics load raises its own signal
        h.manager.complete_script_load(requests[0].element, Ok(()));
        assert_eq!(h.drain_signals(), vec![TrackerSignal::EnableTracker]);
    }

    #[test]
    fn test_deny_all_from_bar() {
        let mut h = harness();
        h.click("cookie-cancel-all");

        assert!(h.manager.record().all_denied());
        assert_eq!(h.drain_signals(), vec![TrackerSignal::DisableTracker]);
        assert_eq!(h.visual("cookie-cancel-all"), ControlVisual::Refused);
        assert_eq!(h.visual("cookie-accept-all"), ControlVisual::Refused);
        assert_eq!(h.visual("cookie-cancel-perf"), ControlVisual::Refused);
        assert!(h.loads.is_empty());
        assert!(!h.manager.page().is_hidden(h.el("close-modal-button")));
    }

    #[test]
    fn test_deny_performance_after_accept_all() {
        let mut h = harness();
        h.click("cookie-accept-all");
        let placeholders_before = h.placeholders();

        h.click("cookie-button");
        assert!(!h.manager.page().is_hidden(h.el("cookie-modal")));
        h.click("cookie-cancel-perf");

        let page = h.manager.page();
        let video = h.el("video");
        assert!(page.is_hidden(video));
        assert_eq!(page.attr(video, "src"), Some(""));

        let fp = fingerprint("https://video.example/embed/42");
        let placeholder = page
            .element_by_id(&format!("{}{}", PLACEHOLDER_PREFIX, fp))
            .unwrap();
        assert!(!page.is_hidden(placeholder));
        assert_eq!(h.placeholders(), placeholders_before);

        // Targeting resources untouched
        let ads = h.el("ads");
        assert_eq!(page.attr(ads, "src"), Some("https://ads.example/slot"));
        assert!(!page.is_hidden(ads));

        // Partial consent: accept-all refused, deny-all neutral
        assert_eq!(h.visual("accept-all"), ControlVisual::Refused);
        assert_eq!(h.visual("deny-all"), ControlVisual::Neutral);
        assert!(!page.has_class(h.el("accept-all"), ACCEPTED_CLASS));
    }

    #[test]
    fn test_reaccept_performance_restores_iframe() {
        let mut h = harness();
        h.click("cookie-accept-all");
        h.click("cookie-button");
        h.click("cookie-cancel-perf");
        let placeholders = h.placeholders();
        h.drain_signals();

        h.click("cookie-perf");

        let page = h.manager.page();
        let video = h.el("video");
        assert_eq!(page.attr(video, "src"), Some("https://video.example/embed/42"));
        assert!(!page.is_hidden(video));
        assert_eq!(h.placeholders(), placeholders);
        assert!(placeholders.iter().all(|p| page.is_hidden(*p)));
        assert_eq!(h.drain_signals(), vec![TrackerSignal::EnableTracker]);

        // The analytics script was already requested; it is not requested again
        assert_eq!(h.loads.take().len(), 1);
    }

    #[test]
    fn test_shared_locator_single_placeholder() {
        let mut h = harness();
        h.click("cookie-custom");
        h.click("cookie-pub");

        // Performance still unset: both copies of the video sit behind one notice
        let page = h.manager.page();
        let fp = fingerprint("https://video.example/embed/42");
        let shared = page
            .element_by_id(&format!("{}{}", PLACEHOLDER_PREFIX, fp))
            .unwrap();
        assert!(page.is_hidden(h.el("video")));
        assert!(page.is_hidden(h.el("video-copy")));
        assert!(!page.is_hidden(shared));
        assert_eq!(
            h.placeholders()
                .into_iter()
                .filter(|p| page.attr(*p, "id").unwrap().ends_with(&fp.to_string()))
                .count(),
            1
        );

        // Targeting was granted from the custom modal
        assert_eq!(h.pixel_runs.get(), 1);
        assert_eq!(h.manager.state(), BannerState::ModalResolved);
        assert!(!page.has_class(h.el("main-frame"), INERT_CLASS));
    }

    #[test]
    fn test_placeholder_link_reopens_modal() {
        let mut h = harness();
        h.click("cookie-cancel-all");
        assert!(h.manager.page().is_hidden(h.el("cookie-modal")));

        let page = h.manager.page();
        let link = page
            .elements_with_attr("class")
            .into_iter()
            .find(|el| page.has_class(*el, OPEN_MODAL_CLASS))
            .unwrap();

        assert!(h.manager.handle_click(link).unwrap());
        assert!(!h.manager.page().is_hidden(h.el("cookie-modal")));
    }

    #[test]
    fn test_page_content_reusing_control_id_is_ignored() {
        let mut h = harness();
        let page = h.manager.page_mut();
        let frame = page.element_by_id("main-frame").unwrap();
        let decoy = page.create_element("button");
        page.set_attr(decoy, "id", "accept-all");
        let label = page.create_element("span");
        page.append_child(decoy, label).unwrap();
        page.append_child(frame, decoy).unwrap();

        assert!(!h.manager.handle_click(decoy).unwrap());
        assert!(!h.manager.handle_click(label).unwrap());
        assert!(h.manager.record().is_unset());
        assert_eq!(h.manager.state(), BannerState::BarShown);
        assert!(h.drain_signals().is_empty());

        // A click inside the reopen button still counts
        let reopen = h.el("cookie-button");
        let icon = h.manager.page_mut().create_element("i");
        h.manager.page_mut().append_child(reopen, icon).unwrap();
        assert!(h.manager.handle_click(icon).unwrap());
        assert!(!h.manager.page().is_hidden(h.el("cookie-modal")));
    }

    #[test]
    fn test_close_modal_only_after_choice() {
        let mut h = harness();
        h.click("cookie-custom");
        assert!(h.manager.page().is_hidden(h.el("close-modal-button")));

        h.manager.dispatch(UserAction::CloseModal).unwrap();
        assert!(!h.manager.page().is_hidden(h.el("cookie-modal")));
        assert_eq!(h.manager.state(), BannerState::BarShown);

        h.click("deny-all");
        h.click("cookie-button");
        h.click("close-modal-button");
        assert!(h.manager.page().is_hidden(h.el("cookie-modal")));
    }

    #[test]
    fn test_returning_visitor_skips_bar() {
        let db = Database::open_in_memory().unwrap();
        {
            let store = ConsentStore::new(Arc::new(db.clone()), Default::default());
            store
                .set_all([
                    (ConsentCategory::Performance, true),
                    (ConsentCategory::Targeting, false),
                ])
                .unwrap();
        }

        let mut h = harness_with(Arc::new(db));
        let page = h.manager.page();

        assert_eq!(h.manager.state(), BannerState::ModalResolved);
        assert!(page.is_hidden(h.el("cookie-frame")));
        assert!(!page.has_class(h.el("main-frame"), INERT_CLASS));
        assert!(!page.is_hidden(h.el("close-modal-button")));
        assert_eq!(h.visual("accept-all"), ControlVisual::Refused);
        assert_eq!(h.loads.take().len(), 1);
        assert_eq!(h.pixel_runs.get(), 0);
        assert!(h.drain_signals().is_empty());
    }

    #[test]
    fn test_repeated_refresh_is_idempotent() {
        let mut h = harness();
        h.click("cookie-accept-all");
        h.loads.take();
        let elements = h
            .manager
            .page()
            .descendants(h.manager.page().document_element())
            .len();

        let report = h.manager.refresh().unwrap();
        assert!(report.is_empty());
        assert!(h.manager.refresh().unwrap().is_empty());

        assert!(h.loads.is_empty());
        assert_eq!(h.pixel_runs.get(), 1);
        assert_eq!(
            h.manager
                .page()
                .descendants(h.manager.page().document_element())
                .len(),
            elements
        );
    }

    #[test]
    fn test_missing_control_fails_startup() {
        let mut manager = ConsentManager::new(
            Config::default(),
            Page::parse(PAGE),
            Arc::new(MemoryJar::new()),
            Box::new(PendingLoads::new()),
            Box::new(ActivationList::new()),
        )
        .unwrap();

        let template = TEMPLATE.replace(r#"id="cookie-pub""#, r#"id="cookie-ads""#);
        match manager.install_template(&template) {
            Err(CoreError::MissingCollaborator(id)) => assert_eq!(id, "cookie-pub"),
            other => panic!("expected missing collaborator, got {:?}", other),
        }
        assert!(matches!(
            manager.dispatch(UserAction::BarAcceptAll),
            Err(CoreError::NotInitialized)
        ));
    }

    #[test]
    fn test_empty_page_skips_notice() {
        let mut manager = ConsentManager::new(
            Config::default(),
            Page::parse(
                r#"<html><body>
                    <div id="main-frame"><main>   </main></div>
                    <div id="cookie-container"></div>
                    <button id="cookie-button">Cookies</button>
                </body></html>"#,
            ),
            Arc::new(MemoryJar::new()),
            Box::new(PendingLoads::new()),
            Box::new(ActivationList::new()),
        )
        .unwrap();

        assert!(!manager.install_template(TEMPLATE).unwrap());
        let reopen = manager.page().element_by_id("cookie-button").unwrap();
        assert!(manager.page().is_hidden(reopen));
        assert!(manager.controls().is_err());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = Config {
            base_url: Some("::nope".to_string()),
            ..Config::default()
        };
        let result = ConsentManager::new(
            config,
            Page::new(),
            Arc::new(MemoryJar::new()),
            Box::new(PendingLoads::new()),
            Box::new(ActivationList::new()),
        );
        assert!(matches!(result, Err(CoreError::InvalidUrl(_))));
    }
}
