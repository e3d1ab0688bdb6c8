//! Cookie Choice Gating
//!
//! Consent model and the resource gate:
//! - Two consent categories (performance, targeting), persisted per entry
//! - Gated `<script>` / `<iframe>` elements discovered by `data-cookiecategory`
//! - Blocked iframes swapped for a placeholder keyed by a URL fingerprint
//! - Tracker enabled / disabled notifications for external subscribers
//!
//! Category matching is a deliberate substring test: an element whose
//! category reads `"performance targeting"` mentions both.

mod activation;
mod category;
mod error;
mod gate;
mod hasher;
mod registry;
mod signal;
mod store;
mod substitution;

pub use activation::{
    ActivationList, InlineActivator, InlineScript, PendingLoads, ScriptLoader, ScriptRequest,
};
pub use category::{CategoryLabels, ConsentCategory, ConsentRecord, ConsentValue};
pub use error::GateError;
pub use gate::{EvaluationReport, ResourceGate};
pub use hasher::fingerprint;
pub use registry::{FetchState, Processing, ResourceKind, ResourceRegistry, ResourceTag, TagState};
pub use signal::{SignalBus, TrackerSignal};
pub use store::ConsentStore;
pub use substitution::{IframeSubstitution, NoticeText, OPEN_MODAL_CLASS, PLACEHOLDER_PREFIX};

pub type Result<T> = std::result::Result<T, GateError>;
