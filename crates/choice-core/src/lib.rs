//! Cookie Choice Core
//!
//! Coordination layer: a [`ConsentManager`] built once per page owns the
//! consent store, the resource gate, the notice controls and the banner state.
//! User clicks go in, consent writes, gating side effects and tracker signals
//! come out.

mod config;
mod controls;
mod error;
mod manager;
mod visibility;

pub use config::Config;
pub use controls::{ControlVisual, Controls, UserAction};
pub use error::CoreError;
pub use manager::ConsentManager;
pub use visibility::BannerState;

// Re-export the pieces hosts wire together
pub use choice_gate::{
    fingerprint, ActivationList, CategoryLabels, ConsentCategory, ConsentRecord, ConsentStore,
    ConsentValue, EvaluationReport, InlineActivator, InlineScript, NoticeText, PendingLoads,
    ScriptLoader, ScriptRequest, SignalBus, TrackerSignal,
};
pub use choice_page::{ElementId, Page};
pub use choice_storage::{CookieJar, Database, Expiry, MemoryJar, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
