//! Collaborators that actually run gated code
//!
//! External scripts are handed to a [`ScriptLoader`]; completion is reported
//! back later through the gate. Inline scripts are never evaluated as text:
//! an [`InlineActivator`] maps them to host-registered behaviour.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use choice_page::ElementId;

use crate::error::GateError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRequest {
    pub element: ElementId,
    pub locator: String,
}

/// Starts an external script load. Loads cannot be cancelled once requested.
pub trait ScriptLoader {
    fn request(&self, request: ScriptRequest);
}

/// Loader that queues requests for the host to fulfil
#[derive(Debug, Clone, Default)]
pub struct PendingLoads {
    queue: Arc<Mutex<Vec<ScriptRequest>>>,
}

impl PendingLoads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain queued requests
    pub fn take(&self) -> Vec<ScriptRequest> {
        std::mem::take(&mut *self.queue.lock())
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl ScriptLoader for PendingLoads {
    fn request(&self, request: ScriptRequest) {
        tracing::debug!(element = %request.element, locator = %request.locator, "Queued script load");
        self.queue.lock().push(request);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineScript {
    pub element: ElementId,
    /// `data-activation` attribute, if any
    pub name: Option<String>,
    pub body: String,
}

impl InlineScript {
    /// Lookup key: the activation name, else the trimmed script body
    pub fn key(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.body.trim())
    }
}

pub trait InlineActivator {
    fn activate(&self, script: &InlineScript) -> Result<()>;
}

type Activation = Box<dyn Fn() -> std::result::Result<(), String>>;

/// Declarative list of permitted inline activations
#[derive(Default)]
pub struct ActivationList {
    entries: HashMap<String, Activation>,
}

impl ActivationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, key: &str, activation: F)
    where
        F: Fn() -> std::result::Result<(), String> + 'static,
    {
        self.entries.insert(key.trim().to_string(), Box::new(activation));
    }

    pub fn with<F>(mut self, key: &str, activation: F) -> Self
    where
        F: Fn() -> std::result::Result<(), String> + 'static,
    {
        self.register(key, activation);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key.trim())
    }
}

impl InlineActivator for ActivationList {
    fn activate(&self, script: &InlineScript) -> Result<()> {
        let activation = self
            .entries
            .get(script.key())
            .ok_or_else(|| GateError::InlineExecution {
                element: script.element.to_string(),
                reason: format!("no activation registered for {:?}", script.key()),
            })?;

        activation().map_err(|reason| GateError::InlineExecution {
            element: script.element.to_string(),
            reason,
        })
    }
}
