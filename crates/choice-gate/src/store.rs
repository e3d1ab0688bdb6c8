//! Consent persistence
//!
//! Each category is stored as its own `name=true|false` entry sharing one
//! expiry window. Reads go straight to the jar; there is no cache, so a write
//! is visible to the very next read.

use chrono::Utc;
use std::sync::Arc;

use choice_storage::{Cookie, CookieJar, CookieValue, Expiry};

use crate::category::{ConsentCategory, ConsentRecord, ConsentValue};
use crate::Result;

pub struct ConsentStore {
    jar: Arc<dyn CookieJar>,
    expiry: Expiry,
    path: String,
}

impl ConsentStore {
    pub fn new(jar: Arc<dyn CookieJar>, expiry: Expiry) -> Self {
        Self {
            jar,
            expiry,
            path: "/".to_string(),
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn expiry(&self) -> Expiry {
        self.expiry
    }

    /// Decoded raw entry, for callers that use the jar as a generic store
    pub fn raw(&self, name: &str) -> Result<Option<CookieValue>> {
        Ok(self.jar.get(name)?.map(|raw| CookieValue::decode(&raw)))
    }

    pub fn get(&self, category: ConsentCategory) -> Result<ConsentValue> {
        let value = match self.raw(category.as_str())? {
            Some(CookieValue::Bool(granted)) => ConsentValue::from(granted),
            Some(CookieValue::Null) | None => ConsentValue::Unset,
            Some(other) => {
                tracing::debug!(
                    category = %category,
                    value = ?other,
                    "Ignoring non-boolean consent entry"
                );
                ConsentValue::Unset
            }
        };

        Ok(value)
    }

    pub fn record(&self) -> Result<ConsentRecord> {
        Ok(ConsentRecord::new(
            self.get(ConsentCategory::Performance)?,
            self.get(ConsentCategory::Targeting)?,
        ))
    }

    pub fn set(&self, category: ConsentCategory, granted: bool) -> Result<()> {
        let expires_at = self.expiry.expires_at(Utc::now())?;
        let cookie = Cookie::new(category.as_str(), if granted { "true" } else { "false" }, expires_at)?
            .with_path(&self.path);

        self.jar.set(cookie)?;

        tracing::info!(category = %category, granted, "Consent updated");

        Ok(())
    }

    pub fn set_all<I>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (ConsentCategory, bool)>,
    {
        for (category, granted) in values {
            self.set(category, granted)?;
        }
        Ok(())
    }

    /// Return a category to Unset
    pub fn clear(&self, category: ConsentCategory) -> Result<()> {
        self.jar.remove(category.as_str())?;
        tracing::info!(category = %category, "Consent cleared");
        Ok(())
    }
}
