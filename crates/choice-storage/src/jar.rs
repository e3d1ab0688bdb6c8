//! Cookie jar contract and in-memory backend

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::StorageError;
use crate::value::CookieValue;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub expires_at: DateTime<Utc>,
}

impl Cookie {
    pub fn new(name: &str, value: &str, expires_at: DateTime<Utc>) -> Result<Self> {
        let invalid = name.is_empty()
            || name
                .chars()
                .any(|c| c == ';' || c == '=' || c == ',' || c.is_whitespace());
        if invalid {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
            path: "/".to_string(),
            expires_at,
        })
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn decoded(&self) -> CookieValue {
        CookieValue::decode(&self.value)
    }

    /// Render as a `Set-Cookie` style assignment
    pub fn to_header(&self) -> String {
        format!(
            "{}={};path={};expires={}",
            self.name,
            self.value,
            self.path,
            self.expires_at.format("%a, %d %b %Y %H:%M:%S GMT")
        )
    }
}

/// Expiring key/value store holding consent entries.
///
/// Expired entries must read as absent.
pub trait CookieJar: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>>;

    fn set(&self, cookie: Cookie) -> Result<()>;

    fn remove(&self, name: &str) -> Result<()>;

    /// All live entries, ordered by name
    fn entries(&self) -> Result<Vec<Cookie>>;

    /// Render live entries the way a document exposes them
    fn cookie_string(&self) -> Result<String> {
        Ok(self
            .entries()?
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; "))
    }
}

#[derive(Default)]
pub struct MemoryJar {
    cookies: RwLock<HashMap<String, Cookie>>,
}

impl MemoryJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieJar for MemoryJar {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let now = Utc::now();
        Ok(self
            .cookies
            .read()
            .get(name)
            .filter(|c| !c.is_expired(now))
            .map(|c| c.value.clone()))
    }

    fn set(&self, cookie: Cookie) -> Result<()> {
        tracing::trace!(cookie = %cookie.to_header(), "Storing cookie");
        self.cookies.write().insert(cookie.name.clone(), cookie);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.cookies.write().remove(name);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<Cookie>> {
        let now = Utc::now();
        let mut live: Vec<Cookie> = {
            let mut cookies = self.cookies.write();
            cookies.retain(|_, c| !c.is_expired(now));
            cookies.values().cloned().collect()
        };
        live.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(live)
    }
}
