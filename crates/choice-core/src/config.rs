//! Consent manager configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use choice_gate::{CategoryLabels, NoticeText};
use choice_storage::Expiry;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Consent lifetime as `<count><unit>`; malformed values mean three months
    pub expiry: String,
    /// Path attribute of stored consent entries
    pub cookie_path: String,
    /// Category names shown in placeholder notices
    pub labels: CategoryLabels,
    /// Placeholder notice text
    pub notice: NoticeText,
    /// Page URL that relative script locators resolve against
    pub base_url: Option<String>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn expiry(&self) -> Expiry {
        Expiry::parse_or_default(&self.expiry)
    }

    pub fn base_url(&self) -> Result<Option<Url>> {
        Ok(self.base_url.as_deref().map(Url::parse).transpose()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expiry: "3M".to_string(),
            cookie_path: "/".to_string(),
            labels: CategoryLabels::default(),
            notice: NoticeText::default(),
            base_url: None,
        }
    }
}
