//! Consent categories and values

use serde::{Deserialize, Serialize};

use crate::error::GateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentCategory {
    Performance,
    Targeting,
}

impl ConsentCategory {
    pub const ALL: [ConsentCategory; 2] = [ConsentCategory::Performance, ConsentCategory::Targeting];

    /// Storage key, also the term looked for in category annotations
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentCategory::Performance => "performance",
            ConsentCategory::Targeting => "targeting",
        }
    }

    /// Loose match: the annotation merely has to contain the category name
    pub fn mentioned_in(&self, annotation: &str) -> bool {
        annotation.contains(self.as_str())
    }
}

impl std::fmt::Display for ConsentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConsentCategory {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "performance" => Ok(ConsentCategory::Performance),
            "targeting" => Ok(ConsentCategory::Targeting),
            _ => Err(GateError::UnknownCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentValue {
    #[default]
    Unset,
    Granted,
    Denied,
}

impl ConsentValue {
    pub fn is_granted(&self) -> bool {
        matches!(self, ConsentValue::Granted)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, ConsentValue::Denied)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, ConsentValue::Unset)
    }
}

impl From<bool> for ConsentValue {
    fn from(granted: bool) -> Self {
        if granted {
            ConsentValue::Granted
        } else {
            ConsentValue::Denied
        }
    }
}

/// Snapshot of both categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub performance: ConsentValue,
    pub targeting: ConsentValue,
}

impl ConsentRecord {
    pub fn new(performance: ConsentValue, targeting: ConsentValue) -> Self {
        Self {
            performance,
            targeting,
        }
    }

    pub fn get(&self, category: ConsentCategory) -> ConsentValue {
        match category {
            ConsentCategory::Performance => self.performance,
            ConsentCategory::Targeting => self.targeting,
        }
    }

    pub fn set(&mut self, category: ConsentCategory, value: ConsentValue) {
        match category {
            ConsentCategory::Performance => self.performance = value,
            ConsentCategory::Targeting => self.targeting = value,
        }
    }

    /// Neither category has ever been written
    pub fn is_unset(&self) -> bool {
        self.performance.is_unset() && self.targeting.is_unset()
    }

    pub fn all_granted(&self) -> bool {
        self.performance.is_granted() && self.targeting.is_granted()
    }

    pub fn all_denied(&self) -> bool {
        self.performance.is_denied() && self.targeting.is_denied()
    }

    /// Exactly one category is granted
    pub fn is_partial(&self) -> bool {
        self.performance.is_granted() != self.targeting.is_granted()
    }
}

/// Human-readable category names shown in placeholder notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryLabels {
    pub performance: String,
    pub targeting: String,
}

impl CategoryLabels {
    pub fn label(&self, category: ConsentCategory) -> &str {
        match category {
            ConsentCategory::Performance => &self.performance,
            ConsentCategory::Targeting => &self.targeting,
        }
    }
}

impl Default for CategoryLabels {
    fn default() -> Self {
        Self {
            performance: "Cookies de performance".to_string(),
            targeting: "Cookies de publicité ciblée".to_string(),
        }
    }
}
