//! Banner state machine
//!
//! ```text
//! Unset ──(nothing stored)──▶ BarShown ──(any choice)──▶ ModalResolved
//!   └──────────(consent already stored)──────────────────▲
//! ```
//!
//! `ModalResolved` is terminal: individual toggles re-enter it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerState {
    /// Not initialized yet
    #[default]
    Unset,
    /// Compact bar visible, main content blocked
    BarShown,
    /// A choice exists; the settings modal is available on demand
    ModalResolved,
}

impl BannerState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: BannerState) -> bool {
        match (self, target) {
            (BannerState::Unset, BannerState::BarShown) => true,
            (BannerState::Unset, BannerState::ModalResolved) => true,
            (BannerState::BarShown, BannerState::ModalResolved) => true,
            // Same state is always valid (no-op)
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    /// Returns true while the main content must not be interacted with
    pub fn blocks_main_content(&self) -> bool {
        matches!(self, BannerState::BarShown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BannerState::Unset => "unset",
            BannerState::BarShown => "bar_shown",
            BannerState::ModalResolved => "modal_resolved",
        }
    }
}

impl std::fmt::Display for BannerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BannerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unset" => Ok(BannerState::Unset),
            "bar_shown" => Ok(BannerState::BarShown),
            "modal_resolved" => Ok(BannerState::ModalResolved),
            _ => Err(format!("Unknown banner state: {}", s)),
        }
    }
}
