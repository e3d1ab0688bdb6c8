//! Expiry descriptors
//!
//! A descriptor is `<count><unit>` where unit is one of `y`, `M`, `d`, `h`,
//! `m`, `s` (case-sensitive: `M` is months, `m` is minutes).

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryUnit {
    Years,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl ExpiryUnit {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'y' => Some(ExpiryUnit::Years),
            'M' => Some(ExpiryUnit::Months),
            'd' => Some(ExpiryUnit::Days),
            'h' => Some(ExpiryUnit::Hours),
            'm' => Some(ExpiryUnit::Minutes),
            's' => Some(ExpiryUnit::Seconds),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            ExpiryUnit::Years => 'y',
            ExpiryUnit::Months => 'M',
            ExpiryUnit::Days => 'd',
            ExpiryUnit::Hours => 'h',
            ExpiryUnit::Minutes => 'm',
            ExpiryUnit::Seconds => 's',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub count: u32,
    pub unit: ExpiryUnit,
}

impl Expiry {
    pub const fn new(count: u32, unit: ExpiryUnit) -> Self {
        Self { count, unit }
    }

    /// Parse a descriptor, falling back to three months when it is malformed
    /// or out of range
    pub fn parse_or_default(descriptor: &str) -> Self {
        match descriptor.parse() {
            Ok(expiry) => expiry,
            Err(e) => {
                tracing::debug!(error = %e, "Falling back to default expiry");
                Self::default()
            }
        }
    }

    /// Absolute expiry instant counted from `now`
    pub fn expires_at(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let count = self.count;
        let shifted = match self.unit {
            ExpiryUnit::Years => count
                .checked_mul(12)
                .and_then(|months| now.checked_add_months(Months::new(months))),
            ExpiryUnit::Months => now.checked_add_months(Months::new(count)),
            ExpiryUnit::Days => now.checked_add_signed(Duration::days(count.into())),
            ExpiryUnit::Hours => now.checked_add_signed(Duration::hours(count.into())),
            ExpiryUnit::Minutes => now.checked_add_signed(Duration::minutes(count.into())),
            ExpiryUnit::Seconds => now.checked_add_signed(Duration::seconds(count.into())),
        };

        shifted.ok_or_else(|| StorageError::ExpiryOutOfRange(self.to_string()))
    }
}

impl Default for Expiry {
    fn default() -> Self {
        Self::new(3, ExpiryUnit::Months)
    }
}

impl std::fmt::Display for Expiry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.unit.as_char())
    }
}

impl std::str::FromStr for Expiry {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || StorageError::MalformedExpiry(s.to_string());

        let unit_char = s.chars().last().ok_or_else(malformed)?;
        let unit = ExpiryUnit::from_char(unit_char).ok_or_else(malformed)?;
        let digits = &s[..s.len() - unit_char.len_utf8()];

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let count = digits.parse::<u32>().map_err(|_| malformed())?;
        let expiry = Self::new(count, unit);

        // A window that cannot be represented would make every write fail
        expiry.expires_at(Utc::now())?;
        Ok(expiry)
    }
}
