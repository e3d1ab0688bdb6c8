//! Permissive cookie value decoding
//!
//! The jar is a generic key/value layer, so decoding is not consent-specific:
//! booleans and integers are recognised, an empty value is null and anything
//! else passes through as text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CookieValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Null,
}

impl CookieValue {
    pub fn decode(raw: &str) -> Self {
        if raw.is_empty() {
            return CookieValue::Null;
        }

        if raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<i64>() {
                return CookieValue::Int(n);
            }
        }

        if raw.eq_ignore_ascii_case("true") {
            return CookieValue::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return CookieValue::Bool(false);
        }

        CookieValue::Text(raw.to_string())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CookieValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CookieValue::Null)
    }
}

/// Parse a `name=value; other=value` cookie string into decoded values.
///
/// Later duplicates win. A pair without `=` decodes to null.
pub fn parse_cookie_string(cookies: &str) -> BTreeMap<String, CookieValue> {
    let mut out = BTreeMap::new();

    for pair in cookies.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (name, value) = match pair.split_once('=') {
            Some((name, value)) => (name.trim(), CookieValue::decode(value.trim())),
            None => (pair, CookieValue::Null),
        };

        out.insert(name.to_string(), value);
    }

    out
}
