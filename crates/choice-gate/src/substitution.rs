//! Iframe placeholders
//!
//! A blocked iframe is hidden and a notice is shown right after it. Notices are
//! keyed by the fingerprint of the iframe's locator: iframes embedding the same
//! URL share one notice, created by whichever is blocked first.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use choice_page::{ElementId, Page};

use crate::category::{CategoryLabels, ConsentCategory};
use crate::hasher::fingerprint;
use crate::Result;

pub const PLACEHOLDER_PREFIX: &str = "cookie-iframe-";
pub const OPEN_MODAL_CLASS: &str = "btn-open-cookie-modal";

/// Properties copied from the iframe onto its placeholder
const MIRRORED_PROPERTIES: [&str; 6] = ["width", "height", "position", "display", "top", "left"];

/// Localised notice text; `{category}` is replaced by the category label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeText {
    pub message: String,
    pub action: String,
}

impl Default for NoticeText {
    fn default() -> Self {
        Self {
            message: "Cet élément est masqué car vous avez refusé les \"{category}\".".to_string(),
            action: "Veuillez les activer pour afficher l'élément.".to_string(),
        }
    }
}

impl NoticeText {
    fn render(&self, label: &str) -> String {
        format!(
            r#"<p>{} <span class="{}">{}</span></p>"#,
            escape(&self.message).replace("{category}", &escape(label)),
            OPEN_MODAL_CLASS,
            escape(&self.action)
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Leading integer of an attribute value, the way HTML dimension attributes read
fn leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}px", value as i64)
    } else {
        format!("{}px", value)
    }
}

pub fn placeholder_id(fp: i32) -> String {
    format!("{}{}", PLACEHOLDER_PREFIX, fp)
}

#[derive(Debug, Default)]
pub struct IframeSubstitution {
    /// Locators seen on gated iframes, by fingerprint
    observed: HashMap<i32, String>,
    placeholders: HashMap<i32, ElementId>,
    labels: CategoryLabels,
    notice: NoticeText,
}

impl IframeSubstitution {
    pub fn new(labels: CategoryLabels, notice: NoticeText) -> Self {
        Self {
            observed: HashMap::new(),
            placeholders: HashMap::new(),
            labels,
            notice,
        }
    }

    /// Remember a locator so it can later be restored by fingerprint
    pub fn observe(&mut self, locator: &str) -> i32 {
        let fp = fingerprint(locator);
        self.observed
            .entry(fp)
            .or_insert_with(|| locator.to_string());
        fp
    }

    pub fn observed(&self, fp: i32) -> Option<&str> {
        self.observed.get(&fp).map(String::as_str)
    }

    fn locator_of(page: &Page, iframe: ElementId) -> Option<String> {
        page.attr(iframe, "src")
            .filter(|s| !s.is_empty())
            .or_else(|| page.data(iframe, "src").filter(|s| !s.is_empty()))
            .map(str::to_string)
    }

    /// Existing placeholder for a fingerprint, if any
    pub fn placeholder(&self, page: &Page, fp: i32) -> Option<ElementId> {
        self.placeholders
            .get(&fp)
            .copied()
            .or_else(|| page.element_by_id(&placeholder_id(fp)))
    }

    /// Hide `iframe` behind its placeholder, creating the placeholder on first use
    pub fn show_placeholder(
        &mut self,
        page: &mut Page,
        iframe: ElementId,
        category: ConsentCategory,
    ) -> Result<Option<ElementId>> {
        let Some(locator) = Self::locator_of(page, iframe) else {
            tracing::debug!(element = %iframe, "Iframe has no locator, nothing to substitute");
            return Ok(None);
        };
        let fp = fingerprint(&locator);

        if let Some(existing) = self.placeholder(page, fp) {
            self.placeholders.insert(fp, existing);
            page.show(existing);
            page.hide(iframe);
            return Ok(Some(existing));
        }

        let placeholder = page.create_element("div");
        page.set_attr(placeholder, "id", &placeholder_id(fp));
        page.set_attr(placeholder, "style", &self.mirrored_style(page, iframe));
        page.set_inner_html(placeholder, &self.notice.render(self.labels.label(category)));
        page.insert_after(iframe, placeholder)?;
        page.hide(iframe);

        self.placeholders.insert(fp, placeholder);

        tracing::debug!(
            element = %iframe,
            fingerprint = fp,
            category = %category,
            "Created iframe placeholder"
        );

        Ok(Some(placeholder))
    }

    /// Hide the placeholder and show the iframe again; no-op without a placeholder
    pub fn restore_original(&self, page: &mut Page, iframe: ElementId) -> bool {
        let Some(locator) = Self::locator_of(page, iframe) else {
            return false;
        };

        match self.placeholder(page, fingerprint(&locator)) {
            Some(placeholder) => {
                page.hide(placeholder);
                page.show(iframe);
                true
            }
            None => false,
        }
    }

    fn mirrored_style(&self, page: &Page, iframe: ElementId) -> String {
        let mut styles: Vec<String> = MIRRORED_PROPERTIES
            .iter()
            .filter_map(|prop| {
                let from_attr = page
                    .attr(iframe, prop)
                    .and_then(leading_int)
                    .map(|n| px(n as f64));
                page.style(iframe, prop)
                    .or(from_attr)
                    .map(|value| format!("{}:{}", prop, value))
            })
            .collect();

        let width = page.attr(iframe, "width").and_then(leading_int);
        if let (Some(parent), Some(width)) = (page.parent(iframe), width) {
            let width = width as f64;
            let margin = match page.style(parent, "text-align").as_deref() {
                Some("center") => Some(format!("calc(50% - {})", px(width / 2.0))),
                Some("right") => Some(format!("calc(100% - {})", px(width))),
                _ => None,
            };
            if let Some(margin) = margin {
                styles.push(format!("margin-left:{}", margin));
            }
        }

        styles.join(";")
    }
}
