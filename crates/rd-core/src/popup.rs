//! Popup content shown for a map marker

use crate::category::{classify, ColorCategory};
use crate::record::Restaurant;

/// Badge text for records without a cuisine
const DEFAULT_BADGE: &str = "RESTO";

/// Check that an optional value is worth displaying
///
/// Rejects missing values, empty strings and the missing-data sentinels.
pub fn is_valid(value: Option<&str>) -> bool {
    value.map(|v| !crate::is_missing_sentinel(v)).unwrap_or(false)
}

/// One optional line of the popup body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupLine {
    /// One entry per comma-delimited item
    Hours(Vec<String>),
    Phone(String),
    Website(String),
}

/// Structured popup, renderable as HTML or directly by a UI
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub subtitle: String,
    pub badge: String,
    pub accent: ColorCategory,
    pub lines: Vec<PopupLine>,
}

impl PopupContent {
    /// Render the popup as an HTML fragment
    pub fn to_html(&self) -> String {
        let fill = self.accent.hex();
        let text = self.accent.text_hex();

        let mut html = String::new();
        html.push_str("<div style=\"font-family: Arial; width: 300px;\">");
        html.push_str(&format!(
            "<h3 style=\"color: {}; margin: 0 0 5px 0;\">{}</h3>",
            text,
            escape_html(&self.title)
        ));
        html.push_str(&format!(
            "<div style=\"font-size: 11px; color: #888; margin-bottom: 5px;\">{}</div>",
            escape_html(&self.subtitle)
        ));
        html.push_str(&format!(
            "<span style=\"background-color: {}; color: white; padding: 3px 10px; border-radius: 12px; font-size: 11px; font-weight: bold;\">{}</span>",
            fill,
            escape_html(&self.badge)
        ));
        html.push_str("<div style=\"font-size: 12px; margin-top: 10px; line-height: 1.5;\">");

        for line in &self.lines {
            match line {
                PopupLine::Hours(entries) => {
                    let joined = entries.iter().map(|e| escape_html(e)).collect::<Vec<_>>().join("<br>");
                    html.push_str(&format!("🕒 {}<br>", joined));
                }
                PopupLine::Phone(phone) => {
                    html.push_str(&format!("📞 {}<br>", escape_html(phone)));
                }
                PopupLine::Website(url) => {
                    let url = escape_html(url);
                    html.push_str(&format!(
                        "Site web <a href=\"{}\" target=\"_blank\" style=\"color: {}; font-weight: bold; text-decoration: underline; word-wrap: break-word;\">{}</a>",
                        url, text, url
                    ));
                }
            }
        }

        html.push_str("</div></div>");
        html
    }

    pub fn hours(&self) -> Option<&[String]> {
        self.lines.iter().find_map(|line| match line {
            PopupLine::Hours(entries) => Some(entries.as_slice()),
            _ => None,
        })
    }

    pub fn phone(&self) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            PopupLine::Phone(phone) => Some(phone.as_str()),
            _ => None,
        })
    }

    pub fn website(&self) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            PopupLine::Website(url) => Some(url.as_str()),
            _ => None,
        })
    }
}

/// Assemble the popup for a record
///
/// Order is fixed: title, subtitle, badge, then hours, phone and website,
/// each only when its value is valid.
pub fn build_popup_content(record: &Restaurant) -> PopupContent {
    let mut lines = Vec::new();

    if is_valid(record.horaires.as_deref()) {
        let entries = record.hours_lines().into_iter().map(str::to_string).collect();
        lines.push(PopupLine::Hours(entries));
    }

    if let Some(phone) = record.phone.as_deref().filter(|p| is_valid(Some(*p))) {
        lines.push(PopupLine::Phone(phone.to_string()));
    }

    if let Some(website) = record.website.as_deref().filter(|w| is_valid(Some(*w))) {
        lines.push(PopupLine::Website(website.to_string()));
    }

    PopupContent {
        title: record.name.clone(),
        subtitle: record.quartier.clone().unwrap_or_default(),
        badge: record
            .cuisine
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| DEFAULT_BADGE.to_string()),
        accent: classify(record.cuisine.as_deref()),
        lines,
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
