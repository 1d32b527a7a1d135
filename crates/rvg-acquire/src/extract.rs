use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;
use crate::normalize;

/// Class of the `<div>` wrapping one verse paragraph on ebible.org.
pub const VERSE_CONTAINER_CLASS: &str = "m";
/// Class of the `<span>` holding the verse number inside a container.
pub const VERSE_LABEL_CLASS: &str = "verse";

/// Pulls verse text out of a chapter page.
///
/// Extraction is a pure function of the markup. A page whose shape is not
/// recognized simply yields no verses.
#[derive(Debug, Clone)]
pub struct VerseExtractor {
    container: Selector,
    label: Selector,
}

impl Default for VerseExtractor {
    fn default() -> Self {
        Self::with_classes(VERSE_CONTAINER_CLASS, VERSE_LABEL_CLASS).expect("valid selector")
    }
}

impl VerseExtractor {
    /// Use different marker classes for containers (`div.{container_class}`)
    /// and verse-number labels (`span.{label_class}`).
    pub fn with_classes(container_class: &str, label_class: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            container: parse_selector(&format!("div.{container_class}"))?,
            label: parse_selector(&format!("span.{label_class}"))?,
        })
    }

    /// Extract every verse on the page, in document order.
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        let verses: Vec<String> = document
            .select(&self.container)
            .filter_map(|container| self.verse_text(container))
            .collect();
        tracing::debug!(verses = verses.len(), "Extracted verses");
        verses
    }

    /// Text of one container with its verse-number label removed.
    ///
    /// Containers without a label (headings, notes) yield `None`, as do
    /// containers holding nothing but the label.
    fn verse_text(&self, container: ElementRef) -> Option<String> {
        let label = container.select(&self.label).next()?;
        let label_text: String = label.text().collect();
        let full_text: String = container.text().collect();

        let body = full_text.replacen(label_text.trim(), "", 1);
        let verse = normalize::normalize_verse(&body);
        (!verse.is_empty()).then_some(verse)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|_| ExtractError::InvalidSelector(selector.to_string()))
}
