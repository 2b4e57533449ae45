use chrono::NaiveDateTime;
use quick_xml::events::Event;
use quick_xml::Reader;
use scraper::{Html, Selector};

use crate::error::ScrapeError;

/// Section heading that opens the label block in a lot description.
const LOT_LIST_MARKER: &str = "Lot list";
/// Section heading that ends the label block and opens the key:value block.
const CHARACTERISTICS_MARKER: &str = "Characteristics";
/// Keys containing this substring hold feed timestamps.
const DATE_KEY_MARKER: &str = "date";

const FEED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const OUTPUT_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Label → value pairs pulled out of one description blob. Backed by a Vec
/// so iteration order is always insertion order; the downstream substring
/// matching depends on that order being stable.
#[derive(Debug, Default, Clone)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    /// Registers a label with an empty value. No-op if already present.
    pub fn add_label(&mut self, key: &str) {
        if !self.contains_key(key) {
            self.entries.push((key.to_string(), String::new()));
        }
    }

    /// Sets a value, overwriting an existing entry or appending a new one.
    pub fn set(&mut self, key: &str, value: String) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drops a single trailing punctuation character, so "Lot number:" and the
/// label "Lot number" compare equal.
fn strip_trailing_punct(s: &str) -> &str {
    match s.chars().last() {
        Some(c) if c.is_ascii_punctuation() => &s[..s.len() - c.len_utf8()],
        _ => s,
    }
}

/// Feed timestamps become the report format; anything else stays as-is.
fn reformat_date(value: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(value, FEED_DATE_FORMAT)
        .ok()
        .map(|dt| dt.format(OUTPUT_DATE_FORMAT).to_string())
}

pub struct Extractor {
    bold_selector: Selector,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            bold_selector: Selector::parse("b").unwrap(),
        }
    }

    /// Pulls the description text out of the first `<item>` of the feed.
    ///
    /// Returns `Ok(None)` when the feed carries no item at all (the VIN is
    /// simply not on auction). An item without a description is malformed
    /// and surfaces as `MissingDescription`.
    pub fn first_item_description(&self, feed: &str) -> Result<Option<String>, ScrapeError> {
        let mut reader = Reader::from_str(feed);
        let mut saw_item = false;
        let mut in_item = false;
        let mut in_description = false;
        let mut saw_description = false;
        let mut description = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) if !in_item && e.name().as_ref() == b"item" => {
                    saw_item = true;
                    in_item = true;
                }
                Event::Start(e) if in_item && e.name().as_ref() == b"description" => {
                    in_description = true;
                    saw_description = true;
                }
                Event::Text(t) if in_description => description.push_str(&t.unescape()?),
                Event::CData(t) if in_description => {
                    description.push_str(&String::from_utf8_lossy(&t));
                }
                Event::End(e) if in_description && e.name().as_ref() == b"description" => {
                    in_description = false;
                }
                // Only the first item counts; stop before any later ones.
                Event::End(e) if in_item && e.name().as_ref() == b"item" => break,
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_item {
            return Ok(None);
        }
        if !saw_description {
            return Err(ScrapeError::MissingDescription);
        }
        Ok(Some(description))
    }

    /// Two-pass heuristic extraction over the description HTML.
    ///
    /// The blob has no schema: field labels are the bold runs between the
    /// "Lot list" and "Characteristics" headings, a label's value is
    /// whatever text node follows it, and the characteristics section
    /// repeats some fields as plain `key: value` lines that take precedence.
    pub fn extract_fields(&self, description: &str) -> FieldMap {
        let html = Html::parse_fragment(description);
        let mut fields = FieldMap::default();

        // Pass 1: collect labels from bold runs inside the lot-list section.
        let mut in_lot_list = false;
        for element in html.select(&self.bold_selector) {
            let text: String = element.text().collect();
            let text = text.trim();
            if in_lot_list {
                if text.contains(CHARACTERISTICS_MARKER) {
                    break;
                }
                fields.add_label(strip_trailing_punct(text));
            } else if text.contains(LOT_LIST_MARKER) {
                in_lot_list = true;
            }
        }

        // Flatten the blob into its non-empty text nodes, in document order.
        let strings: Vec<String> = html
            .root_element()
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        // Pass 2: the node after the one containing a label is its value,
        // unless that node is itself another label (two adjacent labels with
        // nothing in between must not borrow each other's text).
        let labels: Vec<String> = fields.keys().map(str::to_string).collect();
        for label in &labels {
            if let Some(idx) = strings.iter().position(|s| s.contains(label.as_str())) {
                if let Some(candidate) = strings.get(idx + 1) {
                    if !fields.contains_key(strip_trailing_punct(candidate)) {
                        fields.set(label, candidate.clone());
                    }
                }
            }
        }

        // Pass 3: `key: value` lines after the characteristics heading
        // overwrite whatever pass 2 found.
        let mut in_characteristics = false;
        for s in &strings {
            if in_characteristics {
                if let Some((key, value)) = s.split_once(':') {
                    fields.set(key.trim(), value.trim().to_string());
                }
            }
            if s.contains(CHARACTERISTICS_MARKER) {
                in_characteristics = true;
            }
        }

        // Timestamps arrive in the feed's ISO form; report them localised.
        for (key, value) in fields.entries.iter_mut() {
            if key.contains(DATE_KEY_MARKER) && !value.is_empty() {
                if let Some(formatted) = reformat_date(value) {
                    *value = formatted;
                }
            }
        }

        fields
    }
}
