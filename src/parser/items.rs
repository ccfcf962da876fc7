use anyhow::{Context, Result};
use regex::Regex;

use crate::catalog::Catalog;
use crate::model::{ItemRecord, OrderBlock};
use crate::util::truncate_chars;

use super::fields::FieldExtractor;

/// Characters after a marker searched for that item's customization fields.
pub const ITEM_WINDOW_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMarker {
    pub start: usize,
    pub sku: String,
    pub towel_color: String,
}

#[derive(Debug)]
pub struct ItemExtractor {
    catalog: Catalog,
    fields: FieldExtractor,
    item_marker: Regex,
}

impl ItemExtractor {
    pub fn new(catalog: Catalog) -> Result<Self> {
        let item_marker = build_item_marker_regex(&catalog)?;
        Ok(Self {
            catalog,
            fields: FieldExtractor::new()?,
            item_marker,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn extract_items(&self, block: &OrderBlock, source_file: &str) -> Vec<ItemRecord> {
        let text = block.merged_text.as_str();
        let markers = self.find_markers(text);
        if markers.is_empty() {
            return Vec::new();
        }

        let buyer_name = self.fields.buyer_name(text);
        let gift_message = self.fields.gift_message(text);

        markers
            .into_iter()
            .map(|marker| {
                let window = lookahead_window(text, marker.start, ITEM_WINDOW_CHARS);
                ItemRecord {
                    order_id: block.order_id.clone(),
                    buyer_name: buyer_name.clone(),
                    product_type: self.fields.product_type(&marker.sku, &self.catalog),
                    sku: marker.sku,
                    towel_color: marker.towel_color,
                    thread_color: self.fields.thread_color(window),
                    customization_text: self.fields.customization_text(window),
                    font: self.fields.font(window),
                    quantity: self.fields.quantity(window),
                    gift_message: gift_message.clone(),
                    source_file: source_file.to_string(),
                }
            })
            .collect()
    }

    pub fn find_markers(&self, text: &str) -> Vec<ItemMarker> {
        self.item_marker
            .captures_iter(text)
            .filter_map(|captures| {
                let code = captures.get(1)?;
                let color = captures.get(2)?;
                Some(ItemMarker {
                    start: code.start(),
                    sku: text[code.start()..color.end()].to_string(),
                    towel_color: color.as_str().to_string(),
                })
            })
            .collect()
    }
}

/// Marker = catalog code, hyphen, capitalized colour word. The code must not
/// be glued to a preceding letter or digit, so look-alike prefixes never match.
fn build_item_marker_regex(catalog: &Catalog) -> Result<Regex> {
    let mut codes = catalog.codes().map(str::trim).collect::<Vec<&str>>();
    // Longer codes first so alternation picks the most specific one.
    codes.sort_by(|left, right| right.len().cmp(&left.len()).then(left.cmp(right)));

    let alternation = codes
        .iter()
        .map(|code| regex::escape(code))
        .collect::<Vec<String>>()
        .join("|");
    let pattern = format!(r"(?:^|[^A-Za-z0-9])({alternation})-([A-Z][A-Za-z]*)");

    Regex::new(&pattern).context("failed to compile item marker regex")
}

fn lookahead_window(text: &str, start: usize, max_chars: usize) -> &str {
    truncate_chars(&text[start..], max_chars)
}

#[cfg(test)]
mod window_tests {
    use super::*;

    #[test]
    fn lookahead_window_caps_characters_not_bytes() {
        let text = format!("Set-3Pcs-White {}", "é".repeat(600));
        let window = lookahead_window(&text, 0, ITEM_WINDOW_CHARS);
        assert_eq!(window.chars().count(), ITEM_WINDOW_CHARS);
        assert!(window.starts_with("Set-3Pcs-White"));
    }

    #[test]
    fn lookahead_window_returns_tail_when_short() {
        assert_eq!(lookahead_window("abc HT-2Pcs-Gray", 4, 500), "HT-2Pcs-Gray");
    }
}
