use anyhow::{Context, Result};
use regex::Regex;

use crate::catalog::Catalog;
use crate::util::{collapse_whitespace, truncate_chars};

pub const DEFAULT_BUYER_NAME: &str = "Unknown Buyer";
pub const DEFAULT_THREAD_COLOR: &str = "Not Specified";
pub const DEFAULT_CUSTOMIZATION_TEXT: &str = "None";
pub const DEFAULT_FONT: &str = "Default";
pub const DEFAULT_QUANTITY: u32 = 1;
pub const DEFAULT_PRODUCT_TYPE: &str = "Unknown Product";

const GIFT_MESSAGE_MAX_CHARS: usize = 200;
const CUSTOMIZATION_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Copy)]
struct Cleanup {
    collapse_whitespace: bool,
    max_chars: Option<usize>,
}

impl Cleanup {
    const TRIM: Cleanup = Cleanup {
        collapse_whitespace: false,
        max_chars: None,
    };

    fn apply(self, raw: &str) -> String {
        let value = if self.collapse_whitespace {
            collapse_whitespace(raw)
        } else {
            raw.trim().to_string()
        };

        match self.max_chars {
            Some(max_chars) => truncate_chars(&value, max_chars).trim_end().to_string(),
            None => value,
        }
    }
}

/// Ordered candidate patterns for one field. Capture group 1 holds the value.
#[derive(Debug)]
struct FieldRules {
    patterns: Vec<Regex>,
    cleanup: Cleanup,
}

impl FieldRules {
    fn compile(field: &str, patterns: &[&str], cleanup: Cleanup) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("failed to compile {field} regex: {pattern}"))
            })
            .collect::<Result<Vec<Regex>>>()?;

        Ok(Self { patterns, cleanup })
    }

    /// First pattern whose cleaned capture is accepted wins.
    fn first_match<T>(&self, text: &str, accept: impl Fn(String) -> Option<T>) -> Option<T> {
        self.patterns.iter().find_map(|pattern| {
            let value = pattern.captures(text)?.get(1)?;
            let cleaned = self.cleanup.apply(value.as_str());
            if cleaned.is_empty() {
                return None;
            }
            accept(cleaned)
        })
    }

    fn first_capture(&self, text: &str) -> Option<String> {
        self.first_match(text, Some)
    }
}

#[derive(Debug)]
pub struct FieldExtractor {
    buyer_name: FieldRules,
    gift_message: FieldRules,
    thread_color: FieldRules,
    customization_text: FieldRules,
    font: FieldRules,
    quantity: FieldRules,
}

impl FieldExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            buyer_name: FieldRules::compile(
                "buyer name",
                &[
                    r"Ship to:\s*([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+)",
                    r"(?m)^([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+)",
                ],
                Cleanup::TRIM,
            )?,
            gift_message: FieldRules::compile(
                "gift message",
                &[r"(?s)(?i:gift\s*(?:message|card|bag)\s*:)\s*(.+?)(?:\n\n|\n[A-Z]|$)"],
                Cleanup {
                    collapse_whitespace: true,
                    max_chars: Some(GIFT_MESSAGE_MAX_CHARS),
                },
            )?,
            thread_color: FieldRules::compile(
                "thread color",
                &[
                    r"Thread Color:\s*([A-Za-z]+)",
                    r"Thread:\s*([A-Za-z]+)",
                    r"Color:\s*([A-Za-z]+)",
                ],
                Cleanup::TRIM,
            )?,
            customization_text: FieldRules::compile(
                "customization text",
                &[
                    r"(?i)(?:customization|text|name):\s*(.+?)(?:\n|thread|font|$)",
                    r"(?i)embroider:\s*(.+?)(?:\n|thread|font|$)",
                ],
                Cleanup {
                    collapse_whitespace: true,
                    max_chars: Some(CUSTOMIZATION_MAX_CHARS),
                },
            )?,
            font: FieldRules::compile(
                "font",
                &[r"(?i)(?:choose your font|font):\s*([a-z\s]+?)(?:\n|thread|$)"],
                Cleanup::TRIM,
            )?,
            quantity: FieldRules::compile("quantity", &[r"Quantity:\s*([0-9]+)"], Cleanup::TRIM)?,
        })
    }

    pub fn buyer_name(&self, text: &str) -> String {
        self.buyer_name
            .first_capture(text)
            .unwrap_or_else(|| DEFAULT_BUYER_NAME.to_string())
    }

    /// `None` when the order carries no gift message at all.
    pub fn gift_message(&self, text: &str) -> Option<String> {
        self.gift_message.first_capture(text)
    }

    pub fn thread_color(&self, text: &str) -> String {
        self.thread_color
            .first_capture(text)
            .unwrap_or_else(|| DEFAULT_THREAD_COLOR.to_string())
    }

    pub fn customization_text(&self, text: &str) -> String {
        self.customization_text
            .first_capture(text)
            .unwrap_or_else(|| DEFAULT_CUSTOMIZATION_TEXT.to_string())
    }

    pub fn font(&self, text: &str) -> String {
        self.font
            .first_capture(text)
            .unwrap_or_else(|| DEFAULT_FONT.to_string())
    }

    pub fn quantity(&self, text: &str) -> u32 {
        self.quantity
            .first_match(text, |value| {
                value.parse::<u32>().ok().filter(|quantity| *quantity >= 1)
            })
            .unwrap_or(DEFAULT_QUANTITY)
    }

    pub fn product_type(&self, sku: &str, catalog: &Catalog) -> String {
        catalog
            .category_for_sku(sku)
            .map(|category| category.label.clone())
            .unwrap_or_else(|| DEFAULT_PRODUCT_TYPE.to_string())
    }
}
