use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_index: usize,
    pub text: Option<String>,
}

impl PageText {
    pub fn new(page_index: usize, text: impl Into<String>) -> Self {
        Self {
            page_index,
            text: Some(text.into()),
        }
    }

    /// Text of the page, or `None` when the page is absent or blank.
    pub fn content(&self) -> Option<&str> {
        self.text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBlock {
    pub order_id: String,
    pub merged_text: String,
    pub first_page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub order_id: String,
    pub buyer_name: String,
    pub sku: String,
    pub product_type: String,
    pub towel_color: String,
    pub thread_color: String,
    pub customization_text: String,
    pub font: String,
    pub quantity: u32,
    pub gift_message: Option<String>,
    pub source_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionSummary {
    pub towel_color_counts: BTreeMap<String, u32>,
    pub hand_towel_counts: BTreeMap<String, u32>,
    pub bath_towel_counts: BTreeMap<String, u32>,
    pub bath_sheet_counts: BTreeMap<String, u32>,
    pub standard_unit_equivalents: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub filename: String,
    pub path: String,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInventory {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: Option<String>,
    pub document_count: usize,
    pub documents: Vec<DocumentEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsePaths {
    pub output_dir: String,
    pub items_path: String,
    pub csv_path: String,
    pub gift_messages_path: String,
    pub labels_path: String,
    pub summary_path: String,
    pub catalog_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseCounts {
    pub document_count: usize,
    pub failed_document_count: usize,
    pub page_count: usize,
    pub order_count: usize,
    pub item_count: usize,
    pub gift_message_count: usize,
    pub unknown_order_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub paths: ParsePaths,
    pub counts: ParseCounts,
    pub sources: Vec<DocumentEntry>,
    pub warnings: Vec<String>,
}
