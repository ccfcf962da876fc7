//! Order segmentation and item extraction for packing slip text.
//!
//! Pages flow through `OrderSegmenter` into order blocks, and each block
//! through `ItemExtractor` into item records. Nothing here performs I/O or
//! returns errors once constructed: a field that cannot be found resolves to
//! its default value.

mod fields;
mod items;
mod segment;

use anyhow::Result;
use tracing::debug;

use crate::catalog::Catalog;
use crate::model::{ItemRecord, PageText};

use items::ItemExtractor;
use segment::{OrderSegmenter, UNKNOWN_ORDER_PREFIX};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub order_count: usize,
    pub unknown_order_count: usize,
    pub items: Vec<ItemRecord>,
}

#[derive(Debug)]
pub struct OrderParser {
    segmenter: OrderSegmenter,
    items: ItemExtractor,
}

impl OrderParser {
    pub fn new(catalog: Catalog) -> Result<Self> {
        Ok(Self {
            segmenter: OrderSegmenter::new()?,
            items: ItemExtractor::new(catalog)?,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        self.items.catalog()
    }

    pub fn parse_pages(&self, pages: &[PageText], source_file: &str) -> ParsedDocument {
        let blocks = self.segmenter.segment(pages);
        let mut parsed = ParsedDocument {
            order_count: blocks.len(),
            ..ParsedDocument::default()
        };

        for block in &blocks {
            if block.order_id.starts_with(UNKNOWN_ORDER_PREFIX) {
                parsed.unknown_order_count += 1;
            }

            let items = self.items.extract_items(block, source_file);
            if items.is_empty() {
                debug!(
                    order_id = %block.order_id,
                    page = block.first_page + 1,
                    "order block has no item markers"
                );
            }
            parsed.items.extend(items);
        }

        parsed
    }
}
