use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::model::{OrderBlock, PageText};

pub const UNKNOWN_ORDER_PREFIX: &str = "UNKNOWN-";

#[derive(Debug)]
enum SegmenterState {
    Idle,
    Open(OrderBlock),
}

#[derive(Debug)]
pub struct OrderSegmenter {
    order_id: Regex,
    person_name_line: Regex,
}

impl OrderSegmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            order_id: Regex::new(r"Order ID:\s*([0-9][0-9-]*)")
                .context("failed to compile order id regex")?,
            person_name_line: Regex::new(r"(?m)^[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+")
                .context("failed to compile person name line regex")?,
        })
    }

    /// Splits ordered pages into order blocks.
    ///
    /// A page carrying an order id opens a new block. Any other page is
    /// merged into the open block; before the first block it opens an
    /// `UNKNOWN-<page>` block only when a line starts with a person name.
    /// Continuation pages are not checked for buyer or address continuity.
    pub fn segment(&self, pages: &[PageText]) -> Vec<OrderBlock> {
        let mut blocks = Vec::new();
        let mut state = SegmenterState::Idle;

        for page in pages {
            let Some(text) = page.content() else {
                debug!(page = page.page_index + 1, "skipping empty page");
                continue;
            };

            state = match (state, self.order_id(text)) {
                (previous, Some(order_id)) => {
                    if let SegmenterState::Open(block) = previous {
                        blocks.push(block);
                    }
                    SegmenterState::Open(OrderBlock {
                        order_id,
                        merged_text: text.to_string(),
                        first_page: page.page_index,
                    })
                }
                (SegmenterState::Open(mut block), None) => {
                    block.merged_text.push('\n');
                    block.merged_text.push_str(text);
                    SegmenterState::Open(block)
                }
                (SegmenterState::Idle, None) => {
                    if self.person_name_line.is_match(text) {
                        SegmenterState::Open(OrderBlock {
                            order_id: format!("{UNKNOWN_ORDER_PREFIX}{}", page.page_index + 1),
                            merged_text: text.to_string(),
                            first_page: page.page_index,
                        })
                    } else {
                        debug!(
                            page = page.page_index + 1,
                            "dropping page before first order"
                        );
                        SegmenterState::Idle
                    }
                }
            };
        }

        if let SegmenterState::Open(block) = state {
            blocks.push(block);
        }

        blocks
    }

    fn order_id(&self, text: &str) -> Option<String> {
        self.order_id
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().to_string())
    }
}
