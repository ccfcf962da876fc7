use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::commands::inventory::document_label;
use crate::model::ItemRecord;
use crate::parser::OrderParser;

use super::pages::extract_pages;

#[derive(Debug, Clone, Default)]
pub(super) struct DocumentOutcome {
    pub source_file: String,
    pub page_count: usize,
    pub order_count: usize,
    pub unknown_order_count: usize,
    pub items: Vec<ItemRecord>,
    pub error: Option<String>,
}

/// Documents are independent, so they run in parallel; the result keeps the
/// input order.
pub(super) fn process_documents(
    paths: &[PathBuf],
    parser: &OrderParser,
    max_pages: Option<usize>,
) -> Vec<DocumentOutcome> {
    paths
        .par_iter()
        .map(|path| process_document(path, parser, max_pages))
        .collect()
}

pub(super) fn process_document(
    path: &Path,
    parser: &OrderParser,
    max_pages: Option<usize>,
) -> DocumentOutcome {
    let source_file = document_label(path);

    let pages = match extract_pages(path, max_pages) {
        Ok(pages) => pages,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "document text extraction failed");
            return DocumentOutcome {
                source_file,
                error: Some(format!("{error:#}")),
                ..DocumentOutcome::default()
            };
        }
    };

    let parsed = parser.parse_pages(&pages, &source_file);
    info!(
        document = %source_file,
        pages = pages.len(),
        orders = parsed.order_count,
        items = parsed.items.len(),
        "parsed document"
    );
    if parsed.order_count == 0 {
        warn!(document = %source_file, "no orders found in document");
    }

    DocumentOutcome {
        source_file,
        page_count: pages.len(),
        order_count: parsed.order_count,
        unknown_order_count: parsed.unknown_order_count,
        items: parsed.items,
        error: None,
    }
}
