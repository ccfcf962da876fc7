use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::Catalog;
use crate::cli::SummarizeArgs;
use crate::model::ItemRecord;
use crate::production::summarize;

pub fn run(args: SummarizeArgs) -> Result<()> {
    let catalog = Catalog::load_or_default(args.catalog_path.as_deref())?;
    let items = load_items(&args.items_path)?;
    let summary = summarize(&items, &catalog);

    info!(
        path = %args.items_path.display(),
        items = items.len(),
        units = summary.total_units(),
        equivalents = summary.standard_unit_equivalents,
        "summarized items"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &summary)
            .context("failed to serialize production summary")?;
        writeln!(output)?;
    } else {
        write!(output, "{}", summary.render_text())?;
    }
    output.flush()?;

    Ok(())
}

pub fn load_items(path: &Path) -> Result<Vec<ItemRecord>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
