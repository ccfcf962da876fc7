use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::cli::ParseArgs;
use crate::commands::inventory;
use crate::model::{ItemRecord, ParseCounts, ParsePaths, ParseRunManifest};
use crate::parser::OrderParser;
use crate::production::summarize;
use crate::util::{
    ensure_directory, now_utc_string, utc_compact_string, write_json_pretty, write_text,
};

use super::export::{gift_message_items, items_to_csv, label_payloads};
use super::pipeline::process_documents;

pub fn run(args: ParseArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let output_dir = args.output_dir.clone();
    ensure_directory(&output_dir)?;

    let items_path = output_dir.join("items.json");
    let csv_path = output_dir.join("orders.csv");
    let gift_messages_path = output_dir.join("gift_messages.json");
    let labels_path = output_dir.join("labels.json");
    let summary_path = output_dir.join("production_summary.json");
    let manifest_path =
        output_dir.join(format!("parse_run_{}.json", utc_compact_string(started_ts)));

    let catalog = Catalog::load_or_default(args.catalog_path.as_deref())?;
    let inventory = inventory::build_inventory(args.input_dir.as_deref(), &args.files)?;

    info!(
        run_id = %run_id,
        documents = inventory.document_count,
        output_dir = %output_dir.display(),
        "starting parse"
    );

    let parser = OrderParser::new(catalog)?;
    let paths = inventory
        .documents
        .iter()
        .map(|document| PathBuf::from(&document.path))
        .collect::<Vec<PathBuf>>();
    let outcomes = process_documents(&paths, &parser, args.max_pages_per_doc);

    let mut warnings = Vec::<String>::new();
    let mut counts = ParseCounts {
        document_count: outcomes.len(),
        ..ParseCounts::default()
    };
    let mut items = Vec::<ItemRecord>::new();

    for document in &inventory.documents {
        if document.sha256.is_none() {
            warnings.push(format!("could not hash {}", document.path));
        }
    }

    for outcome in outcomes {
        if let Some(error) = &outcome.error {
            counts.failed_document_count += 1;
            warnings.push(format!("{}: {}", outcome.source_file, error));
        } else if outcome.order_count == 0 {
            warnings.push(format!("{}: no orders found", outcome.source_file));
        }

        counts.page_count += outcome.page_count;
        counts.order_count += outcome.order_count;
        counts.unknown_order_count += outcome.unknown_order_count;
        items.extend(outcome.items);
    }

    counts.item_count = items.len();
    let gift_items = gift_message_items(&items);
    counts.gift_message_count = gift_items.len();

    if items.is_empty() {
        warn!("no items extracted from any document");
    }

    let summary = summarize(&items, parser.catalog());
    let labels = label_payloads(&items, parser.catalog());

    write_json_pretty(&items_path, &items)?;
    write_text(&csv_path, &items_to_csv(&items))?;
    write_json_pretty(&gift_messages_path, &gift_items)?;
    write_json_pretty(&labels_path, &labels)?;
    write_json_pretty(&summary_path, &summary)?;

    let manifest = ParseRunManifest {
        manifest_version: 1,
        run_id: run_id.clone(),
        status: if counts.failed_document_count == 0 {
            "completed".to_string()
        } else {
            "completed_with_warnings".to_string()
        },
        started_at,
        updated_at: now_utc_string(),
        command: render_parse_command(&args),
        paths: ParsePaths {
            output_dir: output_dir.display().to_string(),
            items_path: items_path.display().to_string(),
            csv_path: csv_path.display().to_string(),
            gift_messages_path: gift_messages_path.display().to_string(),
            labels_path: labels_path.display().to_string(),
            summary_path: summary_path.display().to_string(),
            catalog_path: args
                .catalog_path
                .as_ref()
                .map(|path| path.display().to_string()),
        },
        counts: counts.clone(),
        sources: inventory.documents,
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote parse run manifest");
    info!(
        documents = counts.document_count,
        failed = counts.failed_document_count,
        orders = counts.order_count,
        items = counts.item_count,
        gift_messages = counts.gift_message_count,
        equivalents = summary.standard_unit_equivalents,
        "parse completed"
    );

    if args.print_summary {
        let mut output = io::BufWriter::new(io::stdout().lock());
        write!(output, "{}", summary.render_text())?;
        output.flush()?;
    }

    Ok(())
}

fn render_parse_command(args: &ParseArgs) -> String {
    let mut command = vec!["packslip".to_string(), "parse".to_string()];

    for file in &args.files {
        command.push(file.display().to_string());
    }
    if let Some(path) = &args.input_dir {
        command.push("--input-dir".to_string());
        command.push(path.display().to_string());
    }
    command.push("--output-dir".to_string());
    command.push(args.output_dir.display().to_string());
    if let Some(path) = &args.catalog_path {
        command.push("--catalog-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(max_pages) = args.max_pages_per_doc {
        command.push("--max-pages-per-doc".to_string());
        command.push(max_pages.to_string());
    }
    if args.print_summary {
        command.push("--print-summary".to_string());
    }

    command.join(" ")
}
