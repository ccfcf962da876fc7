use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::InventoryArgs;
use crate::model::{DocumentEntry, DocumentInventory};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

pub fn run(args: InventoryArgs) -> Result<()> {
    let inventory = build_inventory(Some(&args.input_dir), &[])?;

    for document in &inventory.documents {
        info!(
            filename = %document.filename,
            sha256 = %document.sha256.as_deref().unwrap_or("unavailable"),
            "document"
        );
    }

    if args.dry_run {
        info!(
            document_count = inventory.document_count,
            source = %args.input_dir.display(),
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.input_dir.join("document_inventory.json"));

    write_json_pretty(&manifest_path, &inventory)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(document_count = inventory.document_count, "inventory completed");

    Ok(())
}

/// Explicit files keep their given order; directory entries follow, sorted.
pub fn build_inventory(input_dir: Option<&Path>, files: &[PathBuf]) -> Result<DocumentInventory> {
    let mut paths = files.to_vec();
    if let Some(input_dir) = input_dir {
        let mut discovered = discover_documents(input_dir)?;
        discovered.sort();
        paths.extend(discovered);
    }

    let mut seen = HashSet::new();
    paths.retain(|path| seen.insert(path.clone()));

    if paths.is_empty() {
        match input_dir {
            Some(input_dir) => bail!("no packing slip documents found in {}", input_dir.display()),
            None => bail!("no packing slip documents given; pass files or --input-dir"),
        }
    }

    let documents = paths
        .iter()
        .map(|path| {
            let sha256 = match sha256_file(path) {
                Ok(hash) => Some(hash),
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "could not hash document");
                    None
                }
            };

            DocumentEntry {
                filename: document_label(path),
                path: path.display().to_string(),
                sha256,
            }
        })
        .collect::<Vec<DocumentEntry>>();

    Ok(DocumentInventory {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: input_dir.map(|dir| dir.display().to_string()),
        document_count: documents.len(),
        documents,
    })
}

pub fn document_label(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| path.display().to_string())
}

pub fn is_supported_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

fn discover_documents(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        if is_supported_document(&path) {
            documents.push(path);
        }
    }

    Ok(documents)
}
