use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::model::PageText;

/// Page text for one document: `.pdf` through `pdftotext`, `.txt` as
/// pre-extracted text. Pages are separated by form feeds in both cases.
pub(super) fn extract_pages(path: &Path, max_pages: Option<usize>) -> Result<Vec<PageText>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let raw = match extension.as_deref() {
        Some("pdf") => extract_text_with_pdftotext(path, max_pages)?,
        Some("txt") => {
            let bytes =
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
        _ => bail!("unsupported document type: {}", path.display()),
    };

    let mut pages = split_pages(&raw);
    if let Some(max_pages) = max_pages {
        pages.truncate(max_pages);
    }

    Ok(pages)
}

pub(super) fn split_pages(raw: &str) -> Vec<PageText> {
    let mut pages = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', "").replace("\r\n", "\n"))
        .collect::<Vec<String>>();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    pages
        .into_iter()
        .enumerate()
        .map(|(page_index, text)| {
            if text.trim().is_empty() {
                PageText {
                    page_index,
                    text: None,
                }
            } else {
                PageText::new(page_index, text)
            }
        })
        .collect()
}

fn extract_text_with_pdftotext(pdf_path: &Path, max_pages: Option<usize>) -> Result<String> {
    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
    if let Some(max_pages) = max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
