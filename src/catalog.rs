use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Multipliers are accumulated as integer thousandths of a standard unit.
pub const MULTIPLIER_SCALE: u64 = 1000;

const MAX_MULTIPLIER: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub code: String,
    pub label: String,
    /// Standard units (3-piece set equivalents) contributed per unit sold.
    pub multiplier: f64,
}

impl ProductCategory {
    /// `multiplier` in `MULTIPLIER_SCALE` units. Exact for validated catalogs.
    pub fn multiplier_units(&self) -> u64 {
        (self.multiplier * MULTIPLIER_SCALE as f64).round() as u64
    }
}

/// Lookup tables shared by the parser and the production aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<ProductCategory>,
    #[serde(default)]
    pub thread_color_translations: BTreeMap<String, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        let categories = [
            ("Set-6Pcs", "6-Piece Towel Set", 2.0),
            ("Set-3Pcs", "3-Piece Towel Set", 1.0),
            ("HT-2Pcs", "2-Piece Hand Towel", 0.0),
            ("BT-2Pcs", "2-Piece Bath Towel", 0.0),
            ("BS-1Pcs", "Bath Sheet", 0.0),
        ]
        .into_iter()
        .map(|(code, label, multiplier)| ProductCategory {
            code: code.to_string(),
            label: label.to_string(),
            multiplier,
        })
        .collect();

        let thread_color_translations = [
            ("White", "Blanco"),
            ("Black", "Negro"),
            ("Navy", "Azul Marino"),
            ("Gray", "Gris"),
            ("Brown", "Marrón"),
            ("Red", "Rojo"),
            ("Pink", "Rosa"),
            ("Blue", "Azul"),
            ("Green", "Verde"),
            ("Yellow", "Amarillo"),
            ("Orange", "Naranja"),
            ("Purple", "Púrpura"),
            ("Beige", "Beige"),
            ("Cream", "Crema"),
            ("Ivory", "Marfil"),
        ]
        .into_iter()
        .map(|(english, translated)| (english.to_string(), translated.to_string()))
        .collect();

        Self {
            categories,
            thread_color_translations,
        }
    }
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let catalog: Catalog = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        catalog
            .validate()
            .with_context(|| format!("invalid catalog: {}", path.display()))?;

        info!(
            path = %path.display(),
            categories = catalog.categories.len(),
            translations = catalog.thread_color_translations.len(),
            "loaded catalog"
        );

        Ok(catalog)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            bail!("catalog defines no product categories");
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            let code = category.code.trim();
            if code.is_empty() {
                bail!("product category with label '{}' has a blank code", category.label);
            }
            if !seen.insert(code) {
                bail!("duplicate product category code: {code}");
            }
            let multiplier = category.multiplier;
            if !multiplier.is_finite() || !(0.0..=MAX_MULTIPLIER).contains(&multiplier) {
                bail!("product category {code} has invalid multiplier {multiplier}");
            }
            let scaled = multiplier * MULTIPLIER_SCALE as f64;
            if (scaled - scaled.round()).abs() > 1e-6 {
                bail!(
                    "product category {code} multiplier {multiplier} has more than three decimal places"
                );
            }
        }

        Ok(())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.code.as_str())
    }

    /// Longest category code that prefixes `sku` up to a hyphen or the end.
    pub fn category_for_sku(&self, sku: &str) -> Option<&ProductCategory> {
        self.categories
            .iter()
            .filter(|category| {
                sku.strip_prefix(category.code.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
            })
            .max_by_key(|category| category.code.len())
    }

    /// Multiplier units for the category of `sku`; unknown SKUs weigh nothing.
    pub fn multiplier_units_for_sku(&self, sku: &str) -> u64 {
        self.category_for_sku(sku)
            .map(ProductCategory::multiplier_units)
            .unwrap_or(0)
    }

    pub fn translate_thread_color<'a>(&'a self, color: &'a str) -> &'a str {
        self.thread_color_translations
            .get(color)
            .map(String::as_str)
            .unwrap_or(color)
    }
}
