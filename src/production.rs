use std::collections::BTreeMap;

use crate::catalog::{Catalog, MULTIPLIER_SCALE};
use crate::model::{ItemRecord, ProductionSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeparateTally {
    HandTowel,
    BathTowel,
    BathSheet,
}

impl SeparateTally {
    fn for_product_type(product_type: &str) -> Option<Self> {
        if product_type.contains("Hand") {
            Some(Self::HandTowel)
        } else if product_type.contains("Bath Towel") && !product_type.contains("Sheet") {
            Some(Self::BathTowel)
        } else if product_type.contains("Sheet") {
            Some(Self::BathSheet)
        } else {
            None
        }
    }
}

/// Equivalents are summed as integer multiplier units and converted once, so
/// the total does not depend on item order.
pub fn summarize(items: &[ItemRecord], catalog: &Catalog) -> ProductionSummary {
    let mut summary = ProductionSummary::default();
    let mut equivalent_units = 0u64;

    for item in items {
        add_count(&mut summary.towel_color_counts, &item.towel_color, item.quantity);

        let units = catalog
            .multiplier_units_for_sku(&item.sku)
            .saturating_mul(u64::from(item.quantity));
        equivalent_units = equivalent_units.saturating_add(units);

        let counts = match SeparateTally::for_product_type(&item.product_type) {
            Some(SeparateTally::HandTowel) => &mut summary.hand_towel_counts,
            Some(SeparateTally::BathTowel) => &mut summary.bath_towel_counts,
            Some(SeparateTally::BathSheet) => &mut summary.bath_sheet_counts,
            None => continue,
        };
        add_count(counts, &item.towel_color, item.quantity);
    }

    summary.standard_unit_equivalents = equivalent_units as f64 / MULTIPLIER_SCALE as f64;
    summary
}

fn add_count(counts: &mut BTreeMap<String, u32>, color: &str, quantity: u32) {
    let entry = counts.entry(color.to_string()).or_insert(0);
    *entry = entry.saturating_add(quantity);
}

impl ProductionSummary {
    pub fn total_units(&self) -> u32 {
        self.towel_color_counts
            .values()
            .fold(0u32, |total, count| total.saturating_add(*count))
    }

    pub fn render_text(&self) -> String {
        let mut lines = vec!["Towel colors".to_string()];
        if self.towel_color_counts.is_empty() {
            lines.push("\t(none)".to_string());
        }
        lines.extend(count_lines(&self.towel_color_counts));
        lines.push(format!(
            "3-piece equivalents: {:.1}",
            self.standard_unit_equivalents
        ));

        for (title, counts) in [
            ("Hand towels", &self.hand_towel_counts),
            ("Bath towels", &self.bath_towel_counts),
            ("Bath sheets", &self.bath_sheet_counts),
        ] {
            if counts.is_empty() {
                continue;
            }
            lines.push(title.to_string());
            lines.extend(count_lines(counts));
        }

        let mut output = lines.join("\n");
        output.push('\n');
        output
    }
}

fn count_lines(counts: &BTreeMap<String, u32>) -> impl Iterator<Item = String> + '_ {
    counts
        .iter()
        .map(|(color, count)| format!("\t{color}\t{count}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductCategory;

    fn item(sku: &str, product_type: &str, towel_color: &str, quantity: u32) -> ItemRecord {
        ItemRecord {
            order_id: "112-0000000-0000000".to_string(),
            buyer_name: "Jane Doe".to_string(),
            sku: sku.to_string(),
            product_type: product_type.to_string(),
            towel_color: towel_color.to_string(),
            thread_color: "Navy".to_string(),
            customization_text: "None".to_string(),
            font: "Default".to_string(),
            quantity,
            gift_message: None,
            source_file: "a.pdf".to_string(),
        }
    }

    fn category(code: &str, label: &str, multiplier: f64) -> ProductCategory {
        ProductCategory {
            code: code.to_string(),
            label: label.to_string(),
            multiplier,
        }
    }

    #[test]
    fn loaded_categories_weigh_by_longest_code() {
        let mut catalog = Catalog::default();
        catalog.categories.push(category("Robe", "Bath Robe", 1.5));
        catalog
            .categories
            .push(category("Set-6Pcs-Lux", "Luxury 6-Piece Towel Set", 4.0));
        assert!(catalog.validate().is_ok());

        let summary = summarize(&[item("Robe-White", "Bath Robe", "White", 1)], &catalog);
        assert_eq!(summary.standard_unit_equivalents, 1.5);

        let summary = summarize(
            &[item("Set-6Pcs-Lux-White", "Luxury 6-Piece Towel Set", "White", 1)],
            &catalog,
        );
        assert_eq!(summary.standard_unit_equivalents, 4.0);

        let summary = summarize(
            &[item("Set-6Pcs-White", "6-Piece Towel Set", "White", 1)],
            &catalog,
        );
        assert_eq!(summary.standard_unit_equivalents, 2.0);
    }

    #[test]
    fn decimal_multipliers_sum_identically_in_any_order() {
        let catalog = Catalog {
            categories: vec![
                category("A-1Pcs", "Sample A", 0.1),
                category("B-1Pcs", "Sample B", 0.2),
                category("C-1Pcs", "Sample C", 0.3),
            ],
            thread_color_translations: BTreeMap::new(),
        };
        assert!(catalog.validate().is_ok());

        let items = vec![
            item("A-1Pcs-White", "Sample A", "White", 1),
            item("B-1Pcs-White", "Sample B", "White", 1),
            item("C-1Pcs-White", "Sample C", "White", 1),
        ];
        let forward = summarize(&items, &catalog);
        let mut reversed = items.clone();
        reversed.reverse();
        let backward = summarize(&reversed, &catalog);

        assert_eq!(forward.standard_unit_equivalents, 0.6);
        assert_eq!(forward, backward);
    }

    #[test]
    fn equivalents_weight_sets_and_ignore_order() {
        let catalog = Catalog::default();
        let items = vec![
            item("Set-6Pcs-White", "6-Piece Towel Set", "White", 1),
            item("Set-6Pcs-Gray", "6-Piece Towel Set", "Gray", 1),
            item("Set-3Pcs-White", "3-Piece Towel Set", "White", 2),
        ];

        let forward = summarize(&items, &catalog);
        let mut reversed = items.clone();
        reversed.reverse();
        let backward = summarize(&reversed, &catalog);

        assert_eq!(forward.standard_unit_equivalents, 6.0);
        assert_eq!(forward, backward);
        assert_eq!(forward.towel_color_counts.get("White"), Some(&3));
        assert_eq!(forward.towel_color_counts.get("Gray"), Some(&1));
        assert!(forward.hand_towel_counts.is_empty());
    }

    #[test]
    fn pairs_and_sheets_are_tallied_separately() {
        let catalog = Catalog::default();
        let items = vec![
            item("HT-2Pcs-Blue", "2-Piece Hand Towel", "Blue", 3),
            item("BT-2Pcs-Blue", "2-Piece Bath Towel", "Blue", 2),
            item("BS-1Pcs-Cream", "Bath Sheet", "Cream", 1),
            item("HT-2Pcs-Blue", "2-Piece Hand Towel", "Blue", 1),
        ];

        let summary = summarize(&items, &catalog);
        assert_eq!(summary.standard_unit_equivalents, 0.0);
        assert_eq!(summary.hand_towel_counts.get("Blue"), Some(&4));
        assert_eq!(summary.bath_towel_counts.get("Blue"), Some(&2));
        assert_eq!(summary.bath_sheet_counts.get("Cream"), Some(&1));
        assert_eq!(summary.towel_color_counts.get("Blue"), Some(&6));
        assert_eq!(summary.total_units(), 7);
    }

    #[test]
    fn unknown_categories_count_colors_but_add_no_equivalents() {
        let summary = summarize(
            &[item("Robe-1Pcs-White", "Unknown Product", "White", 2)],
            &Catalog::default(),
        );
        assert_eq!(summary.standard_unit_equivalents, 0.0);
        assert_eq!(summary.towel_color_counts.get("White"), Some(&2));
        assert!(summary.bath_sheet_counts.is_empty());
    }

    #[test]
    fn empty_item_list_yields_empty_summary() {
        let summary = summarize(&[], &Catalog::default());
        assert_eq!(summary, ProductionSummary::default());
        assert!(summary.render_text().contains("(none)"));
    }

    #[test]
    fn render_text_lists_sorted_colors_and_sections() {
        let items = vec![
            item("Set-3Pcs-White", "3-Piece Towel Set", "White", 1),
            item("BS-1Pcs-Beige", "Bath Sheet", "Beige", 2),
        ];
        let text = summarize(&items, &Catalog::default()).render_text();

        let beige = text.find("\tBeige\t2").expect("beige row");
        let white = text.find("\tWhite\t1").expect("white row");
        assert!(beige < white);
        assert!(text.contains("3-piece equivalents: 1.0"));
        assert!(text.contains("Bath sheets"));
        assert!(!text.contains("Hand towels"));
    }
}
