use serde::Serialize;

use crate::catalog::Catalog;
use crate::model::ItemRecord;
use crate::util::truncate_chars;

pub(super) const CSV_COLUMNS: [&str; 9] = [
    "order_id",
    "buyer_name",
    "product_type",
    "towel_color",
    "thread_color",
    "customization_text",
    "font",
    "quantity",
    "gift_message",
];

const LABEL_BUYER_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, Serialize)]
pub(super) struct ManufacturingLabel {
    pub order_id: String,
    pub buyer_name: String,
    pub product: String,
    pub thread_color: String,
    pub customization_text: String,
    pub font: String,
    pub quantity: u32,
    pub source_file: String,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct GiftLabel {
    pub order_id: String,
    pub buyer_name: String,
    pub gift_message: String,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct LabelPayloads {
    pub manufacturing: Vec<ManufacturingLabel>,
    pub gift: Vec<GiftLabel>,
}

pub(super) fn items_to_csv(items: &[ItemRecord]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(CSV_COLUMNS.join(","));

    for item in items {
        let quantity = item.quantity.to_string();
        let row = [
            item.order_id.as_str(),
            item.buyer_name.as_str(),
            item.product_type.as_str(),
            item.towel_color.as_str(),
            item.thread_color.as_str(),
            item.customization_text.as_str(),
            item.font.as_str(),
            quantity.as_str(),
            item.gift_message.as_deref().unwrap_or(""),
        ];
        lines.push(
            row.iter()
                .map(|cell| escape_csv_cell(cell))
                .collect::<Vec<String>>()
                .join(","),
        );
    }

    let mut csv = lines.join("\n");
    csv.push('\n');
    csv
}

fn escape_csv_cell(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub(super) fn gift_message_items(items: &[ItemRecord]) -> Vec<ItemRecord> {
    items
        .iter()
        .filter(|item| item.gift_message.is_some())
        .cloned()
        .collect()
}

pub(super) fn label_payloads(items: &[ItemRecord], catalog: &Catalog) -> LabelPayloads {
    let manufacturing = items
        .iter()
        .map(|item| ManufacturingLabel {
            order_id: item.order_id.clone(),
            buyer_name: truncate_chars(&item.buyer_name, LABEL_BUYER_MAX_CHARS).to_string(),
            product: format!("{} - {}", item.product_type, item.towel_color),
            thread_color: format!(
                "{} ({})",
                catalog.translate_thread_color(&item.thread_color),
                item.thread_color
            ),
            customization_text: item.customization_text.clone(),
            font: item.font.clone(),
            quantity: item.quantity,
            source_file: item.source_file.clone(),
        })
        .collect();

    let gift = items
        .iter()
        .filter_map(|item| {
            let gift_message = item.gift_message.as_ref()?;
            Some(GiftLabel {
                order_id: item.order_id.clone(),
                buyer_name: item.buyer_name.clone(),
                gift_message: gift_message.clone(),
            })
        })
        .collect();

    LabelPayloads {
        manufacturing,
        gift,
    }
}
