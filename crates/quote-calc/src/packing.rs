//! 包裝清單

use quote_core::{PartType, PricedBomLine};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 包裝清單項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingListItem {
    /// 零件編號（無編號時為零件名稱）
    pub key: String,
    pub part_name: String,
    pub part_type: PartType,
    pub quantity: Decimal,
    pub unit: String,
}

/// 彙總標記為列入包裝清單的 BOM 行
///
/// 依零件編號（無編號時用名稱）與單位合併，保留首次出現的順序。
pub fn packing_list<'a, I>(lines: I) -> Vec<PackingListItem>
where
    I: IntoIterator<Item = &'a PricedBomLine>,
{
    let mut items: Vec<PackingListItem> = Vec::new();

    for line in lines.into_iter().filter(|l| l.add_to_packing_list) {
        let key = line
            .part_number
            .clone()
            .unwrap_or_else(|| line.part_name.clone());

        match items
            .iter_mut()
            .find(|item| item.key == key && item.unit == line.unit)
        {
            Some(item) => item.quantity = item.quantity.saturating_add(line.quantity),
            None => items.push(PackingListItem {
                key,
                part_name: line.part_name.clone(),
                part_type: line.part_type,
                quantity: line.quantity,
                unit: line.unit.clone(),
            }),
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn line(part_number: Option<&str>, name: &str, qty: i64, unit: &str, pack: bool) -> PricedBomLine {
        PricedBomLine {
            opening_id: Uuid::nil(),
            opening_name: "A".to_string(),
            panel_id: Uuid::nil(),
            product_name: "P".to_string(),
            template_id: Some(1),
            part_number: part_number.map(str::to_string),
            part_name: name.to_string(),
            part_type: PartType::Hardware,
            quantity: Decimal::from(qty),
            cut_length: None,
            stock_length: None,
            area: None,
            unit: unit.to_string(),
            description: String::new(),
            cost: Decimal::ZERO,
            costing_method: None,
            add_to_packing_list: pack,
            is_standard_option: false,
        }
    }

    #[test]
    fn test_packing_list_aggregates_by_part_and_unit() {
        let lines = vec![
            line(Some("HW-1"), "Hinge", 3, "EA", true),
            line(Some("HW-2"), "Screw", 10, "EA", false),
            line(None, "Shim Pack", 1, "BOX", true),
            line(Some("HW-1"), "Hinge", 2, "EA", true),
            line(Some("HW-1"), "Hinge", 1, "PR", true),
        ];

        let items = packing_list(&lines);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].key, "HW-1");
        assert_eq!(items[0].quantity, Decimal::from(5));
        assert_eq!(items[1].key, "Shim Pack");
        assert_eq!(items[2].unit, "PR");
    }
}
