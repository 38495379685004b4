//! 報價單摘要項目（每開口一項）

use quote_catalog::CatalogSnapshot;
use quote_core::{
    ComponentInstance, EngineConfig, Opening, OpeningCostBreakdown, Product, ProductType,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 報價單摘要項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub opening_id: Uuid,
    pub name: String,

    /// 例如 "2 Swing Doors, 1 Fixed Panel"
    pub description: String,

    /// 例如 "72\" W × 96\" H"
    pub dimensions: String,

    pub color: String,

    /// 五金選配說明
    pub hardware: String,

    /// 五金選配總價
    pub hardware_price: Decimal,

    /// 玻璃類型（逗號分隔）
    pub glass_type: String,

    /// 售價 × 倍數
    pub price: Decimal,
}

impl QuoteItem {
    /// 由開口與其成本明細建立摘要項目
    pub fn build(
        opening: &Opening,
        breakdown: Option<&OpeningCostBreakdown>,
        catalog: &CatalogSnapshot,
        config: &EngineConfig,
    ) -> Self {
        let mut type_counts: Vec<(ProductType, usize)> = Vec::new();
        let mut hardware_items: Vec<(String, Decimal)> = Vec::new();
        let mut glass_types: Vec<String> = Vec::new();

        for panel in &opening.panels {
            if let Some(glass) = panel.glass_type.as_deref().map(str::trim) {
                if !config.skips_glass(glass) && !glass_types.iter().any(|g| g == glass) {
                    glass_types.push(glass.to_string());
                }
            }

            let Some(component) = &panel.component else {
                continue;
            };
            let Some(product) = catalog.product(&component.product_id) else {
                continue;
            };

            match type_counts.iter_mut().find(|(t, _)| *t == product.product_type) {
                Some((_, count)) => *count += 1,
                None => type_counts.push((product.product_type, 1)),
            }

            hardware_items.extend(hardware_selections(product, component));
        }

        let description = describe(&type_counts);
        let hardware = if hardware_items.is_empty() {
            "Standard Hardware".to_string()
        } else {
            hardware_items
                .iter()
                .map(|(name, price)| format!("{} | +${}", name, whole_dollars(*price)))
                .collect::<Vec<_>>()
                .join(" • ")
        };

        Self {
            opening_id: opening.id,
            name: opening.name.clone(),
            description,
            dimensions: format!(
                "{}\" W × {}\" H",
                opening.total_width().normalize(),
                opening.max_height().normalize()
            ),
            color: opening
                .finish_color
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "Standard".to_string()),
            hardware,
            hardware_price: hardware_items
                .iter()
                .fold(Decimal::ZERO, |total, (_, price)| total.saturating_add(*price)),
            glass_type: if glass_types.is_empty() {
                "Clear".to_string()
            } else {
                glass_types.join(", ")
            },
            price: breakdown.map_or(Decimal::ZERO, OpeningCostBreakdown::extended_price),
        }
    }
}

/// 門窗表（每面板一列）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorScheduleRow {
    /// 項次（從 1 起）
    pub item: usize,

    /// 產品類型，無元件時為 "Panel"
    pub panel_type: String,

    /// 例如 "36\" x 96\""
    pub size: String,

    pub glass: String,

    /// 五金選配，逗號分隔；無選配時為 "Standard"
    pub hardware: String,
}

/// 建立開口的門窗表
pub fn door_schedule(opening: &Opening, catalog: &CatalogSnapshot) -> Vec<DoorScheduleRow> {
    opening
        .panels
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            let product = panel
                .component
                .as_ref()
                .and_then(|c| catalog.product(&c.product_id).map(|p| (p, c)));

            let hardware: Vec<String> = product
                .map(|(product, component)| {
                    hardware_selections(product, component)
                        .into_iter()
                        .map(|(name, _)| name)
                        .collect()
                })
                .unwrap_or_default();

            DoorScheduleRow {
                item: i + 1,
                panel_type: product
                    .map_or("Panel", |(p, _)| p.product_type.display_name())
                    .to_string(),
                size: format!(
                    "{}\" x {}\"",
                    panel.width.normalize(),
                    panel.height.normalize()
                ),
                glass: panel
                    .glass_type
                    .as_deref()
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .unwrap_or("Clear")
                    .to_string(),
                hardware: if hardware.is_empty() {
                    "Standard".to_string()
                } else {
                    hardware.join(", ")
                },
            }
        })
        .collect()
}

/// 五金類選配（"類別: 選項" 與價格）；選配解析失敗時略過
fn hardware_selections(product: &Product, component: &ComponentInstance) -> Vec<(String, Decimal)> {
    let selections = component.parse_selections().unwrap_or_default();
    selections
        .into_iter()
        .filter_map(|(category_id, option_id)| {
            let category = product
                .sub_option(category_id)
                .filter(|c| c.is_hardware_category())?;
            let option = category.option(option_id)?;
            Some((format!("{}: {}", category.name, option.name), option.price))
        })
        .collect()
}

fn describe(type_counts: &[(ProductType, usize)]) -> String {
    if type_counts.is_empty() {
        return "Custom Opening".to_string();
    }
    type_counts
        .iter()
        .map(|(product_type, count)| {
            let plural = if *count > 1 { "s" } else { "" };
            format!("{} {}{}", count, product_type.display_name(), plural)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// 整數金額加千分位，例如 1234.5 → "1,235"
fn whole_dollars(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_core::{ComponentInstance, IndividualOption, Panel, Product, SubOptionCategory};
    use rstest::rstest;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn catalog() -> CatalogSnapshot {
        let swing = Product::new("SW".to_string(), "Swing".to_string(), ProductType::SwingDoor)
            .with_sub_option(SubOptionCategory {
                id: 1,
                name: "Lock Set".to_string(),
                options: vec![IndividualOption {
                    id: 11,
                    name: "Deadbolt".to_string(),
                    price: Decimal::new(123450, 2),
                    part_number: None,
                }],
            })
            .with_sub_option(SubOptionCategory {
                id: 2,
                name: "Screen".to_string(),
                options: vec![IndividualOption {
                    id: 21,
                    name: "Retractable".to_string(),
                    price: d(80),
                    part_number: None,
                }],
            });
        let fixed = Product::new("FX".to_string(), "Fixed".to_string(), ProductType::FixedPanel);

        CatalogSnapshot::new()
            .with_product(swing)
            .and_then(|c| c.with_product(fixed))
            .unwrap()
    }

    #[test]
    fn test_quote_item_summary() {
        let opening = Opening::new("Front".to_string())
            .with_finish_color("Black")
            .with_panel(
                Panel::new(d(36), d(96))
                    .with_glass_type("Low-E")
                    .with_component(
                        ComponentInstance::new("SW".to_string())
                            .with_selections(r#"{"1": 11, "2": 21}"#),
                    ),
            )
            .with_panel(
                Panel::new(d(36), d(96))
                    .with_glass_type("Low-E")
                    .with_component(ComponentInstance::new("SW".to_string())),
            )
            .with_panel(
                Panel::new(Decimal::new(245, 1), d(80))
                    .with_glass_type("N/A")
                    .with_component(ComponentInstance::new("FX".to_string())),
            );

        let item = QuoteItem::build(&opening, None, &catalog(), &EngineConfig::new());

        assert_eq!(item.description, "2 Swing Doors, 1 Fixed Panel");
        assert_eq!(item.dimensions, "96.5\" W × 96\" H");
        assert_eq!(item.color, "Black");
        assert_eq!(item.hardware, "Lock Set: Deadbolt | +$1,235");
        assert_eq!(item.hardware_price, Decimal::new(123450, 2));
        assert_eq!(item.glass_type, "Low-E");
        assert_eq!(item.price, Decimal::ZERO);
    }

    #[test]
    fn test_quote_item_defaults() {
        let opening = Opening::new("Empty".to_string()).with_panel(Panel::new(d(30), d(40)));
        let item = QuoteItem::build(&opening, None, &catalog(), &EngineConfig::new());

        assert_eq!(item.description, "Custom Opening");
        assert_eq!(item.color, "Standard");
        assert_eq!(item.hardware, "Standard Hardware");
        assert_eq!(item.glass_type, "Clear");
    }

    #[test]
    fn test_door_schedule_rows() {
        let opening = Opening::new("Front".to_string())
            .with_panel(
                Panel::new(d(36), d(96))
                    .with_glass_type("Low-E")
                    .with_component(
                        ComponentInstance::new("SW".to_string())
                            .with_selections(r#"{"1": 11, "2": 21}"#),
                    ),
            )
            .with_panel(
                Panel::new(Decimal::new(245, 1), d(80)).with_component(ComponentInstance::new("FX".to_string())),
            )
            .with_panel(Panel::new(d(12), d(80)));

        let rows = door_schedule(&opening, &catalog());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].item, 1);
        assert_eq!(rows[0].panel_type, "Swing Door");
        assert_eq!(rows[0].size, "36\" x 96\"");
        assert_eq!(rows[0].glass, "Low-E");
        assert_eq!(rows[0].hardware, "Lock Set: Deadbolt");

        assert_eq!(rows[1].panel_type, "Fixed Panel");
        assert_eq!(rows[1].size, "24.5\" x 80\"");
        assert_eq!(rows[1].glass, "Clear");
        assert_eq!(rows[1].hardware, "Standard");

        assert_eq!(rows[2].item, 3);
        assert_eq!(rows[2].panel_type, "Panel");
    }

    #[rstest]
    #[case(Decimal::new(0, 0), "0")]
    #[case(Decimal::new(999, 0), "999")]
    #[case(Decimal::new(1000, 0), "1,000")]
    #[case(Decimal::new(12345675, 1), "1,234,568")]
    #[case(Decimal::new(-2500, 0), "-2,500")]
    fn test_whole_dollars(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(whole_dollars(amount), expected);
    }
}
