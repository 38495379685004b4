//! 門窗報價示例
//!
//! 執行：`RUST_LOG=debug cargo run --example door_quote`

use anyhow::{Context, Result};
use chrono::NaiveDate;
use quote_engine::*;
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

const CATALOG_JSON: &str = r#"{
    "parts": [
        {"part_number": "AL-4500", "base_name": "Door Stile", "part_type": "Extrusion",
         "cost": null, "is_mill_finish": false,
         "stock_length_rules": [
            {"id": 1, "min_width": null, "max_width": null, "min_height": null,
             "max_height": "84", "stock_length": "96", "base_price": "48", "is_active": true},
            {"id": 2, "min_width": null, "max_width": null, "min_height": "84",
             "max_height": null, "stock_length": "144", "base_price": "67.5", "is_active": true}
         ]},
        {"part_number": "AL-4510", "base_name": "Door Rail", "part_type": "Extrusion",
         "cost": null, "is_mill_finish": false, "costing_method": "PERCENTAGE_BASED",
         "stock_length_rules": [
            {"id": 3, "min_width": null, "max_width": null, "min_height": null,
             "max_height": null, "stock_length": "144", "base_price": "52", "is_active": true}
         ]},
        {"part_number": "HW-HG3", "base_name": "Butt Hinge", "part_type": "Hardware",
         "cost": "11.40", "is_mill_finish": true,
         "pricing_rules": [{"id": 1, "name": "Contract", "base_price": "9.80", "is_active": true}]}
    ],
    "products": [
        {"id": "SWING-36", "name": "Swing Door", "product_type": "SWING_DOOR",
         "bom_lines": [
            {"id": 1, "part_number": "AL-4500", "part_name": "Stile", "part_type": "Extrusion",
             "formula": "height - 0.5", "quantity": "2", "unit": "IN",
             "add_finish_to_part_number": true},
            {"id": 2, "part_number": "AL-4510", "part_name": "Rail", "part_type": "Extrusion",
             "formula": "width - 7.25", "quantity": "2", "unit": "IN",
             "add_finish_to_part_number": true},
            {"id": 3, "part_number": "HW-HG3", "part_name": "Hinge", "part_type": "Hardware",
             "unit": "EA", "quantity": "3",
             "quantity_policy": {"mode": "RANGED", "min": "3", "max": "4"},
             "add_to_packing_list": true},
            {"id": 4, "part_name": "Weatherstrip", "part_type": "Other",
             "formula": "(width + height) * 2 * 0.12", "unit": "FT"}
         ],
         "glass_offsets": {"width_formula": "-6.5", "height_formula": "-7"},
         "sub_options": [
            {"id": 1, "name": "Lock Hardware", "options": [
                {"id": 11, "name": "Keyed Deadbolt", "price": "145", "part_number": "LK-DB"},
                {"id": 12, "name": "Multi-Point Lock", "price": "385", "part_number": "LK-MP"}
            ]}
         ]},
        {"id": "FIXED", "name": "Fixed Lite", "product_type": "FIXED_PANEL",
         "bom_lines": [
            {"id": 1, "part_number": "AL-4510", "part_name": "Frame", "part_type": "Extrusion",
             "formula": "width - 1", "quantity": "2", "unit": "IN",
             "add_finish_to_part_number": true}
         ],
         "glass_offsets": {"width_formula": "-2", "height_formula": "-2"}}
    ],
    "glass_types": [
        {"name": "Clear", "price_per_sq_ft": "9.25"},
        {"name": "Low-E", "price_per_sq_ft": "14.75"}
    ]
}"#;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();
}

fn main() -> Result<()> {
    init_logging();

    println!("=== 門窗報價示例 ===\n");

    let catalog = CatalogSnapshot::from_json(CATALOG_JSON).context("目錄載入失敗")?;
    for (product, part) in catalog.dangling_part_references() {
        println!("  ! 產品 {} 引用不存在的零件 {}", product, part);
    }

    let mut registry = PricingModeRegistry::new(vec![PricingMode::new(1, "Contractor".to_string())
        .with_markup(Decimal::from(35))
        .with_category_markup(PartType::Glass, Decimal::from(20))
        .with_discount(Decimal::from(5))]);
    let default_mode = registry.ensure_default_pricing_mode().name.clone();
    println!("預設計價模式: {}", default_mode);

    let entry = Opening::new("Entry".to_string())
        .with_finish_color("Black")
        .with_rough_size(Decimal::from(74), Decimal::from(98))
        .with_panel(
            Panel::new(Decimal::from(36), Decimal::from(96))
                .with_glass_type("Low-E")
                .with_component(
                    ComponentInstance::new("SWING-36".to_string())
                        .with_selections(r#"{"1": 12}"#)
                        .with_quantity_choice(3, Decimal::from(4)),
                ),
        )
        .with_panel(
            Panel::new(Decimal::from(36), Decimal::from(96))
                .with_glass_type("Low-E")
                .with_component(ComponentInstance::new("FIXED".to_string())),
        );

    let side = Opening::new("Side Lite".to_string())
        .with_finish_color("Clear")
        .with_multiplier(Decimal::from(2))
        .with_panel(
            Panel::new(Decimal::from(18), Decimal::from(80))
                .with_glass_type("Clear")
                .with_component(ComponentInstance::new("FIXED".to_string())),
        );

    let settings = QuoteSettings::default()
        .with_tax_rate(Decimal::new(825, 4))
        .with_installation_cost(Decimal::from(650));
    let calculator = QuoteCalculator::new(catalog, EngineConfig::new(), settings);

    println!("\n門窗表（{}）:", entry.name);
    for row in calculator.door_schedule(&entry) {
        println!(
            "  {:>2} | {:<12} | {:<14} | {:<6} | {}",
            row.item, row.panel_type, row.size, row.glass, row.hardware
        );
    }

    let quote_date = NaiveDate::from_ymd_opt(2026, 10, 16).context("無效日期")?;
    let result = calculator.calculate_with_registry(&[entry, side], &registry, Some(1), quote_date)?;
    tracing::info!("報價完成：{} 行 BOM，{} 筆警告", result.lines.len(), result.warnings.len());

    println!("\nBOM:");
    for line in &result.lines {
        println!(
            "  [{}] {:<10} {:<22} {:<20} 數量 {:>4} 切料 {:>7} 成本 {:>9}",
            line.opening_name,
            line.part_type.as_str(),
            line.part_number.as_deref().unwrap_or("-"),
            line.part_name,
            line.quantity,
            line.cut_length.map(|c| c.normalize().to_string()).unwrap_or_default(),
            line.cost.round_dp(2)
        );
    }

    println!("\n開口明細:");
    for breakdown in &result.breakdowns {
        println!(
            "  {}: 成本 {} 加成 {} 折扣 {} 售價 {} × {}",
            breakdown.opening_name,
            breakdown.total_cost().round_dp(2),
            breakdown.markup_amount.round_dp(2),
            breakdown.discount_amount.round_dp(2),
            breakdown.sell_price.round_dp(2),
            breakdown.multiplier
        );
    }

    println!("\n報價項目:");
    for item in &result.items {
        println!(
            "  {} | {} | {} | {} | {} | {}",
            item.name, item.description, item.dimensions, item.color, item.hardware, item.glass_type
        );
    }

    println!("\n包裝清單:");
    for item in result.packing_list() {
        println!("  {} × {} {}", item.key, item.quantity, item.unit);
    }

    let totals = &result.totals;
    println!("\n報價單 {}（{} 至 {}）", totals.quote_id, totals.quote_date, totals.valid_until);
    println!("  小計:   {}", totals.subtotal);
    println!("  安裝費: {}", totals.installation_cost);
    println!("  稅額:   {}", totals.tax_amount);
    println!("  總計:   {}", totals.total);

    println!("\nJSON:\n{}", serde_json::to_string_pretty(totals)?);

    for warning in &result.warnings {
        println!(
            "  ! {:?} [{}] {}: {}",
            warning.severity, warning.opening_name, warning.subject, warning.message
        );
    }

    Ok(())
}
