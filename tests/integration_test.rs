//! 集成測試

use chrono::NaiveDate;
use quote_engine::*;
use rstest::rstest;
use rust_decimal::Decimal;

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

fn quote_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
}

/// 單一型材 + 玻璃的固定窗目錄
fn window_catalog() -> CatalogSnapshot {
    let product = Product::new("FX-1".to_string(), "Picture Window".to_string(), ProductType::FixedPanel)
        .with_bom_line(
            BomLineTemplate::new(1, "Head".to_string(), PartType::Extrusion, "IN".to_string())
                .with_part_number("EX-HEAD".to_string())
                .with_formula("width - 4")
                .with_finish_suffix(true),
        );

    CatalogSnapshot::new()
        .with_part(
            MasterPart::new("EX-HEAD".to_string(), "Head".to_string(), PartType::Extrusion)
                .with_stock_length_rule(StockLengthRule::new(1, d(96), d(50))),
        )
        .and_then(|c| c.with_product(product))
        .unwrap()
        .with_glass_type(GlassType::new("Clear".to_string(), d(10)))
}

fn window(name: &str) -> Opening {
    Opening::new(name.to_string())
        .with_finish_color("Black")
        .with_panel(
            Panel::new(d(40), d(60))
                .with_glass_type("Clear")
                .with_component(ComponentInstance::new("FX-1".to_string())),
        )
}

#[test]
fn test_end_to_end_single_opening() {
    let calculator = QuoteCalculator::new(window_catalog(), EngineConfig::new(), QuoteSettings::default());
    let mode = PricingMode::new(1, "Default".to_string()).with_costing_method(CostingMethod::FullStock);

    let result = calculator.calculate(&[window("W1")], &mode, quote_date()).unwrap();

    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.lines.len(), 2);

    let head = &result.lines[0];
    assert_eq!(head.part_type, PartType::Extrusion);
    assert_eq!(head.cut_length, Some(d(36)));
    assert_eq!(head.stock_length, Some(d(96)));
    assert_eq!(head.part_number.as_deref(), Some("EX-HEAD-BL-96"));
    assert_eq!(head.cost, d(50));

    let glass = &result.lines[1];
    assert_eq!(glass.part_type, PartType::Glass);
    assert_eq!(glass.area, Some(Decimal::new(1667, 2)));

    let breakdown = result.breakdown("W1").unwrap();
    assert_eq!(breakdown.costs.extrusion_cost, d(50));
    assert_eq!(breakdown.costs.glass_cost, Decimal::new(16670, 2));
}

#[test]
fn test_markup_inheritance_end_to_end() {
    let calculator = QuoteCalculator::new(window_catalog(), EngineConfig::new(), QuoteSettings::default());
    let mode = PricingMode::new(1, "Retail".to_string())
        .with_markup(d(10))
        .with_category_markup(PartType::Glass, d(50));

    let result = calculator.calculate(&[window("W1")], &mode, quote_date()).unwrap();
    let breakdown = result.breakdown("W1").unwrap();

    // 型材 50 × 1.10 + 玻璃 166.70 × 1.50
    assert_eq!(breakdown.sell_price, Decimal::new(30505, 2));
}

#[test]
fn test_multiple_openings_multiplier_and_tax() {
    let settings = QuoteSettings::default()
        .with_tax_rate(Decimal::new(5, 2))
        .with_installation_cost(d(100));
    let calculator = QuoteCalculator::new(window_catalog(), EngineConfig::new(), settings);
    let mode = PricingMode::new(1, "Default".to_string());

    let openings = vec![window("W2").with_multiplier(d(3)), window("W1")];
    let result = calculator.calculate(&openings, &mode, quote_date()).unwrap();

    let order: Vec<&str> = result.lines.iter().map(|l| l.opening_name.as_str()).collect();
    assert_eq!(order, vec!["W1", "W1", "W2", "W2"]);

    // 單樘 216.70，共 4 樘
    assert_eq!(result.totals.subtotal, Decimal::new(86680, 2));
    assert_eq!(result.totals.adjusted_subtotal, Decimal::new(96680, 2));
    assert_eq!(result.totals.tax_amount, Decimal::new(4834, 2));
    assert_eq!(result.totals.total, Decimal::new(101514, 2));
    assert_eq!(result.totals.valid_until, NaiveDate::from_ymd_opt(2026, 6, 3).unwrap());

    assert_eq!(result.items[0].name, "W2");
    assert_eq!(result.items[0].description, "1 Fixed Panel");
    assert_eq!(result.items[0].price, Decimal::new(65010, 2));
}

#[rstest]
#[case(CostingMethod::FullStock, Decimal::from(30))]
#[case(CostingMethod::PercentageBased, Decimal::new(625, 2))]
fn test_costing_method_from_pricing_mode(#[case] method: CostingMethod, #[case] expected: Decimal) {
    let product = Product::new("P".to_string(), "Sill".to_string(), ProductType::FixedPanel).with_bom_line(
        BomLineTemplate::new(1, "Sill".to_string(), PartType::Extrusion, "IN".to_string())
            .with_part_number("EX-SILL".to_string())
            .with_formula("width - 20"),
    );
    let catalog = CatalogSnapshot::new()
        .with_part(
            MasterPart::new("EX-SILL".to_string(), "Sill".to_string(), PartType::Extrusion)
                .with_stock_length_rule(StockLengthRule::new(1, d(96), d(30))),
        )
        .and_then(|c| c.with_product(product))
        .unwrap();
    let calculator = QuoteCalculator::new(catalog, EngineConfig::new(), QuoteSettings::default());
    let mode = PricingMode::new(1, "M".to_string()).with_costing_method(method);

    let opening = Opening::new("S".to_string())
        .with_panel(Panel::new(d(40), d(80)).with_component(ComponentInstance::new("P".to_string())));
    let result = calculator.calculate(&[opening], &mode, quote_date()).unwrap();

    assert_eq!(result.lines[0].cost.round_dp(6), expected);
}

#[test]
fn test_default_pricing_mode_created_once() {
    let mut registry = PricingModeRegistry::new(vec![
        PricingMode::new(3, "Contractor".to_string()).with_markup(d(15)),
    ]);
    let first_id = registry.ensure_default_pricing_mode().id;
    let second_id = registry.ensure_default_pricing_mode().id;
    assert_eq!(first_id, second_id);
    assert_eq!(registry.modes().len(), 2);

    let calculator = QuoteCalculator::new(window_catalog(), EngineConfig::new(), QuoteSettings::default());
    let result = calculator
        .calculate_with_registry(&[window("W1")], &registry, None, quote_date())
        .unwrap();

    // 預設模式零加成：售價等於成本
    let breakdown = result.breakdown("W1").unwrap();
    assert_eq!(breakdown.sell_price, breakdown.total_cost());
}

#[test]
fn test_catalog_json_with_options_and_cut_list() {
    let json = r#"{
        "parts": [
            {"part_number": "EX-STILE", "base_name": "Stile", "part_type": "Extrusion",
             "cost": null, "is_mill_finish": false,
             "stock_length_rules": [
                {"id": 1, "min_width": null, "max_width": null, "min_height": null,
                 "max_height": null, "stock_length": "96", "base_price": "40", "is_active": true},
                {"id": 2, "min_width": null, "max_width": null, "min_height": "84",
                 "max_height": null, "stock_length": "144", "base_price": "55", "is_active": true}
             ]}
        ],
        "products": [
            {"id": "SW-1", "name": "Swing Door", "product_type": "SWING_DOOR",
             "bom_lines": [
                {"id": 1, "part_number": "EX-STILE", "part_name": "Stile",
                 "part_type": "Extrusion", "formula": "height - 1", "quantity": "2", "unit": "IN",
                 "add_finish_to_part_number": true}
             ],
             "sub_options": [
                {"id": 7, "name": "Handle", "options": [
                    {"id": 70, "name": "Lever", "price": "85", "part_number": "HD-LV"}
                ]}
             ]}
        ],
        "glass_types": []
    }"#;
    let catalog = CatalogSnapshot::from_json(json).unwrap();
    let calculator = QuoteCalculator::new(catalog, EngineConfig::new(), QuoteSettings::default());
    let mode = PricingMode::new(1, "Retail".to_string()).with_markup(d(20));

    let opening = Opening::new("Entry".to_string())
        .with_finish_color("Clear")
        .with_multiplier(d(2))
        .with_panel(
            Panel::new(d(36), d(90)).with_component(
                ComponentInstance::new("SW-1".to_string()).with_selections(r#"{"7": 70}"#),
            ),
        );
    let schedule = calculator.door_schedule(&opening);
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].panel_type, "Swing Door");
    assert_eq!(schedule[0].size, "36\" x 90\"");
    assert_eq!(schedule[0].hardware, "Handle: Lever");

    let result = calculator.calculate(&[opening], &mode, quote_date()).unwrap();

    let stile = &result.lines[0];
    assert_eq!(stile.part_number.as_deref(), Some("EX-STILE-C2-144"));
    assert_eq!(stile.cut_length, Some(d(89)));
    assert_eq!(stile.cost, d(110));

    let breakdown = result.breakdown("Entry").unwrap();
    assert_eq!(breakdown.standard_option_cost, d(85));
    // 110 × 1.2 + 85（選配不加成）
    assert_eq!(breakdown.sell_price, d(217));
    assert_eq!(result.items[0].hardware, "Handle: Lever | +$85");

    // 每樘 2 支 89"，倍數 2 → 4 支 144" 長料各切一刀
    let plan = CutListOptimizer::new().optimize_quote(&result);
    let part = plan.part("EX-STILE-C2-144").unwrap();
    assert_eq!(part.sticks_needed(), 4);
    assert!(part.oversize_cuts.is_empty());
}
