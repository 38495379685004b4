//! 型材下料示例

use anyhow::{Context, Result};
use chrono::NaiveDate;
use quote_engine::*;
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    println!("=== 型材下料示例 ===\n");

    let product = Product::new("SLIDER".to_string(), "Sliding Door".to_string(), ProductType::SlidingDoor)
        .with_bom_line(
            BomLineTemplate::new(1, "Jamb".to_string(), PartType::Extrusion, "IN".to_string())
                .with_part_number("AL-7100".to_string())
                .with_formula("height - 1.25")
                .with_quantity(Decimal::from(2))
                .with_finish_suffix(true),
        )
        .with_bom_line(
            BomLineTemplate::new(2, "Head".to_string(), PartType::Extrusion, "IN".to_string())
                .with_part_number("AL-7200".to_string())
                .with_formula("width - 0.75")
                .with_finish_suffix(true),
        );

    let catalog = CatalogSnapshot::new()
        .with_part(
            MasterPart::new("AL-7100".to_string(), "Jamb".to_string(), PartType::Extrusion)
                .with_stock_length_rule(StockLengthRule::new(1, Decimal::from(192), Decimal::from(88))),
        )?
        .with_part(
            MasterPart::new("AL-7200".to_string(), "Head".to_string(), PartType::Extrusion)
                .with_stock_length_rule(StockLengthRule::new(1, Decimal::from(144), Decimal::from(61))),
        )?
        .with_product(product)?;

    let openings: Vec<Opening> = [(72, 80, 3), (96, 82, 2), (60, 80, 1)]
        .iter()
        .enumerate()
        .map(|(i, (w, h, multiplier))| {
            Opening::new(format!("D{}", i + 1))
                .with_finish_color("Clear")
                .with_multiplier(Decimal::from(*multiplier))
                .with_panel(
                    Panel::new(Decimal::from(*w), Decimal::from(*h))
                        .with_component(ComponentInstance::new("SLIDER".to_string())),
                )
        })
        .collect();

    let calculator = QuoteCalculator::new(catalog, EngineConfig::new(), QuoteSettings::default());
    let mode = PricingMode::new(1, "Default".to_string()).with_default(true);
    let quote_date = NaiveDate::from_ymd_opt(2026, 10, 16).context("無效日期")?;
    let result = calculator.calculate(&openings, &mode, quote_date)?;

    let optimizer = CutListOptimizer::new().with_kerf(Decimal::new(125, 3))?;
    let plan = optimizer.optimize_quote(&result);

    for part in &plan.parts {
        println!(
            "{}（長料 {}\"）：{} 支，廢料 {}\"，利用率 {}%",
            part.part_number,
            part.stock_length,
            part.sticks_needed(),
            part.waste().normalize(),
            (part.utilization() * Decimal::ONE_HUNDRED).round_dp(1)
        );
        for (i, bar) in part.bars.iter().enumerate() {
            let cuts: Vec<String> = bar.cuts.iter().map(|c| c.normalize().to_string()).collect();
            println!("  #{:<2} {}  剩 {}", i + 1, cuts.join(" + "), bar.remaining.normalize());
        }
        for cut in &part.oversize_cuts {
            println!("  ! 切料 {} 超過長料長度", cut);
        }
    }

    println!("\n合計長料 {} 支，總廢料 {}\"", plan.total_sticks(), plan.total_waste().normalize());

    Ok(())
}
