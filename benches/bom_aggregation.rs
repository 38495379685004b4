//! BOM 彙總效能測試

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quote_engine::*;
use rust_decimal::Decimal;

fn catalog() -> CatalogSnapshot {
    let mut product = Product::new("SL-2".to_string(), "Slider".to_string(), ProductType::SlidingDoor);
    let mut catalog = CatalogSnapshot::new();

    for i in 0..12 {
        let pn = format!("EX-{:03}", i);
        let part = MasterPart::new(pn.clone(), format!("Profile {}", i), PartType::Extrusion)
            .with_stock_length_rule(StockLengthRule::new(1, Decimal::from(96), Decimal::from(40)))
            .with_stock_length_rule(
                StockLengthRule::new(2, Decimal::from(144), Decimal::from(58))
                    .with_height_range(Some(Decimal::from(84)), None),
            );
        if catalog.insert_part(part).is_err() {
            continue;
        }
        product = product.with_bom_line(
            BomLineTemplate::new(i, format!("Profile {}", i), PartType::Extrusion, "IN".to_string())
                .with_part_number(pn)
                .with_formula(if i % 2 == 0 { "width - 3.5" } else { "(height - 2) / 2 + 0.25" })
                .with_finish_suffix(true),
        );
    }
    product = product.with_bom_line(
        BomLineTemplate::new(100, "Roller".to_string(), PartType::Hardware, "EA".to_string())
            .with_cost(Decimal::new(1250, 2))
            .with_quantity(Decimal::from(4)),
    );

    let _ = catalog.insert_product(product);
    catalog.with_glass_type(GlassType::new("Low-E".to_string(), Decimal::new(1475, 2)))
}

fn openings(count: usize) -> Vec<Opening> {
    (0..count)
        .map(|i| {
            let mut opening = Opening::new(format!("O-{:04}", i)).with_finish_color("Black");
            for _ in 0..3 {
                opening = opening.with_panel(
                    Panel::new(Decimal::from(36 + (i % 12) as i64), Decimal::from(80 + (i % 20) as i64))
                        .with_glass_type("Low-E")
                        .with_component(ComponentInstance::new("SL-2".to_string())),
                );
            }
            opening
        })
        .collect()
}

fn bench_quote(c: &mut Criterion) {
    let mode = PricingMode::new(1, "Retail".to_string())
        .with_markup(Decimal::from(35))
        .with_costing_method(CostingMethod::PercentageBased);
    let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default();

    let mut group = c.benchmark_group("quote_calculation");
    for count in [10usize, 100, 500] {
        let input = openings(count);
        for parallel in [false, true] {
            let calculator = QuoteCalculator::new(
                catalog(),
                EngineConfig::new().with_parallel(parallel),
                QuoteSettings::default(),
            );
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, count), &input, |b, input| {
                b.iter(|| calculator.calculate(black_box(input), &mode, date))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_quote);
criterion_main!(benches);
