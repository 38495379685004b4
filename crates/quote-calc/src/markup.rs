//! 計價模式加成引擎

use quote_core::{CategoryCosts, OpeningCostBreakdown, PartType, PricingMode};
use rust_decimal::Decimal;

use crate::aggregator::OpeningBom;
use crate::QuoteWarning;

const PART_TYPES: [PartType; 4] = [
    PartType::Extrusion,
    PartType::Hardware,
    PartType::Glass,
    PartType::Other,
];

/// 單一開口的售價計算結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningPrice {
    /// 單樘售價
    pub sell_price: Decimal,

    /// 加成金額（顯示用）
    pub markup_amount: Decimal,

    /// 折扣金額（顯示用）
    pub discount_amount: Decimal,

    /// 計算溢位，金額已飽和於 Decimal::MAX
    pub saturated: bool,
}

/// 加成引擎
pub struct MarkupEngine;

impl MarkupEngine {
    /// 有效加成百分比
    ///
    /// 類別加成為 0 時沿用全域加成，不代表零加成。
    pub fn effective_markup(mode: &PricingMode, part_type: PartType) -> Decimal {
        let category = mode.category_markup(part_type);
        if category > Decimal::ZERO {
            category
        } else {
            mode.markup
        }
    }

    /// 計算開口售價
    ///
    /// 標準選配與混合計價剩餘成本不套用加成與折扣，直接計入售價。
    pub fn price_opening(
        costs: &CategoryCosts,
        standard_option_cost: Decimal,
        hybrid_remaining_cost: Decimal,
        mode: &PricingMode,
    ) -> OpeningPrice {
        let mut saturated = false;
        let mut saturate = |value: Option<Decimal>| {
            value.unwrap_or_else(|| {
                saturated = true;
                Decimal::MAX
            })
        };

        let mut markup_amount = Decimal::ZERO;
        let mut discount_amount = Decimal::ZERO;
        let mut marked_total = Decimal::ZERO;

        for part_type in PART_TYPES {
            let cost = costs.get(part_type);
            if cost.is_zero() {
                continue;
            }

            let markup = saturate(percent_of(cost, Self::effective_markup(mode, part_type)));
            let marked = saturate(cost.checked_add(markup));
            let discount = if mode.discount > Decimal::ZERO {
                saturate(percent_of(marked, mode.discount))
            } else {
                Decimal::ZERO
            };

            markup_amount = saturate(markup_amount.checked_add(markup));
            discount_amount = saturate(discount_amount.checked_add(discount));
            marked_total = saturate(
                marked
                    .checked_sub(discount)
                    .and_then(|net| marked_total.checked_add(net)),
            );
        }

        let sell_price = saturate(
            marked_total
                .checked_add(standard_option_cost)
                .and_then(|v| v.checked_add(hybrid_remaining_cost)),
        );

        OpeningPrice {
            sell_price,
            markup_amount,
            discount_amount,
            saturated,
        }
    }

    /// 由開口 BOM 產生成本與售價明細；售價溢位時附加錯誤警告
    pub fn breakdown(
        bom: &OpeningBom,
        mode: &PricingMode,
        warnings: &mut Vec<QuoteWarning>,
    ) -> OpeningCostBreakdown {
        let costs = bom.category_costs();
        let standard_option_cost = bom.standard_option_cost();
        let hybrid_remaining_cost = Decimal::ZERO;
        let price = Self::price_opening(&costs, standard_option_cost, hybrid_remaining_cost, mode);

        if price.saturated {
            let message = format!("計價模式 {} 售價計算溢位，金額以上限計", mode.name);
            tracing::warn!("[{}] {}", bom.opening_name, message);
            warnings.push(QuoteWarning::error(
                bom.opening_name.clone(),
                mode.name.clone(),
                message,
            ));
        }

        tracing::debug!(
            "[{}] 成本 {} 加成 {} 折扣 {} 售價 {}",
            bom.opening_name,
            costs.total(),
            price.markup_amount,
            price.discount_amount,
            price.sell_price
        );

        OpeningCostBreakdown {
            opening_id: bom.opening_id,
            opening_name: bom.opening_name.clone(),
            costs,
            standard_option_cost,
            hybrid_remaining_cost,
            markup_amount: price.markup_amount,
            discount_amount: price.discount_amount,
            sell_price: price.sell_price,
            multiplier: bom.multiplier,
        }
    }
}

/// amount × percent / 100；乘積溢位時先除後乘
fn percent_of(amount: Decimal, percent: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(percent)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .or_else(|| {
            amount
                .checked_div(Decimal::ONE_HUNDRED)
                .and_then(|v| v.checked_mul(percent))
        })
}
