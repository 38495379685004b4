//! 報價單總計

use chrono::{Days, NaiveDate};
use quote_core::{OpeningCostBreakdown, QuoteSettings};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 報價單總計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteTotals {
    /// 報價單ID
    pub quote_id: Uuid,

    /// 報價日期
    pub quote_date: NaiveDate,

    /// 有效期限
    pub valid_until: NaiveDate,

    /// 各開口售價 × 倍數之和（已含加成與折扣）
    pub subtotal: Decimal,

    /// 加成金額（顯示用）
    pub markup_amount: Decimal,

    /// 折扣金額（顯示用）
    pub discount_amount: Decimal,

    /// 安裝費
    pub installation_cost: Decimal,

    /// 小計 + 安裝費
    pub adjusted_subtotal: Decimal,

    /// 稅額
    pub tax_amount: Decimal,

    /// 總計
    pub total: Decimal,
}

impl QuoteTotals {
    /// 由開口明細彙總報價單
    pub fn from_breakdowns(
        breakdowns: &[OpeningCostBreakdown],
        settings: &QuoteSettings,
        quote_date: NaiveDate,
    ) -> Self {
        let mut subtotal = Decimal::ZERO;
        let mut markup_amount = Decimal::ZERO;
        let mut discount_amount = Decimal::ZERO;

        for breakdown in breakdowns {
            let multiplier = breakdown.multiplier;
            subtotal = subtotal.saturating_add(scale(breakdown.sell_price, multiplier));
            markup_amount = markup_amount.saturating_add(scale(breakdown.markup_amount, multiplier));
            discount_amount =
                discount_amount.saturating_add(scale(breakdown.discount_amount, multiplier));
        }

        let subtotal = money(subtotal);
        let installation_cost = money(settings.installation_cost.max(Decimal::ZERO));
        let adjusted_subtotal = subtotal.saturating_add(installation_cost);
        let tax_amount = money(adjusted_subtotal.saturating_mul(settings.tax_rate.max(Decimal::ZERO)));

        let valid_until = quote_date
            .checked_add_days(Days::new(u64::from(settings.validity_days)))
            .unwrap_or(quote_date);

        Self {
            quote_id: Uuid::new_v4(),
            quote_date,
            valid_until,
            subtotal,
            markup_amount: money(markup_amount),
            discount_amount: money(discount_amount),
            installation_cost,
            adjusted_subtotal,
            tax_amount,
            total: adjusted_subtotal.saturating_add(tax_amount),
        }
    }
}

fn scale(amount: Decimal, multiplier: Decimal) -> Decimal {
    amount.saturating_mul(multiplier)
}

/// 金額四捨五入至分
pub fn money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
