//! 長料規則選擇

use quote_core::StockLengthRule;
use rust_decimal::Decimal;

/// 長料規則選擇器
pub struct StockRuleSelector;

impl StockRuleSelector {
    /// 選出最適用的長料規則
    ///
    /// - 只考慮啟用中、且寬高都落在範圍內的規則（None 邊界視為不限）
    /// - 設定邊界越多（越具體）者優先
    /// - 具體程度相同時，以輸入順序中較早者為準
    pub fn select_best(
        rules: &[StockLengthRule],
        width: Decimal,
        height: Decimal,
    ) -> Option<&StockLengthRule> {
        let mut best: Option<&StockLengthRule> = None;

        for rule in rules
            .iter()
            .filter(|r| r.is_active && r.covers(width, height))
        {
            match best {
                Some(current) if current.specificity() >= rule.specificity() => {}
                _ => best = Some(rule),
            }
        }

        if let Some(rule) = best {
            tracing::trace!(
                "長料規則 {} 適用於 {} x {}（具體程度 {}）",
                rule.id,
                width,
                height,
                rule.specificity()
            );
        }

        best
    }
}
