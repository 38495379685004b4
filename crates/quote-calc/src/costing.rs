//! 型材計價策略

use quote_core::{CostingMethod, EngineConfig, StockLengthRule};
use rust_decimal::Decimal;

/// 找不到可用長料規則時的退回計價來源
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallbackCost {
    /// 固定單價（乘上數量）
    Flat(Decimal),
    /// 公式計算結果（直接作為成本）
    Formula(Decimal),
    /// 無任何計價來源
    Nothing,
}

/// 型材計價結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionCost {
    /// 行成本
    pub cost: Decimal,

    /// 實際採用的計價方式（退回計價時為 None）
    pub method: Option<CostingMethod>,

    /// 採用的長料長度（退回計價時為 None）
    pub stock_length: Option<Decimal>,

    /// 使用比例（僅比例計價）
    pub usage_fraction: Option<Decimal>,
}

impl ExtrusionCost {
    fn fallback(cost: Decimal) -> Self {
        Self {
            cost: cost.max(Decimal::ZERO),
            method: None,
            stock_length: None,
            usage_fraction: None,
        }
    }
}

/// 型材計價計算器
pub struct ExtrusionCosting;

impl ExtrusionCosting {
    /// 計算型材行成本
    ///
    /// # 參數
    /// * `required_cut_length` - 所需切料長度
    /// * `quantity` - 件數
    /// * `stock_rule` - 選出的長料規則（長度為 0 視同無規則）
    /// * `method` - 計價方式（HYBRID 依配置轉換）
    /// * `fallback` - 無規則時的計價來源
    pub fn price(
        required_cut_length: Decimal,
        quantity: Decimal,
        stock_rule: Option<&StockLengthRule>,
        method: CostingMethod,
        fallback: FallbackCost,
        config: &EngineConfig,
    ) -> ExtrusionCost {
        let rule = match stock_rule.filter(|r| r.has_usable_length()) {
            Some(rule) => rule,
            None => return Self::price_without_rule(quantity, fallback),
        };

        let full_stock = rule
            .base_price
            .checked_mul(quantity)
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO);

        let resolved = config.resolve_costing_method(method);
        match resolved {
            CostingMethod::PercentageBased => {
                let usage = required_cut_length
                    .checked_div(rule.stock_length)
                    .unwrap_or(Decimal::ONE);
                let remaining = Decimal::ONE - usage;

                // 剩料超過門檻才按使用比例計價，否則剩料無法再利用，計整支
                let cost = if remaining > config.waste_threshold {
                    rule.base_price
                        .checked_mul(usage)
                        .and_then(|c| c.checked_mul(quantity))
                        .unwrap_or(Decimal::ZERO)
                        .max(Decimal::ZERO)
                } else {
                    full_stock
                };

                ExtrusionCost {
                    cost,
                    method: Some(CostingMethod::PercentageBased),
                    stock_length: Some(rule.stock_length),
                    usage_fraction: Some(usage),
                }
            }
            _ => ExtrusionCost {
                cost: full_stock,
                method: Some(CostingMethod::FullStock),
                stock_length: Some(rule.stock_length),
                usage_fraction: None,
            },
        }
    }

    fn price_without_rule(quantity: Decimal, fallback: FallbackCost) -> ExtrusionCost {
        match fallback {
            FallbackCost::Flat(unit_cost) => {
                ExtrusionCost::fallback(unit_cost.checked_mul(quantity).unwrap_or(Decimal::ZERO))
            }
            FallbackCost::Formula(cost) => ExtrusionCost::fallback(cost),
            FallbackCost::Nothing => ExtrusionCost::fallback(Decimal::ZERO),
        }
    }
}
