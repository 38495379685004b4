//! 計價後 BOM 與成本彙總模型（報價計算結果）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::part::PartType;
use crate::pricing_mode::CostingMethod;

/// 計價後的 BOM 行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedBomLine {
    /// 開口ID
    pub opening_id: Uuid,

    /// 開口名稱
    pub opening_name: String,

    /// 面板ID
    pub panel_id: Uuid,

    /// 產品名稱
    pub product_name: String,

    /// 來源範本ID（合成行為 None）
    pub template_id: Option<i64>,

    /// 完整零件編號（含表面處理與長料後綴）
    pub part_number: Option<String>,

    /// 零件名稱
    pub part_name: String,

    /// 零件類型
    pub part_type: PartType,

    /// 數量
    pub quantity: Decimal,

    /// 切料長度（型材）
    pub cut_length: Option<Decimal>,

    /// 長料長度（型材）
    pub stock_length: Option<Decimal>,

    /// 面積（玻璃，平方英尺）
    pub area: Option<Decimal>,

    /// 單位
    pub unit: String,

    /// 說明
    pub description: String,

    /// 行成本（已乘數量）
    pub cost: Decimal,

    /// 實際使用的型材計價方式
    pub costing_method: Option<CostingMethod>,

    /// 是否列入包裝清單
    pub add_to_packing_list: bool,

    /// 是否為標準選配（不套用加成）
    pub is_standard_option: bool,
}

/// 各類別成本
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCosts {
    pub extrusion_cost: Decimal,
    pub hardware_cost: Decimal,
    pub glass_cost: Decimal,
    pub other_cost: Decimal,
}

impl CategoryCosts {
    /// 累加成本至對應類別（溢位時飽和於 Decimal::MAX）
    pub fn add(&mut self, part_type: PartType, cost: Decimal) {
        let bucket = match part_type {
            PartType::Extrusion => &mut self.extrusion_cost,
            PartType::Hardware => &mut self.hardware_cost,
            PartType::Glass => &mut self.glass_cost,
            PartType::Other => &mut self.other_cost,
        };
        *bucket = bucket.saturating_add(cost);
    }

    pub fn get(&self, part_type: PartType) -> Decimal {
        match part_type {
            PartType::Extrusion => self.extrusion_cost,
            PartType::Hardware => self.hardware_cost,
            PartType::Glass => self.glass_cost,
            PartType::Other => self.other_cost,
        }
    }

    pub fn total(&self) -> Decimal {
        self.extrusion_cost
            .saturating_add(self.hardware_cost)
            .saturating_add(self.glass_cost)
            .saturating_add(self.other_cost)
    }
}

/// 單一開口的成本與售價明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningCostBreakdown {
    pub opening_id: Uuid,
    pub opening_name: String,

    #[serde(flatten)]
    pub costs: CategoryCosts,

    /// 標準選配成本（不加成）
    pub standard_option_cost: Decimal,

    /// 混合計價剩餘成本（不加成）
    pub hybrid_remaining_cost: Decimal,

    /// 加成金額（顯示用）
    pub markup_amount: Decimal,

    /// 折扣金額（顯示用）
    pub discount_amount: Decimal,

    /// 單樘售價
    pub sell_price: Decimal,

    /// 數量倍數
    pub multiplier: Decimal,
}

impl OpeningCostBreakdown {
    /// 售價 × 數量倍數
    pub fn extended_price(&self) -> Decimal {
        self.sell_price.saturating_mul(self.multiplier)
    }

    /// 總成本（含不加成項目）
    pub fn total_cost(&self) -> Decimal {
        self.costs
            .total()
            .saturating_add(self.standard_option_cost)
            .saturating_add(self.hybrid_remaining_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_costs_accumulate() {
        let mut costs = CategoryCosts::default();
        costs.add(PartType::Extrusion, Decimal::from(50));
        costs.add(PartType::Extrusion, Decimal::from(25));
        costs.add(PartType::Glass, Decimal::from(10));
        costs.add(PartType::Other, Decimal::ONE);

        assert_eq!(costs.get(PartType::Extrusion), Decimal::from(75));
        assert_eq!(costs.hardware_cost, Decimal::ZERO);
        assert_eq!(costs.total(), Decimal::from(86));
    }

    #[test]
    fn test_category_costs_saturate_instead_of_panicking() {
        let mut costs = CategoryCosts::default();
        costs.add(PartType::Other, Decimal::MAX);
        costs.add(PartType::Other, Decimal::MAX);
        costs.add(PartType::Glass, Decimal::ONE);

        assert_eq!(costs.other_cost, Decimal::MAX);
        assert_eq!(costs.total(), Decimal::MAX);
    }

    #[test]
    fn test_breakdown_flattens_category_costs() {
        let breakdown = OpeningCostBreakdown {
            opening_id: Uuid::nil(),
            opening_name: "A".to_string(),
            costs: CategoryCosts {
                extrusion_cost: Decimal::from(100),
                ..CategoryCosts::default()
            },
            standard_option_cost: Decimal::from(20),
            hybrid_remaining_cost: Decimal::ZERO,
            markup_amount: Decimal::from(10),
            discount_amount: Decimal::ZERO,
            sell_price: Decimal::from(130),
            multiplier: Decimal::from(2),
        };

        let json = serde_json::to_value(&breakdown).unwrap();
        assert!(json.get("extrusion_cost").is_some());
        assert_eq!(breakdown.extended_price(), Decimal::from(260));
        assert_eq!(breakdown.total_cost(), Decimal::from(120));
    }
}
