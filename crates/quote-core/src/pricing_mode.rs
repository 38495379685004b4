//! 計價模式模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::part::PartType;

/// 型材計價方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostingMethod {
    /// 每件計整支長料
    FullStock,
    /// 依使用比例計價（剩料不足一半時計整支）
    PercentageBased,
    /// 混合（由呼叫端依業務政策決定實際方式）
    Hybrid,
}

impl CostingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostingMethod::FullStock => "FULL_STOCK",
            CostingMethod::PercentageBased => "PERCENTAGE_BASED",
            CostingMethod::Hybrid => "HYBRID",
        }
    }
}

impl Default for CostingMethod {
    fn default() -> Self {
        CostingMethod::FullStock
    }
}

impl std::str::FromStr for CostingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "FULL_STOCK" => Ok(CostingMethod::FullStock),
            "PERCENTAGE_BASED" => Ok(CostingMethod::PercentageBased),
            "HYBRID" => Ok(CostingMethod::Hybrid),
            other => Err(format!("未知的計價方式: {}", other)),
        }
    }
}

/// 計價模式（加成與折扣政策）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingMode {
    /// 模式ID
    pub id: i64,

    /// 模式名稱
    pub name: String,

    /// 全域加成（%）
    pub markup: Decimal,

    /// 型材加成（%，0 表示沿用全域加成）
    pub extrusion_markup: Decimal,

    /// 五金加成（%，0 表示沿用全域加成）
    pub hardware_markup: Decimal,

    /// 玻璃加成（%，0 表示沿用全域加成）
    pub glass_markup: Decimal,

    /// 其他加成（%，0 表示沿用全域加成）
    pub other_markup: Decimal,

    /// 折扣（%）
    pub discount: Decimal,

    /// 預設型材計價方式
    pub extrusion_costing_method: CostingMethod,

    /// 是否為預設模式
    pub is_default: bool,
}

impl PricingMode {
    /// 創建零加成、零折扣的計價模式
    pub fn new(id: i64, name: String) -> Self {
        Self {
            id,
            name,
            markup: Decimal::ZERO,
            extrusion_markup: Decimal::ZERO,
            hardware_markup: Decimal::ZERO,
            glass_markup: Decimal::ZERO,
            other_markup: Decimal::ZERO,
            discount: Decimal::ZERO,
            extrusion_costing_method: CostingMethod::FullStock,
            is_default: false,
        }
    }

    /// 建構器模式：設置全域加成
    pub fn with_markup(mut self, markup: Decimal) -> Self {
        self.markup = markup;
        self
    }

    /// 建構器模式：設置類別加成
    pub fn with_category_markup(mut self, part_type: PartType, markup: Decimal) -> Self {
        match part_type {
            PartType::Extrusion => self.extrusion_markup = markup,
            PartType::Hardware => self.hardware_markup = markup,
            PartType::Glass => self.glass_markup = markup,
            PartType::Other => self.other_markup = markup,
        }
        self
    }

    /// 建構器模式：設置折扣
    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    /// 建構器模式：設置型材計價方式
    pub fn with_costing_method(mut self, method: CostingMethod) -> Self {
        self.extrusion_costing_method = method;
        self
    }

    /// 建構器模式：標記為預設模式
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// 類別設定的加成（原始值，未套用沿用規則）
    pub fn category_markup(&self, part_type: PartType) -> Decimal {
        match part_type {
            PartType::Extrusion => self.extrusion_markup,
            PartType::Hardware => self.hardware_markup,
            PartType::Glass => self.glass_markup,
            PartType::Other => self.other_markup,
        }
    }
}
