//! 零件主檔與長料規則模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing_mode::CostingMethod;

/// 零件類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartType {
    /// 鋁擠型材
    Extrusion,
    /// 五金
    Hardware,
    /// 玻璃
    Glass,
    /// 其他
    Other,
}

impl PartType {
    /// BOM 排序優先序：型材 < 五金 < 玻璃 < 其他
    pub fn sort_priority(&self) -> u8 {
        match self {
            PartType::Extrusion => 1,
            PartType::Hardware => 2,
            PartType::Glass => 3,
            PartType::Other => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PartType::Extrusion => "Extrusion",
            PartType::Hardware => "Hardware",
            PartType::Glass => "Glass",
            PartType::Other => "Other",
        }
    }
}

impl std::str::FromStr for PartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "extrusion" => Ok(PartType::Extrusion),
            "hardware" => Ok(PartType::Hardware),
            "glass" => Ok(PartType::Glass),
            "other" | "material" => Ok(PartType::Other),
            other => Err(format!("未知的零件類型: {}", other)),
        }
    }
}

/// 長料規則（依尺寸範圍決定採購長度與單價）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLengthRule {
    /// 規則ID
    pub id: i64,

    /// 最小寬度（None = 不限）
    pub min_width: Option<Decimal>,

    /// 最大寬度（None = 不限）
    pub max_width: Option<Decimal>,

    /// 最小高度（None = 不限）
    pub min_height: Option<Decimal>,

    /// 最大高度（None = 不限）
    pub max_height: Option<Decimal>,

    /// 長料長度（英吋）
    pub stock_length: Decimal,

    /// 整支長料單價
    pub base_price: Decimal,

    /// 是否啟用
    pub is_active: bool,
}

impl StockLengthRule {
    /// 創建不限尺寸的長料規則
    pub fn new(id: i64, stock_length: Decimal, base_price: Decimal) -> Self {
        Self {
            id,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            stock_length,
            base_price,
            is_active: true,
        }
    }

    /// 建構器模式：設置寬度範圍
    pub fn with_width_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    /// 建構器模式：設置高度範圍
    pub fn with_height_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }

    /// 建構器模式：設置啟用狀態
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    /// 具體程度：四個邊界中有設定的數量
    pub fn specificity(&self) -> usize {
        [
            self.min_width,
            self.max_width,
            self.min_height,
            self.max_height,
        ]
        .iter()
        .filter(|bound| bound.is_some())
        .count()
    }

    /// 尺寸是否落在規則範圍內（含邊界）
    pub fn covers(&self, width: Decimal, height: Decimal) -> bool {
        within(width, self.min_width, self.max_width)
            && within(height, self.min_height, self.max_height)
    }

    /// 長料長度是否可用於計價
    pub fn has_usable_length(&self) -> bool {
        self.stock_length > Decimal::ZERO
    }
}

fn within(value: Decimal, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
}

/// 非型材零件的計價規則
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: i64,
    pub name: String,
    pub base_price: Decimal,
    pub is_active: bool,
}

impl PricingRule {
    pub fn new(id: i64, name: String, base_price: Decimal) -> Self {
        Self {
            id,
            name,
            base_price,
            is_active: true,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

/// 零件主檔
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterPart {
    /// 零件編號（唯一）
    pub part_number: String,

    /// 基本名稱
    pub base_name: String,

    /// 零件類型
    pub part_type: PartType,

    /// 固定單價（如果適用）
    pub cost: Option<Decimal>,

    /// 僅提供原色（不加表面處理後綴）
    pub is_mill_finish: bool,

    /// 長料規則（依建立順序）
    #[serde(default)]
    pub stock_length_rules: Vec<StockLengthRule>,

    /// 計價規則（依建立順序）
    #[serde(default)]
    pub pricing_rules: Vec<PricingRule>,

    /// 型材計價方式覆寫（None = 沿用計價模式）
    #[serde(default)]
    pub costing_method: Option<CostingMethod>,
}

impl MasterPart {
    /// 創建新的零件主檔
    pub fn new(part_number: String, base_name: String, part_type: PartType) -> Self {
        Self {
            part_number,
            base_name,
            part_type,
            cost: None,
            is_mill_finish: false,
            stock_length_rules: Vec::new(),
            pricing_rules: Vec::new(),
            costing_method: None,
        }
    }

    /// 建構器模式：設置固定單價
    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = Some(cost);
        self
    }

    /// 建構器模式：設置僅原色
    pub fn with_mill_finish(mut self, mill_finish: bool) -> Self {
        self.is_mill_finish = mill_finish;
        self
    }

    /// 建構器模式：新增長料規則
    pub fn with_stock_length_rule(mut self, rule: StockLengthRule) -> Self {
        self.stock_length_rules.push(rule);
        self
    }

    /// 建構器模式：新增計價規則
    pub fn with_pricing_rule(mut self, rule: PricingRule) -> Self {
        self.pricing_rules.push(rule);
        self
    }

    /// 建構器模式：覆寫型材計價方式
    pub fn with_costing_method(mut self, method: CostingMethod) -> Self {
        self.costing_method = Some(method);
        self
    }

    /// 第一個啟用中的計價規則
    pub fn active_pricing_rule(&self) -> Option<&PricingRule> {
        self.pricing_rules.iter().find(|r| r.is_active)
    }
}

/// 玻璃種類與每平方英尺單價
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlassType {
    pub name: String,
    pub price_per_sq_ft: Decimal,
}

impl GlassType {
    pub fn new(name: String, price_per_sq_ft: Decimal) -> Self {
        Self {
            name,
            price_per_sq_ft,
        }
    }
}
