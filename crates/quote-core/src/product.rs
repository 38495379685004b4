//! 產品與 BOM 行範本模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::part::PartType;
use crate::{QuoteError, Result};

/// 產品類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    /// 平開門
    SwingDoor,
    /// 推拉門
    SlidingDoor,
    /// 固定窗
    FixedPanel,
    /// 90 度轉角
    #[serde(rename = "CORNER_90")]
    Corner90,
}

impl ProductType {
    /// 報價單顯示名稱
    pub fn display_name(&self) -> &'static str {
        match self {
            ProductType::SwingDoor => "Swing Door",
            ProductType::SlidingDoor => "Sliding Door",
            ProductType::FixedPanel => "Fixed Panel",
            ProductType::Corner90 => "90° Corner",
        }
    }
}

/// 數量政策
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuantityPolicy {
    /// 固定數量
    Fixed,
    /// 範圍數量（由配置選擇，限制在 min..=max）
    Ranged { min: Decimal, max: Decimal },
}

impl Default for QuantityPolicy {
    fn default() -> Self {
        QuantityPolicy::Fixed
    }
}

/// 產品 BOM 行範本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLineTemplate {
    /// 範本ID
    pub id: i64,

    /// 零件編號（可選）
    pub part_number: Option<String>,

    /// 零件名稱
    pub part_name: String,

    /// 說明
    #[serde(default)]
    pub description: Option<String>,

    /// 零件類型
    pub part_type: PartType,

    /// 公式（型材為切料長度，其他為成本）
    #[serde(default)]
    pub formula: Option<String>,

    /// 直接固定單價
    #[serde(default)]
    pub cost: Option<Decimal>,

    /// 固定數量
    #[serde(default)]
    pub quantity: Option<Decimal>,

    /// 數量政策
    #[serde(default)]
    pub quantity_policy: QuantityPolicy,

    /// 單位
    pub unit: String,

    /// 零件編號是否加上表面處理後綴
    #[serde(default)]
    pub add_finish_to_part_number: bool,

    /// 是否列入包裝清單
    #[serde(default)]
    pub add_to_packing_list: bool,
}

impl BomLineTemplate {
    /// 創建新的 BOM 行範本
    pub fn new(id: i64, part_name: String, part_type: PartType, unit: String) -> Self {
        Self {
            id,
            part_number: None,
            part_name,
            description: None,
            part_type,
            formula: None,
            cost: None,
            quantity: None,
            quantity_policy: QuantityPolicy::Fixed,
            unit,
            add_finish_to_part_number: false,
            add_to_packing_list: false,
        }
    }

    /// 建構器模式：設置零件編號
    pub fn with_part_number(mut self, part_number: String) -> Self {
        self.part_number = Some(part_number);
        self
    }

    /// 建構器模式：設置說明
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    /// 建構器模式：設置公式
    pub fn with_formula(mut self, formula: &str) -> Self {
        self.formula = Some(formula.to_string());
        self
    }

    /// 建構器模式：設置固定單價
    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = Some(cost);
        self
    }

    /// 建構器模式：設置固定數量
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// 建構器模式：設置範圍數量
    pub fn with_quantity_range(mut self, min: Decimal, max: Decimal) -> Self {
        self.quantity_policy = QuantityPolicy::Ranged { min, max };
        self
    }

    /// 建構器模式：零件編號加上表面處理後綴
    pub fn with_finish_suffix(mut self, add: bool) -> Self {
        self.add_finish_to_part_number = add;
        self
    }

    /// 建構器模式：列入包裝清單
    pub fn with_packing_list(mut self, add: bool) -> Self {
        self.add_to_packing_list = add;
        self
    }

    /// 決定實際數量
    ///
    /// # 參數
    /// * `chosen` - 配置時選擇的數量（僅範圍數量適用）
    pub fn resolve_quantity(&self, chosen: Option<Decimal>) -> Decimal {
        match self.quantity_policy {
            QuantityPolicy::Fixed => self.quantity.unwrap_or(Decimal::ONE),
            QuantityPolicy::Ranged { min, max } => chosen
                .or(self.quantity)
                .unwrap_or(min)
                .max(min)
                .min(max),
        }
    }

    /// 檢查範本設定
    pub fn validate(&self) -> Result<()> {
        if let QuantityPolicy::Ranged { min, max } = self.quantity_policy {
            if min > max {
                return Err(QuoteError::InvalidQuantityRange { min, max });
            }
        }
        Ok(())
    }
}

/// 玻璃尺寸偏移公式
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlassOffsets {
    pub width_formula: Option<String>,
    pub height_formula: Option<String>,
}

/// 選配項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualOption {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub part_number: Option<String>,
}

/// 選配類別
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubOptionCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub options: Vec<IndividualOption>,
}

impl SubOptionCategory {
    pub fn option(&self, option_id: i64) -> Option<&IndividualOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// 是否為五金類選配（報價單五金欄位使用）
    pub fn is_hardware_category(&self) -> bool {
        let name = self.name.to_lowercase();
        ["hardware", "handle", "lock", "hinge"]
            .iter()
            .any(|term| name.contains(term))
    }
}

/// 產品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// 產品ID
    pub id: String,

    /// 產品名稱
    pub name: String,

    /// 產品類型
    pub product_type: ProductType,

    /// BOM 行範本
    #[serde(default)]
    pub bom_lines: Vec<BomLineTemplate>,

    /// 玻璃尺寸偏移
    #[serde(default)]
    pub glass_offsets: GlassOffsets,

    /// 選配類別
    #[serde(default)]
    pub sub_options: Vec<SubOptionCategory>,
}

impl Product {
    /// 創建新的產品
    pub fn new(id: String, name: String, product_type: ProductType) -> Self {
        Self {
            id,
            name,
            product_type,
            bom_lines: Vec::new(),
            glass_offsets: GlassOffsets::default(),
            sub_options: Vec::new(),
        }
    }

    /// 建構器模式：新增 BOM 行範本
    pub fn with_bom_line(mut self, line: BomLineTemplate) -> Self {
        self.bom_lines.push(line);
        self
    }

    /// 建構器模式：設置玻璃偏移公式
    pub fn with_glass_offsets(mut self, width: Option<&str>, height: Option<&str>) -> Self {
        self.glass_offsets = GlassOffsets {
            width_formula: width.map(str::to_string),
            height_formula: height.map(str::to_string),
        };
        self
    }

    /// 建構器模式：新增選配類別
    pub fn with_sub_option(mut self, category: SubOptionCategory) -> Self {
        self.sub_options.push(category);
        self
    }

    pub fn sub_option(&self, category_id: i64) -> Option<&SubOptionCategory> {
        self.sub_options.iter().find(|c| c.id == category_id)
    }

    /// 檢查所有 BOM 行範本
    pub fn validate(&self) -> Result<()> {
        self.bom_lines.iter().try_for_each(BomLineTemplate::validate)
    }
}
