//! 報價引擎配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing_mode::CostingMethod;
use crate::{QuoteError, Result};

/// 報價引擎參數配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 混合計價（HYBRID）實際採用的方式
    /// - 只能是 FULL_STOCK 或 PERCENTAGE_BASED
    /// - 預設 FULL_STOCK
    pub hybrid_resolution: CostingMethod,

    /// 比例計價門檻：剩料比例大於此值才按比例計價
    pub waste_threshold: Decimal,

    /// 玻璃面積換算除數（平方英吋 → 平方英尺）
    pub glass_area_divisor: Decimal,

    /// 玻璃面積小數位數
    pub glass_area_precision: u32,

    /// 不產生玻璃行的玻璃種類
    pub skip_glass_types: Vec<String>,

    /// 玻璃行單位
    pub glass_unit: String,

    /// 選配行單位
    pub option_unit: String,

    /// 公式失敗歸零的行是否產生警告
    pub flag_zero_cost_lines: bool,

    /// 多開口時是否並行計算
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hybrid_resolution: CostingMethod::FullStock,
            waste_threshold: Decimal::new(5, 1),
            glass_area_divisor: Decimal::from(144),
            glass_area_precision: 2,
            skip_glass_types: vec!["None".to_string(), "N/A".to_string()],
            glass_unit: "SQ FT".to_string(),
            option_unit: "EA".to_string(),
            flag_zero_cost_lines: true,
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 載入並檢查配置
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置混合計價的實際方式
    pub fn with_hybrid_resolution(mut self, method: CostingMethod) -> Self {
        self.hybrid_resolution = method;
        self
    }

    /// 建構器模式：設置比例計價門檻
    pub fn with_waste_threshold(mut self, threshold: Decimal) -> Self {
        self.waste_threshold = threshold;
        self
    }

    /// 建構器模式：設置是否並行計算
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 建構器模式：設置是否標記歸零行
    pub fn with_flag_zero_cost_lines(mut self, flag: bool) -> Self {
        self.flag_zero_cost_lines = flag;
        self
    }

    /// 檢查配置
    pub fn validate(&self) -> Result<()> {
        if self.hybrid_resolution == CostingMethod::Hybrid {
            return Err(QuoteError::InvalidConfig(
                "hybrid_resolution 不可為 HYBRID".to_string(),
            ));
        }
        if self.waste_threshold < Decimal::ZERO || self.waste_threshold > Decimal::ONE {
            return Err(QuoteError::InvalidConfig(format!(
                "waste_threshold 必須介於 0 與 1: {}",
                self.waste_threshold
            )));
        }
        if self.glass_area_divisor <= Decimal::ZERO {
            return Err(QuoteError::InvalidConfig(format!(
                "glass_area_divisor 必須大於 0: {}",
                self.glass_area_divisor
            )));
        }
        Ok(())
    }

    /// 將計價方式解析為實際方式（HYBRID 依配置轉換）
    pub fn resolve_costing_method(&self, method: CostingMethod) -> CostingMethod {
        match method {
            CostingMethod::Hybrid => self.hybrid_resolution,
            concrete => concrete,
        }
    }

    /// 玻璃種類是否不產生玻璃行
    pub fn skips_glass(&self, glass_type: &str) -> bool {
        let glass_type = glass_type.trim();
        glass_type.is_empty()
            || self
                .skip_glass_types
                .iter()
                .any(|skip| skip.eq_ignore_ascii_case(glass_type))
    }
}

/// 報價單層級設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSettings {
    /// 稅率（小數，例如 0.0825）
    pub tax_rate: Decimal,

    /// 安裝費
    pub installation_cost: Decimal,

    /// 報價有效天數
    pub validity_days: u32,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::ZERO,
            installation_cost: Decimal::ZERO,
            validity_days: 30,
        }
    }
}

impl QuoteSettings {
    /// 建構器模式：設置稅率
    pub fn with_tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    /// 建構器模式：設置安裝費
    pub fn with_installation_cost(mut self, cost: Decimal) -> Self {
        self.installation_cost = cost;
        self
    }

    /// 建構器模式：設置有效天數
    pub fn with_validity_days(mut self, days: u32) -> Self {
        self.validity_days = days;
        self
    }
}
