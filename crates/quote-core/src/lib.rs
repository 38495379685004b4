//! # Quote Core
//!
//! 報價引擎核心資料模型與類型定義

pub mod bom;
pub mod config;
pub mod opening;
pub mod part;
pub mod pricing_mode;
pub mod product;

// Re-export 主要類型
pub use bom::{CategoryCosts, OpeningCostBreakdown, PricedBomLine};
pub use config::{EngineConfig, QuoteSettings};
pub use opening::{ComponentInstance, FinishColor, Opening, Panel};
pub use part::{GlassType, MasterPart, PartType, PricingRule, StockLengthRule};
pub use pricing_mode::{CostingMethod, PricingMode};
pub use product::{
    BomLineTemplate, GlassOffsets, IndividualOption, Product, ProductType, QuantityPolicy,
    SubOptionCategory,
};

/// 報價引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("找不到零件: {0}")]
    PartNotFound(String),

    #[error("找不到產品: {0}")]
    ProductNotFound(String),

    #[error("找不到計價模式: {0}")]
    PricingModeNotFound(String),

    #[error("尚未設定預設計價模式")]
    NoDefaultPricingMode,

    #[error("數量範圍無效: 最小 {min} 大於最大 {max}")]
    InvalidQuantityRange {
        min: rust_decimal::Decimal,
        max: rust_decimal::Decimal,
    },

    #[error("重複的零件編號: {0}")]
    DuplicatePartNumber(String),

    #[error("配置錯誤: {0}")]
    InvalidConfig(String),

    #[error("JSON 解析錯誤: {0}")]
    Json(#[from] serde_json::Error),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, QuoteError>;
