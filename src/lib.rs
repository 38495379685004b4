//! # Quote
//!
//! 鋁門窗報價引擎：由開口配置與零件目錄計算 BOM、切料長度、成本與售價。
//!
//! ```ignore
//! let calculator = QuoteCalculator::new(catalog, EngineConfig::new(), QuoteSettings::default());
//! let result = calculator.calculate(&openings, &mode, quote_date)?;
//! ```

pub use quote_calc::{
    BomAggregator, DoorScheduleRow, ExtrusionCosting, MarkupEngine, OpeningBom, PackingListItem,
    QuoteCalculator, QuoteItem, QuoteResult, QuoteTotals, QuoteWarning, StockRuleSelector, WarningSeverity,
};
pub use quote_catalog::{CatalogDocument, CatalogSnapshot, PricingModeRegistry};
pub use quote_core::{
    BomLineTemplate, CategoryCosts, ComponentInstance, CostingMethod, EngineConfig, FinishColor,
    GlassOffsets, GlassType, IndividualOption, MasterPart, Opening, OpeningCostBreakdown, Panel,
    PartType, PricedBomLine, PricingMode, PricingRule, Product, ProductType, QuantityPolicy,
    QuoteError, QuoteSettings, Result, StockLengthRule, SubOptionCategory,
};
pub use quote_optimizer::{CutListOptimizer, CutListPlan, PartCutPlan};

/// 子模組直接存取
pub mod calc {
    pub use quote_calc::*;
}

pub mod optimizer {
    pub use quote_optimizer::*;
}
