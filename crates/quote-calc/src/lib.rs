//! # Quote Calculation Engine
//!
//! 報價計算引擎：公式、長料規則、型材計價、零件編號、BOM 彙總與加成

pub mod aggregator;
pub mod calculator;
pub mod costing;
pub mod finish;
pub mod formula;
pub mod glass;
pub mod markup;
pub mod packing;
pub mod quote_total;
pub mod rule_selector;
pub mod summary;

// Re-export 主要類型
pub use aggregator::{BomAggregator, ComponentBom, OpeningBom};
pub use calculator::{QuoteCalculator, QuoteResult};
pub use costing::{ExtrusionCost, ExtrusionCosting, FallbackCost};
pub use formula::{evaluate, try_evaluate, FormulaError, Variables};
pub use markup::{MarkupEngine, OpeningPrice};
pub use packing::PackingListItem;
pub use quote_total::QuoteTotals;
pub use rule_selector::StockRuleSelector;
pub use summary::{DoorScheduleRow, QuoteItem};

/// 報價警告
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteWarning {
    pub opening_name: String,
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl QuoteWarning {
    pub fn new(
        opening_name: String,
        subject: String,
        message: String,
        severity: WarningSeverity,
    ) -> Self {
        Self {
            opening_name,
            subject,
            message,
            severity,
        }
    }

    pub fn info(opening_name: String, subject: String, message: String) -> Self {
        Self::new(opening_name, subject, message, WarningSeverity::Info)
    }

    pub fn warning(opening_name: String, subject: String, message: String) -> Self {
        Self::new(opening_name, subject, message, WarningSeverity::Warning)
    }

    pub fn error(opening_name: String, subject: String, message: String) -> Self {
        Self::new(opening_name, subject, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
