//! # Quote Optimizer
//!
//! 型材下料優化（將切料排入長料）

pub mod cut_list;

// Re-export 主要類型
pub use cut_list::{CutListOptimizer, CutListPlan, PartCutPlan, StockBar, MAX_PIECES_PER_LINE};

/// 下料優化錯誤
#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    #[error("鋸口寬度不可為負數: {0}")]
    InvalidKerf(rust_decimal::Decimal),

    #[error("長料長度必須大於 0: {0}")]
    InvalidStockLength(rust_decimal::Decimal),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
