//! # Quote Catalog
//!
//! 目錄快照與計價模式註冊表（報價計算時唯讀）

pub mod pricing_modes;
pub mod snapshot;

// Re-export 主要類型
pub use pricing_modes::PricingModeRegistry;
pub use snapshot::{CatalogDocument, CatalogSnapshot};
