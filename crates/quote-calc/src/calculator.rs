//! 報價主計算器

use chrono::NaiveDate;
use quote_catalog::{CatalogSnapshot, PricingModeRegistry};
use quote_core::{
    EngineConfig, Opening, OpeningCostBreakdown, PricedBomLine, PricingMode, QuoteSettings,
};
use rayon::prelude::*;

use crate::aggregator::{self, BomAggregator, OpeningBom};
use crate::markup::MarkupEngine;
use crate::packing::{self, PackingListItem};
use crate::quote_total::QuoteTotals;
use crate::summary::{self, DoorScheduleRow, QuoteItem};
use crate::QuoteWarning;

/// 報價計算結果
#[derive(Debug, Clone)]
pub struct QuoteResult {
    /// 全部 BOM 行（依開口名稱、零件類型排序）
    pub lines: Vec<PricedBomLine>,

    /// 各開口 BOM（依輸入順序）
    pub openings: Vec<OpeningBom>,

    /// 各開口成本與售價明細
    pub breakdowns: Vec<OpeningCostBreakdown>,

    /// 報價單總計
    pub totals: QuoteTotals,

    /// 報價單摘要項目
    pub items: Vec<QuoteItem>,

    /// 警告信息
    pub warnings: Vec<QuoteWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl QuoteResult {
    /// 包裝清單
    pub fn packing_list(&self) -> Vec<PackingListItem> {
        packing::packing_list(&self.lines)
    }

    /// 指定開口的成本明細
    pub fn breakdown(&self, opening_name: &str) -> Option<&OpeningCostBreakdown> {
        self.breakdowns.iter().find(|b| b.opening_name == opening_name)
    }
}

/// 報價計算器
///
/// 持有單一目錄快照，所有開口都從同一份快照讀取；計算過程不修改任何共享狀態。
pub struct QuoteCalculator {
    /// 目錄快照
    catalog: CatalogSnapshot,

    /// 引擎配置
    config: EngineConfig,

    /// 報價單設定
    settings: QuoteSettings,
}

impl QuoteCalculator {
    /// 創建新的報價計算器
    pub fn new(catalog: CatalogSnapshot, config: EngineConfig, settings: QuoteSettings) -> Self {
        Self {
            catalog,
            config,
            settings,
        }
    }

    pub fn catalog(&self) -> &CatalogSnapshot {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 開口門窗表
    pub fn door_schedule(&self, opening: &Opening) -> Vec<DoorScheduleRow> {
        summary::door_schedule(opening, &self.catalog)
    }

    /// 依註冊表決定計價模式後計算（未指定時沿用預設模式）
    pub fn calculate_with_registry(
        &self,
        openings: &[Opening],
        registry: &PricingModeRegistry,
        mode_id: Option<i64>,
        quote_date: NaiveDate,
    ) -> quote_core::Result<QuoteResult> {
        let mode = registry.resolve(mode_id)?;
        self.calculate(openings, mode, quote_date)
    }

    /// 主報價計算入口
    pub fn calculate(
        &self,
        openings: &[Opening],
        mode: &PricingMode,
        quote_date: NaiveDate,
    ) -> quote_core::Result<QuoteResult> {
        self.config.validate()?;

        tracing::info!(
            "開始報價計算：開口 {} 個，計價模式 {}",
            openings.len(),
            mode.name
        );
        let start_time = std::time::Instant::now();

        // Step 1: 逐開口展開 BOM 並計價
        let aggregator = BomAggregator::new(&self.catalog, &self.config);
        let opening_boms: Vec<OpeningBom> = if self.config.parallel {
            openings
                .par_iter()
                .map(|opening| aggregator.build_opening(opening, mode))
                .collect()
        } else {
            openings
                .iter()
                .map(|opening| aggregator.build_opening(opening, mode))
                .collect()
        };

        // Step 2: 類別加成與折扣
        let mut pricing_warnings = Vec::new();
        let breakdowns: Vec<OpeningCostBreakdown> = opening_boms
            .iter()
            .map(|bom| MarkupEngine::breakdown(bom, mode, &mut pricing_warnings))
            .collect();

        // Step 3: 報價單總計
        let totals = QuoteTotals::from_breakdowns(&breakdowns, &self.settings, quote_date);

        // Step 4: 摘要與排序
        let items: Vec<QuoteItem> = openings
            .iter()
            .zip(&breakdowns)
            .map(|(opening, breakdown)| {
                QuoteItem::build(opening, Some(breakdown), &self.catalog, &self.config)
            })
            .collect();

        let mut lines: Vec<PricedBomLine> = opening_boms
            .iter()
            .flat_map(|bom| bom.lines().cloned())
            .collect();
        aggregator::sort_lines(&mut lines);

        let warnings: Vec<QuoteWarning> = opening_boms
            .iter()
            .flat_map(|bom| bom.warnings.iter().cloned())
            .chain(pricing_warnings)
            .collect();

        let elapsed = start_time.elapsed();
        tracing::info!("報價計算完成，耗時 {:?}", elapsed);
        tracing::info!(
            "BOM 行 {} 筆，警告 {} 筆，總計 {}",
            lines.len(),
            warnings.len(),
            totals.total
        );

        Ok(QuoteResult {
            lines,
            openings: opening_boms,
            breakdowns,
            totals,
            items,
            warnings,
            calculation_time_ms: Some(elapsed.as_millis()),
        })
    }
}
