//! 下料清單（First-Fit Decreasing）

use std::collections::BTreeMap;

use quote_calc::QuoteResult;
use quote_core::{PartType, PricedBomLine};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{OptimizerError, Result};

/// 單一 BOM 行的件數上限
pub const MAX_PIECES_PER_LINE: usize = 10_000;

/// 單支長料的下料結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBar {
    /// 切料長度（依排入順序）
    pub cuts: Vec<Decimal>,

    /// 剩餘長度（已扣除鋸口）
    pub remaining: Decimal,
}

impl StockBar {
    fn new(stock_length: Decimal) -> Self {
        Self {
            cuts: Vec::new(),
            remaining: stock_length,
        }
    }

    /// 放入切料所需長度（第二刀起含鋸口）
    fn required(&self, cut: Decimal, kerf: Decimal) -> Decimal {
        if self.cuts.is_empty() {
            cut
        } else {
            cut.saturating_add(kerf)
        }
    }

    fn try_place(&mut self, cut: Decimal, kerf: Decimal) -> bool {
        let required = self.required(cut, kerf);
        if required > self.remaining {
            return false;
        }
        self.remaining -= required;
        self.cuts.push(cut);
        true
    }
}

/// 單一零件（完整零件編號 + 長料長度）的下料計劃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartCutPlan {
    pub part_number: String,
    pub stock_length: Decimal,
    pub bars: Vec<StockBar>,

    /// 超過長料長度、無法排入的切料
    pub oversize_cuts: Vec<Decimal>,
}

impl PartCutPlan {
    /// 需要的長料支數
    pub fn sticks_needed(&self) -> usize {
        self.bars.len()
    }

    /// 總廢料長度
    pub fn waste(&self) -> Decimal {
        self.bars
            .iter()
            .fold(Decimal::ZERO, |total, b| total.saturating_add(b.remaining))
    }

    /// 材料利用率（0 ~ 1）
    pub fn utilization(&self) -> Decimal {
        let total = self.stock_length.saturating_mul(Decimal::from(self.bars.len()));
        let used = self
            .bars
            .iter()
            .flat_map(|b| b.cuts.iter())
            .fold(Decimal::ZERO, |total, cut| total.saturating_add(*cut));
        used.checked_div(total).unwrap_or(Decimal::ZERO)
    }
}

/// 整份報價的下料計劃
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CutListPlan {
    pub parts: Vec<PartCutPlan>,

    /// 件數超過上限、未排入的零件編號
    #[serde(default)]
    pub skipped: Vec<String>,
}

impl CutListPlan {
    pub fn total_sticks(&self) -> usize {
        self.parts.iter().map(PartCutPlan::sticks_needed).sum()
    }

    pub fn total_waste(&self) -> Decimal {
        self.parts
            .iter()
            .fold(Decimal::ZERO, |total, part| total.saturating_add(part.waste()))
    }

    pub fn part(&self, part_number: &str) -> Option<&PartCutPlan> {
        self.parts.iter().find(|p| p.part_number == part_number)
    }
}

/// 下料優化器
#[derive(Debug, Clone)]
pub struct CutListOptimizer {
    /// 鋸口寬度
    kerf: Decimal,

    /// BOM 行未帶長料長度時使用的長度
    default_stock_length: Option<Decimal>,
}

impl Default for CutListOptimizer {
    fn default() -> Self {
        Self {
            kerf: Decimal::new(125, 3),
            default_stock_length: None,
        }
    }
}

impl CutListOptimizer {
    /// 創建新的優化器（鋸口 1/8"）
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置鋸口寬度
    pub fn with_kerf(mut self, kerf: Decimal) -> Result<Self> {
        if kerf < Decimal::ZERO {
            return Err(OptimizerError::InvalidKerf(kerf));
        }
        self.kerf = kerf;
        Ok(self)
    }

    /// 建構器模式：設置預設長料長度
    pub fn with_default_stock_length(mut self, length: Decimal) -> Result<Self> {
        if length <= Decimal::ZERO {
            return Err(OptimizerError::InvalidStockLength(length));
        }
        self.default_stock_length = Some(length);
        Ok(self)
    }

    pub fn kerf(&self) -> Decimal {
        self.kerf
    }

    /// 優化整份報價（數量乘上開口倍數）
    pub fn optimize_quote(&self, result: &QuoteResult) -> CutListPlan {
        let lines = result.openings.iter().flat_map(|bom| {
            bom.lines().map(move |line| (line, bom.multiplier))
        });
        self.optimize_weighted(lines)
    }

    /// 優化 BOM 行
    pub fn optimize<'a, I>(&self, lines: I) -> CutListPlan
    where
        I: IntoIterator<Item = &'a PricedBomLine>,
    {
        self.optimize_weighted(lines.into_iter().map(|line| (line, Decimal::ONE)))
    }

    fn optimize_weighted<'a, I>(&self, lines: I) -> CutListPlan
    where
        I: IntoIterator<Item = (&'a PricedBomLine, Decimal)>,
    {
        let mut groups: BTreeMap<(String, Decimal), Vec<Decimal>> = BTreeMap::new();
        let mut skipped = Vec::new();

        for (line, multiplier) in lines {
            if line.part_type != PartType::Extrusion {
                continue;
            }
            let (Some(part_number), Some(cut)) = (line.part_number.as_ref(), line.cut_length) else {
                continue;
            };
            if cut <= Decimal::ZERO {
                continue;
            }
            let Some(stock_length) = line.stock_length.or(self.default_stock_length) else {
                tracing::debug!("{} 未設定長料長度，不列入下料", part_number);
                continue;
            };

            let Some(pieces) = piece_count(line.quantity, multiplier) else {
                tracing::warn!(
                    "{} 件數 {} × {} 超過上限 {}，不列入下料",
                    part_number,
                    line.quantity,
                    multiplier,
                    MAX_PIECES_PER_LINE
                );
                skipped.push(part_number.clone());
                continue;
            };
            groups
                .entry((part_number.clone(), stock_length.normalize()))
                .or_default()
                .extend(std::iter::repeat(cut).take(pieces));
        }

        let parts: Vec<PartCutPlan> = groups
            .into_iter()
            .map(|((part_number, stock_length), cuts)| {
                self.pack(part_number, stock_length, cuts)
            })
            .collect();

        let plan = CutListPlan { parts, skipped };
        tracing::debug!(
            "下料計劃：零件 {} 種，長料 {} 支，廢料 {}",
            plan.parts.len(),
            plan.total_sticks(),
            plan.total_waste()
        );
        plan
    }

    /// First-Fit Decreasing：由長到短，放入第一支放得下的長料
    fn pack(&self, part_number: String, stock_length: Decimal, mut cuts: Vec<Decimal>) -> PartCutPlan {
        cuts.sort_by(|a, b| b.cmp(a));

        let mut bars: Vec<StockBar> = Vec::new();
        let mut oversize_cuts = Vec::new();

        for cut in cuts {
            if cut > stock_length {
                tracing::warn!(
                    "{} 切料 {} 超過長料長度 {}",
                    part_number,
                    cut,
                    stock_length
                );
                oversize_cuts.push(cut);
                continue;
            }

            if !bars.iter_mut().any(|bar| bar.try_place(cut, self.kerf)) {
                let mut bar = StockBar::new(stock_length);
                bar.try_place(cut, self.kerf);
                bars.push(bar);
            }
        }

        PartCutPlan {
            part_number,
            stock_length,
            bars,
            oversize_cuts,
        }
    }
}

/// 件數 = 數量 × 倍數，無條件進位；超過上限時為 None
fn piece_count(quantity: Decimal, multiplier: Decimal) -> Option<usize> {
    let pieces = quantity.checked_mul(multiplier)?.ceil();
    if pieces <= Decimal::ZERO {
        return Some(0);
    }
    pieces.to_usize().filter(|p| *p <= MAX_PIECES_PER_LINE)
}
