//! 玻璃尺寸與面積

use quote_core::{EngineConfig, GlassOffsets};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::formula::{self, FormulaError};

/// 玻璃尺寸計算結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlassSize {
    pub width: Decimal,
    pub height: Decimal,
    /// 面積（平方英尺）
    pub area: Decimal,
}

/// 計算玻璃尺寸
///
/// 偏移公式未引用 `width`/`height` 時視為對應尺寸的帶號偏移量：
/// 以 `-` 開頭者直接接在尺寸後，否則補上 `+`。
/// 公式錯誤時該尺寸以 0 計，錯誤一併回傳供呼叫端標記。
pub fn glass_size(
    panel_width: Decimal,
    panel_height: Decimal,
    offsets: &GlassOffsets,
    config: &EngineConfig,
) -> (GlassSize, Vec<FormulaError>) {
    let variables = formula::bindings(panel_width, panel_height, Decimal::ONE);
    let mut errors = Vec::new();

    let mut resolve = |offset: Option<&str>, dimension: &str, panel_value: Decimal| {
        let Some(expression) = offset_expression(offset, dimension) else {
            return panel_value;
        };
        formula::try_evaluate(Some(&expression), &variables).unwrap_or_else(|err| {
            errors.push(err);
            Decimal::ZERO
        })
    };

    let width = resolve(offsets.width_formula.as_deref(), "width", panel_width);
    let height = resolve(offsets.height_formula.as_deref(), "height", panel_height);

    let size = GlassSize {
        width,
        height,
        area: area_sq_ft(width, height, config),
    };
    (size, errors)
}

/// 將偏移公式轉為完整公式（空白公式回傳 None）
pub fn offset_expression(offset: Option<&str>, dimension: &str) -> Option<String> {
    let offset = offset.map(str::trim).filter(|f| !f.is_empty())?;

    if formula::references_variable(offset, "width") || formula::references_variable(offset, "height")
    {
        return Some(offset.to_string());
    }

    if offset.starts_with('-') {
        Some(format!("{}{}", dimension, offset))
    } else {
        Some(format!("{}+{}", dimension, offset))
    }
}

/// 面積 = 寬 × 高 / 144，四捨五入至指定小數位
pub fn area_sq_ft(width: Decimal, height: Decimal, config: &EngineConfig) -> Decimal {
    width
        .checked_mul(height)
        .and_then(|sq_in| sq_in.checked_div(config.glass_area_divisor))
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(
            config.glass_area_precision,
            RoundingStrategy::MidpointAwayFromZero,
        )
}
