//! 零件編號後綴（表面處理、長料長度）

use quote_core::FinishColor;
use rust_decimal::Decimal;

/// 套用表面處理後綴
///
/// 已有相同後綴時不變；已有其他可辨識後綴時替換（不疊加）；
/// 未知顏色不變。
pub fn apply_finish(part_number: &str, finish: Option<FinishColor>) -> String {
    let Some(finish) = finish else {
        return part_number.to_string();
    };
    let target = finish.suffix();

    if part_number.ends_with(target) {
        return part_number.to_string();
    }

    let base = FinishColor::ALL
        .iter()
        .map(FinishColor::suffix)
        .find_map(|suffix| part_number.strip_suffix(suffix))
        .unwrap_or(part_number);

    format!("{}{}", base, target)
}

/// 附加長料長度後綴 `-<長度>`（已存在時不重複附加）
pub fn append_stock_length(part_number: &str, stock_length: Option<Decimal>) -> String {
    let length = match stock_length {
        Some(length) if length > Decimal::ZERO && !part_number.is_empty() => length,
        _ => return part_number.to_string(),
    };

    let suffix = format!("-{}", length.normalize());
    if part_number.ends_with(&suffix) {
        part_number.to_string()
    } else {
        format!("{}{}", part_number, suffix)
    }
}

/// 產生完整零件編號：先套表面處理，再附加長料長度
///
/// # 參數
/// * `apply_color` - BOM 行是否要求表面處理後綴，且零件不是僅原色
pub fn finish_part_number(
    base_part_number: &str,
    finish: Option<FinishColor>,
    stock_length: Option<Decimal>,
    apply_color: bool,
) -> String {
    let colored = if apply_color {
        apply_finish(base_part_number, finish)
    } else {
        base_part_number.to_string()
    };
    append_stock_length(&colored, stock_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("ABC", Some(FinishColor::Black), "ABC-BL")]
    #[case("ABC", Some(FinishColor::Clear), "ABC-C2")]
    #[case("ABC", Some(FinishColor::Other), "ABC-AL")]
    #[case("ABC", None, "ABC")]
    #[case("ABC-BL", Some(FinishColor::Black), "ABC-BL")]
    #[case("ABC-BL", Some(FinishColor::Clear), "ABC-C2")]
    #[case("ABC-AL", Some(FinishColor::Black), "ABC-BL")]
    fn test_apply_finish(
        #[case] part_number: &str,
        #[case] finish: Option<FinishColor>,
        #[case] expected: &str,
    ) {
        assert_eq!(apply_finish(part_number, finish), expected);
    }

    #[test]
    fn test_refinish_by_color_name() {
        assert_eq!(
            apply_finish("ABC-BL", FinishColor::from_name("Clear")),
            "ABC-C2"
        );
        assert_eq!(apply_finish("ABC", FinishColor::from_name("Bronze")), "ABC");
    }

    #[test]
    fn test_append_stock_length() {
        assert_eq!(
            append_stock_length("ABC-BL", Some(Decimal::from(96))),
            "ABC-BL-96"
        );
        assert_eq!(
            append_stock_length("ABC-BL-96", Some(Decimal::from(96))),
            "ABC-BL-96"
        );
        assert_eq!(
            append_stock_length("ABC", Some(Decimal::new(9650, 2))),
            "ABC-96.5"
        );
        assert_eq!(append_stock_length("ABC", None), "ABC");
        assert_eq!(append_stock_length("", Some(Decimal::from(96))), "");
    }

    #[test]
    fn test_finish_part_number_order() {
        assert_eq!(
            finish_part_number("EX-100", Some(FinishColor::Black), Some(Decimal::from(144)), true),
            "EX-100-BL-144"
        );
        // 僅原色：不加顏色，仍附加長度
        assert_eq!(
            finish_part_number("EX-100", Some(FinishColor::Black), Some(Decimal::from(144)), false),
            "EX-100-144"
        );
    }

    proptest! {
        #[test]
        fn prop_apply_finish_idempotent(pn in "[A-Z0-9-]{0,12}", idx in 0usize..3) {
            let finish = Some(FinishColor::ALL[idx]);
            let once = apply_finish(&pn, finish);
            prop_assert_eq!(apply_finish(&once, finish), once);
        }

        #[test]
        fn prop_append_stock_length_idempotent(pn in "[A-Z0-9]{1,12}", length in 1i64..400) {
            let length = Some(Decimal::from(length));
            let once = append_stock_length(&pn, length);
            prop_assert_eq!(append_stock_length(&once, length), once);
        }
    }
}
