//! 門窗開口、面板與配置模型

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// 表面處理顏色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinishColor {
    Black,
    Clear,
    Other,
}

impl FinishColor {
    /// 所有可辨識的表面處理
    pub const ALL: [FinishColor; 3] = [FinishColor::Black, FinishColor::Clear, FinishColor::Other];

    /// 零件編號後綴
    pub fn suffix(&self) -> &'static str {
        match self {
            FinishColor::Black => "-BL",
            FinishColor::Clear => "-C2",
            FinishColor::Other => "-AL",
        }
    }

    /// 由顏色名稱解析（未知顏色回傳 None）
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "Black" => Some(FinishColor::Black),
            "Clear" => Some(FinishColor::Clear),
            "Other" => Some(FinishColor::Other),
            _ => None,
        }
    }
}

/// 元件實例（面板綁定的產品與選配）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInstance {
    /// 產品ID
    pub product_id: String,

    /// 選配結果（原始 JSON：{"類別ID": 選項ID}）
    #[serde(default)]
    pub sub_option_selections: Option<String>,

    /// 範圍數量的選擇（BOM 行範本ID → 數量）
    #[serde(default)]
    pub quantity_choices: HashMap<i64, Decimal>,
}

impl ComponentInstance {
    /// 創建新的元件實例
    pub fn new(product_id: String) -> Self {
        Self {
            product_id,
            sub_option_selections: None,
            quantity_choices: HashMap::new(),
        }
    }

    /// 建構器模式：設置選配 JSON
    pub fn with_selections(mut self, selections_json: &str) -> Self {
        self.sub_option_selections = Some(selections_json.to_string());
        self
    }

    /// 建構器模式：設置範圍數量選擇
    pub fn with_quantity_choice(mut self, template_id: i64, quantity: Decimal) -> Self {
        self.quantity_choices.insert(template_id, quantity);
        self
    }

    /// 解析選配結果為 (類別ID, 選項ID)，依類別ID排序
    ///
    /// 空值或未選擇的類別會被略過；JSON 格式錯誤回傳錯誤。
    pub fn parse_selections(&self) -> Result<Vec<(i64, i64)>> {
        let raw = match self.sub_option_selections.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        let map: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw)?;

        let mut selections: Vec<(i64, i64)> = map
            .into_iter()
            .filter_map(|(category, option)| {
                let category_id = category.trim().parse::<i64>().ok()?;
                let option_id = match option {
                    serde_json::Value::Number(n) => n.as_i64()?,
                    serde_json::Value::String(s) => s.trim().parse::<i64>().ok()?,
                    _ => return None,
                };
                Some((category_id, option_id))
            })
            .collect();
        selections.sort_unstable();

        Ok(selections)
    }
}

/// 面板
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    /// 面板ID
    pub id: Uuid,

    /// 寬度（英吋）
    pub width: Decimal,

    /// 高度（英吋）
    pub height: Decimal,

    /// 玻璃種類
    #[serde(default)]
    pub glass_type: Option<String>,

    /// 綁定的元件
    #[serde(default)]
    pub component: Option<ComponentInstance>,
}

impl Panel {
    /// 創建新的面板
    pub fn new(width: Decimal, height: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            width,
            height,
            glass_type: None,
            component: None,
        }
    }

    /// 建構器模式：設置玻璃種類
    pub fn with_glass_type(mut self, glass_type: &str) -> Self {
        self.glass_type = Some(glass_type.to_string());
        self
    }

    /// 建構器模式：綁定元件
    pub fn with_component(mut self, component: ComponentInstance) -> Self {
        self.component = Some(component);
        self
    }
}

fn default_multiplier() -> Decimal {
    Decimal::ONE
}

/// 門窗開口
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opening {
    /// 開口ID
    pub id: Uuid,

    /// 名稱
    pub name: String,

    /// 粗開口寬度
    pub rough_width: Option<Decimal>,

    /// 粗開口高度
    pub rough_height: Option<Decimal>,

    /// 完成寬度
    pub finished_width: Option<Decimal>,

    /// 完成高度
    pub finished_height: Option<Decimal>,

    /// 表面處理顏色
    #[serde(default)]
    pub finish_color: Option<String>,

    /// 數量倍數
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,

    /// 面板（依位置順序）
    #[serde(default)]
    pub panels: Vec<Panel>,
}

impl Opening {
    /// 創建新的開口
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            rough_width: None,
            rough_height: None,
            finished_width: None,
            finished_height: None,
            finish_color: None,
            multiplier: Decimal::ONE,
            panels: Vec::new(),
        }
    }

    /// 建構器模式：設置表面處理顏色
    pub fn with_finish_color(mut self, color: &str) -> Self {
        self.finish_color = Some(color.to_string());
        self
    }

    /// 建構器模式：設置粗開口尺寸
    pub fn with_rough_size(mut self, width: Decimal, height: Decimal) -> Self {
        self.rough_width = Some(width);
        self.rough_height = Some(height);
        self
    }

    /// 建構器模式：設置完成尺寸
    pub fn with_finished_size(mut self, width: Decimal, height: Decimal) -> Self {
        self.finished_width = Some(width);
        self.finished_height = Some(height);
        self
    }

    /// 建構器模式：設置數量倍數
    pub fn with_multiplier(mut self, multiplier: Decimal) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// 建構器模式：新增面板
    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    /// 可辨識的表面處理（未知顏色為 None）
    pub fn finish(&self) -> Option<FinishColor> {
        self.finish_color.as_deref().and_then(FinishColor::from_name)
    }

    /// 面板總寬
    pub fn total_width(&self) -> Decimal {
        self.panels.iter().map(|p| p.width).sum()
    }

    /// 面板最大高度
    pub fn max_height(&self) -> Decimal {
        self.panels
            .iter()
            .map(|p| p.height)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_color_lookup() {
        assert_eq!(FinishColor::from_name("Black"), Some(FinishColor::Black));
        assert_eq!(FinishColor::from_name("Clear").map(|c| c.suffix()), Some("-C2"));
        assert_eq!(FinishColor::from_name("Bronze"), None);
    }

    #[test]
    fn test_parse_selections() {
        let instance = ComponentInstance::new("P1".to_string())
            .with_selections(r#"{"7": 70, "3": "31", "9": null, "x": 1}"#);

        assert_eq!(instance.parse_selections().unwrap(), vec![(3, 31), (7, 70)]);
    }

    #[test]
    fn test_parse_selections_empty_and_malformed() {
        assert!(ComponentInstance::new("P1".to_string())
            .parse_selections()
            .unwrap()
            .is_empty());

        let broken = ComponentInstance::new("P1".to_string()).with_selections("{not json");
        assert!(broken.parse_selections().is_err());
    }

    #[test]
    fn test_opening_dimensions() {
        let opening = Opening::new("A".to_string())
            .with_panel(Panel::new(Decimal::from(36), Decimal::from(80)))
            .with_panel(Panel::new(Decimal::from(24), Decimal::from(96)));

        assert_eq!(opening.total_width(), Decimal::from(60));
        assert_eq!(opening.max_height(), Decimal::from(96));
        assert_eq!(opening.multiplier, Decimal::ONE);
        assert_eq!(opening.finish(), None);
    }
}
