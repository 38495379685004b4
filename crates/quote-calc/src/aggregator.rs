//! BOM 彙總
//!
//! 逐開口、逐面板展開產品 BOM 範本，計算切料長度、完整零件編號與行成本。
//! 單一行計價失敗只會讓該行以 0 計，不會中斷整份 BOM。

use quote_catalog::CatalogSnapshot;
use quote_core::{
    BomLineTemplate, CategoryCosts, ComponentInstance, EngineConfig, FinishColor, MasterPart,
    Opening, Panel, PartType, PricedBomLine, PricingMode, Product,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::costing::{ExtrusionCosting, FallbackCost};
use crate::formula::{self, Variables};
use crate::rule_selector::StockRuleSelector;
use crate::{finish, glass, QuoteWarning};

/// 單一元件實例（面板）的 BOM
#[derive(Debug, Clone)]
pub struct ComponentBom {
    pub panel_id: Uuid,
    pub product_id: String,
    pub product_name: String,
    pub lines: Vec<PricedBomLine>,
}

/// 單一開口的 BOM（依元件實例分組）
#[derive(Debug, Clone)]
pub struct OpeningBom {
    pub opening_id: Uuid,
    pub opening_name: String,
    pub multiplier: Decimal,
    pub components: Vec<ComponentBom>,
    pub warnings: Vec<QuoteWarning>,
}

impl OpeningBom {
    /// 所有 BOM 行（依元件、範本順序）
    pub fn lines(&self) -> impl Iterator<Item = &PricedBomLine> {
        self.components.iter().flat_map(|c| c.lines.iter())
    }

    /// 依類別彙總成本（不含標準選配）
    pub fn category_costs(&self) -> CategoryCosts {
        let mut costs = CategoryCosts::default();
        for line in self.lines().filter(|l| !l.is_standard_option) {
            costs.add(line.part_type, line.cost);
        }
        costs
    }

    /// 標準選配成本（不套用加成）
    pub fn standard_option_cost(&self) -> Decimal {
        self.lines()
            .filter(|l| l.is_standard_option)
            .fold(Decimal::ZERO, |total, l| total.saturating_add(l.cost))
    }

    /// 排序後的 BOM 行
    pub fn sorted_lines(&self) -> Vec<PricedBomLine> {
        let mut lines: Vec<PricedBomLine> = self.lines().cloned().collect();
        sort_lines(&mut lines);
        lines
    }
}

/// BOM 行排序：開口名稱，再依零件類型（型材 < 五金 < 玻璃 < 其他）
///
/// 排序穩定，同類型維持加入順序。
pub fn sort_lines(lines: &mut [PricedBomLine]) {
    lines.sort_by(|a, b| {
        a.opening_name
            .cmp(&b.opening_name)
            .then_with(|| a.part_type.sort_priority().cmp(&b.part_type.sort_priority()))
    });
}

/// 單一面板計算時的共用資訊
struct PanelContext<'b> {
    opening: &'b Opening,
    panel: &'b Panel,
    product: &'b Product,
    finish: Option<FinishColor>,
}

impl PanelContext<'_> {
    fn blank_line(&self, part_name: String, part_type: PartType, unit: String) -> PricedBomLine {
        PricedBomLine {
            opening_id: self.opening.id,
            opening_name: self.opening.name.clone(),
            panel_id: self.panel.id,
            product_name: self.product.name.clone(),
            template_id: None,
            part_number: None,
            part_name,
            part_type,
            quantity: Decimal::ONE,
            cut_length: None,
            stock_length: None,
            area: None,
            unit,
            description: String::new(),
            cost: Decimal::ZERO,
            costing_method: None,
            add_to_packing_list: false,
            is_standard_option: false,
        }
    }

    fn note(&self, warnings: &mut Vec<QuoteWarning>, subject: &str, message: String) {
        tracing::debug!("[{}] {}: {}", self.opening.name, subject, message);
        warnings.push(QuoteWarning::info(
            self.opening.name.clone(),
            subject.to_string(),
            message,
        ));
    }

    fn warn(&self, warnings: &mut Vec<QuoteWarning>, subject: &str, message: String) {
        tracing::warn!("[{}] {}: {}", self.opening.name, subject, message);
        warnings.push(QuoteWarning::warning(
            self.opening.name.clone(),
            subject.to_string(),
            message,
        ));
    }
}

/// BOM 彙總器
pub struct BomAggregator<'a> {
    catalog: &'a CatalogSnapshot,
    config: &'a EngineConfig,
}

impl<'a> BomAggregator<'a> {
    /// 創建新的彙總器
    pub fn new(catalog: &'a CatalogSnapshot, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// 展開並計價單一開口
    pub fn build_opening(&self, opening: &Opening, mode: &PricingMode) -> OpeningBom {
        tracing::debug!(
            "展開開口 BOM: {}（面板 {} 片）",
            opening.name,
            opening.panels.len()
        );

        let finish = opening.finish();
        let mut warnings = Vec::new();
        let mut components = Vec::new();
        let mut opening_cost = Decimal::ZERO;

        for panel in &opening.panels {
            let Some(component) = &panel.component else {
                continue;
            };

            let Some(product) = self.catalog.product(&component.product_id) else {
                let message = format!("找不到產品 {}，面板略過", component.product_id);
                tracing::warn!("[{}] {}", opening.name, message);
                warnings.push(QuoteWarning::error(
                    opening.name.clone(),
                    component.product_id.clone(),
                    message,
                ));
                continue;
            };

            let ctx = PanelContext {
                opening,
                panel,
                product,
                finish,
            };

            let mut lines: Vec<PricedBomLine> = product
                .bom_lines
                .iter()
                .map(|template| self.price_template_line(&ctx, template, component, mode, &mut warnings))
                .collect();

            lines.extend(self.option_lines(&ctx, component, &mut warnings));
            lines.extend(self.glass_line(&ctx, &mut warnings));
            Self::zero_overflowing_lines(&ctx, &mut lines, &mut opening_cost, &mut warnings);

            components.push(ComponentBom {
                panel_id: panel.id,
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                lines,
            });
        }

        OpeningBom {
            opening_id: opening.id,
            opening_name: opening.name.clone(),
            multiplier: opening.multiplier,
            components,
            warnings,
        }
    }

    /// 計價單一 BOM 範本行
    fn price_template_line(
        &self,
        ctx: &PanelContext<'_>,
        template: &BomLineTemplate,
        component: &ComponentInstance,
        mode: &PricingMode,
        warnings: &mut Vec<QuoteWarning>,
    ) -> PricedBomLine {
        let quantity =
            template.resolve_quantity(component.quantity_choices.get(&template.id).copied());
        let variables = formula::bindings(ctx.panel.width, ctx.panel.height, quantity);
        let subject = template
            .part_number
            .clone()
            .unwrap_or_else(|| template.part_name.clone());

        let part = template.part_number.as_deref().and_then(|pn| {
            let part = self.catalog.part(pn);
            if part.is_none() {
                ctx.warn(warnings, &subject, format!("目錄中找不到零件 {}", pn));
            }
            part
        });

        let is_extrusion = template.part_type == PartType::Extrusion;

        // 型材：公式為切料長度
        let cut_length = if is_extrusion && template.formula.is_some() {
            Some(self.eval(ctx, template, &variables, &subject, warnings))
        } else {
            None
        };

        let rule = part.filter(|_| is_extrusion).and_then(|p| {
            StockRuleSelector::select_best(&p.stock_length_rules, ctx.panel.width, ctx.panel.height)
        });
        if is_extrusion && part.is_some() && rule.is_none() {
            ctx.note(
                warnings,
                &subject,
                format!(
                    "無適用長料規則（{} x {}），改用退回計價",
                    ctx.panel.width, ctx.panel.height
                ),
            );
        }

        let mut costing_method = None;
        let mut stock_length = rule.filter(|r| r.has_usable_length()).map(|r| r.stock_length);

        let cost = if let Some(unit_cost) = template.cost {
            unit_cost.checked_mul(quantity).unwrap_or(Decimal::ZERO)
        } else if template.part_number.is_some() {
            if is_extrusion {
                let method = part
                    .and_then(|p| p.costing_method)
                    .unwrap_or(mode.extrusion_costing_method);
                let fallback = match (part.and_then(|p| p.cost), cut_length) {
                    (Some(unit_cost), _) => FallbackCost::Flat(unit_cost),
                    (None, Some(value)) => FallbackCost::Formula(value),
                    (None, None) => FallbackCost::Nothing,
                };
                let priced = ExtrusionCosting::price(
                    cut_length.unwrap_or(Decimal::ZERO),
                    quantity,
                    rule,
                    method,
                    fallback,
                    self.config,
                );
                costing_method = priced.method;
                stock_length = priced.stock_length.or(stock_length);
                priced.cost
            } else {
                self.price_catalog_line(ctx, template, part, quantity, &variables, &subject, warnings)
            }
        } else if template.formula.is_some() {
            self.eval(ctx, template, &variables, &subject, warnings)
        } else {
            Decimal::ZERO
        };

        let part_number = template.part_number.as_deref().map(|base| {
            let apply_color =
                template.add_finish_to_part_number && !part.map_or(false, |p| p.is_mill_finish);
            let stock = if is_extrusion { stock_length } else { None };
            finish::finish_part_number(base, ctx.finish, stock, apply_color)
        });

        let part_name = if template.part_name.trim().is_empty() {
            part.map(|p| p.base_name.clone()).unwrap_or_default()
        } else {
            template.part_name.clone()
        };
        let description = template
            .description
            .clone()
            .or_else(|| part.map(|p| p.base_name.clone()))
            .unwrap_or_default();

        let mut line = ctx.blank_line(part_name, template.part_type, template.unit.clone());
        line.template_id = Some(template.id);
        line.part_number = part_number;
        line.quantity = quantity;
        line.cut_length = cut_length;
        line.stock_length = if is_extrusion { stock_length } else { None };
        line.description = description;
        line.cost = cost.max(Decimal::ZERO);
        line.costing_method = costing_method;
        line.add_to_packing_list = template.add_to_packing_list;

        tracing::debug!(
            "[{}] BOM 行 {}: 數量 {} 切料 {:?} 成本 {}",
            ctx.opening.name,
            line.part_number.as_deref().unwrap_or(&line.part_name),
            line.quantity,
            line.cut_length,
            line.cost
        );

        line
    }

    /// 開口累計成本溢位時，造成溢位的行以 0 計
    fn zero_overflowing_lines(
        ctx: &PanelContext<'_>,
        lines: &mut [PricedBomLine],
        opening_cost: &mut Decimal,
        warnings: &mut Vec<QuoteWarning>,
    ) {
        for line in lines.iter_mut() {
            match opening_cost.checked_add(line.cost) {
                Some(total) => *opening_cost = total,
                None => {
                    let subject = line
                        .part_number
                        .clone()
                        .unwrap_or_else(|| line.part_name.clone());
                    ctx.warn(
                        warnings,
                        &subject,
                        format!("成本 {} 使開口總成本溢位，以 0 計", line.cost),
                    );
                    line.cost = Decimal::ZERO;
                }
            }
        }
    }

    /// 非型材的目錄零件：計價規則 → 固定單價 → 公式 → 0
    #[allow(clippy::too_many_arguments)]
    fn price_catalog_line(
        &self,
        ctx: &PanelContext<'_>,
        template: &BomLineTemplate,
        part: Option<&MasterPart>,
        quantity: Decimal,
        variables: &Variables,
        subject: &str,
        warnings: &mut Vec<QuoteWarning>,
    ) -> Decimal {
        if let Some(rule) = part.and_then(MasterPart::active_pricing_rule) {
            return rule.base_price.checked_mul(quantity).unwrap_or(Decimal::ZERO);
        }
        if let Some(unit_cost) = part.and_then(|p| p.cost) {
            return unit_cost.checked_mul(quantity).unwrap_or(Decimal::ZERO);
        }
        if template.formula.is_some() {
            return self.eval(ctx, template, variables, subject, warnings);
        }
        Decimal::ZERO
    }

    /// 計算範本公式，失敗時以 0 計並（依配置）標記
    fn eval(
        &self,
        ctx: &PanelContext<'_>,
        template: &BomLineTemplate,
        variables: &Variables,
        subject: &str,
        warnings: &mut Vec<QuoteWarning>,
    ) -> Decimal {
        match formula::try_evaluate(template.formula.as_deref(), variables) {
            Ok(value) => value,
            Err(err) => {
                if self.config.flag_zero_cost_lines {
                    ctx.warn(
                        warnings,
                        subject,
                        format!(
                            "公式 {:?} 計算失敗（{}），以 0 計",
                            template.formula.as_deref().unwrap_or_default(),
                            err
                        ),
                    );
                }
                Decimal::ZERO
            }
        }
    }

    /// 標準選配行（成本不套用加成）
    fn option_lines(
        &self,
        ctx: &PanelContext<'_>,
        component: &ComponentInstance,
        warnings: &mut Vec<QuoteWarning>,
    ) -> Vec<PricedBomLine> {
        let selections = match component.parse_selections() {
            Ok(selections) => selections,
            Err(err) => {
                ctx.warn(
                    warnings,
                    &ctx.product.name,
                    format!("選配資料無法解析，忽略選配: {}", err),
                );
                return Vec::new();
            }
        };

        let mut lines = Vec::new();
        for (category_id, option_id) in selections {
            let Some(category) = ctx.product.sub_option(category_id) else {
                ctx.warn(
                    warnings,
                    &ctx.product.name,
                    format!("找不到選配類別 {}", category_id),
                );
                continue;
            };
            let Some(option) = category.option(option_id) else {
                ctx.warn(
                    warnings,
                    &category.name,
                    format!("找不到選配項目 {}", option_id),
                );
                continue;
            };

            let mut line = ctx.blank_line(
                format!("{}: {}", category.name, option.name),
                PartType::Hardware,
                self.config.option_unit.clone(),
            );
            line.part_number = option.part_number.clone();
            line.description = category.name.clone();
            line.cost = option.price.max(Decimal::ZERO);
            line.is_standard_option = true;
            lines.push(line);
        }
        lines
    }

    /// 面板玻璃行
    fn glass_line(
        &self,
        ctx: &PanelContext<'_>,
        warnings: &mut Vec<QuoteWarning>,
    ) -> Option<PricedBomLine> {
        let glass_type = ctx.panel.glass_type.as_deref()?.trim();
        if self.config.skips_glass(glass_type) {
            return None;
        }

        let (size, errors) = glass::glass_size(
            ctx.panel.width,
            ctx.panel.height,
            &ctx.product.glass_offsets,
            self.config,
        );
        for err in errors {
            ctx.warn(warnings, glass_type, format!("玻璃偏移公式計算失敗（{}），以 0 計", err));
        }

        let cost = match self.catalog.glass_type(glass_type) {
            Some(glass) => glass
                .price_per_sq_ft
                .checked_mul(size.area)
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO),
            None => {
                ctx.warn(warnings, glass_type, "未設定玻璃單價，以 0 計".to_string());
                Decimal::ZERO
            }
        };

        let mut line = ctx.blank_line(
            glass_type.to_string(),
            PartType::Glass,
            self.config.glass_unit.clone(),
        );
        line.area = Some(size.area);
        line.description = format!(
            "{}\" x {}\" {}",
            size.width.normalize(),
            size.height.normalize(),
            glass_type
        );
        line.cost = cost;
        Some(line)
    }
}
