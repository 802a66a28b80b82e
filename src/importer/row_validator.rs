// ==========================================
// 公共采购流程管理 - 行校验器
// ==========================================
// 阶段 2: ImportRow → NewItem 或 RowFailure
// 校验顺序: 描述 → 单位 → 数量 → 预估金额 → 标段 → 供应商
// 只返回第一个失败原因
// ==========================================
// 数值: rust_decimal 定点数，不经过二进制浮点舍入
// ==========================================

use crate::domain::import::{ImportRow, RawCell};
use crate::domain::procurement::NewItem;
use crate::domain::types::RowFailure;
use crate::importer::reference_resolver::ReferenceSnapshot;
use rust_decimal::Decimal;
use std::str::FromStr;

/// 默认金额小数位
pub const DEFAULT_MONETARY_SCALE: u32 = 2;

/// 数值解析失败（具体原因由调用方映射为 RowFailure）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotANumber;

/// 解析数值文本
///
/// 支持: "1234.56" / "1234,56" / "1.234,56" / "1,234.56" / "R$ 1.234,56" / "1e3"
///
/// 仅含一个 '.' 时视为小数点："1.000" 为 1，不是一千
pub fn parse_decimal_text(raw: &str) -> Result<Decimal, NotANumber> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    if cleaned.is_empty() {
        return Err(NotANumber);
    }

    let last_dot = cleaned.rfind('.');
    let last_comma = cleaned.rfind(',');
    let dots = cleaned.matches('.').count();
    let commas = cleaned.matches(',').count();

    let normalized = match (last_dot, last_comma) {
        // 两种分隔符并存：靠后的一个是小数点
        (Some(d), Some(c)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) if commas == 1 => cleaned.replace(',', "."),
        (None, Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) if dots > 1 => cleaned.replace('.', ""),
        _ => cleaned.to_string(),
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| NotANumber)
}

/// 解析数值单元格
///
/// # 返回
/// - Ok(None): 空单元格
/// - Ok(Some(Decimal)): 数值或数值文本
/// - Err: 日期/时间单元格、布尔、错误单元格、非数值文本
pub fn parse_decimal_cell(cell: &RawCell) -> Result<Option<Decimal>, NotANumber> {
    match cell {
        RawCell::Empty => Ok(None),
        RawCell::Text(s) if s.trim().is_empty() => Ok(None),
        RawCell::Text(s) => parse_decimal_text(s).map(Some),
        RawCell::Int(i) => Ok(Some(Decimal::from(*i))),
        RawCell::Float(f) => {
            if !f.is_finite() {
                return Err(NotANumber);
            }
            // 经最短往返文本转换，保留表格显示的十进制值
            parse_decimal_text(&f.to_string()).map(Some)
        }
        // 日期序列号不能当作数量，直接拒绝
        RawCell::DateTime(_) | RawCell::Bool(_) | RawCell::Error(_) => Err(NotANumber),
    }
}

// ==========================================
// RowValidator - 行校验器
// ==========================================
pub struct RowValidator {
    monetary_scale: u32,
}

impl RowValidator {
    pub fn new(monetary_scale: u32) -> Self {
        Self {
            monetary_scale: monetary_scale.max(DEFAULT_MONETARY_SCALE),
        }
    }

    /// 校验一行并构造待落库物料
    pub fn validate(
        &self,
        row: &ImportRow,
        references: &ReferenceSnapshot,
    ) -> Result<NewItem, RowFailure> {
        let description = row
            .description
            .as_text()
            .ok_or(RowFailure::MissingDescription)?;

        let unit = row.unit.as_text().unwrap_or_default();

        let quantity = self.parse_quantity(&row.quantity)?;
        let estimated_value = self.parse_estimated_value(&row.estimated_value)?;

        let lot_id = match row.lot.as_text() {
            None => None,
            Some(reference) => Some(
                references
                    .resolve_lot(&reference)
                    .ok_or(RowFailure::LotNotFound)?,
            ),
        };

        let supplier_id = match row.supplier.as_text() {
            None => None,
            Some(reference) => Some(
                references
                    .resolve_supplier(&reference)
                    .ok_or(RowFailure::SupplierNotFound)?,
            ),
        };

        Ok(NewItem {
            process_id: references.process_id(),
            lot_id,
            supplier_id,
            description,
            unit,
            quantity,
            estimated_value,
        })
    }

    fn parse_quantity(&self, cell: &RawCell) -> Result<Decimal, RowFailure> {
        let quantity = parse_decimal_cell(cell)
            .ok()
            .flatten()
            .ok_or(RowFailure::InvalidQuantity)?;

        if quantity.is_sign_negative() && !quantity.is_zero() {
            return Err(RowFailure::InvalidQuantity);
        }
        Ok(quantity)
    }

    fn parse_estimated_value(&self, cell: &RawCell) -> Result<Decimal, RowFailure> {
        let mut value = parse_decimal_cell(cell)
            .ok()
            .flatten()
            .ok_or(RowFailure::InvalidEstimatedValue)?;

        if value.is_sign_negative() && !value.is_zero() {
            return Err(RowFailure::NegativeValue);
        }

        if value.scale() < self.monetary_scale {
            value.rescale(self.monetary_scale);
        }
        Ok(value)
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MONETARY_SCALE)
    }
}
