// ==========================================
// 公共采购流程管理 - 表头映射器
// ==========================================
// 阶段 1: 源表头 → 标准字段（别名，不区分大小写）
// ==========================================

use crate::domain::import::{ImportRow, RawCell};
use crate::domain::types::ImportField;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

/// 表头规范化：TRIM + 小写 + '_'/'-' 视为空格 + 合并连续空格
fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 字段别名表（已规范化）
fn aliases(field: ImportField) -> &'static [&'static str] {
    match field {
        ImportField::Description => &[
            "description",
            "descrição",
            "descricao",
            "especificação",
            "especificacao",
            "item",
        ],
        ImportField::Unit => &["unit", "unidade", "unid", "und", "un"],
        ImportField::Quantity => &["quantity", "quantidade", "quant", "qtde", "qtd"],
        ImportField::EstimatedValue => &[
            "estimated value",
            "valor estimado",
            "valor unitário",
            "valor unitario",
            "preço estimado",
            "preco estimado",
            "valor",
        ],
        ImportField::Lot => &["lot", "lot reference", "lote"],
        ImportField::Supplier => &["supplier", "supplier reference", "fornecedor", "razão social"],
    }
}

/// 表头 → (字段, 别名序号)；序号越小优先级越高
fn field_for_header(header: &str) -> Option<(ImportField, usize)> {
    let normalized = normalize_header(header);
    if normalized.is_empty() {
        return None;
    }
    ImportField::ALL.iter().copied().find_map(|field| {
        aliases(field)
            .iter()
            .position(|alias| *alias == normalized)
            .map(|rank| (field, rank))
    })
}

// ==========================================
// HeaderMap - 字段 → 列序号
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMap {
    positions: HashMap<ImportField, usize>,
}

impl HeaderMap {
    /// 解析表头行
    ///
    /// # 返回
    /// - Ok(HeaderMap): 必需列齐全
    /// - Err(MissingHeaders): 列出全部缺失的必需列
    pub fn from_headers(headers: &[String]) -> ImportResult<Self> {
        // 字段 → (列序号, 别名序号)
        let mut matched: HashMap<ImportField, (usize, usize)> = HashMap::new();
        for (col_idx, header) in headers.iter().enumerate() {
            if let Some((field, rank)) = field_for_header(header) {
                // 多列命中同一字段：别名序号小者优先，相同时取靠左列
                match matched.get(&field) {
                    Some((_, best)) if *best <= rank => {}
                    _ => {
                        matched.insert(field, (col_idx, rank));
                    }
                }
            }
        }
        let positions: HashMap<ImportField, usize> = matched
            .into_iter()
            .map(|(field, (col_idx, _))| (field, col_idx))
            .collect();

        let missing: Vec<String> = ImportField::ALL
            .iter()
            .filter(|f| f.is_required() && !positions.contains_key(f))
            .map(|f| f.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ImportError::MissingHeaders(missing));
        }

        Ok(Self { positions })
    }

    pub fn position(&self, field: ImportField) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    fn cell(&self, cells: &[RawCell], field: ImportField) -> RawCell {
        self.position(field)
            .and_then(|idx| cells.get(idx))
            .cloned()
            .unwrap_or_default()
    }

    /// 原始单元格行 → ImportRow
    pub fn map_row(&self, cells: &[RawCell], row_index: usize) -> ImportRow {
        ImportRow {
            row_index,
            description: self.cell(cells, ImportField::Description),
            unit: self.cell(cells, ImportField::Unit),
            quantity: self.cell(cells, ImportField::Quantity),
            estimated_value: self.cell(cells, ImportField::EstimatedValue),
            lot: self.cell(cells, ImportField::Lot),
            supplier: self.cell(cells, ImportField::Supplier),
        }
    }
}
