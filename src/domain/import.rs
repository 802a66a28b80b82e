// ==========================================
// 公共采购流程管理 - 导入领域模型
// ==========================================
// 职责: 导入中间结构（ImportRow）与导入结果（ImportOutcome）
// 生命周期: 仅在一次导入调用内，不落库
// ==========================================

use crate::domain::types::RowFailure;
use serde::{Deserialize, Serialize};

// ==========================================
// RawCell - 原始单元格
// ==========================================
// 保留表格原生类型：日期单元格必须能与文本区分
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawCell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(String),
    Error(String),
}

impl RawCell {
    /// 空单元格或纯空白文本
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 以文本形式读取（TRIM 后），空值返回 None
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            RawCell::Empty | RawCell::Error(_) => return None,
            RawCell::Text(s) => s.trim().to_string(),
            RawCell::Int(i) => i.to_string(),
            RawCell::Float(f) => f.to_string(),
            RawCell::Bool(b) => b.to_string(),
            RawCell::DateTime(s) => s.trim().to_string(),
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ==========================================
// ImportRow - 导入行
// ==========================================
// 表头映射后的一行；row_index 从 1 开始，不含表头
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRow {
    pub row_index: usize,
    pub description: RawCell,
    pub unit: RawCell,
    pub quantity: RawCell,
    pub estimated_value: RawCell,
    pub lot: RawCell,
    pub supplier: RawCell,
}

impl ImportRow {
    /// 所有已识别字段均为空
    pub fn is_blank(&self) -> bool {
        [
            &self.description,
            &self.unit,
            &self.quantity,
            &self.estimated_value,
            &self.lot,
            &self.supplier,
        ]
        .iter()
        .all(|c| c.is_empty())
    }
}

// ==========================================
// RowError - 行级错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub reason: String,
}

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
// 不变量:
// - created + failed == total_rows（空白行不计入 total_rows）
// - errors 按 row 严格递增
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub total_rows: usize,
    pub created: usize,
    pub failed: usize,
    pub skipped_blank: usize,
    pub errors: Vec<RowError>,
}

impl ImportOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&mut self) {
        self.total_rows += 1;
        self.created += 1;
    }

    pub fn record_failure(&mut self, row: usize, failure: RowFailure) {
        self.total_rows += 1;
        self.failed += 1;
        self.errors.push(RowError {
            row,
            reason: failure.reason().to_string(),
        });
    }

    pub fn record_blank(&mut self) {
        self.skipped_blank += 1;
    }
}
