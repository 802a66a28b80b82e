// ==========================================
// 公共采购流程管理 - 参照数据解析
// ==========================================
// 职责: 流程下标段/供应商的只读快照，按自然键解析引用
// 规则:
// - 标段: 编号优先，其次描述（不区分大小写）
// - 供应商: 名称（不区分大小写），或证件号（仅比较数字）
// ==========================================

use crate::domain::procurement::{Lot, Supplier};
use std::collections::HashMap;

fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 引用看起来像证件号时返回其数字部分
fn document_digits(raw: &str) -> Option<String> {
    let looks_like_document = raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '/' | '-' | ' '));
    if !looks_like_document {
        return None;
    }

    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

// ==========================================
// ReferenceSnapshot - 参照快照
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReferenceSnapshot {
    process_id: i64,
    lots_by_number: HashMap<String, i64>,
    lots_by_description: HashMap<String, i64>,
    suppliers_by_name: HashMap<String, i64>,
    suppliers_by_document: HashMap<String, i64>,
}

impl ReferenceSnapshot {
    /// 构建快照；不属于该流程的标段被忽略
    pub fn new(process_id: i64, lots: &[Lot], suppliers: &[Supplier]) -> Self {
        let mut snapshot = Self {
            process_id,
            ..Default::default()
        };

        for lot in lots.iter().filter(|l| l.process_id == process_id) {
            snapshot
                .lots_by_number
                .entry(normalize_key(&lot.number))
                .or_insert(lot.lot_id);

            if let Some(desc) = lot.description.as_deref() {
                let key = normalize_key(desc);
                if !key.is_empty() {
                    snapshot.lots_by_description.entry(key).or_insert(lot.lot_id);
                }
            }
        }

        for supplier in suppliers {
            snapshot
                .suppliers_by_name
                .entry(normalize_key(&supplier.name))
                .or_insert(supplier.supplier_id);

            if let Some(digits) = supplier.document.as_deref().and_then(document_digits) {
                snapshot
                    .suppliers_by_document
                    .entry(digits)
                    .or_insert(supplier.supplier_id);
            }
        }

        snapshot
    }

    pub fn process_id(&self) -> i64 {
        self.process_id
    }

    pub fn lot_count(&self) -> usize {
        self.lots_by_number.len()
    }

    pub fn supplier_count(&self) -> usize {
        self.suppliers_by_name.len()
    }

    /// 解析标段引用
    pub fn resolve_lot(&self, reference: &str) -> Option<i64> {
        let key = normalize_key(reference);
        self.lots_by_number
            .get(&key)
            .or_else(|| self.lots_by_description.get(&key))
            .copied()
    }

    /// 解析供应商引用
    pub fn resolve_supplier(&self, reference: &str) -> Option<i64> {
        if let Some(id) = self.suppliers_by_name.get(&normalize_key(reference)) {
            return Some(*id);
        }
        document_digits(reference).and_then(|digits| self.suppliers_by_document.get(&digits).copied())
    }
}
