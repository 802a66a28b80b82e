// ==========================================
// 公共采购流程管理 - 采购领域模型
// ==========================================
// 职责: 采购流程 / 标段 / 供应商 / 采购物料
// 对齐: db.rs 中的 process / lot / supplier / process_supplier / item 表
// ==========================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// Process - 采购流程 (Processo Licitatório)
// ==========================================
// 标段、物料、参与供应商的顶层归属
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub process_id: i64,
    pub number: String,               // 流程编号（如 "PL 012/2024"）
    pub object: Option<String>,       // 采购标的描述
    pub created_at: DateTime<Utc>,
}

// ==========================================
// Lot - 标段 (Lote)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lot {
    pub lot_id: i64,
    pub process_id: i64,
    pub number: String,               // 标段编号（自然键之一）
    pub description: Option<String>,  // 标段描述（自然键之一）
}

// ==========================================
// Supplier - 供应商 (Fornecedor)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: i64,
    pub name: String,
    pub document: Option<String>,     // CNPJ/CPF，仅保存数字
}

// ==========================================
// Item - 采购物料
// ==========================================
// 不变量: 必属一个流程；lot/supplier 若存在，必须登记在同一流程下
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i64,
    pub process_id: i64,
    pub lot_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub description: String,
    pub unit: String,
    pub quantity: Decimal,
    pub estimated_value: Decimal,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// NewItem - 待落库物料
// ==========================================
// 用途: 导入管道输出，由仓储层分配 item_id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub process_id: i64,
    pub lot_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub description: String,
    pub unit: String,
    pub quantity: Decimal,
    pub estimated_value: Decimal,
}
