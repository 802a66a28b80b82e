// ==========================================
// 公共采购流程管理 - 领域模型层
// ==========================================
// 职责: 定义领域实体、导入中间结构、类型
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod import;
pub mod procurement;
pub mod types;

// 重导出核心类型
pub use import::{ImportOutcome, ImportRow, RawCell, RowError};
pub use procurement::{Item, Lot, NewItem, Process, Supplier};
pub use types::{ImportField, RowFailure, SourceFormat};
