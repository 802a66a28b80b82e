// ==========================================
// 公共采购流程管理 - 导入层
// ==========================================
// 职责: 表格文件 → 物料记录
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod header_mapper;
pub mod item_importer_impl;
pub mod item_importer_trait;
pub mod reference_resolver;
pub mod row_validator;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, SheetTable, UniversalFileParser};
pub use header_mapper::HeaderMap;
pub use item_importer_impl::ItemImporterImpl;
pub use item_importer_trait::ItemImporter;
pub use reference_resolver::ReferenceSnapshot;
pub use row_validator::RowValidator;
