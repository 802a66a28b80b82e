// ==========================================
// 公共采购流程管理 - 物料批量导入核心库
// ==========================================
// 技术栈: Rust + SQLite + calamine
// 系统定位: 从表格文件向采购流程批量导入物料
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ImportField, RowFailure, SourceFormat};

// 领域实体
pub use domain::{ImportOutcome, ImportRow, Item, Lot, NewItem, Process, RowError, Supplier};

// 导入器
pub use importer::{ImportError, ItemImporter, ItemImporterImpl, ReferenceSnapshot};

// API
pub use api::{ApiError, ImportApi, ImportItemsResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "licitacao-import";
