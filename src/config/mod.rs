// ==========================================
// 公共采购流程管理 - 配置层
// ==========================================
// 职责: 导入配置读取
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ImportConfigReader, StaticImportConfig};

/// 默认数据库路径
///
/// 优先级: 环境变量 LICITACAO_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("LICITACAO_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./licitacao.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("licitacao-import");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("licitacao.db");
        }
    }

    path.to_string_lossy().to_string()
}
