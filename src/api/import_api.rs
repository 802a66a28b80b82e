// ==========================================
// 物料导入API
// ==========================================
// 职责: 校验流程存在 → 组装导入器 → 执行导入 → 汇总响应
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::import::ImportOutcome;
use crate::domain::procurement::Item;
use crate::importer::{ItemImporter, ItemImporterImpl};
use crate::repository::{ProcurementRepository, ProcurementRepositoryImpl};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{info, warn};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportItemsResponse {
    /// 目标流程ID
    pub process_id: i64,
    /// 源文件名（不含目录）
    pub file_name: String,
    /// 逐行结果汇总
    pub outcome: ImportOutcome,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

/// 导入API
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// 打开共享连接（建表幂等）
    fn open_connection(&self) -> ApiResult<Arc<Mutex<Connection>>> {
        let conn = open_sqlite_connection(&self.db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(format!("初始化数据库失败: {}", e)))?;
        Ok(Arc::new(Mutex::new(conn)))
    }

    fn create_importer(&self) -> ApiResult<ItemImporterImpl<ProcurementRepositoryImpl, ConfigManager>> {
        let conn = self.open_connection()?;
        let repo = ProcurementRepositoryImpl::from_connection(conn.clone())?;
        let config = ConfigManager::from_connection(conn)
            .map_err(|e| ApiError::InternalError(format!("创建配置管理器失败: {}", e)))?;
        Ok(ItemImporterImpl::new(repo, config))
    }

    /// 导入物料数据
    ///
    /// # 参数
    /// - process_id: 目标流程ID
    /// - file_path: 文件路径（.xlsx/.xls/.csv）
    ///
    /// # 返回
    /// - Ok(ImportItemsResponse): 导入结果（含逐行失败原因）
    /// - Err(ApiError::NotFound): 流程不存在
    /// - Err(ApiError::ImportError): 文件级错误，未导入任何行
    pub fn import_items(&self, process_id: i64, file_path: &str) -> ApiResult<ImportItemsResponse> {
        let start_time = Instant::now();

        let importer = self.create_importer()?;

        if importer.repository().find_process(process_id)?.is_none() {
            warn!(process_id, "流程不存在，拒绝导入");
            return Err(ApiError::NotFound(format!("Process(id={})不存在", process_id)));
        }

        let outcome = importer.import_file(process_id, file_path)?;

        let file_name = Path::new(file_path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());

        let elapsed_ms = start_time.elapsed().as_millis() as i64;
        info!(
            process_id,
            file_name = %file_name,
            created = outcome.created,
            failed = outcome.failed,
            elapsed_ms,
            "导入请求完成"
        );

        Ok(ImportItemsResponse {
            process_id,
            file_name,
            outcome,
            elapsed_ms,
        })
    }

    /// 列出流程下的物料
    pub fn list_items(&self, process_id: i64) -> ApiResult<Vec<Item>> {
        let repo = ProcurementRepositoryImpl::from_connection(self.open_connection()?)?;

        if repo.find_process(process_id)?.is_none() {
            return Err(ApiError::NotFound(format!("Process(id={})不存在", process_id)));
        }

        Ok(repo.list_items_by_process(process_id)?)
    }
}
