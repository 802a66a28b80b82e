// ==========================================
// 公共采购流程管理 - 采购数据 Repository Trait
// ==========================================
// 职责: 定义导入相关数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::procurement::{Item, Lot, NewItem, Process, Supplier};
use crate::repository::error::RepositoryResult;

// ==========================================
// ProcurementRepository Trait
// ==========================================
// 用途: 导入器只依赖此接口，不依赖具体存储引擎
// 实现者: ProcurementRepositoryImpl（使用 rusqlite）
pub trait ProcurementRepository: Send + Sync {
    // ===== 导入所需的只读查询 =====

    /// 按 ID 查询采购流程
    ///
    /// # 返回
    /// - Ok(Some(Process)): 存在
    /// - Ok(None): 不存在
    fn find_process(&self, process_id: i64) -> RepositoryResult<Option<Process>>;

    /// 查询流程下的全部标段
    fn find_lots_by_process(&self, process_id: i64) -> RepositoryResult<Vec<Lot>>;

    /// 查询参与该流程的全部供应商
    fn find_suppliers_by_process(&self, process_id: i64) -> RepositoryResult<Vec<Supplier>>;

    // ===== 写入 =====

    /// 新建物料（单行即一个工作单元，不跨行事务）
    ///
    /// # 返回
    /// - Ok(i64): 新物料 item_id
    fn create_item(&self, item: NewItem) -> RepositoryResult<i64>;

    /// 查询流程下的物料（按 item_id 升序）
    fn list_items_by_process(&self, process_id: i64) -> RepositoryResult<Vec<Item>>;

    // ===== 基础数据登记 =====

    fn insert_process(&self, number: &str, object: Option<&str>) -> RepositoryResult<i64>;

    fn insert_lot(
        &self,
        process_id: i64,
        number: &str,
        description: Option<&str>,
    ) -> RepositoryResult<i64>;

    fn insert_supplier(&self, name: &str, document: Option<&str>) -> RepositoryResult<i64>;

    /// 登记供应商参与流程（重复登记忽略）
    fn add_participation(&self, process_id: i64, supplier_id: i64) -> RepositoryResult<()>;
}
