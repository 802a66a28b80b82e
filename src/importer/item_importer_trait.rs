// ==========================================
// 公共采购流程管理 - 物料导入 Trait
// ==========================================
// 职责: 定义物料批量导入接口（不包含实现）
// ==========================================

use crate::domain::import::ImportOutcome;
use crate::domain::types::SourceFormat;
use crate::importer::error::ImportResult;
use crate::importer::reference_resolver::ReferenceSnapshot;
use std::path::Path;

// ==========================================
// ItemImporter Trait
// ==========================================
// 用途: 物料导入主接口
// 实现者: ItemImporterImpl
pub trait ItemImporter: Send + Sync {
    /// 按流程读取参照快照（标段 + 参与供应商）
    fn load_references(&self, process_id: i64) -> ImportResult<ReferenceSnapshot>;

    /// 从字节流导入，参照数据由调用方提供
    ///
    /// # 参数
    /// - bytes: 文件内容
    /// - format: 源文件格式
    /// - references: 目标流程的参照快照（决定物料归属流程）
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 逐行结果汇总（行级失败不会中止）
    /// - Err: 文件级错误（容器损坏、缺少必需表头列），此时不处理任何行
    ///
    /// # 导入流程
    /// 1. 文件解析（表头 + 原始单元格）
    /// 2. 表头映射（缺必需列 → 文件级失败）
    /// 3. 逐行: 空白跳过 → 校验 → 落库 / 记录失败原因
    fn import_with_references(
        &self,
        bytes: &[u8],
        format: SourceFormat,
        references: &ReferenceSnapshot,
    ) -> ImportResult<ImportOutcome>;

    /// 从字节流导入，参照数据从仓储读取
    fn import_bytes(
        &self,
        process_id: i64,
        bytes: &[u8],
        format: SourceFormat,
    ) -> ImportResult<ImportOutcome> {
        let references = self.load_references(process_id)?;
        self.import_with_references(bytes, format, &references)
    }

    /// 从文件导入（按扩展名识别格式）
    fn import_file<P: AsRef<Path>>(&self, process_id: i64, file_path: P) -> ImportResult<ImportOutcome>;
}
