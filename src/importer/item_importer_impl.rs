// ==========================================
// 公共采购流程管理 - 物料导入器实现
// ==========================================
// 职责: 整合导入流程，从字节流到数据库
// 流程: 解析 → 表头映射 → 逐行(空白跳过 → 校验 → 落库)
// ==========================================
// 约束:
// - 严格按文件行序处理，单线程同步执行
// - 每行独立落库，后续行失败不回滚已创建物料
// - 同一流程的并发导入不加锁，由调用方保证
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::import::ImportOutcome;
use crate::domain::procurement::NewItem;
use crate::domain::types::{RowFailure, SourceFormat};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{SheetTable, UniversalFileParser};
use crate::importer::header_mapper::HeaderMap;
use crate::importer::item_importer_trait::ItemImporter;
use crate::importer::reference_resolver::ReferenceSnapshot;
use crate::importer::row_validator::RowValidator;
use crate::repository::ProcurementRepository;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ItemImporterImpl - 物料导入器实现
// ==========================================
pub struct ItemImporterImpl<R, C>
where
    R: ProcurementRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    repo: R,

    // 配置读取器
    config: C,
}

impl<R, C> ItemImporterImpl<R, C>
where
    R: ProcurementRepository,
    C: ImportConfigReader,
{
    /// 创建新的 ItemImporter 实例
    pub fn new(repo: R, config: C) -> Self {
        Self { repo, config }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn file_parser(&self) -> ImportResult<UniversalFileParser> {
        let sheet_name = self
            .config
            .get_sheet_name()
            .map_err(|e| ImportError::ConfigReadError(e.to_string()))?;
        Ok(UniversalFileParser::new(sheet_name))
    }

    /// 对已解析表格执行逐行导入
    ///
    /// # 返回
    /// - Err(MissingHeaders): 缺少必需表头列，不处理任何行
    #[instrument(skip(self, table, references), fields(process_id = references.process_id(), import_id = tracing::field::Empty))]
    pub fn import_table(
        &self,
        table: &SheetTable,
        references: &ReferenceSnapshot,
    ) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let import_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("import_id", import_id.as_str());

        let header_map = HeaderMap::from_headers(&table.headers).map_err(|e| {
            error!(headers = ?table.headers, error = %e, "表头校验失败");
            e
        })?;

        let monetary_scale = self
            .config
            .get_monetary_scale()
            .map_err(|e| ImportError::ConfigReadError(e.to_string()))?;
        let max_logged_failures = self
            .config
            .get_max_logged_failures()
            .map_err(|e| ImportError::ConfigReadError(e.to_string()))?;
        let validator = RowValidator::new(monetary_scale);

        info!(
            rows = table.rows.len(),
            lots = references.lot_count(),
            suppliers = references.supplier_count(),
            "开始导入物料"
        );

        let mut outcome = ImportOutcome::new();
        for (idx, cells) in table.rows.iter().enumerate() {
            let row = header_map.map_row(cells, idx + 1);

            // 跳过完全空白的行（不计入 total_rows）
            if row.is_blank() {
                outcome.record_blank();
                continue;
            }

            let result = validator
                .validate(&row, references)
                .and_then(|item| self.persist_item(row.row_index, item));

            match result {
                Ok(item_id) => {
                    debug!(row = row.row_index, item_id, "物料已创建");
                    outcome.record_created();
                }
                Err(failure) => {
                    if outcome.failed < max_logged_failures {
                        warn!(row = row.row_index, reason = %failure, "行校验失败");
                    }
                    outcome.record_failure(row.row_index, failure);
                }
            }
        }

        info!(
            total = outcome.total_rows,
            created = outcome.created,
            failed = outcome.failed,
            skipped_blank = outcome.skipped_blank,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "物料导入完成"
        );

        Ok(outcome)
    }

    /// 单行落库；存储错误转为行级失败
    fn persist_item(&self, row: usize, item: NewItem) -> Result<i64, RowFailure> {
        self.repo.create_item(item).map_err(|e| {
            error!(row, error = %e, "物料落库失败");
            RowFailure::PersistenceFailed
        })
    }
}

impl<R, C> ItemImporter for ItemImporterImpl<R, C>
where
    R: ProcurementRepository,
    C: ImportConfigReader,
{
    fn load_references(&self, process_id: i64) -> ImportResult<ReferenceSnapshot> {
        let lots = self.repo.find_lots_by_process(process_id)?;
        let suppliers = self.repo.find_suppliers_by_process(process_id)?;
        debug!(process_id, lots = lots.len(), suppliers = suppliers.len(), "参照数据加载完成");
        Ok(ReferenceSnapshot::new(process_id, &lots, &suppliers))
    }

    fn import_with_references(
        &self,
        bytes: &[u8],
        format: SourceFormat,
        references: &ReferenceSnapshot,
    ) -> ImportResult<ImportOutcome> {
        debug!(format = %format, size = bytes.len(), "解析文件");
        let table = self.file_parser()?.parse(bytes, format).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        self.import_table(&table, references)
    }

    fn import_file<P: AsRef<Path>>(&self, process_id: i64, file_path: P) -> ImportResult<ImportOutcome> {
        let path = file_path.as_ref();
        info!(process_id, file_path = %path.display(), "读取导入文件");

        // 先解析文件：文件级错误时不访问参照数据
        let table = self.file_parser()?.parse_file(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        let references = self.load_references(process_id)?;
        self.import_table(&table, &references)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticImportConfig;
    use crate::domain::import::{RawCell, RowError};
    use crate::domain::procurement::{Item, Lot, Process, Supplier};
    use crate::repository::{RepositoryError, RepositoryResult};
    use std::sync::Mutex;

    // ==========================================
    // InMemoryRepository - 测试用仓储
    // ==========================================
    #[derive(Default)]
    struct InMemoryRepository {
        lots: Vec<Lot>,
        suppliers: Vec<Supplier>,
        created: Mutex<Vec<NewItem>>,
        fail_on_description: Option<String>,
    }

    impl ProcurementRepository for InMemoryRepository {
        fn find_process(&self, _process_id: i64) -> RepositoryResult<Option<Process>> {
            Ok(None)
        }

        fn find_lots_by_process(&self, process_id: i64) -> RepositoryResult<Vec<Lot>> {
            Ok(self
                .lots
                .iter()
                .filter(|l| l.process_id == process_id)
                .cloned()
                .collect())
        }

        fn find_suppliers_by_process(&self, _process_id: i64) -> RepositoryResult<Vec<Supplier>> {
            Ok(self.suppliers.clone())
        }

        fn create_item(&self, item: NewItem) -> RepositoryResult<i64> {
            if self.fail_on_description.as_deref() == Some(item.description.as_str()) {
                return Err(RepositoryError::DatabaseQueryError("disk I/O error".to_string()));
            }
            let mut created = self.created.lock().unwrap();
            created.push(item);
            Ok(created.len() as i64)
        }

        fn list_items_by_process(&self, _process_id: i64) -> RepositoryResult<Vec<Item>> {
            Ok(Vec::new())
        }

        fn insert_process(&self, _number: &str, _object: Option<&str>) -> RepositoryResult<i64> {
            Ok(1)
        }

        fn insert_lot(&self, _: i64, _: &str, _: Option<&str>) -> RepositoryResult<i64> {
            Ok(1)
        }

        fn insert_supplier(&self, _: &str, _: Option<&str>) -> RepositoryResult<i64> {
            Ok(1)
        }

        fn add_participation(&self, _: i64, _: i64) -> RepositoryResult<()> {
            Ok(())
        }
    }

    fn repo_with_lot() -> InMemoryRepository {
        InMemoryRepository {
            lots: vec![Lot {
                lot_id: 11,
                process_id: 1,
                number: "L1".to_string(),
                description: Some("Papelaria".to_string()),
            }],
            suppliers: vec![Supplier {
                supplier_id: 21,
                name: "Papelaria Central".to_string(),
                document: Some("12345678000190".to_string()),
            }],
            ..Default::default()
        }
    }

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    fn table(rows: Vec<Vec<RawCell>>) -> SheetTable {
        SheetTable {
            headers: ["description", "unit", "quantity", "estimated value", "lot", "supplier"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows,
        }
    }

    #[test]
    fn test_scenario_valid_missing_description_date_quantity() {
        let importer = ItemImporterImpl::new(repo_with_lot(), StaticImportConfig::default());
        let references = importer.load_references(1).unwrap();

        let sheet = table(vec![
            vec![text("Paper A4"), text("box"), RawCell::Int(10), RawCell::Float(25.5), text("L1"), RawCell::Empty],
            vec![RawCell::Empty, text("box"), RawCell::Int(1), RawCell::Float(1.0), RawCell::Empty, RawCell::Empty],
            vec![text("Pen"), text("un"), RawCell::DateTime("2024-01-01".to_string()), RawCell::Float(2.0), RawCell::Empty, RawCell::Empty],
        ]);

        let outcome = importer.import_table(&sheet, &references).unwrap();

        assert_eq!(outcome.total_rows, 3);
        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.failed, 2);
        assert_eq!(
            outcome.errors,
            vec![
                RowError { row: 2, reason: "missing description".to_string() },
                RowError { row: 3, reason: "invalid quantity".to_string() },
            ]
        );

        let created = importer.repository().created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].lot_id, Some(11));
        assert_eq!(created[0].process_id, 1);
        assert_eq!(created[0].estimated_value.to_string(), "25.50");
    }

    #[test]
    fn test_unknown_supplier_not_created() {
        let importer = ItemImporterImpl::new(repo_with_lot(), StaticImportConfig::default());
        let references = importer.load_references(1).unwrap();

        let sheet = table(vec![vec![
            text("Paper A4"),
            text("box"),
            RawCell::Int(10),
            text("25,50"),
            RawCell::Empty,
            text("Fornecedor Fantasma"),
        ]]);

        let outcome = importer.import_table(&sheet, &references).unwrap();

        assert_eq!(outcome.created, 0);
        assert_eq!(outcome.errors[0].reason, "supplier not found");
        assert!(importer.repository().created.lock().unwrap().is_empty());
    }

    #[test]
    fn test_blank_rows_not_counted() {
        let importer = ItemImporterImpl::new(repo_with_lot(), StaticImportConfig::default());
        let references = importer.load_references(1).unwrap();

        let sheet = table(vec![
            vec![RawCell::Empty; 6],
            vec![text("  "), RawCell::Empty],
        ]);

        let outcome = importer.import_table(&sheet, &references).unwrap();

        assert_eq!(outcome.total_rows, 0);
        assert_eq!(outcome.created, 0);
        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.skipped_blank, 2);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_blank_rows_keep_positional_index() {
        let importer = ItemImporterImpl::new(repo_with_lot(), StaticImportConfig::default());
        let references = importer.load_references(1).unwrap();

        let sheet = table(vec![
            vec![RawCell::Empty; 6],
            vec![text("Pen"), RawCell::Empty, text("-2"), text("1.00")],
        ]);

        let outcome = importer.import_table(&sheet, &references).unwrap();
        assert_eq!(outcome.errors, vec![RowError { row: 2, reason: "invalid quantity".to_string() }]);
    }

    #[test]
    fn test_persistence_failure_is_row_level() {
        let repo = InMemoryRepository {
            fail_on_description: Some("Broken".to_string()),
            ..repo_with_lot()
        };
        let importer = ItemImporterImpl::new(repo, StaticImportConfig::default());
        let references = importer.load_references(1).unwrap();

        let sheet = table(vec![
            vec![text("Broken"), RawCell::Empty, RawCell::Int(1), RawCell::Int(1)],
            vec![text("Paper A4"), RawCell::Empty, RawCell::Int(1), RawCell::Int(1)],
        ]);

        let outcome = importer.import_table(&sheet, &references).unwrap();

        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.errors, vec![RowError { row: 1, reason: "could not save item".to_string() }]);
    }

    #[test]
    fn test_missing_headers_abort_before_rows() {
        let importer = ItemImporterImpl::new(repo_with_lot(), StaticImportConfig::default());
        let references = importer.load_references(1).unwrap();

        let sheet = SheetTable {
            headers: vec!["description".to_string(), "unit".to_string()],
            rows: vec![vec![text("Paper A4"), text("box")]],
        };

        let result = importer.import_table(&sheet, &references);
        assert!(matches!(result, Err(ImportError::MissingHeaders(_))));
        assert!(importer.repository().created.lock().unwrap().is_empty());
    }

    #[test]
    fn test_import_csv_bytes() {
        let importer = ItemImporterImpl::new(repo_with_lot(), StaticImportConfig::default());

        let csv = "descrição;unidade;quantidade;valor estimado;lote;fornecedor\n\
                   Papel A4;caixa;10;1.234,56;papelaria;12.345.678/0001-90\n\
                   Caneta;un;5;-1;;\n";

        let outcome = importer.import_bytes(1, csv.as_bytes(), SourceFormat::Csv).unwrap();

        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.errors, vec![RowError { row: 2, reason: "negative value".to_string() }]);

        let created = importer.repository().created.lock().unwrap();
        assert_eq!(created[0].supplier_id, Some(21));
        assert_eq!(created[0].estimated_value.to_string(), "1234.56");
    }
}
