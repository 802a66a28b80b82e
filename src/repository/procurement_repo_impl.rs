// ==========================================
// 公共采购流程管理 - 采购数据 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::procurement::{Item, Lot, NewItem, Process, Supplier};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::procurement_repo::ProcurementRepository;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

fn parse_decimal_column(raw: String, idx: usize) -> rusqlite::Result<Decimal> {
    Decimal::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp_column(raw: String, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ==========================================
// ProcurementRepositoryImpl
// ==========================================
pub struct ProcurementRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ProcurementRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（会再次应用统一 PRAGMA，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl ProcurementRepository for ProcurementRepositoryImpl {
    fn find_process(&self, process_id: i64) -> RepositoryResult<Option<Process>> {
        let conn = self.get_conn()?;
        let process = conn
            .query_row(
                "SELECT process_id, number, object, created_at FROM process WHERE process_id = ?1",
                params![process_id],
                |row| {
                    Ok(Process {
                        process_id: row.get(0)?,
                        number: row.get(1)?,
                        object: row.get(2)?,
                        created_at: parse_timestamp_column(row.get(3)?, 3)?,
                    })
                },
            )
            .optional()?;
        Ok(process)
    }

    fn find_lots_by_process(&self, process_id: i64) -> RepositoryResult<Vec<Lot>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT lot_id, process_id, number, description
            FROM lot
            WHERE process_id = ?1
            ORDER BY lot_id
            "#,
        )?;

        let lots = stmt
            .query_map(params![process_id], |row| {
                Ok(Lot {
                    lot_id: row.get(0)?,
                    process_id: row.get(1)?,
                    number: row.get(2)?,
                    description: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(lots)
    }

    fn find_suppliers_by_process(&self, process_id: i64) -> RepositoryResult<Vec<Supplier>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.supplier_id, s.name, s.document
            FROM supplier s
            JOIN process_supplier ps ON ps.supplier_id = s.supplier_id
            WHERE ps.process_id = ?1
            ORDER BY s.supplier_id
            "#,
        )?;

        let suppliers = stmt
            .query_map(params![process_id], |row| {
                Ok(Supplier {
                    supplier_id: row.get(0)?,
                    name: row.get(1)?,
                    document: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(suppliers)
    }

    fn create_item(&self, item: NewItem) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO item (
                process_id, lot_id, supplier_id, description, unit,
                quantity, estimated_value, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                item.process_id,
                item.lot_id,
                item.supplier_id,
                item.description,
                item.unit,
                item.quantity.to_string(),
                item.estimated_value.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn list_items_by_process(&self, process_id: i64) -> RepositoryResult<Vec<Item>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT item_id, process_id, lot_id, supplier_id, description, unit,
                   quantity, estimated_value, created_at
            FROM item
            WHERE process_id = ?1
            ORDER BY item_id
            "#,
        )?;

        let items = stmt
            .query_map(params![process_id], |row| {
                Ok(Item {
                    item_id: row.get(0)?,
                    process_id: row.get(1)?,
                    lot_id: row.get(2)?,
                    supplier_id: row.get(3)?,
                    description: row.get(4)?,
                    unit: row.get(5)?,
                    quantity: parse_decimal_column(row.get(6)?, 6)?,
                    estimated_value: parse_decimal_column(row.get(7)?, 7)?,
                    created_at: parse_timestamp_column(row.get(8)?, 8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn insert_process(&self, number: &str, object: Option<&str>) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO process (number, object, created_at) VALUES (?1, ?2, ?3)",
            params![number, object, Utc::now().to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_lot(
        &self,
        process_id: i64,
        number: &str,
        description: Option<&str>,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO lot (process_id, number, description) VALUES (?1, ?2, ?3)",
            params![process_id, number, description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_supplier(&self, name: &str, document: Option<&str>) -> RepositoryResult<i64> {
        // 证件号只保存数字
        let document: Option<String> = document
            .map(|d| d.chars().filter(|c| c.is_ascii_digit()).collect::<String>())
            .filter(|d| !d.is_empty());

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO supplier (name, document) VALUES (?1, ?2)",
            params![name, document],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn add_participation(&self, process_id: i64, supplier_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO process_supplier (process_id, supplier_id) VALUES (?1, ?2)",
            params![process_id, supplier_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn setup_repo() -> ProcurementRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ProcurementRepositoryImpl::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_find_process_missing() {
        let repo = setup_repo();
        assert!(repo.find_process(42).unwrap().is_none());
    }

    #[test]
    fn test_lots_scoped_by_process() {
        let repo = setup_repo();
        let p1 = repo.insert_process("PL 001/2024", Some("Material de escritório")).unwrap();
        let p2 = repo.insert_process("PL 002/2024", None).unwrap();
        repo.insert_lot(p1, "L1", Some("Papelaria")).unwrap();
        repo.insert_lot(p2, "L1", None).unwrap();

        let lots = repo.find_lots_by_process(p1).unwrap();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].description.as_deref(), Some("Papelaria"));
    }

    #[test]
    fn test_suppliers_require_participation() {
        let repo = setup_repo();
        let p1 = repo.insert_process("PL 003/2024", None).unwrap();
        let s1 = repo.insert_supplier("Papelaria Central", Some("12.345.678/0001-90")).unwrap();
        repo.insert_supplier("Outro Fornecedor", None).unwrap();
        repo.add_participation(p1, s1).unwrap();
        repo.add_participation(p1, s1).unwrap();

        let suppliers = repo.find_suppliers_by_process(p1).unwrap();
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].document.as_deref(), Some("12345678000190"));
    }

    #[test]
    fn test_create_item_keeps_decimal_text() {
        let repo = setup_repo();
        let p1 = repo.insert_process("PL 004/2024", None).unwrap();

        let id = repo
            .create_item(NewItem {
                process_id: p1,
                lot_id: None,
                supplier_id: None,
                description: "Paper A4".to_string(),
                unit: "box".to_string(),
                quantity: dec("10"),
                estimated_value: dec("25.50"),
            })
            .unwrap();

        let items = repo.list_items_by_process(p1).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_id, id);
        assert_eq!(items[0].estimated_value.to_string(), "25.50");
    }

    #[test]
    fn test_create_item_unknown_process_rejected() {
        let repo = setup_repo();
        let result = repo.create_item(NewItem {
            process_id: 999,
            lot_id: None,
            supplier_id: None,
            description: "Paper A4".to_string(),
            unit: String::new(),
            quantity: dec("1"),
            estimated_value: dec("1.00"),
        });

        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    }
}
