// ==========================================
// 公共采购流程管理 - 领域类型定义
// ==========================================
// 职责: 导入字段、源文件格式、行级失败原因
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ==========================================
// 源文件格式 (Source Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceFormat {
    Xlsx,
    Xls,
    Csv,
}

impl SourceFormat {
    /// 根据扩展名识别格式（不区分大小写）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().to_lowercase().as_str() {
            "xlsx" | "xlsm" => Some(SourceFormat::Xlsx),
            "xls" => Some(SourceFormat::Xls),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Xlsx => write!(f, "XLSX"),
            SourceFormat::Xls => write!(f, "XLS"),
            SourceFormat::Csv => write!(f, "CSV"),
        }
    }
}

// ==========================================
// 导入字段 (Import Field)
// ==========================================
// 表头映射后的标准字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportField {
    Description,
    Unit,
    Quantity,
    EstimatedValue,
    Lot,
    Supplier,
}

impl ImportField {
    pub const ALL: [ImportField; 6] = [
        ImportField::Description,
        ImportField::Unit,
        ImportField::Quantity,
        ImportField::EstimatedValue,
        ImportField::Lot,
        ImportField::Supplier,
    ];

    /// 缺失即文件级失败的字段
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            ImportField::Description | ImportField::Quantity | ImportField::EstimatedValue
        )
    }
}

impl fmt::Display for ImportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportField::Description => write!(f, "description"),
            ImportField::Unit => write!(f, "unit"),
            ImportField::Quantity => write!(f, "quantity"),
            ImportField::EstimatedValue => write!(f, "estimated value"),
            ImportField::Lot => write!(f, "lot"),
            ImportField::Supplier => write!(f, "supplier"),
        }
    }
}

// ==========================================
// 行级失败原因 (Row Failure)
// ==========================================
// Display 文本即对外报告的 reason，调用方按字面值比对
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowFailure {
    MissingDescription,
    InvalidQuantity,
    InvalidEstimatedValue,
    NegativeValue,
    LotNotFound,
    SupplierNotFound,
    PersistenceFailed,
}

impl RowFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            RowFailure::MissingDescription => "missing description",
            RowFailure::InvalidQuantity => "invalid quantity",
            RowFailure::InvalidEstimatedValue => "invalid estimated value",
            RowFailure::NegativeValue => "negative value",
            RowFailure::LotNotFound => "lot not found",
            RowFailure::SupplierNotFound => "supplier not found",
            RowFailure::PersistenceFailed => "could not save item",
        }
    }
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("XLSX"), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_extension("xls"), Some(SourceFormat::Xls));
        assert_eq!(SourceFormat::from_extension(" csv "), Some(SourceFormat::Csv));
        assert_eq!(SourceFormat::from_extension("ods"), None);
    }

    #[test]
    fn test_source_format_from_path() {
        assert_eq!(
            SourceFormat::from_path(Path::new("/tmp/itens.CSV")),
            Some(SourceFormat::Csv)
        );
        assert_eq!(SourceFormat::from_path(Path::new("/tmp/itens")), None);
    }

    #[test]
    fn test_row_failure_reason_text() {
        assert_eq!(RowFailure::MissingDescription.to_string(), "missing description");
        assert_eq!(RowFailure::InvalidQuantity.to_string(), "invalid quantity");
        assert_eq!(RowFailure::NegativeValue.to_string(), "negative value");
        assert_eq!(RowFailure::SupplierNotFound.to_string(), "supplier not found");
    }

    #[test]
    fn test_required_fields() {
        let required: Vec<_> = ImportField::ALL.iter().filter(|f| f.is_required()).collect();
        assert_eq!(required.len(), 3);
        assert!(!ImportField::Unit.is_required());
    }
}
