// ==========================================
// 公共采购流程管理 - 文件解析器实现
// ==========================================
// 阶段 0: 字节流 → 表头 + 原始单元格行
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================
// 说明: 解析器不跳过空白行，行号由导入器按位置计算
// ==========================================

use crate::domain::import::RawCell;
use crate::domain::types::SourceFormat;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_from_rs, Data, Reader, Xls, XlsError, Xlsx, XlsxError};
use csv::ReaderBuilder;
use std::fmt::Display;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

// ==========================================
// SheetTable - 解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 解析字节流为表格
    ///
    /// # 返回
    /// - Ok(SheetTable): 表头 + 数据行（不含表头）
    /// - Err: 容器损坏、无工作表、无表头行
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<SheetTable>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 分隔符探测：统计首行引号外的 ';' 与 ','，';' 更多时使用 ';'
    fn detect_delimiter(bytes: &[u8]) -> u8 {
        let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or(&[]);

        let mut in_quotes = false;
        let (mut semicolons, mut commas) = (0usize, 0usize);
        for b in first_line {
            match b {
                b'"' => in_quotes = !in_quotes,
                b';' if !in_quotes => semicolons += 1,
                b',' if !in_quotes => commas += 1,
                _ => {}
            }
        }

        if semicolons > commas {
            b';'
        } else {
            b','
        }
    }
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<SheetTable> {
        // 去掉 UTF-8 BOM
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .delimiter(Self::detect_delimiter(bytes))
            .from_reader(bytes);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptySheet("CSV".to_string()));
        }

        // 读取所有行
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|value| {
                    if value.trim().is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(value.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        debug!(columns = headers.len(), rows = rows.len(), "CSV 解析完成");
        Ok(SheetTable { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    format: SourceFormat,
    sheet_name: Option<String>, // None 表示第一个工作表
}

impl ExcelParser {
    pub fn new(format: SourceFormat, sheet_name: Option<String>) -> Self {
        Self { format, sheet_name }
    }

    /// calamine 单元格 → RawCell（保留日期类型）
    pub fn cell_from_data(cell: &Data) -> RawCell {
        match cell {
            Data::Empty => RawCell::Empty,
            Data::String(s) => {
                if s.trim().is_empty() {
                    RawCell::Empty
                } else {
                    RawCell::Text(s.clone())
                }
            }
            Data::Int(i) => RawCell::Int(*i),
            Data::Float(f) => RawCell::Float(*f),
            Data::Bool(b) => RawCell::Bool(*b),
            Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => {
                RawCell::DateTime(cell.to_string())
            }
            Data::Error(_) => RawCell::Error(cell.to_string()),
        }
    }

    fn read_workbook<RS, R>(&self, mut workbook: R) -> ImportResult<SheetTable>
    where
        RS: Read + Seek,
        R: Reader<RS>,
        R::Error: Display,
    {
        let sheet_names = workbook.sheet_names();
        let sheet_name = match &self.sheet_name {
            Some(name) => sheet_names
                .iter()
                .find(|s| s.trim().eq_ignore_ascii_case(name.trim()))
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError(format!("工作表不存在: {}", name)))?,
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // 提取表头（第一行）
        let mut rows_iter = range.rows();
        let header_row = rows_iter
            .next()
            .ok_or_else(|| ImportError::EmptySheet(sheet_name.clone()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let rows: Vec<Vec<RawCell>> = rows_iter
            .map(|row| row.iter().map(Self::cell_from_data).collect())
            .collect();

        debug!(sheet = %sheet_name, columns = headers.len(), rows = rows.len(), "Excel 解析完成");
        Ok(SheetTable { headers, rows })
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<SheetTable> {
        let cursor = Cursor::new(bytes);
        match self.format {
            SourceFormat::Xls => {
                let workbook: Xls<_> = open_workbook_from_rs(cursor)
                    .map_err(|e: XlsError| ImportError::ExcelParseError(e.to_string()))?;
                self.read_workbook(workbook)
            }
            _ => {
                let workbook: Xlsx<_> = open_workbook_from_rs(cursor)
                    .map_err(|e: XlsxError| ImportError::ExcelParseError(e.to_string()))?;
                self.read_workbook(workbook)
            }
        }
    }
}

// ==========================================
// 通用文件解析器（根据格式自动选择）
// ==========================================
pub struct UniversalFileParser {
    sheet_name: Option<String>,
}

impl UniversalFileParser {
    pub fn new(sheet_name: Option<String>) -> Self {
        Self { sheet_name }
    }

    pub fn parse(&self, bytes: &[u8], format: SourceFormat) -> ImportResult<SheetTable> {
        match format {
            SourceFormat::Csv => CsvParser.parse_bytes(bytes),
            SourceFormat::Xlsx | SourceFormat::Xls => {
                ExcelParser::new(format, self.sheet_name.clone()).parse_bytes(bytes)
            }
        }
    }

    /// 读取文件并按扩展名选择解析器
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<SheetTable> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let format = SourceFormat::from_path(path).ok_or_else(|| {
            ImportError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("")
                    .to_string(),
            )
        })?;

        let bytes = std::fs::read(path)?;
        self.parse(&bytes, format)
    }
}
