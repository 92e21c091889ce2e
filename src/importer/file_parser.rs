// ==========================================
// 商品目录批量对账系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 去表头的原始行（单元格去空白，行尾空单元格截掉）
// 约束: 空白行保留为 0 个单元格，行号 = 下标 + 2
// ==========================================

use crate::domain::item::RawRow;
use crate::importer::catalog_importer_trait::FileParser;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 规范化一行单元格：去除首尾空白，截掉行尾空单元格
fn normalize_cells<I, S>(cells: I) -> RawRow
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut row: RawRow = cells
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .collect();
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 表头只用于定位首个数据行，不参与输出
        reader.headers()?;

        let mut rows: Vec<RawRow> = Vec::new();
        for result in reader.records() {
            let record = result?;

            // csv 会跳过空行；按记录起始行号补回空白行，保持行号对齐
            if let Some(line) = record.position().map(|p| p.line() as usize) {
                while rows.len() + 2 < line {
                    rows.push(Vec::new());
                }
            }

            rows.push(normalize_cells(record.iter()));
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no sheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 首行为表头
        let rows = range
            .rows()
            .skip(1)
            .map(|row| normalize_cells(row.iter().map(|cell| cell.to_string())))
            .collect();

        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_rows(file_path),
            "xlsx" | "xls" => ExcelParser.parse_rows(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
