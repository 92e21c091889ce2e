// ==========================================
// 商品目录批量对账系统 - 行校验器
// ==========================================
// 职责: 行形状与必填字段校验（sku / name / price 三列）
// 规则:
// - 完全空白行：静默丢弃，不计入 total
// - 少于 3 列：short data
// - 前三列任一为空（去除首尾空白后）：empty data
// ==========================================

use crate::domain::item::FailureEntry;

/// 必需列数（sku, name, price）
pub const REQUIRED_COLUMNS: usize = 3;

/// 失败明细中缺失 sku 的占位符
pub const MISSING_SKU_PLACEHOLDER: &str = " - ";

/// 失败明细中缺失 name 的占位符
pub const MISSING_NAME_PLACEHOLDER: &str = "empty";

pub const SHORT_ROW_MESSAGE: &str = "short data in row.";
pub const EMPTY_FIELD_MESSAGE: &str = "empty data in row";

/// 单行校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowVerdict<'a> {
    /// 完全空白行
    Blank,
    /// 被拒绝（附失败明细）
    Rejected(FailureEntry),
    /// 通过校验，三个必填字段均非空
    Valid {
        sku: &'a str,
        name: &'a str,
        price: &'a str,
    },
}

pub struct RecordValidator;

impl RecordValidator {
    /// 校验单行
    ///
    /// # 参数
    /// - cells: 行单元格
    /// - line: 源文件行号（含表头）
    pub fn validate<'a>(&self, cells: &'a [String], line: usize) -> RowVerdict<'a> {
        if cells.iter().all(|c| c.trim().is_empty()) {
            return RowVerdict::Blank;
        }

        if cells.len() < REQUIRED_COLUMNS {
            return RowVerdict::Rejected(Self::rejection(cells, line, SHORT_ROW_MESSAGE));
        }

        let (sku, name, price) = (cells[0].trim(), cells[1].trim(), cells[2].trim());
        if sku.is_empty() || name.is_empty() || price.is_empty() {
            return RowVerdict::Rejected(Self::rejection(cells, line, EMPTY_FIELD_MESSAGE));
        }

        RowVerdict::Valid { sku, name, price }
    }

    fn rejection(cells: &[String], line: usize, message: &str) -> FailureEntry {
        FailureEntry {
            row: line,
            sku: display_or(cells.first(), MISSING_SKU_PLACEHOLDER),
            name: display_or(cells.get(1), MISSING_NAME_PLACEHOLDER),
            price_pts: 0,
            error: message.to_string(),
        }
    }
}

/// 取单元格用于展示；缺失或仅含空白时使用占位符
fn display_or(cell: Option<&String>, placeholder: &str) -> String {
    match cell.map(|value| value.trim()) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => placeholder.to_string(),
    }
}
