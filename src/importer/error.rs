// ==========================================
// 商品目录批量对账系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 仅致命错误走 Err；行级问题写入报告的 Failed 列表
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 数据访问错误 =====
    #[error("快照读取失败: {0}")]
    SnapshotReadError(#[source] RepositoryError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// 价格解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    #[error("empty amount")]
    Empty,

    #[error("negative amount: {0}")]
    Negative(String),

    #[error("invalid character '{ch}' in amount: {value}")]
    InvalidCharacter { value: String, ch: char },

    #[error("malformed decimal separator in amount: {0}")]
    MalformedDecimal(String),

    #[error("too many fraction digits in amount: {0}")]
    TooPrecise(String),

    #[error("amount out of range: {0}")]
    Overflow(String),
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
