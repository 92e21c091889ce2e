// ==========================================
// 商品目录批量对账系统 - 导入层
// ==========================================
// 职责: 表格源 → 候选 → 对账分类 → 分批写入 → 报告
// 支持: Excel, CSV, 内存行
// ==========================================

// 模块声明
pub mod batch_writer;
pub mod catalog_importer_impl;
pub mod catalog_importer_trait;
pub mod duplicate_detector;
pub mod error;
pub mod file_parser;
pub mod price_parser;
pub mod reconciler;
pub mod record_validator;
pub mod report_builder;
pub mod text_normalizer;

// 重导出核心类型
pub use batch_writer::{BatchWriter, WriteSummary};
pub use catalog_importer_impl::CatalogImporterImpl;
pub use duplicate_detector::{DuplicateDetector, DuplicateHit, DuplicateKey};
pub use error::{ImportError, ImportResult, PriceParseError};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use price_parser::PriceParser;
pub use reconciler::{classify, ExistingIndex, Reconciler};
pub use record_validator::{RecordValidator, RowVerdict};
pub use report_builder::{ReportBuilder, WritePhase};
pub use text_normalizer::{classify_char, is_arabic, CharType, TextNormalizer};

// 重导出 Trait 接口
pub use catalog_importer_trait::{CatalogImporter, FileParser};
