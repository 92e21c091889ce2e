// ==========================================
// 商品目录批量对账系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 表格商品清单与库内目录的批量对账导入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 对账流水线
pub mod importer;

// 配置层 - 导入参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{BulkReport, CandidateItem, CatalogItem, FailureEntry, ItemWrite, Outcome, RawRow};

// 导入
pub use importer::{
    CatalogImporter, CatalogImporterImpl, ImportError, ImportResult, UniversalFileParser,
};

// 仓储与配置
pub use config::{ConfigManager, ImportConfigReader};
pub use repository::{CatalogItemRepository, CatalogItemRepositoryImpl};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "catalog-reconcile";
