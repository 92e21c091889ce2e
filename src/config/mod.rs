// ==========================================
// 商品目录批量对账系统 - 配置层
// ==========================================
// 职责: 导入参数管理（子批次大小、报告名称）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_REPORT_NAME};
pub use import_config_trait::ImportConfigReader;
