// ==========================================
// 商品目录批量对账系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义对账导入所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 对账导入所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait ImportConfigReader: Send + Sync {
    /// 获取 upsert 子批次大小
    ///
    /// # 默认值
    /// - 1000
    fn get_upsert_batch_size(&self) -> ImportResult<usize>;

    /// 获取 insert 子批次大小
    ///
    /// # 默认值
    /// - 100
    fn get_insert_batch_size(&self) -> ImportResult<usize>;

    /// 获取报告名称
    ///
    /// # 默认值
    /// - "Base Items report"
    fn get_report_name(&self) -> ImportResult<String>;
}
