// ==========================================
// 商品目录批量对账系统 - 导入模块 Trait 定义
// ==========================================
// 职责: 定义文件解析与对账导入的接口
// 红线: 只有源读取失败才返回 Err；行级问题进入报告
// ==========================================

use crate::domain::item::{BulkReport, CatalogItem, ItemWrite, RawRow};
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// FileParser Trait - 表格源解析
// ==========================================
// 输出约定:
// - 表头已剥离，行顺序与源文件一致
// - 单元格去除首尾空白，行尾空单元格被截掉（空白行 → 0 个单元格）
// - 空白行保留占位，保证行号与源文件对齐
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行序列
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 数据行（不含表头）
    /// - Err: 文件不存在 / 格式不支持 / 解析失败
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// CatalogImporter Trait - 对账导入主流程
// ==========================================
pub trait CatalogImporter {
    /// 对账导入一批原始行
    ///
    /// # 流程
    /// 1. 行校验 → 重复检测 → 价格解析 → 名称规范化
    /// 2. 一次性读取库内快照（按 sku / 按 name）
    /// 3. 分类：Unchanged / Updated / New / Failed
    /// 4. 分批写入：先 updates，后 inserts
    /// 5. 输出报告（failed 按 row 升序）
    ///
    /// # 返回
    /// - Ok(BulkReport): 即使全部行失败也返回报告
    /// - Err: 快照读取失败 / 配置读取失败
    fn import_rows(&self, rows: &[RawRow]) -> ImportResult<BulkReport>;

    /// 从文件导入（源读取失败时在访问数据库之前返回 Err）
    fn import_from_file(&self, file_path: &Path) -> ImportResult<BulkReport>;

    /// 直接批量创建商品（不做对账；首个失败子批次即返回 Err）
    fn create_bulk(&self, items: &[ItemWrite]) -> ImportResult<usize>;

    /// 查询全部商品
    fn get_all(&self) -> ImportResult<Vec<CatalogItem>>;
}
