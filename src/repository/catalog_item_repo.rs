// ==========================================
// 商品目录批量对账系统 - 目录商品 Repository Trait
// ==========================================
// 职责: 定义对账流程所需的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::item::{CatalogItem, ItemWrite};
use crate::repository::error::RepositoryResult;

// ==========================================
// CatalogItemRepository Trait
// ==========================================
// 用途: 对账读取快照 + 子批次写入
// 实现者: CatalogItemRepositoryImpl（使用 rusqlite）
pub trait CatalogItemRepository: Send + Sync {
    // ===== 快照读取 =====

    /// 查询 sku 位于给定集合中的已有商品
    ///
    /// # 参数
    /// - skus: 本批次 sku 集合
    ///
    /// # 返回
    /// - Ok(Vec<CatalogItem>): 命中的商品（顺序不保证）
    fn find_by_skus(&self, skus: &[String]) -> RepositoryResult<Vec<CatalogItem>>;

    /// 查询 name 位于给定集合中的已有商品
    ///
    /// # 参数
    /// - names: 本批次（空白规范化后的）名称集合
    fn find_by_names(&self, names: &[String]) -> RepositoryResult<Vec<CatalogItem>>;

    // ===== 子批次写入（每次调用一个事务）=====

    /// 按 sku upsert 一个子批次（冲突时更新 name / price_pts）
    ///
    /// # 返回
    /// - Ok(usize): 写入记录数
    /// - Err: 数据库错误（该子批次整体回滚）
    fn upsert_by_sku(&self, items: &[ItemWrite]) -> RepositoryResult<usize>;

    /// 插入一个子批次
    ///
    /// # 返回
    /// - Ok(usize): 写入记录数
    /// - Err: 数据库错误（该子批次整体回滚）
    fn insert_items(&self, items: &[ItemWrite]) -> RepositoryResult<usize>;

    // ===== 目录维护 =====

    /// 查询全部商品（按 id 升序）
    fn list_all(&self) -> RepositoryResult<Vec<CatalogItem>>;

    /// 统计 catalog_item 表记录数
    fn count_items(&self) -> RepositoryResult<usize>;
}
