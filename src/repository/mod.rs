// ==========================================
// 商品目录批量对账系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口，屏蔽数据库细节
// 约束: 所有查询使用参数化，防止 SQL 注入
// ==========================================

pub mod catalog_item_repo;
pub mod catalog_item_repo_impl;
pub mod error;

// 重导出核心仓储
pub use catalog_item_repo::CatalogItemRepository;
pub use catalog_item_repo_impl::CatalogItemRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
