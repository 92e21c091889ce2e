// ==========================================
// 商品目录批量对账系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与对账结果类型
// 红线: 不含数据访问逻辑，不含对账规则
// ==========================================

pub mod item;

// 重导出核心类型
pub use item::{
    BulkReport, CandidateItem, CatalogItem, ConflictKind, FailureEntry, ItemWrite, NameConflict,
    Outcome, RawRow,
};
