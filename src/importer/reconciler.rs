// ==========================================
// 商品目录批量对账系统 - 对账分类引擎
// ==========================================
// 职责: 将每个候选与库内快照比对，得出 Unchanged / Updated / New / Failed
// 判定顺序（先 sku 分支，后通用 name 分支）:
// 1. sku 命中:
//    a. name 与 price 均相同 → Unchanged
//    b. name 命中的是另一条记录 → Failed（名称被他人占用）
//    c. 否则 → Updated
// 2. 仅 name 命中 → Failed（名称已存在）
// 3. 都未命中 → New
// 红线: 纯函数，不访问数据库；快照在分类期间不刷新
// ==========================================

use crate::domain::item::{CandidateItem, CatalogItem, ConflictKind, NameConflict, Outcome};
use std::collections::HashMap;

/// 库内快照的双键索引
#[derive(Debug, Default, Clone)]
pub struct ExistingIndex {
    by_sku: HashMap<String, CatalogItem>,
    by_name: HashMap<String, CatalogItem>,
}

impl ExistingIndex {
    /// 由两次查询结果构建索引
    ///
    /// # 参数
    /// - sku_matches: sku 属于候选 sku 集合的库内记录
    /// - name_matches: name 属于候选 name 集合的库内记录
    pub fn from_snapshots(sku_matches: Vec<CatalogItem>, name_matches: Vec<CatalogItem>) -> Self {
        let by_sku = sku_matches
            .into_iter()
            .map(|item| (item.sku.clone(), item))
            .collect();
        let by_name = name_matches
            .into_iter()
            .map(|item| (item.name.clone(), item))
            .collect();
        Self { by_sku, by_name }
    }

    pub fn get_by_sku(&self, sku: &str) -> Option<&CatalogItem> {
        self.by_sku.get(sku)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&CatalogItem> {
        self.by_name.get(name)
    }
}

/// 单个候选的分类
pub fn classify(candidate: &CandidateItem, index: &ExistingIndex) -> Outcome {
    let name_owner = index.get_by_name(&candidate.name);

    if let Some(existing) = index.get_by_sku(&candidate.sku) {
        if existing.name == candidate.name && existing.price_pts == candidate.price_pts {
            return Outcome::Unchanged;
        }

        // 同一记录的旧名称仍在 name 索引中，不视为冲突
        if let Some(owner) = name_owner.filter(|owner| owner.id != existing.id) {
            return Outcome::Failed(NameConflict {
                kind: ConflictKind::NameOwnedByOtherItem,
                conflicting_id: owner.id,
                conflicting_sku: owner.sku.clone(),
            });
        }

        return Outcome::Updated(candidate.to_write());
    }

    if let Some(owner) = name_owner {
        return Outcome::Failed(NameConflict {
            kind: ConflictKind::NameAlreadyExists,
            conflicting_id: owner.id,
            conflicting_sku: owner.sku.clone(),
        });
    }

    Outcome::New(candidate.to_write())
}

// ==========================================
// Reconciler
// ==========================================
pub struct Reconciler;

impl Reconciler {
    /// 按批次顺序对全部候选分类（每个候选恰好一个结果）
    pub fn classify_batch<'a>(
        &self,
        candidates: &'a [CandidateItem],
        index: &ExistingIndex,
    ) -> Vec<(&'a CandidateItem, Outcome)> {
        candidates
            .iter()
            .map(|candidate| (candidate, classify(candidate, index)))
            .collect()
    }
}
