// ==========================================
// 商品目录批量对账系统 - 商品领域模型
// ==========================================
// 职责: 目录商品 / 导入候选 / 对账结果 / 导入报告
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 原始行：表格源中一行的单元格（已去除表头）
pub type RawRow = Vec<String>;

// ==========================================
// CatalogItem - 目录商品（库中已有记录）
// ==========================================
// 用途: 对账时作为只读快照；按 sku 与 name 分别建索引
// 对齐: catalog_item 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,            // 库内主键（不透明标识）
    pub sku: String,        // 商品编码（唯一）
    pub name: String,       // 显示名称（空白规范化后，唯一）
    pub price_pts: i64,     // 价格（最小货币单位，points）

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// ItemWrite - 待写入记录
// ==========================================
// 用途: 对账输出的 upsert / insert 载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemWrite {
    pub sku: String,
    pub name: String,
    pub price_pts: i64,
}

// ==========================================
// CandidateItem - 导入候选
// ==========================================
// 红线: 同一批次内 sku 与 name 各自唯一（由 DuplicateDetector 保证）
// 生命周期: 每个有效行创建一次，之后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub row: usize,         // 源文件行号（含表头，1 起始）
    pub sku: String,
    pub name: String,       // 空白规范化名称（用于比较与落库）
    pub clean_name: String, // 停用词剥离名称（随行携带，不参与匹配）
    pub price_pts: i64,
}

impl CandidateItem {
    pub fn to_write(&self) -> ItemWrite {
        ItemWrite {
            sku: self.sku.clone(),
            name: self.name.clone(),
            price_pts: self.price_pts,
        }
    }
}

// ==========================================
// Outcome - 单个候选的对账结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Updated(ItemWrite),
    New(ItemWrite),
    Failed(NameConflict),
}

/// 名称冲突类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// sku 已存在，但新名称被另一条记录占用
    NameOwnedByOtherItem,
    /// sku 不存在，名称已绑定到其他 sku
    NameAlreadyExists,
}

/// 名称冲突明细（引用占用该名称的库内记录）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameConflict {
    pub kind: ConflictKind,
    pub conflicting_id: i64,
    pub conflicting_sku: String,
}

impl fmt::Display for NameConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConflictKind::NameOwnedByOtherItem => write!(
                f,
                "this name is already used by another item in db at id: {} | sku: {}",
                self.conflicting_id, self.conflicting_sku
            ),
            ConflictKind::NameAlreadyExists => write!(
                f,
                "this name already exists in db at id: {} | sku: {}",
                self.conflicting_id, self.conflicting_sku
            ),
        }
    }
}

// ==========================================
// FailureEntry - 失败明细
// ==========================================
// 说明: 写入批次失败产生的条目 row = 0（不对应单一源行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    #[serde(rename = "Row")]
    pub row: usize,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PricePts")]
    pub price_pts: i64,
    #[serde(rename = "Error")]
    pub error: String,
}

// ==========================================
// BulkReport - 批量导入报告
// ==========================================
// 不变量: total = 非空行数；failed 按 row 升序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "BatchId")]
    pub batch_id: String,
    #[serde(rename = "Total")]
    pub total: usize,
    #[serde(rename = "Unchanged")]
    pub unchanged: usize,
    #[serde(rename = "Updated")]
    pub updated: usize,
    #[serde(rename = "NewItems")]
    pub new_items: usize,
    #[serde(rename = "Failed")]
    pub failed: Vec<FailureEntry>,
}
