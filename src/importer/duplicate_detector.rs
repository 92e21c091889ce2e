// ==========================================
// 商品目录批量对账系统 - 同批次重复检测
// ==========================================
// 职责: 记录本批次已出现的 sku / name 及其首次出现行号
// 规则:
// - 先查 sku，再查 name；命中即短路
// - 只登记成为候选的行（先 check，解析价格成功后再 record）
// ==========================================

use std::collections::HashMap;

/// 重复键类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKey {
    Sku,
    Name,
}

/// 重复命中：引用首次出现的行号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateHit {
    pub key: DuplicateKey,
    pub first_line: usize,
}

impl DuplicateHit {
    pub fn message(&self) -> String {
        match self.key {
            DuplicateKey::Sku => format!("duplicate SKU found at row [{}]", self.first_line),
            DuplicateKey::Name => format!("duplicate Name found at row [{}]", self.first_line),
        }
    }
}

#[derive(Debug, Default)]
pub struct DuplicateDetector {
    sku_first_line: HashMap<String, usize>,
    name_first_line: HashMap<String, usize>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 检查 sku / name 是否已在本批次出现
    pub fn check(&self, sku: &str, name: &str) -> Option<DuplicateHit> {
        if let Some(&first_line) = self.sku_first_line.get(sku) {
            return Some(DuplicateHit {
                key: DuplicateKey::Sku,
                first_line,
            });
        }
        self.name_first_line
            .get(name)
            .map(|&first_line| DuplicateHit {
                key: DuplicateKey::Name,
                first_line,
            })
    }

    /// 登记首次出现（已存在的键保持原行号）
    pub fn record(&mut self, sku: &str, name: &str, line: usize) {
        self.sku_first_line.entry(sku.to_string()).or_insert(line);
        self.name_first_line.entry(name.to_string()).or_insert(line);
    }
}
