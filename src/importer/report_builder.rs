// ==========================================
// 商品目录批量对账系统 - 报告构建器
// ==========================================
// 职责: 累计四个计数器与失败列表，输出前按 row 稳定排序
// 说明: 写入失败的条目 row = 0，排在所有源行失败之前
// ==========================================

use crate::domain::item::{BulkReport, CandidateItem, FailureEntry, ItemWrite, NameConflict};

/// 写入阶段（决定降级时扣减哪个计数器）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    Update,
    Insert,
}

impl WritePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WritePhase::Update => "update",
            WritePhase::Insert => "insert",
        }
    }
}

#[derive(Debug)]
pub struct ReportBuilder {
    report: BulkReport,
}

impl ReportBuilder {
    pub fn new(name: impl Into<String>, batch_id: impl Into<String>) -> Self {
        Self {
            report: BulkReport {
                name: name.into(),
                batch_id: batch_id.into(),
                ..BulkReport::default()
            },
        }
    }

    /// 计入一条非空行
    pub fn count_row(&mut self) {
        self.report.total += 1;
    }

    pub fn record_unchanged(&mut self) {
        self.report.unchanged += 1;
    }

    pub fn record_updated(&mut self) {
        self.report.updated += 1;
    }

    pub fn record_new(&mut self) {
        self.report.new_items += 1;
    }

    pub fn record_failure(&mut self, entry: FailureEntry) {
        self.report.failed.push(entry);
    }

    /// 记录名称冲突（候选保留源行号）
    pub fn record_conflict(&mut self, candidate: &CandidateItem, conflict: &NameConflict) {
        self.record_failure(FailureEntry {
            row: candidate.row,
            sku: candidate.sku.clone(),
            name: candidate.name.clone(),
            price_pts: candidate.price_pts,
            error: conflict.to_string(),
        });
    }

    /// 子批次写入失败：扣减对应计数器，整批转为 row = 0 的失败条目
    pub fn demote(&mut self, phase: WritePhase, items: &[ItemWrite], error: &str) {
        let counter = match phase {
            WritePhase::Update => &mut self.report.updated,
            WritePhase::Insert => &mut self.report.new_items,
        };
        *counter = counter.saturating_sub(items.len());

        self.report
            .failed
            .extend(items.iter().map(|item| FailureEntry {
                row: 0,
                sku: item.sku.clone(),
                name: item.name.clone(),
                price_pts: item.price_pts,
                error: error.to_string(),
            }));
    }

    pub fn failed_count(&self) -> usize {
        self.report.failed.len()
    }

    /// 输出报告（failed 按 row 升序，同 row 保持插入顺序）
    pub fn finish(mut self) -> BulkReport {
        self.report.failed.sort_by_key(|entry| entry.row);
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(row: usize, sku: &str) -> FailureEntry {
        FailureEntry {
            row,
            sku: sku.to_string(),
            name: "n".to_string(),
            price_pts: 0,
            error: "e".to_string(),
        }
    }

    fn write(sku: &str) -> ItemWrite {
        ItemWrite {
            sku: sku.to_string(),
            name: format!("name-{sku}"),
            price_pts: 100,
        }
    }

    #[test]
    fn test_demote_moves_counts_to_failures() {
        let mut builder = ReportBuilder::new("r", "b");
        for _ in 0..3 {
            builder.count_row();
            builder.record_updated();
        }

        builder.demote(WritePhase::Update, &[write("A"), write("B")], "disk full");
        let report = builder.finish();

        assert_eq!(report.total, 3);
        assert_eq!(report.updated, 1);
        assert_eq!(report.failed.len(), 2);
        assert!(report.failed.iter().all(|f| f.row == 0 && f.error == "disk full"));
    }

    #[test]
    fn test_demote_inserts_uses_new_counter() {
        let mut builder = ReportBuilder::new("r", "b");
        builder.record_new();
        builder.record_updated();

        builder.demote(WritePhase::Insert, &[write("C")], "boom");
        let report = builder.finish();

        assert_eq!(report.new_items, 0);
        assert_eq!(report.updated, 1);
    }

    #[test]
    fn test_finish_sorts_failures_stably() {
        let mut builder = ReportBuilder::new("Base Items report", "batch-1");
        builder.record_failure(failure(5, "late"));
        builder.record_failure(failure(3, "early"));
        builder.demote(WritePhase::Insert, &[write("W1"), write("W2")], "err");
        builder.record_failure(failure(3, "early-second"));

        let report = builder.finish();
        let order: Vec<(usize, &str)> = report
            .failed
            .iter()
            .map(|f| (f.row, f.sku.as_str()))
            .collect();

        assert_eq!(
            order,
            vec![
                (0, "W1"),
                (0, "W2"),
                (3, "early"),
                (3, "early-second"),
                (5, "late")
            ]
        );
        assert_eq!(report.name, "Base Items report");
        assert_eq!(report.batch_id, "batch-1");
    }
}
