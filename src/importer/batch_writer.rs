// ==========================================
// 商品目录批量对账系统 - 分批写入器
// ==========================================
// 职责: 先写 updates（按 sku upsert），再写 inserts
// 失败语义:
// - 每个子批次一个事务；失败子批次整体转为失败条目（row = 0）
// - 已提交的子批次不回滚，后续子批次继续执行
// ==========================================

use crate::domain::item::ItemWrite;
use crate::importer::report_builder::{ReportBuilder, WritePhase};
use crate::repository::{CatalogItemRepository, RepositoryResult};
use tracing::{debug, warn};

/// upsert 子批次默认大小
pub const DEFAULT_UPSERT_BATCH_SIZE: usize = 1000;

/// insert 子批次默认大小
pub const DEFAULT_INSERT_BATCH_SIZE: usize = 100;

/// 写入统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub failed_batches: usize,
}

pub struct BatchWriter<'a, R: CatalogItemRepository + ?Sized> {
    repo: &'a R,
    upsert_batch_size: usize,
    insert_batch_size: usize,
}

impl<'a, R: CatalogItemRepository + ?Sized> BatchWriter<'a, R> {
    pub fn new(repo: &'a R, upsert_batch_size: usize, insert_batch_size: usize) -> Self {
        Self {
            repo,
            upsert_batch_size: upsert_batch_size.max(1),
            insert_batch_size: insert_batch_size.max(1),
        }
    }

    /// 写入 updates（upsert-by-sku）
    pub fn write_updates(&self, updates: &[ItemWrite], report: &mut ReportBuilder) -> WriteSummary {
        self.write_in_batches(WritePhase::Update, updates, self.upsert_batch_size, report, |chunk| {
            self.repo.upsert_by_sku(chunk)
        })
    }

    /// 写入 inserts（普通批量插入）
    pub fn write_inserts(&self, inserts: &[ItemWrite], report: &mut ReportBuilder) -> WriteSummary {
        self.write_in_batches(WritePhase::Insert, inserts, self.insert_batch_size, report, |chunk| {
            self.repo.insert_items(chunk)
        })
    }

    fn write_in_batches<F>(
        &self,
        phase: WritePhase,
        items: &[ItemWrite],
        batch_size: usize,
        report: &mut ReportBuilder,
        write: F,
    ) -> WriteSummary
    where
        F: Fn(&[ItemWrite]) -> RepositoryResult<usize>,
    {
        let mut summary = WriteSummary::default();

        for (batch_no, chunk) in items.chunks(batch_size).enumerate() {
            match write(chunk) {
                Ok(count) => {
                    debug!(phase = phase.as_str(), batch_no, count, "子批次写入成功");
                    summary.written += count;
                }
                Err(e) => {
                    warn!(
                        phase = phase.as_str(),
                        batch_no,
                        size = chunk.len(),
                        error = %e,
                        "子批次写入失败，整批转为失败条目"
                    );
                    summary.failed_batches += 1;
                    report.demote(phase, chunk, &e.to_string());
                }
            }
        }

        summary
    }
}
