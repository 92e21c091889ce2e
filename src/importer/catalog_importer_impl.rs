// ==========================================
// 商品目录批量对账系统 - 对账导入器实现
// ==========================================
// 职责: 整合导入流程，从原始行到数据库与报告
// 流程: 行校验 → 重复检测 → 价格解析 → 名称规范化 → 快照读取 → 分类 → 分批写入 → 报告
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::item::{BulkReport, CandidateItem, CatalogItem, FailureEntry, ItemWrite, Outcome, RawRow};
use crate::importer::batch_writer::BatchWriter;
use crate::importer::catalog_importer_trait::{CatalogImporter, FileParser};
use crate::importer::duplicate_detector::DuplicateDetector;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::price_parser::PriceParser;
use crate::importer::reconciler::{ExistingIndex, Reconciler};
use crate::importer::record_validator::{RecordValidator, RowVerdict};
use crate::importer::report_builder::ReportBuilder;
use crate::importer::text_normalizer::TextNormalizer;
use crate::repository::CatalogItemRepository;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// 源文件中首个数据行的行号（第 1 行为表头）
const FIRST_DATA_LINE: usize = 2;

/// create_bulk 子批次大小
pub const CREATE_BULK_BATCH_SIZE: usize = 1000;

// ==========================================
// CatalogImporterImpl - 对账导入器实现
// ==========================================
pub struct CatalogImporterImpl<R, C>
where
    R: CatalogItemRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    repo: R,

    // 配置读取器
    config: C,

    // 表格源解析
    file_parser: Box<dyn FileParser>,

    // 流水线组件（无状态）
    validator: RecordValidator,
    price_parser: PriceParser,
    normalizer: TextNormalizer,
    reconciler: Reconciler,
}

impl<R, C> CatalogImporterImpl<R, C>
where
    R: CatalogItemRepository,
    C: ImportConfigReader,
{
    /// 创建新的 CatalogImporter 实例
    ///
    /// # 参数
    /// - repo: 目录商品仓储
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    pub fn new(repo: R, config: C, file_parser: Box<dyn FileParser>) -> Self {
        Self {
            repo,
            config,
            file_parser,
            validator: RecordValidator,
            price_parser: PriceParser,
            normalizer: TextNormalizer,
            reconciler: Reconciler,
        }
    }

    /// 行级处理：校验、重复检测、价格解析、名称规范化
    ///
    /// 每个非空行恰好产生一个候选或一条失败明细
    fn collect_candidates(&self, rows: &[RawRow], report: &mut ReportBuilder) -> Vec<CandidateItem> {
        let mut detector = DuplicateDetector::new();
        let mut candidates = Vec::new();

        for (idx, cells) in rows.iter().enumerate() {
            let line = idx + FIRST_DATA_LINE;

            let (sku, raw_name, raw_price) = match self.validator.validate(cells, line) {
                RowVerdict::Blank => continue,
                RowVerdict::Rejected(entry) => {
                    report.count_row();
                    report.record_failure(entry);
                    continue;
                }
                RowVerdict::Valid { sku, name, price } => (sku, name, price),
            };
            report.count_row();

            let name = self.normalizer.normalize_whitespace(raw_name);

            if let Some(hit) = detector.check(sku, &name) {
                report.record_failure(FailureEntry {
                    row: line,
                    sku: sku.to_string(),
                    name,
                    price_pts: 0,
                    error: hit.message(),
                });
                continue;
            }

            let price_pts = match self.price_parser.parse_points(raw_price) {
                Ok(points) => points,
                Err(e) => {
                    report.record_failure(FailureEntry {
                        row: line,
                        sku: sku.to_string(),
                        name,
                        price_pts: 0,
                        error: format!("wrong price: {}", e),
                    });
                    continue;
                }
            };

            detector.record(sku, &name, line);
            candidates.push(CandidateItem {
                row: line,
                sku: sku.to_string(),
                clean_name: self.normalizer.clean(&name),
                name,
                price_pts,
            });
        }

        candidates
    }

    /// 读取库内快照（按 sku、按 name 各一次查询）
    ///
    /// 说明: 快照在分类期间不刷新。若其他写入方在读取之后修改了数据，
    /// 分类结果基于过期数据；name 上的唯一索引会让由此产生的冲突在写入时
    /// 以子批次失败的形式暴露出来。
    fn load_snapshot(&self, candidates: &[CandidateItem]) -> ImportResult<ExistingIndex> {
        if candidates.is_empty() {
            return Ok(ExistingIndex::default());
        }

        let skus: Vec<String> = candidates.iter().map(|c| c.sku.clone()).collect();
        let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();

        let by_sku = self
            .repo
            .find_by_skus(&skus)
            .map_err(ImportError::SnapshotReadError)?;
        let by_name = self
            .repo
            .find_by_names(&names)
            .map_err(ImportError::SnapshotReadError)?;

        debug!(sku_hits = by_sku.len(), name_hits = by_name.len(), "快照读取完成");
        Ok(ExistingIndex::from_snapshots(by_sku, by_name))
    }
}

impl<R, C> CatalogImporter for CatalogImporterImpl<R, C>
where
    R: CatalogItemRepository,
    C: ImportConfigReader,
{
    #[instrument(skip(self, rows), fields(batch_id))]
    fn import_rows(&self, rows: &[RawRow]) -> ImportResult<BulkReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let report_name = self.config.get_report_name()?;
        let upsert_batch_size = self.config.get_upsert_batch_size()?;
        let insert_batch_size = self.config.get_insert_batch_size()?;

        info!(batch_id = %batch_id, rows = rows.len(), "开始对账导入");
        let mut report = ReportBuilder::new(report_name, batch_id.clone());

        // === 步骤 1: 行级处理 ===
        debug!("步骤 1: 行校验 / 重复检测 / 价格解析");
        let candidates = self.collect_candidates(rows, &mut report);
        info!(
            candidates = candidates.len(),
            rejected = report.failed_count(),
            "行级处理完成"
        );

        // === 步骤 2: 快照读取 ===
        debug!("步骤 2: 读取库内快照");
        let index = self.load_snapshot(&candidates).map_err(|e| {
            error!(error = %e, "快照读取失败");
            e
        })?;

        // === 步骤 3: 分类 ===
        debug!("步骤 3: 对账分类");
        let mut updates: Vec<ItemWrite> = Vec::new();
        let mut inserts: Vec<ItemWrite> = Vec::new();
        for (candidate, outcome) in self.reconciler.classify_batch(&candidates, &index) {
            match outcome {
                Outcome::Unchanged => report.record_unchanged(),
                Outcome::Updated(write) => {
                    report.record_updated();
                    updates.push(write);
                }
                Outcome::New(write) => {
                    report.record_new();
                    inserts.push(write);
                }
                Outcome::Failed(conflict) => report.record_conflict(candidate, &conflict),
            }
        }

        // === 步骤 4: 分批写入（先 updates，后 inserts）===
        debug!(updates = updates.len(), inserts = inserts.len(), "步骤 4: 分批写入");
        let writer = BatchWriter::new(&self.repo, upsert_batch_size, insert_batch_size);
        let update_summary = writer.write_updates(&updates, &mut report);
        let insert_summary = writer.write_inserts(&inserts, &mut report);

        // === 步骤 5: 输出报告 ===
        let report = report.finish();
        info!(
            batch_id = %batch_id,
            total = report.total,
            unchanged = report.unchanged,
            updated = report.updated,
            new_items = report.new_items,
            failed = report.failed.len(),
            failed_batches = update_summary.failed_batches + insert_summary.failed_batches,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "对账导入完成"
        );

        Ok(report)
    }

    fn import_from_file(&self, file_path: &Path) -> ImportResult<BulkReport> {
        info!(file_path = %file_path.display(), "开始解析文件");

        let rows = self.file_parser.parse_rows(file_path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        self.import_rows(&rows)
    }

    fn create_bulk(&self, items: &[ItemWrite]) -> ImportResult<usize> {
        let mut created = 0;
        for chunk in items.chunks(CREATE_BULK_BATCH_SIZE) {
            created += self.repo.insert_items(chunk)?;
        }
        info!(count = created, "批量创建完成");
        Ok(created)
    }

    fn get_all(&self) -> ImportResult<Vec<CatalogItem>> {
        Ok(self.repo.list_all()?)
    }
}
