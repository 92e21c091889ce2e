// ==========================================
// CatalogImporter 集成测试
// ==========================================
// 测试目标: 验证 文件 → 对账 → 写库 → 报告 的完整流程
// ==========================================

mod test_helpers;

use catalog_reconcile::config::{config_keys, ConfigManager};
use catalog_reconcile::domain::{CatalogItem, ItemWrite};
use catalog_reconcile::importer::{
    CatalogImporter, CatalogImporterImpl, CsvParser, ImportError, UniversalFileParser,
};
use catalog_reconcile::logging;
use catalog_reconcile::repository::{
    CatalogItemRepository, CatalogItemRepositoryImpl, RepositoryError, RepositoryResult,
};
use std::path::Path;
use std::sync::Mutex;
use test_helpers::{create_test_db, item, raw_row, write_csv, MockConfig};

/// 创建测试用的 CatalogImporter 实例
fn create_test_importer(
    db_path: &str,
    config: MockConfig,
) -> CatalogImporterImpl<CatalogItemRepositoryImpl, MockConfig> {
    let repo = CatalogItemRepositoryImpl::new(db_path).expect("Failed to create repository");
    CatalogImporterImpl::new(repo, config, Box::new(UniversalFileParser))
}

#[test]
fn test_import_csv_mixed_outcomes() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path, MockConfig::default());
    importer
        .create_bulk(&[item("A1", "Panadol", 100), item("B2", "Brufen", 200)])
        .unwrap();

    let csv = write_csv(&[
        "sku,name,price",
        "A1,Panadol,1.00",          // 2: unchanged
        "B2,  Brufen   400 ,2.50",  // 3: updated（改名 + 调价）
        "C3,Zinc,3",                // 4: new
        "",                         // 5: 空白行
        "C3,Other,4",               // 6: 重复 sku
        "E5,Brufen 400,1",          // 7: 重复 name
        "F6,Thing,12.345",          // 8: 价格精度超限
        "G7,Brufen,5",              // 9: 名称已被 B2 占用（快照）
        "H8",                       // 10: 列数不足
        ",Foo,1",                   // 11: 必填为空
    ]);

    let report = importer.import_from_file(csv.path()).unwrap();

    assert_eq!(report.name, "Base Items report");
    assert!(!report.batch_id.is_empty());
    assert_eq!(report.total, 9);
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.new_items, 1);
    assert_eq!(
        report.unchanged + report.updated + report.new_items + report.failed.len(),
        report.total
    );

    let rows: Vec<usize> = report.failed.iter().map(|f| f.row).collect();
    assert_eq!(rows, vec![6, 7, 8, 9, 10, 11]);

    let errors: Vec<&str> = report.failed.iter().map(|f| f.error.as_str()).collect();
    assert_eq!(errors[0], "duplicate SKU found at row [4]");
    assert_eq!(errors[1], "duplicate Name found at row [3]");
    assert!(errors[2].starts_with("wrong price: "));
    assert_eq!(errors[3], "this name already exists in db at id: 2 | sku: B2");
    assert_eq!(errors[4], "short data in row.");
    assert_eq!(errors[5], "empty data in row");
    assert_eq!(report.failed[5].sku, " - ");

    let all = importer.get_all().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].sku, "B2");
    assert_eq!(all[1].name, "Brufen 400");
    assert_eq!(all[1].price_pts, 250);
    assert_eq!(all[2].sku, "C3");
    assert_eq!(all[2].price_pts, 300);
}

#[test]
fn test_reimport_same_file_is_unchanged() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path, MockConfig::default());

    let csv = write_csv(&["sku,name,price", "A1,Panadol,1.00", "B2,Brufen,2.50"]);

    let first = importer.import_from_file(csv.path()).unwrap();
    assert_eq!(first.new_items, 2);

    let second = importer.import_from_file(csv.path()).unwrap();
    assert_eq!(second.total, 2);
    assert_eq!(second.unchanged, 2);
    assert_eq!(second.updated + second.new_items, 0);
    assert!(second.failed.is_empty());
    assert_ne!(first.batch_id, second.batch_id);
}

#[test]
fn test_rename_onto_other_items_name_fails() {
    let (_temp_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path, MockConfig::default());
    importer
        .create_bulk(&[item("A1", "X", 100), item("B2", "Y", 200)])
        .unwrap();

    let report = importer
        .import_rows(&[raw_row(&["A1", "Y", "1.50"])])
        .unwrap();

    assert_eq!(report.updated, 0);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].row, 2);
    assert_eq!(
        report.failed[0].error,
        "this name is already used by another item in db at id: 2 | sku: B2"
    );

    // 库内数据保持不变
    let all = importer.get_all().unwrap();
    assert_eq!(all[0].name, "X");
    assert_eq!(all[0].price_pts, 100);
}

#[test]
fn test_whitespace_only_sku_or_name_is_rejected() {
    let (_temp_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path, MockConfig::default());

    let report = importer
        .import_rows(&[raw_row(&["A1", "   ", "1"]), raw_row(&["  ", "Foo", "2"])])
        .unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.new_items, 0);
    let failed: Vec<(usize, &str, &str, &str)> = report
        .failed
        .iter()
        .map(|f| (f.row, f.sku.as_str(), f.name.as_str(), f.error.as_str()))
        .collect();
    assert_eq!(
        failed,
        vec![
            (2, "A1", "empty", "empty data in row"),
            (3, " - ", "Foo", "empty data in row")
        ]
    );
    assert!(importer.get_all().unwrap().is_empty());
}

#[test]
fn test_blank_rows_do_not_count() {
    let (_temp_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path, MockConfig::default());

    let rows = vec![
        raw_row(&[]),
        raw_row(&["A1", "X", "1"]),
        raw_row(&["", "", ""]),
        raw_row(&["A1", "Z", "2"]),
    ];

    let report = importer.import_rows(&rows).unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.new_items, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].row, 5);
    assert_eq!(report.failed[0].error, "duplicate SKU found at row [3]");
}

#[test]
fn test_missing_file_aborts_before_store_access() {
    let repo = ScriptedRepo::new();
    let importer = CatalogImporterImpl::new(&repo, MockConfig::default(), Box::new(CsvParser));

    let result = importer.import_from_file(Path::new("no_such_catalog.csv"));
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    assert_eq!(*repo.lookups.lock().unwrap(), 0);
}

#[test]
fn test_snapshot_failure_is_fatal() {
    let mut repo = ScriptedRepo::new();
    repo.fail_lookups = true;
    let importer = CatalogImporterImpl::new(&repo, MockConfig::default(), Box::new(CsvParser));

    let result = importer.import_rows(&[raw_row(&["A1", "X", "1"])]);
    assert!(matches!(result, Err(ImportError::SnapshotReadError(_))));
    assert!(repo.inserted.lock().unwrap().is_empty());
}

#[test]
fn test_failed_insert_batch_is_demoted_and_sorted_first() {
    logging::init_test();

    let mut repo = ScriptedRepo::new();
    repo.fail_insert_call = Some(2);
    let importer =
        CatalogImporterImpl::new(&repo, MockConfig::with_batch_sizes(1000, 2), Box::new(CsvParser));

    let rows = vec![
        raw_row(&["S1", "N1", "1"]),
        raw_row(&["S2", "N2", "1"]),
        raw_row(&["S3", "N3", "1"]),
        raw_row(&["S4", "N4", "oops"]),
        raw_row(&["S5", "N5", "1"]),
        raw_row(&["S6", "N6", "1"]),
    ];

    let report = importer.import_rows(&rows).unwrap();

    assert_eq!(report.total, 6);
    // 第二个 insert 子批次（S3, S5）失败，其余子批次保持写入
    assert_eq!(report.new_items, 3);
    assert_eq!(
        *repo.inserted.lock().unwrap(),
        vec!["S1".to_string(), "S2".to_string(), "S6".to_string()]
    );

    let failed: Vec<(usize, &str)> = report
        .failed
        .iter()
        .map(|f| (f.row, f.sku.as_str()))
        .collect();
    assert_eq!(failed, vec![(0, "S3"), (0, "S5"), (5, "S4")]);
    assert!(report.failed[0].error.contains("disk I/O"));
    assert_eq!(report.failed[0].price_pts, 100);
}

#[test]
fn test_report_name_and_batch_sizes_from_config_kv() {
    let (_temp_db, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_global_config_value(config_keys::REPORT_NAME, "Pharmacy prices")
        .unwrap();
    config
        .set_global_config_value(config_keys::INSERT_BATCH_SIZE, "1")
        .unwrap();

    let repo = CatalogItemRepositoryImpl::new(&db_path).unwrap();
    let importer = CatalogImporterImpl::new(repo, config, Box::new(UniversalFileParser));

    let report = importer
        .import_rows(&[raw_row(&["A1", "X", "1"]), raw_row(&["B2", "Y", "2"])])
        .unwrap();

    assert_eq!(report.name, "Pharmacy prices");
    assert_eq!(report.new_items, 2);
    assert_eq!(importer.get_all().unwrap().len(), 2);
}

#[test]
fn test_create_bulk_propagates_store_error() {
    let (_temp_db, db_path) = create_test_db().unwrap();
    let importer = create_test_importer(&db_path, MockConfig::default());

    let result = importer.create_bulk(&[item("A1", "X", 1), item("B2", "X", 2)]);
    assert!(matches!(
        result,
        Err(ImportError::Repository(RepositoryError::UniqueConstraintViolation(_)))
    ));
    assert!(importer.get_all().unwrap().is_empty());
}

// ==========================================
// ScriptedRepo - 可注入失败的内存仓储
// ==========================================
struct ScriptedRepo {
    fail_lookups: bool,
    fail_insert_call: Option<usize>,
    lookups: Mutex<usize>,
    insert_calls: Mutex<usize>,
    inserted: Mutex<Vec<String>>,
}

impl ScriptedRepo {
    fn new() -> Self {
        Self {
            fail_lookups: false,
            fail_insert_call: None,
            lookups: Mutex::new(0),
            insert_calls: Mutex::new(0),
            inserted: Mutex::new(Vec::new()),
        }
    }

    fn lookup(&self) -> RepositoryResult<Vec<CatalogItem>> {
        *self.lookups.lock().unwrap() += 1;
        if self.fail_lookups {
            return Err(RepositoryError::DatabaseConnectionError(
                "database is locked".to_string(),
            ));
        }
        Ok(Vec::new())
    }
}

impl CatalogItemRepository for &ScriptedRepo {
    fn find_by_skus(&self, _skus: &[String]) -> RepositoryResult<Vec<CatalogItem>> {
        self.lookup()
    }

    fn find_by_names(&self, _names: &[String]) -> RepositoryResult<Vec<CatalogItem>> {
        self.lookup()
    }

    fn upsert_by_sku(&self, items: &[ItemWrite]) -> RepositoryResult<usize> {
        Ok(items.len())
    }

    fn insert_items(&self, items: &[ItemWrite]) -> RepositoryResult<usize> {
        let mut calls = self.insert_calls.lock().unwrap();
        *calls += 1;
        if self.fail_insert_call == Some(*calls) {
            return Err(RepositoryError::DatabaseTransactionError(
                "disk I/O error".to_string(),
            ));
        }
        self.inserted
            .lock()
            .unwrap()
            .extend(items.iter().map(|i| i.sku.clone()));
        Ok(items.len())
    }

    fn list_all(&self) -> RepositoryResult<Vec<CatalogItem>> {
        Ok(Vec::new())
    }

    fn count_items(&self) -> RepositoryResult<usize> {
        Ok(self.inserted.lock().unwrap().len())
    }
}
