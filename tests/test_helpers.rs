// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、CSV 生成、Mock 配置
// ==========================================

#![allow(dead_code)]

use catalog_reconcile::config::ImportConfigReader;
use catalog_reconcile::db::{init_schema, open_sqlite_connection};
use catalog_reconcile::domain::ItemWrite;
use catalog_reconcile::importer::ImportResult;
use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 写入临时 CSV 文件（首行为表头）
pub fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

/// 构造原始行
pub fn raw_row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

pub fn item(sku: &str, name: &str, price_pts: i64) -> ItemWrite {
    ItemWrite {
        sku: sku.to_string(),
        name: name.to_string(),
        price_pts,
    }
}

// ==========================================
// MockConfig - 固定导入参数
// ==========================================
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub upsert_batch_size: usize,
    pub insert_batch_size: usize,
    pub report_name: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            upsert_batch_size: 1000,
            insert_batch_size: 100,
            report_name: "Base Items report".to_string(),
        }
    }
}

impl MockConfig {
    pub fn with_batch_sizes(upsert_batch_size: usize, insert_batch_size: usize) -> Self {
        Self {
            upsert_batch_size,
            insert_batch_size,
            ..Self::default()
        }
    }
}

impl ImportConfigReader for MockConfig {
    fn get_upsert_batch_size(&self) -> ImportResult<usize> {
        Ok(self.upsert_batch_size)
    }

    fn get_insert_batch_size(&self) -> ImportResult<usize> {
        Ok(self.insert_batch_size)
    }

    fn get_report_name(&self) -> ImportResult<String> {
        Ok(self.report_name.clone())
    }
}
