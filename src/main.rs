// ==========================================
// 商品目录批量对账系统 - 命令行入口
// ==========================================
// 用法: catalog-reconcile <file.csv|file.xlsx> [db_path]
// 输出: 报告以 JSON 写入 stdout，日志写入 stderr
// ==========================================

use anyhow::{bail, Context, Result};
use catalog_reconcile::db::{default_db_path, init_schema, open_sqlite_connection};
use catalog_reconcile::{
    logging, CatalogImporter, CatalogImporterImpl, CatalogItemRepositoryImpl, ConfigManager,
    UniversalFileParser,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(file_path) = args.next().map(PathBuf::from) else {
        bail!("用法: catalog-reconcile <file.csv|file.xlsx> [db_path]");
    };
    let db_path = args.next().unwrap_or_else(default_db_path);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", catalog_reconcile::APP_NAME, catalog_reconcile::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("==================================================");

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn).context("数据库建表失败")?;
    let conn = Arc::new(Mutex::new(conn));

    let repo = CatalogItemRepositoryImpl::from_connection(conn.clone());
    let config = ConfigManager::from_connection(conn).context("配置初始化失败")?;
    let importer = CatalogImporterImpl::new(repo, config, Box::new(UniversalFileParser));

    let report = importer
        .import_from_file(&file_path)
        .with_context(|| format!("导入失败: {}", file_path.display()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
