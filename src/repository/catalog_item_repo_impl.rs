// ==========================================
// 商品目录批量对账系统 - 目录商品 Repository 实现
// ==========================================
// 职责: 实现目录商品数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::item::{CatalogItem, ItemWrite};
use crate::repository::catalog_item_repo::CatalogItemRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 单条 IN 查询绑定参数上限（低于 SQLite 默认变量上限）
const LOOKUP_CHUNK_SIZE: usize = 500;

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn map_catalog_item(row: &Row<'_>) -> rusqlite::Result<CatalogItem> {
    Ok(CatalogItem {
        id: row.get(0)?,
        sku: row.get(1)?,
        name: row.get(2)?,
        price_pts: row.get(3)?,
        created_at: parse_timestamp(&row.get::<_, String>(4)?),
        updated_at: parse_timestamp(&row.get::<_, String>(5)?),
    })
}

// ==========================================
// CatalogItemRepositoryImpl
// ==========================================
pub struct CatalogItemRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogItemRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按列做分块 IN 查询
    fn find_by_column_in(
        &self,
        column: &str,
        values: &[String],
    ) -> RepositoryResult<Vec<CatalogItem>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let mut items = Vec::new();

        for chunk in values.chunks(LOOKUP_CHUNK_SIZE) {
            // 构建 IN 子句的占位符
            let placeholders = chunk.iter().map(|_| "?").collect::<Vec<_>>().join(",");

            let query = format!(
                "SELECT id, sku, name, price_pts, created_at, updated_at \
                 FROM catalog_item WHERE {} IN ({})",
                column, placeholders
            );

            let mut stmt = conn.prepare(&query)?;

            // 绑定参数
            let params: Vec<&dyn rusqlite::ToSql> =
                chunk.iter().map(|v| v as &dyn rusqlite::ToSql).collect();

            let rows = stmt
                .query_map(params.as_slice(), map_catalog_item)?
                .collect::<Result<Vec<_>, _>>()?;
            items.extend(rows);
        }

        Ok(items)
    }
}

impl CatalogItemRepository for CatalogItemRepositoryImpl {
    fn find_by_skus(&self, skus: &[String]) -> RepositoryResult<Vec<CatalogItem>> {
        self.find_by_column_in("sku", skus)
    }

    fn find_by_names(&self, names: &[String]) -> RepositoryResult<Vec<CatalogItem>> {
        self.find_by_column_in("name", names)
    }

    /// 子批次 upsert（事务化）
    fn upsert_by_sku(&self, items: &[ItemWrite]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let now = Utc::now().to_rfc3339();

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO catalog_item (sku, name, price_pts, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?4)
                ON CONFLICT(sku) DO UPDATE SET
                    name = excluded.name,
                    price_pts = excluded.price_pts,
                    updated_at = excluded.updated_at
                "#,
            )?;

            for item in items {
                stmt.execute(params![item.sku, item.name, item.price_pts, now])?;
                count += 1;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    /// 子批次插入（事务化）
    fn insert_items(&self, items: &[ItemWrite]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let now = Utc::now().to_rfc3339();

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO catalog_item (sku, name, price_pts, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?4)
                "#,
            )?;

            for item in items {
                stmt.execute(params![item.sku, item.name, item.price_pts, now])?;
                count += 1;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    fn list_all(&self) -> RepositoryResult<Vec<CatalogItem>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, sku, name, price_pts, created_at, updated_at
            FROM catalog_item
            ORDER BY id ASC
            "#,
        )?;

        let items = stmt
            .query_map([], map_catalog_item)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn count_items(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM catalog_item", [], |row| row.get(0))?;

        Ok(count as usize)
    }
}
