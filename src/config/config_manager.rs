// ==========================================
// 商品目录批量对账系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// 规则: 缺失或非法的值回退到默认值（非法值记 warn 日志）
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::importer::batch_writer::{DEFAULT_INSERT_BATCH_SIZE, DEFAULT_UPSERT_BATCH_SIZE};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// 默认报告名称
pub const DEFAULT_REPORT_NAME: &str = "Base Items report";

/// 全局配置作用域
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        Ok(())
    }

    fn read_value(&self, key: &str) -> ImportResult<Option<String>> {
        self.get_global_config_value(key)
            .map_err(|e| ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    /// 读取正整数配置，缺失或非法时回退默认值
    fn read_positive_usize(&self, key: &str, default: usize) -> ImportResult<usize> {
        let Some(raw) = self.read_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default,
                    "配置值非法，使用默认值"
                );
                Ok(default)
            }
        }
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
impl ImportConfigReader for ConfigManager {
    fn get_upsert_batch_size(&self) -> ImportResult<usize> {
        self.read_positive_usize(config_keys::UPSERT_BATCH_SIZE, DEFAULT_UPSERT_BATCH_SIZE)
    }

    fn get_insert_batch_size(&self) -> ImportResult<usize> {
        self.read_positive_usize(config_keys::INSERT_BATCH_SIZE, DEFAULT_INSERT_BATCH_SIZE)
    }

    fn get_report_name(&self) -> ImportResult<String> {
        let name = self
            .read_value(config_keys::REPORT_NAME)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string());
        Ok(name)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 写入分批
    pub const UPSERT_BATCH_SIZE: &str = "import/upsert_batch_size";
    pub const INSERT_BATCH_SIZE: &str = "import/insert_batch_size";

    // 报告
    pub const REPORT_NAME: &str = "import/report_name";
}
