// ==========================================
// 机柜配置器 - 本地键值存储
// ==========================================
// 职责: 向导状态/草稿的本地持久化（best-effort）
// 存储: local_storage 表（storage_key -> value_json）
// 说明: 只存 JSON 文本，不解析业务结构
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_local_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 本地键值存储接口
pub trait LocalStore: Send + Sync {
    fn save(&self, key: &str, value_json: &str) -> RepositoryResult<()>;

    fn load(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// 删除键，返回是否存在
    fn remove(&self, key: &str) -> RepositoryResult<bool>;
}

// ==========================================
// SqliteLocalStore
// ==========================================
pub struct SqliteLocalStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLocalStore {
    /// 打开（或创建）本地存储文件
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_local_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（会再次应用统一 PRAGMA 与建表，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_local_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl LocalStore for SqliteLocalStore {
    fn save(&self, key: &str, value_json: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO local_storage (storage_key, value_json, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(storage_key) DO UPDATE SET
                value_json = excluded.value_json,
                updated_at = excluded.updated_at
            "#,
            params![key, value_json],
        )?;
        Ok(())
    }

    fn load(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value_json FROM local_storage WHERE storage_key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn remove(&self, key: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM local_storage WHERE storage_key = ?1",
            params![key],
        )?;
        Ok(affected > 0)
    }
}

// ==========================================
// MemoryLocalStore
// ==========================================
// 进程内存储（测试与无磁盘场景）
#[derive(Default)]
pub struct MemoryLocalStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_entries(&self) -> RepositoryResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl LocalStore for MemoryLocalStore {
    fn save(&self, key: &str, value_json: &str) -> RepositoryResult<()> {
        self.get_entries()?
            .insert(key.to_string(), value_json.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.get_entries()?.get(key).cloned())
    }

    fn remove(&self, key: &str) -> RepositoryResult<bool> {
        Ok(self.get_entries()?.remove(key).is_some())
    }
}
