// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的本地存储初始化、配置写入等功能
// ==========================================

#![allow(dead_code)]

use cabinet_configurator::config::ConfigManager;
use cabinet_configurator::db::{ensure_local_schema, open_sqlite_connection};
use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时本地存储并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时文件（需要保持存活）
/// - String: 文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_local_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试连接（统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 写入一组配置
pub fn insert_config(conn: &Connection, entries: &[(&str, &str)]) -> Result<(), Box<dyn Error>> {
    for (key, value) in entries {
        conn.execute(
            "INSERT OR REPLACE INTO config_kv (key, value) VALUES (?1, ?2)",
            [key, value],
        )?;
    }
    Ok(())
}

/// 标准测试配置
///
/// - 告警阈值收紧到 80% / 50%
/// - 不允许回退
/// - 自定义草稿键
pub fn insert_test_config(conn: &Connection) -> Result<(), Box<dyn Error>> {
    insert_config(
        conn,
        &[
            ("validation.critical_warning_pct", "0.8"),
            ("validation.info_pct", "0.5"),
            ("navigation.allow_back_navigation", "false"),
            ("navigation.clear_future_on_back", "true"),
            ("storage.draft_key", "test-draft"),
        ],
    )
}

/// 基于临时文件的 ConfigManager
pub fn create_config_manager() -> Result<(NamedTempFile, ConfigManager), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let manager = ConfigManager::new(&db_path)?;
    Ok((temp_file, manager))
}
