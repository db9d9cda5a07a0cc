// ==========================================
// 机柜配置器 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value)
// 说明: 缺失或非法值一律回落到默认值，并打 warn 日志
// ==========================================

use crate::config::config_reader::ConfigReader;
use crate::config::thresholds::{self, ValidationThresholds};
use crate::configurator::definition::{NavigationPolicy, DEFAULT_DRAFT_STORAGE_KEY};
use crate::db::{configure_sqlite_connection, ensure_local_schema, open_sqlite_connection};
use crate::repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

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
    /// - db_path: 本地存储文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_local_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 与建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&conn_guard)?;
            ensure_local_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入（覆写）配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        tracing::debug!(key, value, "配置已更新");
        Ok(())
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析配置值，解析失败回落到默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> RepositoryResult<T>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!("配置值非法: {}={}，使用默认值 {}", key, raw, default);
                    Ok(default)
                }
            },
        }
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> RepositoryResult<bool> {
        let value = self.get_config_or_default(key, if default { "true" } else { "false" })?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => {
                tracing::warn!("配置值非法: {}={}，使用默认值 {}", key, other, default);
                Ok(default)
            }
        }
    }

    /// 获取所有配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<HashMap<String, String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut snapshot = HashMap::new();
        for row in rows {
            let (k, v) = row?;
            snapshot.insert(k, v);
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl ConfigReader for ConfigManager {
    async fn get_validation_thresholds(&self) -> RepositoryResult<ValidationThresholds> {
        let loaded = ValidationThresholds {
            critical_warning_pct: self.get_parsed_or_default(
                config_keys::CRITICAL_WARNING_PCT,
                thresholds::DEFAULT_CRITICAL_WARNING_PCT,
            )?,
            info_pct: self.get_parsed_or_default(config_keys::INFO_PCT, thresholds::DEFAULT_INFO_PCT)?,
            width_warning_pct: self.get_parsed_or_default(
                config_keys::WIDTH_WARNING_PCT,
                thresholds::DEFAULT_WIDTH_WARNING_PCT,
            )?,
            depth_warning_pct: self.get_parsed_or_default(
                config_keys::DEPTH_WARNING_PCT,
                thresholds::DEFAULT_DEPTH_WARNING_PCT,
            )?,
            standard_voltage_v: self.get_parsed_or_default(
                config_keys::STANDARD_VOLTAGE_V,
                thresholds::DEFAULT_STANDARD_VOLTAGE_V,
            )?,
            max_current_a: self.get_parsed_or_default(
                config_keys::MAX_CURRENT_A,
                thresholds::DEFAULT_MAX_CURRENT_A,
            )?,
            min_rack_depth_mm: self.get_parsed_or_default(
                config_keys::MIN_RACK_DEPTH_MM,
                thresholds::DEFAULT_MIN_RACK_DEPTH_MM,
            )?,
            din_module_width_min: self.get_parsed_or_default(
                config_keys::DIN_MODULE_WIDTH_MIN,
                thresholds::DEFAULT_DIN_MODULE_WIDTH_MIN,
            )?,
            din_module_width_max: self.get_parsed_or_default(
                config_keys::DIN_MODULE_WIDTH_MAX,
                thresholds::DEFAULT_DIN_MODULE_WIDTH_MAX,
            )?,
        };

        if loaded.is_consistent() {
            Ok(loaded)
        } else {
            tracing::warn!(?loaded, "校验阈值不自洽，整体回落到默认值");
            Ok(ValidationThresholds::default())
        }
    }

    async fn get_navigation_policy(&self) -> RepositoryResult<NavigationPolicy> {
        Ok(NavigationPolicy {
            allow_back_navigation: self.get_bool_or_default(config_keys::ALLOW_BACK_NAVIGATION, true)?,
            clear_future_on_back: self.get_bool_or_default(config_keys::CLEAR_FUTURE_ON_BACK, true)?,
        })
    }

    async fn get_catalog_path(&self) -> RepositoryResult<Option<String>> {
        Ok(self
            .get_config_value(config_keys::CATALOG_PATH)?
            .filter(|p| !p.trim().is_empty()))
    }

    async fn get_draft_storage_key(&self) -> RepositoryResult<String> {
        self.get_config_or_default(config_keys::DRAFT_STORAGE_KEY, DEFAULT_DRAFT_STORAGE_KEY)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 校验阈值
    pub const CRITICAL_WARNING_PCT: &str = "validation.critical_warning_pct";
    pub const INFO_PCT: &str = "validation.info_pct";
    pub const WIDTH_WARNING_PCT: &str = "validation.width_warning_pct";
    pub const DEPTH_WARNING_PCT: &str = "validation.depth_warning_pct";
    pub const STANDARD_VOLTAGE_V: &str = "validation.standard_voltage_v";
    pub const MAX_CURRENT_A: &str = "validation.max_current_a";
    pub const MIN_RACK_DEPTH_MM: &str = "validation.min_rack_depth_mm";
    pub const DIN_MODULE_WIDTH_MIN: &str = "validation.din_module_width_min";
    pub const DIN_MODULE_WIDTH_MAX: &str = "validation.din_module_width_max";

    // 向导导航
    pub const ALLOW_BACK_NAVIGATION: &str = "navigation.allow_back_navigation";
    pub const CLEAR_FUTURE_ON_BACK: &str = "navigation.clear_future_on_back";

    // 目录与草稿
    pub const CATALOG_PATH: &str = "catalog.path";
    pub const DRAFT_STORAGE_KEY: &str = "storage.draft_key";
}
