// ==========================================
// 机柜配置器 - 安装策略注册表
// ==========================================
// 职责: 安装方式 -> 策略构造器；支持别名；键统一规范化
// 红线: 注册前必须校验能力（can_mount + mount），不合法的构造器拒绝注册
// ==========================================

use crate::domain::cabinet::CabinetType;
use crate::domain::types::{mount_types, normalize_key};
use crate::strategy::error::{StrategyError, StrategyResult};
use crate::strategy::mounting::{
    DinRailStrategy, MountingPlateStrategy, MountingStrategy, RackUnitStrategy, StrategyOptions,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

pub type StrategyBuildFn = dyn Fn(&CabinetType, &StrategyOptions) -> StrategyResult<Box<dyn MountingStrategy>>
    + Send
    + Sync;

/// 构造器声明的能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyCapabilities {
    pub can_mount: bool,
    pub mount: bool,
}

impl Default for StrategyCapabilities {
    fn default() -> Self {
        Self {
            can_mount: true,
            mount: true,
        }
    }
}

// ==========================================
// StrategyConstructor - 策略构造器
// ==========================================
#[derive(Clone)]
pub struct StrategyConstructor {
    name: String,
    capabilities: StrategyCapabilities,
    build: Arc<StrategyBuildFn>,
}

impl StrategyConstructor {
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&CabinetType, &StrategyOptions) -> StrategyResult<Box<dyn MountingStrategy>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            capabilities: StrategyCapabilities::default(),
            build: Arc::new(build),
        }
    }

    pub fn with_capabilities(mut self, capabilities: StrategyCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> StrategyCapabilities {
        self.capabilities
    }

    pub fn construct(
        &self,
        cabinet: &CabinetType,
        options: &StrategyOptions,
    ) -> StrategyResult<Box<dyn MountingStrategy>> {
        (self.build)(cabinet, options)
    }
}

impl fmt::Debug for StrategyConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyConstructor")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// 注册表统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRegistryStats {
    /// 主键 + 别名
    pub total_keys: usize,
    pub unique_types: usize,
    pub total_aliases: usize,
}

// ==========================================
// StrategyRegistry
// ==========================================
#[derive(Debug, Default)]
pub struct StrategyRegistry {
    /// 主键 -> 构造器
    strategies: HashMap<String, Arc<StrategyConstructor>>,
    /// 别名 -> 主键
    alias_index: HashMap<String, String>,
    /// 主键注册顺序
    order: Vec<String>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置三种安装方式
    ///
    /// - din_rail: din / rail
    /// - rack_unit: rack / 19inch
    /// - mounting_plate: plate
    pub fn with_builtin_strategies() -> Self {
        let mut registry = Self::new();
        let builtins: [(&str, StrategyConstructor, &[&str]); 3] = [
            (
                mount_types::DIN_RAIL,
                StrategyConstructor::new("DinRailStrategy", |cabinet, options| {
                    Ok(Box::new(DinRailStrategy::new(cabinet, options)?) as Box<dyn MountingStrategy>)
                }),
                &["din", "rail"],
            ),
            (
                mount_types::RACK_UNIT,
                StrategyConstructor::new("RackUnitStrategy", |cabinet, options| {
                    Ok(Box::new(RackUnitStrategy::new(cabinet, options)?) as Box<dyn MountingStrategy>)
                }),
                &["rack", "19inch"],
            ),
            (
                mount_types::MOUNTING_PLATE,
                StrategyConstructor::new("MountingPlateStrategy", |cabinet, options| {
                    Ok(Box::new(MountingPlateStrategy::new(cabinet, options)?)
                        as Box<dyn MountingStrategy>)
                }),
                &["plate"],
            ),
        ];

        for (key, ctor, aliases) in builtins {
            if let Err(e) = registry.register(key, ctor, aliases) {
                error!(key, error = %e, "内置安装策略注册失败");
            }
        }
        registry
    }

    /// 校验构造器声明的能力
    ///
    /// 只检查构造器自报的 `StrategyCapabilities` 标志，这些标志即注册约定；
    /// `MountingStrategy` trait 本身已要求实现 `can_mount` 与 `mount`，此处不实例化探测。
    pub fn validate_strategy(ctor: &StrategyConstructor) -> StrategyResult<()> {
        let caps = ctor.capabilities();
        let mut missing = Vec::new();
        if !caps.can_mount {
            missing.push("can_mount");
        }
        if !caps.mount {
            missing.push("mount");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StrategyError::InvalidStrategy {
                name: ctor.name().to_string(),
                reason: format!("缺少能力: {}", missing.join(", ")),
            })
        }
    }

    /// 注册策略
    ///
    /// 同名主键覆盖并记录警告；别名与已有主键冲突时忽略该别名
    pub fn register(
        &mut self,
        key: &str,
        ctor: StrategyConstructor,
        aliases: &[&str],
    ) -> StrategyResult<()> {
        let key = normalize_key(key);
        if key.is_empty() {
            return Err(StrategyError::InvalidStrategy {
                name: ctor.name().to_string(),
                reason: "安装方式为空".to_string(),
            });
        }
        if let Err(e) = Self::validate_strategy(&ctor) {
            error!(key = %key, error = %e, "拒绝注册安装策略");
            return Err(e);
        }

        if self.strategies.contains_key(&key) {
            warn!(key = %key, "安装策略已存在，覆盖旧的构造器及其别名");
            self.alias_index.retain(|_, target| target != &key);
        } else {
            if let Some(previous) = self.alias_index.remove(&key) {
                warn!(key = %key, previous = %previous, "键原为别名，改为独立安装策略");
            }
            self.order.push(key.clone());
        }
        self.strategies.insert(key.clone(), Arc::new(ctor));

        for alias in aliases {
            let alias = normalize_key(alias);
            if alias.is_empty() || alias == key {
                continue;
            }
            if self.strategies.contains_key(&alias) {
                warn!(alias = %alias, key = %key, "别名与已注册安装方式同名，忽略");
                continue;
            }
            if let Some(previous) = self.alias_index.insert(alias.clone(), key.clone()) {
                if previous != key {
                    warn!(alias = %alias, previous = %previous, key = %key, "别名改指向新的安装方式");
                }
            }
        }

        info!(key = %key, aliases = aliases.len(), "安装策略已注册");
        Ok(())
    }

    /// 解析到主键（主键或别名均可）
    pub fn resolve_key(&self, key: &str) -> Option<String> {
        let key = normalize_key(key);
        if self.strategies.contains_key(&key) {
            return Some(key);
        }
        self.alias_index.get(&key).cloned()
    }

    pub fn get(&self, key: &str) -> Option<Arc<StrategyConstructor>> {
        self.resolve_key(key)
            .and_then(|canonical| self.strategies.get(&canonical).cloned())
    }

    pub fn has(&self, key: &str) -> bool {
        self.resolve_key(key).is_some()
    }

    /// 构造策略实例（错误保留给调用方）
    pub fn try_create(
        &self,
        key: &str,
        cabinet: &CabinetType,
        options: &StrategyOptions,
    ) -> StrategyResult<Box<dyn MountingStrategy>> {
        let ctor = self.get(key).ok_or_else(|| StrategyError::NotFound {
            key: normalize_key(key),
            available: self.registered_types().join(", "),
        })?;
        ctor.construct(cabinet, options)
            .map_err(|e| match e {
                StrategyError::Construction { .. } => e,
                other => StrategyError::Construction {
                    key: normalize_key(key),
                    reason: other.to_string(),
                },
            })
    }

    /// 构造策略实例；未注册或构造失败时记录日志并返回 None
    pub fn create(
        &self,
        key: &str,
        cabinet: &CabinetType,
        options: &StrategyOptions,
    ) -> Option<Box<dyn MountingStrategy>> {
        match self.try_create(key, cabinet, options) {
            Ok(strategy) => Some(strategy),
            Err(e) => {
                error!(key, cabinet = %cabinet.id, error = %e, "安装策略创建失败");
                None
            }
        }
    }

    /// 注销
    ///
    /// 主键: 连同其全部别名一起移除；别名: 仅移除该别名
    pub fn unregister(&mut self, key: &str) -> bool {
        let key = normalize_key(key);
        if self.strategies.remove(&key).is_some() {
            self.alias_index.retain(|_, target| target != &key);
            self.order.retain(|k| k != &key);
            info!(key = %key, "安装策略已注销");
            return true;
        }
        self.alias_index.remove(&key).is_some()
    }

    /// 已注册的安装方式（不含别名，按注册顺序）
    pub fn registered_types(&self) -> Vec<String> {
        self.order.clone()
    }

    /// 指定安装方式的别名（排序后返回）
    pub fn aliases(&self, key: &str) -> Vec<String> {
        let Some(canonical) = self.resolve_key(key) else {
            return Vec::new();
        };
        let mut aliases: Vec<String> = self
            .alias_index
            .iter()
            .filter(|(_, target)| **target == canonical)
            .map(|(alias, _)| alias.clone())
            .collect();
        aliases.sort();
        aliases
    }

    pub fn clear(&mut self) {
        self.strategies.clear();
        self.alias_index.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn stats(&self) -> StrategyRegistryStats {
        StrategyRegistryStats {
            total_keys: self.strategies.len() + self.alias_index.len(),
            unique_types: self.strategies.len(),
            total_aliases: self.alias_index.len(),
        }
    }
}
