// ==========================================
// 机柜配置器 - 安装策略工厂
// ==========================================
// 职责: 在注册表之上提供按机柜批量创建、回退创建与安装前检查
// ==========================================

use crate::domain::cabinet::CabinetType;
use crate::domain::equipment::EquipmentItem;
use crate::domain::types::normalize_key;
use crate::strategy::mounting::{MountingStrategy, StrategyOptions};
use crate::strategy::registry::{StrategyCapabilities, StrategyConstructor, StrategyRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 策略描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyInfo {
    /// 请求的键（规范化后）
    pub requested: String,
    /// 解析出的主键
    pub mount_type: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub capabilities: StrategyCapabilities,
}

/// 安装前检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountCheck {
    pub can_mount: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MountCheck {
    fn ok() -> Self {
        Self {
            can_mount: true,
            reason: None,
        }
    }

    fn refused(reason: impl Into<String>) -> Self {
        Self {
            can_mount: false,
            reason: Some(reason.into()),
        }
    }
}

pub struct StrategyFactory<'a> {
    registry: &'a StrategyRegistry,
}

impl<'a> StrategyFactory<'a> {
    pub fn new(registry: &'a StrategyRegistry) -> Self {
        Self { registry }
    }

    pub fn create(
        &self,
        mount_type: &str,
        cabinet: &CabinetType,
        options: &StrategyOptions,
    ) -> Option<Box<dyn MountingStrategy>> {
        if normalize_key(mount_type).is_empty() {
            warn!(cabinet = %cabinet.id, "安装方式为空，无法创建策略");
            return None;
        }
        self.registry.create(mount_type, cabinet, options)
    }

    /// 注册表无法创建时使用回退构造器
    pub fn create_with_fallback(
        &self,
        mount_type: &str,
        cabinet: &CabinetType,
        options: &StrategyOptions,
        fallback: &StrategyConstructor,
    ) -> Option<Box<dyn MountingStrategy>> {
        if let Some(strategy) = self.create(mount_type, cabinet, options) {
            return Some(strategy);
        }
        debug!(mount_type, fallback = fallback.name(), "使用回退安装策略");
        match fallback.construct(cabinet, options) {
            Ok(strategy) => Some(strategy),
            Err(e) => {
                warn!(mount_type, error = %e, "回退安装策略创建失败");
                None
            }
        }
    }

    /// 批量创建，按规范化后的请求键返回；失败的类型被跳过
    pub fn create_multiple(
        &self,
        mount_types: &[&str],
        cabinet: &CabinetType,
        options: &StrategyOptions,
    ) -> BTreeMap<String, Box<dyn MountingStrategy>> {
        let mut strategies = BTreeMap::new();
        for mount_type in mount_types {
            let key = normalize_key(mount_type);
            if strategies.contains_key(&key) {
                continue;
            }
            if let Some(strategy) = self.create(mount_type, cabinet, options) {
                strategies.insert(key, strategy);
            }
        }
        strategies
    }

    /// 按机柜声明的安装能力创建全部策略
    pub fn create_for_cabinet(
        &self,
        cabinet: &CabinetType,
        options: &StrategyOptions,
    ) -> BTreeMap<String, Box<dyn MountingStrategy>> {
        let types: Vec<&str> = cabinet
            .mounting_capabilities
            .iter()
            .map(String::as_str)
            .collect();
        self.create_multiple(&types, cabinet, options)
    }

    pub fn supports(&self, mount_type: &str) -> bool {
        self.registry.has(mount_type)
    }

    pub fn supported_types(&self) -> Vec<String> {
        self.registry.registered_types()
    }

    pub fn strategy_info(&self, mount_type: &str) -> Option<StrategyInfo> {
        let canonical = self.registry.resolve_key(mount_type)?;
        let ctor = self.registry.get(&canonical)?;
        Some(StrategyInfo {
            requested: normalize_key(mount_type),
            aliases: self.registry.aliases(&canonical),
            mount_type: canonical,
            name: ctor.name().to_string(),
            capabilities: ctor.capabilities(),
        })
    }

    /// 安装前检查: 安装方式已注册、机柜支持、策略可创建且接受该设备
    pub fn validate_mount(
        &self,
        mount_type: &str,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
    ) -> MountCheck {
        if !self.supports(mount_type) {
            return MountCheck::refused(format!("不支持的安装方式: {}", mount_type));
        }
        let canonical = self
            .registry
            .resolve_key(mount_type)
            .unwrap_or_else(|| normalize_key(mount_type));
        if !cabinet.supports_mount_type(&canonical) {
            return MountCheck::refused(format!(
                "机柜 {} 不支持安装方式 {}",
                cabinet.id, canonical
            ));
        }
        let Some(strategy) = self.create(&canonical, cabinet, &StrategyOptions::default()) else {
            return MountCheck::refused(format!("安装策略创建失败: {}", canonical));
        };
        if !strategy.can_mount(equipment) {
            return MountCheck::refused(format!(
                "设备 {} 无法以 {} 方式安装到机柜 {}",
                equipment.id, canonical, cabinet.id
            ));
        }
        MountCheck::ok()
    }
}
