// ==========================================
// 机柜配置器 - 机柜工厂
// ==========================================
// 职责: 按 (className, modulePath) 动态加载机柜类；从目录记录组装机柜
// 红线: 加载失败记录日志后原样返回给调用方，不吞错
// ==========================================

use crate::domain::cabinet::{CabinetDefinition, CabinetType};
use crate::domain::types::mount_types;
use crate::registry::cabinet_classes::{Cabinet, CabinetConstructor};
use crate::registry::cabinet_registry::CabinetRegistry;
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::module_loader::ModuleLoader;
use crate::strategy::factory::StrategyFactory;
use crate::strategy::mounting::{MountingStrategy, StrategyOptions};
use crate::strategy::registry::StrategyRegistry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

// ==========================================
// CabinetAssembly - 组装结果
// ==========================================
pub struct CabinetAssembly {
    pub instance: Box<dyn Cabinet>,
    pub cabinet_type: CabinetType,
    /// 规范化安装方式 -> 策略实例
    pub strategies: BTreeMap<String, Box<dyn MountingStrategy>>,
    /// 按机柜声明顺序第一个可用的安装方式
    pub primary_strategy: Option<String>,
}

impl CabinetAssembly {
    pub fn strategy_mut(&mut self, mount_type: &str) -> Option<&mut Box<dyn MountingStrategy>> {
        self.strategies.get_mut(mount_type)
    }

    pub fn primary_mut(&mut self) -> Option<&mut Box<dyn MountingStrategy>> {
        let key = self.primary_strategy.clone()?;
        self.strategies.get_mut(&key)
    }
}

impl fmt::Debug for CabinetAssembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CabinetAssembly")
            .field("instance", &self.instance)
            .field("cabinet_type", &self.cabinet_type.id)
            .field("strategies", &self.strategies.keys().collect::<Vec<_>>())
            .field("primary_strategy", &self.primary_strategy)
            .finish()
    }
}

// ==========================================
// CabinetFactory
// ==========================================
pub struct CabinetFactory {
    loader: Arc<dyn ModuleLoader>,
}

impl CabinetFactory {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self { loader }
    }

    /// 加载模块并取出类构造器
    #[instrument(skip(self))]
    pub async fn load_class(
        &self,
        class_name: &str,
        module_path: &str,
    ) -> RegistryResult<CabinetConstructor> {
        let module = match self.loader.load_module(module_path).await {
            Ok(module) => module,
            Err(e) => {
                error!(error = %e, "机柜模块加载失败");
                return Err(e);
            }
        };

        module.export(class_name).ok_or_else(|| {
            let err = RegistryError::ClassNotFound {
                class_name: class_name.to_string(),
                module_path: module.path().to_string(),
                exports: module.export_names().join(", "),
            };
            error!(error = %err, "机柜类不存在");
            err
        })
    }

    /// 加载并实例化
    pub async fn load_cabinet(
        &self,
        class_name: &str,
        module_path: &str,
    ) -> RegistryResult<Box<dyn Cabinet>> {
        let ctor = self.load_class(class_name, module_path).await?;
        Self::instantiate(class_name, &ctor)
    }

    /// 加载、注册并实例化
    pub async fn load_and_register(
        &self,
        class_name: &str,
        module_path: &str,
        registry: &mut CabinetRegistry,
    ) -> RegistryResult<Box<dyn Cabinet>> {
        let ctor = self.load_class(class_name, module_path).await?;
        let instance = Self::instantiate(class_name, &ctor)?;
        registry.register(class_name, ctor);
        Ok(instance)
    }

    /// 从目录记录加载（className 与 modulePath 必须同时存在）
    pub async fn create_from_catalog(
        &self,
        def: &CabinetDefinition,
    ) -> RegistryResult<Box<dyn Cabinet>> {
        let (class_name, module_path) = Self::require_class_ref(def)?;
        self.load_cabinet(class_name, module_path).await
    }

    /// 组装: 机柜类实例 + 能力视图 + 每种安装能力的策略
    #[instrument(skip_all, fields(cabinet = %def.id))]
    pub async fn create_from_definition(
        &self,
        def: &CabinetDefinition,
        strategies: &StrategyRegistry,
        options: &StrategyOptions,
    ) -> RegistryResult<CabinetAssembly> {
        let instance = self.create_from_catalog(def).await?;
        Ok(Self::assemble(instance, def, strategies, options))
    }

    /// 同步组装（实例已加载）
    ///
    /// 机柜未声明任何可创建的安装方式时回退到 din_rail
    pub fn assemble(
        instance: Box<dyn Cabinet>,
        def: &CabinetDefinition,
        strategies: &StrategyRegistry,
        options: &StrategyOptions,
    ) -> CabinetAssembly {
        let cabinet_type = CabinetType::from_definition(def);

        let factory = StrategyFactory::new(strategies);
        let mut created = factory.create_for_cabinet(&cabinet_type, options);
        if created.is_empty() {
            warn!(cabinet = %def.id, "机柜没有可用的安装策略，回退到 din_rail");
            if let Some(strategy) = factory.create(mount_types::DIN_RAIL, &cabinet_type, options) {
                created.insert(mount_types::DIN_RAIL.to_string(), strategy);
            }
        }

        let primary_strategy = cabinet_type
            .mounting_capabilities
            .iter()
            .find(|cap| created.contains_key(cap.as_str()))
            .cloned()
            .or_else(|| created.keys().next().cloned());

        info!(
            cabinet = %def.id,
            class_name = instance.class_name(),
            strategies = created.len(),
            primary = ?primary_strategy,
            "机柜组装完成"
        );

        CabinetAssembly {
            instance,
            cabinet_type,
            strategies: created,
            primary_strategy,
        }
    }

    fn require_class_ref(def: &CabinetDefinition) -> RegistryResult<(&str, &str)> {
        let class_name = def.class_name.as_deref().map(str::trim).unwrap_or("");
        let module_path = def.module_path.as_deref().map(str::trim).unwrap_or("");

        let mut missing = Vec::new();
        if class_name.is_empty() {
            missing.push("className");
        }
        if module_path.is_empty() {
            missing.push("modulePath");
        }
        if !missing.is_empty() {
            let err = RegistryError::InvalidCatalogEntry {
                id: def.id.clone(),
                missing: missing.join(", "),
            };
            error!(error = %err, "目录记录无法加载机柜类");
            return Err(err);
        }
        Ok((class_name, module_path))
    }

    fn instantiate(
        class_name: &str,
        ctor: &CabinetConstructor,
    ) -> RegistryResult<Box<dyn Cabinet>> {
        ctor().map_err(|e| {
            let err = match e {
                RegistryError::Construction { .. } => e,
                other => RegistryError::Construction {
                    class_name: class_name.to_string(),
                    reason: other.to_string(),
                },
            };
            error!(error = %err, "机柜类实例化失败");
            err
        })
    }
}
