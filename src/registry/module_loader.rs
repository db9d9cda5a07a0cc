// ==========================================
// 机柜配置器 - 机柜模块加载
// ==========================================
// 职责: 按模块路径异步加载机柜模块（类名 -> 构造器的导出表）
// ==========================================

use crate::registry::cabinet_classes::{
    constructor, CabinetConstructor, GenericCabinet, ServerCabinet, SERVER_CABINET_CLASS,
};
use crate::registry::error::{RegistryError, RegistryResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// ==========================================
// CabinetModule - 模块导出表
// ==========================================
#[derive(Clone, Default)]
pub struct CabinetModule {
    path: String,
    exports: BTreeMap<String, CabinetConstructor>,
}

impl CabinetModule {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            exports: BTreeMap::new(),
        }
    }

    pub fn with_export(mut self, name: impl Into<String>, ctor: CabinetConstructor) -> Self {
        self.exports.insert(name.into(), ctor);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn export(&self, name: &str) -> Option<CabinetConstructor> {
        self.exports.get(name).cloned()
    }

    pub fn export_names(&self) -> Vec<String> {
        self.exports.keys().cloned().collect()
    }
}

impl fmt::Debug for CabinetModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CabinetModule")
            .field("path", &self.path)
            .field("exports", &self.export_names())
            .finish()
    }
}

// ==========================================
// ModuleLoader - 加载接口
// ==========================================
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// 加载模块；未知路径返回 ModuleNotFound
    async fn load_module(&self, module_path: &str) -> RegistryResult<Arc<CabinetModule>>;

    fn known_modules(&self) -> Vec<String>;
}

// ==========================================
// StaticModuleLoader - 预置模块表
// ==========================================
// 路径匹配: 完全相等优先，其次按后缀匹配（忽略 ./ 前缀与 .js/.rs 扩展名）
#[derive(Debug, Clone, Default)]
pub struct StaticModuleLoader {
    modules: BTreeMap<String, Arc<CabinetModule>>,
}

impl StaticModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置模块
    ///
    /// - cabinets/ServerCabinet: ServerCabinet
    /// - cabinets/tsh_700_500_240/tsh_700_500_240: tsh_700_500_240
    /// - cabinets/GenericCabinet: GenericCabinet
    pub fn with_builtin_modules() -> Self {
        let mut loader = Self::new();
        loader.add_module(
            CabinetModule::new("cabinets/ServerCabinet")
                .with_export(SERVER_CABINET_CLASS, constructor(|| ServerCabinet)),
        );
        loader.add_module(
            CabinetModule::new("cabinets/tsh_700_500_240/tsh_700_500_240").with_export(
                "tsh_700_500_240",
                constructor(|| GenericCabinet::new("tsh_700_500_240")),
            ),
        );
        loader.add_module(
            CabinetModule::new("cabinets/GenericCabinet").with_export(
                "GenericCabinet",
                constructor(|| GenericCabinet::new("GenericCabinet")),
            ),
        );
        loader
    }

    pub fn add_module(&mut self, module: CabinetModule) {
        let key = Self::normalize_path(module.path());
        self.modules.insert(key, Arc::new(module));
    }

    fn normalize_path(path: &str) -> String {
        let trimmed = path.trim().trim_start_matches("./").trim_start_matches('/');
        let trimmed = trimmed
            .strip_suffix(".js")
            .or_else(|| trimmed.strip_suffix(".rs"))
            .unwrap_or(trimmed);
        trimmed.to_string()
    }

    fn find(&self, module_path: &str) -> Option<Arc<CabinetModule>> {
        let wanted = Self::normalize_path(module_path);
        if wanted.is_empty() {
            return None;
        }
        if let Some(module) = self.modules.get(&wanted) {
            return Some(module.clone());
        }
        self.modules
            .iter()
            .find(|(key, _)| {
                key.ends_with(&format!("/{}", wanted)) || wanted.ends_with(&format!("/{}", key))
            })
            .map(|(_, module)| module.clone())
    }
}

#[async_trait]
impl ModuleLoader for StaticModuleLoader {
    async fn load_module(&self, module_path: &str) -> RegistryResult<Arc<CabinetModule>> {
        self.find(module_path)
            .ok_or_else(|| RegistryError::ModuleNotFound {
                module_path: module_path.to_string(),
                available: self.known_modules().join(", "),
            })
    }

    fn known_modules(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }
}
