// ==========================================
// 机柜配置器 - 机柜类注册表
// ==========================================
// 职责: 类名 -> 机柜类构造器
// 红线: 类名按原样匹配（目录中的 className 大小写敏感）
// ==========================================

use crate::registry::cabinet_classes::{Cabinet, CabinetConstructor};
use crate::registry::error::{RegistryError, RegistryResult};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

#[derive(Default, Clone)]
pub struct CabinetRegistry {
    classes: BTreeMap<String, CabinetConstructor>,
}

impl CabinetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册机柜类，同名覆盖
    pub fn register(&mut self, name: &str, ctor: CabinetConstructor) {
        if self.classes.insert(name.to_string(), ctor).is_some() {
            warn!(class_name = name, "机柜类已存在，覆盖注册");
        } else {
            info!(class_name = name, "机柜类已注册");
        }
    }

    pub fn get(&self, name: &str) -> Option<CabinetConstructor> {
        self.classes.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// 已注册类名（字典序）
    pub fn names(&self) -> Vec<String> {
        self.classes.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.classes.clear();
    }

    pub fn size(&self) -> usize {
        self.classes.len()
    }

    /// 按类名实例化
    pub fn instantiate(&self, name: &str) -> RegistryResult<Box<dyn Cabinet>> {
        let ctor = self.get(name).ok_or_else(|| RegistryError::ClassNotFound {
            class_name: name.to_string(),
            module_path: "<registry>".to_string(),
            exports: self.names().join(", "),
        })?;
        ctor()
    }
}

impl fmt::Debug for CabinetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CabinetRegistry")
            .field("classes", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::cabinet_classes::{constructor, GenericCabinet, ServerCabinet};

    #[test]
    fn test_register_get_has_clear_size() {
        let mut registry = CabinetRegistry::new();
        assert_eq!(registry.size(), 0);

        registry.register("ServerCabinet", constructor(|| ServerCabinet));
        registry.register("tsh_700_500_240", constructor(|| GenericCabinet::new("tsh_700_500_240")));
        assert!(registry.has("ServerCabinet"));
        assert!(!registry.has("servercabinet"));
        assert_eq!(registry.size(), 2);
        assert_eq!(registry.names(), vec!["ServerCabinet", "tsh_700_500_240"]);

        let instance = registry.instantiate("tsh_700_500_240").unwrap();
        assert_eq!(instance.class_name(), "tsh_700_500_240");

        // 覆盖不增加数量
        registry.register("ServerCabinet", constructor(|| ServerCabinet));
        assert_eq!(registry.size(), 2);

        registry.clear();
        assert_eq!(registry.size(), 0);
        assert!(registry.get("ServerCabinet").is_none());
    }

    #[test]
    fn test_instantiate_unknown_lists_registered() {
        let mut registry = CabinetRegistry::new();
        registry.register("ServerCabinet", constructor(|| ServerCabinet));
        let err = registry.instantiate("Missing").unwrap_err();
        assert!(err.to_string().contains("ServerCabinet"));
    }
}
