// ==========================================
// 机柜配置器 - 机柜类型注册与动态加载
// ==========================================
// 职责: 机柜类注册表 + 按模块路径动态加载的工厂
// ==========================================

pub mod cabinet_classes;
pub mod cabinet_factory;
pub mod cabinet_registry;
pub mod error;
pub mod module_loader;


pub use cabinet_classes::{
    constructor, Cabinet, CabinetConstructor, GenericCabinet, ServerCabinet, SERVER_CABINET_CLASS,
};
pub use cabinet_factory::{CabinetAssembly, CabinetFactory};
pub use cabinet_registry::CabinetRegistry;
pub use error::{RegistryError, RegistryResult};
pub use module_loader::{CabinetModule, ModuleLoader, StaticModuleLoader};
