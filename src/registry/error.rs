// ==========================================
// 机柜配置器 - 类型注册 / 动态加载错误
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// 模块已加载但没有对应导出
    #[error("模块 {module_path} 中未找到类 {class_name}（可用导出: {exports}）")]
    ClassNotFound {
        class_name: String,
        module_path: String,
        exports: String,
    },

    #[error("未找到机柜模块: {module_path}（已知模块: {available}）")]
    ModuleNotFound {
        module_path: String,
        available: String,
    },

    #[error("目录记录不完整: {id}，缺少 {missing}")]
    InvalidCatalogEntry { id: String, missing: String },

    #[error("机柜类实例化失败: {class_name}: {reason}")]
    Construction { class_name: String, reason: String },

    #[error("模块加载失败: {module_path}: {reason}")]
    Load { module_path: String, reason: String },
}

pub type RegistryResult<T> = Result<T, RegistryError>;
