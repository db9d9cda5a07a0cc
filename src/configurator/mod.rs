// ==========================================
// 机柜配置器 - 向导层
// ==========================================
// 职责: 多步骤向导（选择、可见性、冲突、导航、草稿）
// 输入: ConfiguratorConfig（JSON 可反序列化）
// 输出: 合并后的配置参数 + 向导状态
// ==========================================

pub mod definition;
pub mod error;
pub mod machine;
pub mod state;


pub use definition::{
    ConfiguratorConfig, ConflictSettings, DraftSettings, InjectedStep, NavigationPolicy,
    StorageConfig,
};
pub use error::{ConfiguratorError, ConfiguratorResult};
pub use machine::Configurator;
pub use state::{ConfiguratorState, Draft, DRAFT_SCHEMA_VERSION};
