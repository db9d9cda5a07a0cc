// ==========================================
// 机柜配置器 - 配置层
// ==========================================
// 职责: 系统配置管理（校验阈值、导航策略、目录路径、草稿键）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader;
pub mod thresholds;

pub use config_manager::{config_keys, ConfigManager};
pub use config_reader::ConfigReader;
pub use thresholds::ValidationThresholds;
