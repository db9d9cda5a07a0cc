// ==========================================
// 机柜配置器 - 核心库
// ==========================================
// 范围: 向导状态机、设备装配校验、安装策略、机柜类型加载、目录缓存
// 技术栈: Rust + SQLite（本地草稿 / 配置）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 目录记录与向导定义
pub mod domain;

// 数据仓储层 - 本地存储
pub mod repository;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 配置层 - 系统配置
pub mod config;

// 向导状态机
pub mod configurator;

// 引擎层 - 装配校验规则
pub mod engine;

// 安装策略
pub mod strategy;

// 机柜类注册与动态加载
pub mod registry;

// 目录服务
pub mod catalog;

// API 层 - 设备安装
pub mod api;

// 应用层 - 共享状态
pub mod app;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域
pub use domain::{
    CabinetDefinition, CabinetType, Conflict, EquipmentItem, Selection, Step, StepOption,
};

// 向导
pub use configurator::{
    Configurator, ConfiguratorConfig, ConfiguratorError, ConfiguratorResult, ConfiguratorState,
    Draft,
};

// 校验
pub use engine::{ValidationContext, ValidationEngine, ValidationResult, ValidationRule};

// 策略 / 机柜类 / 目录
pub use catalog::{Catalog, CatalogService};
pub use registry::{CabinetAssembly, CabinetFactory, CabinetRegistry};
pub use strategy::{MountingStrategy, StrategyFactory, StrategyRegistry};

// API
pub use api::{ApiError, ApiResult, PlacementApi};
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "机柜配置器";
