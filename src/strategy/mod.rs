// ==========================================
// 机柜配置器 - 安装策略层
// ==========================================
// 职责: 安装方式 -> 策略注册与创建；策略在安装区内分配位置
// ==========================================

pub mod error;
pub mod factory;
pub mod mounting;
pub mod registry;

#[cfg(test)]
mod tests;

pub use error::{StrategyError, StrategyResult};
pub use factory::{MountCheck, StrategyFactory, StrategyInfo};
pub use mounting::{
    DinRailStrategy, MountingPlateStrategy, MountingStrategy, OccupancyStats, Placement,
    PlacementPosition, PlacementRequest, RackUnitStrategy, StrategyOptions, DEFAULT_RACK_UNITS,
    DIN_MODULE_PITCH_MM,
};
pub use registry::{
    StrategyCapabilities, StrategyConstructor, StrategyRegistry, StrategyRegistryStats,
};
