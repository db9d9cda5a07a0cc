// ==========================================
// 机柜配置器 - 校验规则集
// ==========================================
// 六条相互独立的规则，每条对 (机柜, 设备, 上下文) 为纯函数
// ==========================================

pub mod budget;
pub mod compatibility;
pub mod dimension;
pub mod mount_type;
pub mod power;
pub mod thermal;
pub mod weight;

pub use compatibility::{CompatibilityRule, COMPATIBILITY_RULE};
pub use dimension::{DimensionRule, DIMENSION_RULE};
pub use mount_type::{MountTypeRule, MOUNT_TYPE_RULE};
pub use power::{PowerRule, POWER_RULE};
pub use thermal::{ThermalRule, THERMAL_RULE};
pub use weight::{WeightRule, WEIGHT_RULE};
