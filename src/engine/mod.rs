// ==========================================
// 机柜配置器 - 引擎层
// ==========================================
// 职责: 设备安装前的多维度校验（兼容性、尺寸、安装方式、重量、功率、散热）
// 红线: 引擎不做 IO；发现项是数据，永不以错误形式抛出
// ==========================================

pub mod rules;
pub mod validation;

#[cfg(test)]
mod tests;

pub use rules::{
    CompatibilityRule, DimensionRule, MountTypeRule, PowerRule, ThermalRule, WeightRule,
};
pub use validation::{
    Finding, ValidationContext, ValidationEngine, ValidationResult, ValidationRule, ValidationStats,
};
