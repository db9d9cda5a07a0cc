// ==========================================
// 机柜配置器 - 校验阈值
// ==========================================
// 说明: 90% / 75% 的告警阈值是经验值（源系统未给出物理依据），
//       因此做成可配置项，不在规则中硬编码
// ==========================================

use serde::{Deserialize, Serialize};

/// 超过上限的该比例时给出警告
pub const DEFAULT_CRITICAL_WARNING_PCT: f64 = 0.9;
/// 超过上限的该比例时给出负载提示
pub const DEFAULT_INFO_PCT: f64 = 0.75;
pub const DEFAULT_WIDTH_WARNING_PCT: f64 = 0.95;
pub const DEFAULT_DEPTH_WARNING_PCT: f64 = 0.9;
/// 标准电网电压（V）
pub const DEFAULT_STANDARD_VOLTAGE_V: f64 = 230.0;
/// 标准断路器额定电流（A）
pub const DEFAULT_MAX_CURRENT_A: f64 = 16.0;
pub const DEFAULT_MIN_RACK_DEPTH_MM: f64 = 200.0;
pub const DEFAULT_DIN_MODULE_WIDTH_MIN: u32 = 1;
pub const DEFAULT_DIN_MODULE_WIDTH_MAX: u32 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationThresholds {
    pub critical_warning_pct: f64,
    pub info_pct: f64,
    pub width_warning_pct: f64,
    pub depth_warning_pct: f64,
    pub standard_voltage_v: f64,
    pub max_current_a: f64,
    pub min_rack_depth_mm: f64,
    pub din_module_width_min: u32,
    pub din_module_width_max: u32,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            critical_warning_pct: DEFAULT_CRITICAL_WARNING_PCT,
            info_pct: DEFAULT_INFO_PCT,
            width_warning_pct: DEFAULT_WIDTH_WARNING_PCT,
            depth_warning_pct: DEFAULT_DEPTH_WARNING_PCT,
            standard_voltage_v: DEFAULT_STANDARD_VOLTAGE_V,
            max_current_a: DEFAULT_MAX_CURRENT_A,
            min_rack_depth_mm: DEFAULT_MIN_RACK_DEPTH_MM,
            din_module_width_min: DEFAULT_DIN_MODULE_WIDTH_MIN,
            din_module_width_max: DEFAULT_DIN_MODULE_WIDTH_MAX,
        }
    }
}

impl ValidationThresholds {
    /// 阈值自洽性检查：0 < info < critical <= 1
    pub fn is_consistent(&self) -> bool {
        self.info_pct > 0.0
            && self.info_pct < self.critical_warning_pct
            && self.critical_warning_pct <= 1.0
            && self.standard_voltage_v > 0.0
            && self.din_module_width_min <= self.din_module_width_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        assert!(ValidationThresholds::default().is_consistent());
    }

    #[test]
    fn test_inverted_thresholds_are_inconsistent() {
        let thresholds = ValidationThresholds {
            info_pct: 0.95,
            critical_warning_pct: 0.9,
            ..Default::default()
        };
        assert!(!thresholds.is_consistent());
    }
}
