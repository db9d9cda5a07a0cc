// ==========================================
// 机柜配置器 - 累计负载分级
// ==========================================
// 职责: 重量 / 功率 / 散热三条规则共用的阈值分级
// 分级: > 上限 -> 超限；> critical% -> 临界；> info% -> 偏高；其余正常
// 说明: 边界值（恰好等于阈值）归入较低一级
// ==========================================

use crate::config::thresholds::ValidationThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadLevel {
    Exceeded,
    Critical,
    Elevated,
    Normal,
}

/// 按阈值对新的累计值分级（capacity 必须 > 0）
pub fn classify_load(new_total: f64, capacity: f64, thresholds: &ValidationThresholds) -> LoadLevel {
    if new_total > capacity {
        LoadLevel::Exceeded
    } else if new_total > capacity * thresholds.critical_warning_pct {
        LoadLevel::Critical
    } else if new_total > capacity * thresholds.info_pct {
        LoadLevel::Elevated
    } else {
        LoadLevel::Normal
    }
}

pub fn load_percent(new_total: f64, capacity: f64) -> f64 {
    new_total / capacity * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_fall_into_lower_level() {
        let t = ValidationThresholds::default();
        assert_eq!(classify_load(100.0, 100.0, &t), LoadLevel::Critical);
        assert_eq!(classify_load(100.5, 100.0, &t), LoadLevel::Exceeded);
        assert_eq!(classify_load(90.0, 100.0, &t), LoadLevel::Elevated);
        assert_eq!(classify_load(75.0, 100.0, &t), LoadLevel::Normal);
        assert_eq!(classify_load(75.1, 100.0, &t), LoadLevel::Elevated);
    }
}
