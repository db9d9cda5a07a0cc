// ==========================================
// 机柜配置器 - 功率规则
// ==========================================
// 规则: 与重量规则相同的分级，比较对象为机柜最大功率
// 附加: 估算电流 I = P / U，超过标准断路器额定电流时警告
// ==========================================

use crate::config::thresholds::ValidationThresholds;
use crate::domain::cabinet::CabinetType;
use crate::domain::equipment::EquipmentItem;
use crate::engine::rules::budget::{classify_load, load_percent, LoadLevel};
use crate::engine::validation::{ValidationContext, ValidationResult, ValidationRule};

pub const POWER_RULE: &str = "PowerRule";

pub struct PowerRule {
    thresholds: ValidationThresholds,
}

impl PowerRule {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }
}

impl ValidationRule for PowerRule {
    fn name(&self) -> &str {
        POWER_RULE
    }

    fn validate(
        &self,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
        context: &ValidationContext,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        let Some(power) = equipment.specs.power else {
            result.push_info(POWER_RULE, "设备功率未声明，跳过功率校验");
            return result;
        };

        let max_power = cabinet.max_power();
        if max_power <= 0.0 {
            result.push_info(POWER_RULE, "机柜最大功率未定义");
            return result;
        }

        let new_total = context.total_power + power;
        match classify_load(new_total, max_power, &self.thresholds) {
            LoadLevel::Exceeded => result.push_error(
                POWER_RULE,
                format!("总功率 {:.0}W 将超过机柜最大功率 {}W", new_total, max_power),
            ),
            LoadLevel::Critical => result.push_warning(
                POWER_RULE,
                format!("总功率 {:.0}W 接近机柜最大功率 {}W", new_total, max_power),
            ),
            LoadLevel::Elevated => result.push_info(
                POWER_RULE,
                format!("功率负载: {:.1}%", load_percent(new_total, max_power)),
            ),
            LoadLevel::Normal => {}
        }

        let current = new_total / self.thresholds.standard_voltage_v;
        if current > self.thresholds.max_current_a {
            result.push_warning(
                POWER_RULE,
                format!(
                    "估算电流 {:.1}A 超过标准断路器额定电流 {}A",
                    current, self.thresholds.max_current_a
                ),
            );
        }

        result
    }
}
