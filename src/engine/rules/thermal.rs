// ==========================================
// 机柜配置器 - 散热规则
// ==========================================
// 规则: 已提交散热量 + 设备散热量，与机柜散热能力按同一阈值分级
// 注: 加法近似模型，不考虑气流与环境温度，不能作为安全依据
// 缺失: 设备散热量或机柜散热能力未定义 -> info（计算延后），不静默跳过
// ==========================================

use crate::config::thresholds::ValidationThresholds;
use crate::domain::cabinet::CabinetType;
use crate::domain::equipment::EquipmentItem;
use crate::engine::rules::budget::{classify_load, load_percent, LoadLevel};
use crate::engine::validation::{ValidationContext, ValidationResult, ValidationRule};

pub const THERMAL_RULE: &str = "ThermalRule";

pub struct ThermalRule {
    thresholds: ValidationThresholds,
}

impl ThermalRule {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }
}

impl ValidationRule for ThermalRule {
    fn name(&self) -> &str {
        THERMAL_RULE
    }

    fn validate(
        &self,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
        context: &ValidationContext,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        let Some(heat) = equipment.specs.heat_dissipation else {
            result.push_info(THERMAL_RULE, "设备散热量未声明，热计算延后");
            return result;
        };
        let Some(capacity) = cabinet.cooling_capacity() else {
            result.push_info(THERMAL_RULE, "机柜散热能力未定义，热计算延后");
            return result;
        };

        let new_total = context.total_heat + heat;
        match classify_load(new_total, capacity, &self.thresholds) {
            LoadLevel::Exceeded => result.push_error(
                THERMAL_RULE,
                format!(
                    "总散热量 {:.0}W 将超过机柜散热能力 {}W（近似估算）",
                    new_total, capacity
                ),
            ),
            LoadLevel::Critical => result.push_warning(
                THERMAL_RULE,
                format!(
                    "总散热量 {:.0}W 接近机柜散热能力 {}W（近似估算）",
                    new_total, capacity
                ),
            ),
            LoadLevel::Elevated => result.push_info(
                THERMAL_RULE,
                format!("热负载: {:.1}%（近似估算）", load_percent(new_total, capacity)),
            ),
            LoadLevel::Normal => {}
        }

        result
    }
}
