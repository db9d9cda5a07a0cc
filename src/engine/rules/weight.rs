// ==========================================
// 机柜配置器 - 重量规则
// ==========================================
// 规则: new_total = 已提交重量 + 设备重量，与机柜最大承重比较
// 缺失: 设备重量未声明 / 机柜承重未定义 -> 仅 info
// ==========================================

use crate::config::thresholds::ValidationThresholds;
use crate::domain::cabinet::CabinetType;
use crate::domain::equipment::EquipmentItem;
use crate::engine::rules::budget::{classify_load, load_percent, LoadLevel};
use crate::engine::validation::{ValidationContext, ValidationResult, ValidationRule};

pub const WEIGHT_RULE: &str = "WeightRule";

pub struct WeightRule {
    thresholds: ValidationThresholds,
}

impl WeightRule {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }
}

impl ValidationRule for WeightRule {
    fn name(&self) -> &str {
        WEIGHT_RULE
    }

    fn validate(
        &self,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
        context: &ValidationContext,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        let Some(weight) = equipment.specs.weight else {
            result.push_info(WEIGHT_RULE, "设备重量未声明，跳过重量校验");
            return result;
        };

        let max_load = cabinet.max_load();
        if max_load <= 0.0 {
            result.push_info(WEIGHT_RULE, "机柜最大承重未定义");
            return result;
        }

        let new_total = context.total_weight + weight;
        match classify_load(new_total, max_load, &self.thresholds) {
            LoadLevel::Exceeded => result.push_error(
                WEIGHT_RULE,
                format!("总重量 {:.1}kg 将超过机柜最大承重 {}kg", new_total, max_load),
            ),
            LoadLevel::Critical => result.push_warning(
                WEIGHT_RULE,
                format!("总重量 {:.1}kg 接近机柜最大承重 {}kg", new_total, max_load),
            ),
            LoadLevel::Elevated => result.push_info(
                WEIGHT_RULE,
                format!("重量负载: {:.1}%", load_percent(new_total, max_load)),
            ),
            LoadLevel::Normal => {}
        }

        result
    }
}
