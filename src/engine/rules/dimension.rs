// ==========================================
// 机柜配置器 - 尺寸规则
// ==========================================
// 规则:
// 1. 机架设备 U 数超过剩余机架空间 -> error
// 2. 宽/高/深超过机柜内部尺寸 -> error
// 3. 宽度超过 width_warning_pct、深度超过 depth_warning_pct -> warning
// 缺失: 设备或机柜尺寸未定义 -> info
// ==========================================

use crate::config::thresholds::ValidationThresholds;
use crate::domain::cabinet::CabinetType;
use crate::domain::equipment::EquipmentItem;
use crate::engine::validation::{ValidationContext, ValidationResult, ValidationRule};

pub const DIMENSION_RULE: &str = "DimensionRule";

pub struct DimensionRule {
    thresholds: ValidationThresholds,
}

impl DimensionRule {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    /// 单个方向的尺寸比较
    fn check_axis(
        result: &mut ValidationResult,
        axis: &str,
        equipment_mm: Option<f64>,
        cabinet_mm: Option<f64>,
        warning_pct: Option<f64>,
    ) {
        let (Some(eq), Some(cab)) = (equipment_mm, cabinet_mm) else {
            return;
        };
        if cab <= 0.0 {
            return;
        }

        if eq > cab {
            result.push_error(
                DIMENSION_RULE,
                format!("设备{} {}mm 超过机柜{} {}mm", axis, eq, axis, cab),
            );
        } else if let Some(pct) = warning_pct {
            if eq > cab * pct {
                result.push_warning(
                    DIMENSION_RULE,
                    format!(
                        "设备{} {}mm 占机柜{}的 {:.0}% 以上，安装余量不足",
                        axis,
                        eq,
                        axis,
                        pct * 100.0
                    ),
                );
            }
        }
    }
}

impl ValidationRule for DimensionRule {
    fn name(&self) -> &str {
        DIMENSION_RULE
    }

    fn validate(
        &self,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
        context: &ValidationContext,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(units) = equipment.rack_units() {
            let total = cabinet.rack_units();
            if total > 0 {
                let free = total.saturating_sub(context.used_rack_units);
                if units > free {
                    result.push_error(
                        DIMENSION_RULE,
                        format!("机架空间不足: 需要 {}U，剩余 {}U（共 {}U）", units, free, total),
                    );
                }
            }
        }

        let Some(dims) = equipment.dimensions.as_ref() else {
            result.push_info(DIMENSION_RULE, "设备尺寸未声明，跳过尺寸校验");
            return result;
        };

        let cabinet_dims = &cabinet.dimensions;
        if cabinet_dims.width.is_none() && cabinet_dims.height.is_none() && cabinet_dims.depth.is_none() {
            result.push_info(DIMENSION_RULE, "机柜尺寸未定义，跳过尺寸校验");
            return result;
        }

        Self::check_axis(
            &mut result,
            "宽度",
            dims.width,
            cabinet_dims.width,
            Some(self.thresholds.width_warning_pct),
        );
        Self::check_axis(&mut result, "高度", dims.height, cabinet_dims.height, None);
        Self::check_axis(
            &mut result,
            "深度",
            dims.depth,
            cabinet_dims.depth,
            Some(self.thresholds.depth_warning_pct),
        );

        result
    }
}
