// ==========================================
// 机柜配置器 - 安装方式规则
// ==========================================
// 职责: 在兼容性粗检之外，确认机柜上存在对应的安装区
// 规则:
// - din_rail: 无 DIN 安装区 -> error；模块宽度超出范围 -> warning
// - rack_unit: 无机架安装区 -> error；设备深度过浅 -> warning
// - mounting_plate: 无安装板区 -> warning；固定孔缺 pattern/spacing -> warning
// - 期望安装区不存在或已被占用 -> warning
// ==========================================

use crate::config::thresholds::ValidationThresholds;
use crate::domain::cabinet::CabinetType;
use crate::domain::equipment::EquipmentItem;
use crate::domain::types::{mount_types, normalize_key};
use crate::engine::validation::{ValidationContext, ValidationResult, ValidationRule};

pub const MOUNT_TYPE_RULE: &str = "MountTypeRule";

pub struct MountTypeRule {
    thresholds: ValidationThresholds,
}

impl MountTypeRule {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }
}

impl ValidationRule for MountTypeRule {
    fn name(&self) -> &str {
        MOUNT_TYPE_RULE
    }

    fn validate(
        &self,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
        context: &ValidationContext,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        // 缺失安装方式由兼容性规则报告
        let Some(mount_type) = equipment.mount_type() else {
            return result;
        };
        let mount_type = normalize_key(mount_type);
        let zones = cabinet.mounting_zones(&mount_type);

        match mount_type.as_str() {
            mount_types::DIN_RAIL => {
                if zones.is_empty() {
                    result.push_error(MOUNT_TYPE_RULE, format!("机柜 {} 没有 DIN 导轨安装区", cabinet.name));
                }
                let module_width = equipment.mounting.as_ref().and_then(|m| m.module_width);
                if let Some(width) = module_width {
                    let (min, max) = (
                        self.thresholds.din_module_width_min,
                        self.thresholds.din_module_width_max,
                    );
                    if width < min || width > max {
                        result.push_warning(
                            MOUNT_TYPE_RULE,
                            format!("DIN 模块宽度 {} 超出常规范围 {}..={}", width, min, max),
                        );
                    }
                }
            }
            mount_types::RACK_UNIT => {
                if zones.is_empty() {
                    result.push_error(MOUNT_TYPE_RULE, format!("机柜 {} 没有 19\" 机架安装区", cabinet.name));
                }
                let depth = equipment.dimensions.as_ref().and_then(|d| d.depth);
                if let Some(depth) = depth {
                    if depth < self.thresholds.min_rack_depth_mm {
                        result.push_warning(
                            MOUNT_TYPE_RULE,
                            format!(
                                "机架设备深度 {}mm 小于 {}mm，需确认导轨支撑",
                                depth, self.thresholds.min_rack_depth_mm
                            ),
                        );
                    }
                }
            }
            mount_types::MOUNTING_PLATE => {
                if zones.is_empty() {
                    result.push_warning(MOUNT_TYPE_RULE, format!("机柜 {} 没有安装板区域", cabinet.name));
                }
                let holes = equipment.mounting.as_ref().and_then(|m| m.mounting_holes.as_ref());
                if holes.is_some_and(|h| !h.is_complete()) {
                    result.push_warning(MOUNT_TYPE_RULE, "固定孔布局未完整定义（缺少 pattern 或 spacing）");
                }
            }
            other => {
                if zones.is_empty() {
                    result.push_warning(MOUNT_TYPE_RULE, format!("机柜 {} 没有 {} 安装区", cabinet.name, other));
                }
            }
        }

        let preferred = equipment.mounting.as_ref().and_then(|m| m.preferred_zone.as_deref());
        if let Some(zone) = preferred {
            let exists = zones.iter().any(|z| z.component_names.iter().any(|c| c == zone));
            if !exists && !zones.is_empty() {
                result.push_warning(MOUNT_TYPE_RULE, format!("期望的安装区 {} 不存在", zone));
            } else if context.is_zone_occupied(zone) {
                result.push_warning(MOUNT_TYPE_RULE, format!("期望的安装区 {} 已被占用", zone));
            }
        }

        result
    }
}
