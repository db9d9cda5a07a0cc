// ==========================================
// 机柜配置器 - 兼容性规则
// ==========================================
// 规则:
// 1. 安装方式不在机柜能力集合中 -> error（列出可用方式）
// 2. 安装方式缺失 -> warning
// 3. 设备类别不是该类机柜的典型设备 -> warning（启发式，不阻止安装）
// ==========================================

use crate::domain::cabinet::CabinetType;
use crate::domain::equipment::EquipmentItem;
use crate::domain::types::normalize_key;
use crate::engine::validation::{ValidationContext, ValidationResult, ValidationRule};

pub const COMPATIBILITY_RULE: &str = "CompatibilityRule";

#[derive(Debug, Default)]
pub struct CompatibilityRule;

impl CompatibilityRule {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationRule for CompatibilityRule {
    fn name(&self) -> &str {
        COMPATIBILITY_RULE
    }

    fn validate(
        &self,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
        _context: &ValidationContext,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        match equipment.mount_type() {
            None => result.push_warning(COMPATIBILITY_RULE, "设备未声明安装方式"),
            Some(mount_type) if !cabinet.supports_mount_type(mount_type) => {
                let available = if cabinet.mounting_capabilities.is_empty() {
                    "无".to_string()
                } else {
                    cabinet.mounting_capabilities.join(", ")
                };
                result.push_error(
                    COMPATIBILITY_RULE,
                    format!(
                        "机柜 {} 不支持安装方式 {}（可用: {}）",
                        cabinet.name, mount_type, available
                    ),
                );
            }
            Some(_) => {}
        }

        if let (Some(typical), Some(category)) =
            (cabinet.category.typical_equipment(), equipment.category.as_deref())
        {
            let category = normalize_key(category);
            if !typical.iter().any(|t| *t == category) {
                result.push_warning(
                    COMPATIBILITY_RULE,
                    format!(
                        "设备类别 {} 不是 {} 类机柜的典型设备（典型: {}）",
                        category,
                        cabinet.category,
                        typical.join(", ")
                    ),
                );
            }
        }

        result
    }
}
