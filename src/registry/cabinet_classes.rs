// ==========================================
// 机柜配置器 - 机柜类
// ==========================================
// 职责: 机柜类接口与内置实现；类可在通用校验之外追加类别专属检查
// ==========================================

use crate::domain::cabinet::CabinetType;
use crate::domain::equipment::EquipmentItem;
use crate::engine::validation::ValidationResult;
use crate::registry::error::RegistryResult;
use std::fmt;
use std::sync::Arc;

/// 机柜类构造器（无参实例化，可能失败）
pub type CabinetConstructor = Arc<dyn Fn() -> RegistryResult<Box<dyn Cabinet>> + Send + Sync>;

/// 机柜类
pub trait Cabinet: fmt::Debug + Send + Sync {
    fn class_name(&self) -> &str;

    /// 类别专属检查，默认无附加发现
    fn validate_equipment(
        &self,
        _cabinet: &CabinetType,
        _equipment: &EquipmentItem,
    ) -> ValidationResult {
        ValidationResult::new()
    }
}

/// 把具体类型包装成构造器
pub fn constructor<C, F>(build: F) -> CabinetConstructor
where
    C: Cabinet + 'static,
    F: Fn() -> C + Send + Sync + 'static,
{
    Arc::new(move || Ok(Box::new(build()) as Box<dyn Cabinet>))
}

// ==========================================
// GenericCabinet - 无附加检查的机柜类
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericCabinet {
    class_name: String,
}

impl GenericCabinet {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}

impl Cabinet for GenericCabinet {
    fn class_name(&self) -> &str {
        &self.class_name
    }
}

// ==========================================
// ServerCabinet - 服务器机柜
// ==========================================
// 附加检查: 风道方向、功率密度（kW/U）、高 U 数服务器
pub const SERVER_CABINET_CLASS: &str = "ServerCabinet";

/// 超过此 U 数的服务器提示可能影响通风
const TALL_SERVER_UNITS: u32 = 4;

const PASSIVE_AIRFLOW: &str = "passive";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerCabinet;

impl Cabinet for ServerCabinet {
    fn class_name(&self) -> &str {
        SERVER_CABINET_CLASS
    }

    fn validate_equipment(
        &self,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let (Some(equipment_airflow), Some(cabinet_airflow)) = (
            equipment.specs.airflow_direction.as_deref(),
            cabinet.airflow_type(),
        ) {
            if equipment_airflow != PASSIVE_AIRFLOW
                && cabinet_airflow != PASSIVE_AIRFLOW
                && equipment_airflow != cabinet_airflow
            {
                result.push_warning(
                    SERVER_CABINET_CLASS,
                    format!(
                        "设备风道方向 ({}) 与机柜风道配置 ({}) 不一致",
                        equipment_airflow, cabinet_airflow
                    ),
                );
            }
        }

        // 机柜未定义功率密度上限时跳过
        let max_density = cabinet.specifications.max_power_density_kw;
        if let Some(power) = equipment.specs.power.filter(|p| *p > 0.0) {
            if max_density > 0.0 {
                let units = equipment.rack_units().filter(|u| *u > 0).unwrap_or(1);
                let density = power / 1000.0 / f64::from(units);
                if density > max_density {
                    result.push_warning(
                        SERVER_CABINET_CLASS,
                        format!(
                            "设备功率密度 {:.2}kW/U 超过推荐值 {}kW/U",
                            density, max_density
                        ),
                    );
                }
            }
        }

        if equipment.category.as_deref() == Some("server")
            && equipment.rack_units().unwrap_or(0) > TALL_SERVER_UNITS
        {
            result.push_warning(SERVER_CABINET_CLASS, "高 U 数服务器可能影响机柜通风");
        }

        result
    }
}
