// ==========================================
// 机柜配置器 - 设备目录记录
// ==========================================
// 职责: 可装入机柜的设备定义（外部输入）
// 单位: 尺寸 mm，重量 kg，功率/散热 W
// ==========================================

use crate::domain::cabinet::Dimensions;
use serde::{Deserialize, Serialize};

/// 安装参数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountingSpec {
    /// 安装方式（din_rail / rack_unit / mounting_plate ...），缺失时兼容性规则给出警告
    #[serde(rename = "type", default)]
    pub mount_type: Option<String>,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub requires_space: bool,
    #[serde(default)]
    pub snap_to_grid: bool,
    /// 机架设备高度（U）
    #[serde(default)]
    pub rack_units: Option<u32>,
    /// DIN 模块宽度（模数）
    #[serde(default)]
    pub module_width: Option<u32>,
    /// 期望的安装区组件名
    #[serde(default)]
    pub preferred_zone: Option<String>,
    /// 安装板设备的固定孔
    #[serde(default)]
    pub mounting_holes: Option<MountingHoles>,
}

/// 固定孔布局
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountingHoles {
    #[serde(default)]
    pub pattern: Option<String>,
    /// 孔距 mm
    #[serde(default)]
    pub spacing: Option<f64>,
}

impl MountingHoles {
    pub fn is_complete(&self) -> bool {
        self.pattern.as_deref().is_some_and(|p| !p.trim().is_empty()) && self.spacing.is_some()
    }
}

/// 设备技术参数（只列出校验关心的字段）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSpecs {
    /// kg
    #[serde(default)]
    pub weight: Option<f64>,
    /// W
    #[serde(default)]
    pub power: Option<f64>,
    /// W
    #[serde(default)]
    pub heat_dissipation: Option<f64>,
    #[serde(default)]
    pub airflow_direction: Option<String>,
}

// ==========================================
// EquipmentItem - 目录中的设备记录
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub mounting: Option<MountingSpec>,
    #[serde(default, alias = "specifications")]
    pub specs: EquipmentSpecs,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub model: Option<serde_json::Value>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub in_stock: bool,
}

impl EquipmentItem {
    /// 安装方式（未声明时为 None）
    pub fn mount_type(&self) -> Option<&str> {
        self.mounting
            .as_ref()
            .and_then(|m| m.mount_type.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    pub fn rack_units(&self) -> Option<u32> {
        self.mounting.as_ref().and_then(|m| m.rack_units)
    }

    pub fn width_mm(&self) -> Option<f64> {
        self.dimensions.as_ref().and_then(|d| d.width)
    }
}
