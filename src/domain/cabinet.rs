// ==========================================
// 机柜配置器 - 机柜目录记录与机柜类型
// ==========================================
// 职责: 目录中的机柜定义（外部输入）+ 由定义派生的能力视图 CabinetType
// 单位: 尺寸 mm，重量 kg，功率/散热 W
// ==========================================

use crate::domain::types::{normalize_key, CabinetCategory};
use serde::{Deserialize, Serialize};

/// 外形尺寸（mm）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub depth: Option<f64>,
}

/// 机柜散热规格
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoolingSpec {
    /// 散热能力（W）
    #[serde(default)]
    pub capacity: Option<f64>,
    /// passive / front-to-back / side-to-side
    #[serde(default)]
    pub airflow_type: Option<String>,
}

/// 机柜技术参数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinetSpecifications {
    #[serde(default)]
    pub protection: Option<String>,
    /// 柜体自重（kg）
    #[serde(default)]
    pub weight: Option<f64>,
    /// 最大承重（kg），0 表示未定义
    #[serde(default)]
    pub max_load: f64,
    /// 最大功率（W），0 表示未定义
    #[serde(default)]
    pub max_power: f64,
    /// 19" 机架高度（U），0 表示非机架柜
    #[serde(default)]
    pub rack_units: u32,
    /// 单 U 最大功率密度（kW/U），0 表示不限制
    #[serde(default)]
    pub max_power_density_kw: f64,
    #[serde(default)]
    pub cooling: Option<CoolingSpec>,
}

/// 温控柜热参数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalSpec {
    #[serde(default)]
    pub heating_power: f64,
    #[serde(default)]
    pub cooling_power: f64,
    #[serde(default)]
    pub insulation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateSpec {
    #[serde(default)]
    pub has_heater: bool,
    #[serde(default)]
    pub has_cooler: bool,
    #[serde(default)]
    pub has_thermostat: bool,
    #[serde(default)]
    pub has_humidity_control: bool,
}

/// 安装区：某种安装方式在 3D 模型上的锚点组件组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountingZone {
    #[serde(rename = "type")]
    pub zone_type: String,
    #[serde(default)]
    pub component_names: Vec<String>,
    /// 导轨可用长度（mm），为空时按机柜宽度计
    #[serde(default)]
    pub length_mm: Option<f64>,
}

// ==========================================
// CabinetDefinition - 目录中的机柜记录
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinetDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    /// 机柜类名（类型注册表键）
    #[serde(default)]
    pub class_name: Option<String>,
    /// 插件模块引用（按路径动态加载）
    #[serde(default)]
    pub module_path: Option<String>,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub specifications: CabinetSpecifications,
    #[serde(default)]
    pub mounting_capabilities: Vec<String>,
    #[serde(default)]
    pub mounting_zones: Vec<MountingZone>,
    #[serde(default)]
    pub thermal: Option<ThermalSpec>,
    #[serde(default)]
    pub climate: Option<ClimateSpec>,
    /// 渲染层使用的特性描述，核心不解析
    #[serde(default)]
    pub features: Option<serde_json::Value>,
    /// 3D 模型引用，核心不解析
    #[serde(default)]
    pub model: Option<serde_json::Value>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub in_stock: bool,
}

// ==========================================
// CabinetType - 机柜能力视图
// ==========================================
// 由 CabinetDefinition 派生，校验规则只依赖此视图
#[derive(Debug, Clone, PartialEq)]
pub struct CabinetType {
    pub id: String,
    pub name: String,
    pub category: CabinetCategory,
    pub dimensions: Dimensions,
    /// 已规范化的安装方式集合（保持目录顺序）
    pub mounting_capabilities: Vec<String>,
    pub mounting_zones: Vec<MountingZone>,
    pub specifications: CabinetSpecifications,
    pub thermal: Option<ThermalSpec>,
}

impl CabinetType {
    pub fn from_definition(def: &CabinetDefinition) -> Self {
        let mut capabilities: Vec<String> = Vec::new();
        for cap in &def.mounting_capabilities {
            let key = normalize_key(cap);
            if !key.is_empty() && !capabilities.contains(&key) {
                capabilities.push(key);
            }
        }

        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            category: CabinetCategory::parse(&def.category),
            dimensions: def.dimensions.clone(),
            mounting_capabilities: capabilities,
            mounting_zones: def.mounting_zones.clone(),
            specifications: def.specifications.clone(),
            thermal: def.thermal.clone(),
        }
    }

    pub fn supports_mount_type(&self, mount_type: &str) -> bool {
        let key = normalize_key(mount_type);
        self.mounting_capabilities.iter().any(|c| c == &key)
    }

    /// 指定安装方式的安装区
    pub fn mounting_zones(&self, zone_type: &str) -> Vec<&MountingZone> {
        let key = normalize_key(zone_type);
        self.mounting_zones
            .iter()
            .filter(|z| normalize_key(&z.zone_type) == key)
            .collect()
    }

    pub fn has_din_rails(&self) -> bool {
        !self.mounting_zones(crate::domain::types::mount_types::DIN_RAIL).is_empty()
    }

    pub fn has_rack_units(&self) -> bool {
        !self.mounting_zones(crate::domain::types::mount_types::RACK_UNIT).is_empty()
    }

    /// 最大承重（kg），0 表示未定义
    pub fn max_load(&self) -> f64 {
        self.specifications.max_load
    }

    /// 最大功率（W），0 表示未定义
    pub fn max_power(&self) -> f64 {
        self.specifications.max_power
    }

    pub fn rack_units(&self) -> u32 {
        self.specifications.rack_units
    }

    /// 散热能力（W）
    ///
    /// 优先取 specifications.cooling.capacity，其次取温控柜 thermal.coolingPower；
    /// 均未定义（或为 0）时返回 None
    pub fn cooling_capacity(&self) -> Option<f64> {
        let from_spec = self
            .specifications
            .cooling
            .as_ref()
            .and_then(|c| c.capacity)
            .filter(|c| *c > 0.0);

        from_spec.or_else(|| {
            self.thermal
                .as_ref()
                .map(|t| t.cooling_power)
                .filter(|c| *c > 0.0)
        })
    }

    pub fn airflow_type(&self) -> Option<&str> {
        self.specifications
            .cooling
            .as_ref()
            .and_then(|c| c.airflow_type.as_deref())
    }
}

impl std::fmt::Display for CabinetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CabinetType({}:{})", self.category, self.id)
    }
}
