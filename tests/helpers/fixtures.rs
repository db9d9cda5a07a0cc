// ==========================================
// 测试数据 - 目录 / 向导 / 设备
// ==========================================

use cabinet_configurator::catalog::Catalog;
use cabinet_configurator::domain::cabinet::{
    CabinetDefinition, CabinetSpecifications, Dimensions, MountingZone,
};
use cabinet_configurator::domain::equipment::{EquipmentItem, EquipmentSpecs, MountingSpec};
use cabinet_configurator::ConfiguratorConfig;

pub const DEMO_CATALOG_JSON: &str = include_str!("../../demos/catalog.json");
pub const DEMO_WIZARD_JSON: &str = include_str!("../../demos/wizard.json");

pub fn demo_catalog() -> Catalog {
    Catalog::from_json(DEMO_CATALOG_JSON).expect("demo catalog should parse")
}

pub fn demo_wizard() -> ConfiguratorConfig {
    ConfiguratorConfig::from_json(DEMO_WIZARD_JSON).expect("demo wizard should be valid")
}

/// 目录中的机柜记录
pub fn cabinet(id: &str) -> CabinetDefinition {
    demo_catalog()
        .find_cabinet(id)
        .cloned()
        .unwrap_or_else(|| panic!("cabinet {id} missing from demo catalog"))
}

/// 目录中的设备记录
pub fn equipment(id: &str) -> EquipmentItem {
    demo_catalog()
        .find_equipment(id)
        .cloned()
        .unwrap_or_else(|| panic!("equipment {id} missing from demo catalog"))
}

/// 小型 DIN 柜（承重 10kg，功率 100W，一根 90mm 导轨）
pub fn small_din_cabinet() -> CabinetDefinition {
    CabinetDefinition {
        id: "mini".to_string(),
        name: "Mini".to_string(),
        category: "distribution".to_string(),
        class_name: Some("GenericCabinet".to_string()),
        module_path: Some("cabinets/GenericCabinet".to_string()),
        dimensions: Dimensions {
            width: Some(300.0),
            height: Some(400.0),
            depth: Some(200.0),
        },
        specifications: CabinetSpecifications {
            max_load: 10.0,
            max_power: 100.0,
            ..Default::default()
        },
        mounting_capabilities: vec!["din_rail".to_string()],
        mounting_zones: vec![MountingZone {
            zone_type: "din_rail".to_string(),
            component_names: vec!["rail_a".to_string()],
            length_mm: Some(90.0),
        }],
        ..Default::default()
    }
}

/// DIN 模块设备
pub fn din_module(id: &str, modules: u32, weight: f64, power: f64) -> EquipmentItem {
    EquipmentItem {
        id: id.to_string(),
        name: id.to_string(),
        category: Some("protection".to_string()),
        mounting: Some(MountingSpec {
            mount_type: Some("din_rail".to_string()),
            module_width: Some(modules),
            ..Default::default()
        }),
        specs: EquipmentSpecs {
            weight: Some(weight),
            power: Some(power),
            heat_dissipation: Some(power),
            airflow_direction: None,
        },
        dimensions: Some(Dimensions {
            width: Some(18.0 * modules as f64),
            height: Some(80.0),
            depth: Some(70.0),
        }),
        ..Default::default()
    }
}

/// 机架设备
pub fn rack_server(id: &str, units: u32, power: f64) -> EquipmentItem {
    EquipmentItem {
        id: id.to_string(),
        name: id.to_string(),
        category: Some("server".to_string()),
        mounting: Some(MountingSpec {
            mount_type: Some("rack_unit".to_string()),
            rack_units: Some(units),
            ..Default::default()
        }),
        specs: EquipmentSpecs {
            weight: Some(15.0),
            power: Some(power),
            heat_dissipation: Some(power),
            airflow_direction: Some("front-to-back".to_string()),
        },
        dimensions: Some(Dimensions {
            width: Some(440.0),
            height: Some(44.0 * units as f64),
            depth: Some(600.0),
        }),
        ..Default::default()
    }
}
