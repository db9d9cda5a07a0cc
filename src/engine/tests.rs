use super::rules::*;
use super::*;
use crate::config::thresholds::ValidationThresholds;
use crate::domain::cabinet::{CabinetDefinition, CabinetType};
use crate::domain::equipment::EquipmentItem;
use serde_json::json;

// ==========================================
// 测试辅助函数
// ==========================================

/// 服务器机柜: 42U，承重 100kg，功率 1000W，散热 500W
fn server_cabinet() -> CabinetType {
    let def: CabinetDefinition = serde_json::from_value(json!({
        "id": "srv-42u",
        "name": "Server 42U",
        "category": "server",
        "dimensions": { "width": 600, "height": 2000, "depth": 1000 },
        "specifications": {
            "maxLoad": 100,
            "maxPower": 1000,
            "rackUnits": 42,
            "cooling": { "capacity": 500, "airflowType": "front-to-back" }
        },
        "mountingCapabilities": ["rack_unit", "mounting_plate"],
        "mountingZones": [
            { "type": "rack_unit", "componentNames": ["rack_front", "rack_rear"] },
            { "type": "mounting_plate", "componentNames": ["plate_main"] }
        ]
    }))
    .unwrap();
    CabinetType::from_definition(&def)
}

/// 温控柜: DIN 导轨，无承重/功率定义
fn thermal_cabinet() -> CabinetType {
    let def: CabinetDefinition = serde_json::from_value(json!({
        "id": "tsh-7",
        "name": "TSh-7",
        "category": "outdoor",
        "dimensions": { "width": 700, "height": 500, "depth": 240 },
        "mountingCapabilities": ["din_rail"],
        "mountingZones": [{ "type": "din_rail", "componentNames": ["din_rail_1", "din_rail_2"] }],
        "thermal": { "heatingPower": 100, "coolingPower": 300 }
    }))
    .unwrap();
    CabinetType::from_definition(&def)
}

fn equipment(value: serde_json::Value) -> EquipmentItem {
    serde_json::from_value(value).unwrap()
}

fn rack_server(weight: f64) -> EquipmentItem {
    equipment(json!({
        "id": "srv-1u",
        "category": "server",
        "specifications": { "weight": weight },
        "dimensions": { "width": 440, "height": 44, "depth": 700 },
        "mounting": { "type": "rack_unit", "rackUnits": 1 }
    }))
}

fn thresholds() -> ValidationThresholds {
    ValidationThresholds::default()
}

fn weight_result(current: f64, candidate: f64) -> ValidationResult {
    let context = ValidationContext {
        total_weight: current,
        ..Default::default()
    };
    WeightRule::new(thresholds()).validate(&server_cabinet(), &rack_server(candidate), &context)
}

// ==========================================
// 重量 / 功率 / 散热分级
// ==========================================

#[test]
fn test_weight_thresholds() {
    // 超过上限
    let r = weight_result(0.0, 101.0);
    assert_eq!(r.errors.len(), 1);
    assert!(r.warnings.is_empty());

    // 恰好等于上限: 不超限，属于临界
    let r = weight_result(0.0, 100.0);
    assert!(r.errors.is_empty());
    assert_eq!(r.warnings.len(), 1);

    let r = weight_result(0.0, 95.0);
    assert!(r.errors.is_empty());
    assert_eq!(r.warnings.len(), 1);

    // 恰好 90%: 不属于临界
    let r = weight_result(0.0, 90.0);
    assert!(r.warnings.is_empty());
    assert_eq!(r.info.len(), 1);
    assert!(r.info[0].message.contains("90.0%"));

    let r = weight_result(0.0, 85.0);
    assert!(r.errors.is_empty() && r.warnings.is_empty());
    assert_eq!(r.info.len(), 1);

    let r = weight_result(0.0, 76.0);
    assert_eq!(r.info.len(), 1);

    let r = weight_result(0.0, 50.0);
    assert_eq!(r.total(), 0);
}

#[test]
fn test_weight_uses_committed_total() {
    let r = weight_result(60.0, 45.0);
    assert_eq!(r.errors.len(), 1);
    assert!(r.errors[0].message.contains("105.0"));
    assert_eq!(r.errors[0].rule, WEIGHT_RULE);
}

#[test]
fn test_weight_missing_specs_are_info_only() {
    let rule = WeightRule::new(thresholds());
    let item = equipment(json!({ "id": "x", "mounting": { "type": "rack_unit" } }));
    let r = rule.validate(&server_cabinet(), &item, &ValidationContext::new());
    assert_eq!(r.info.len(), 1);
    assert!(r.errors.is_empty() && r.warnings.is_empty());

    // 机柜承重未定义
    let r = rule.validate(&thermal_cabinet(), &rack_server(10.0), &ValidationContext::new());
    assert_eq!(r.info.len(), 1);
    assert!(r.info[0].message.contains("未定义"));
}

#[test]
fn test_power_thresholds_and_current() {
    let rule = PowerRule::new(thresholds());
    let cabinet = server_cabinet();
    let item = |power: f64| equipment(json!({ "id": "p", "specifications": { "power": power } }));

    let ctx = ValidationContext::new();
    assert_eq!(rule.validate(&cabinet, &item(1001.0), &ctx).errors.len(), 1);
    assert_eq!(rule.validate(&cabinet, &item(1000.0), &ctx).warnings.len(), 1);
    assert_eq!(rule.validate(&cabinet, &item(900.0), &ctx).info.len(), 1);
    assert_eq!(rule.validate(&cabinet, &item(500.0), &ctx).total(), 0);

    // 大功率机柜: 4000W / 230V ≈ 17.4A > 16A
    let mut big = cabinet.clone();
    big.specifications.max_power = 10_000.0;
    let r = rule.validate(&big, &item(4000.0), &ctx);
    assert!(r.errors.is_empty());
    assert_eq!(r.warnings.len(), 1);
    assert!(r.warnings[0].message.contains("A"));
}

#[test]
fn test_thermal_threshold_and_deferred() {
    let rule = ThermalRule::new(thresholds());
    let heat = |w: f64| equipment(json!({ "id": "h", "specifications": { "heatDissipation": w } }));
    let ctx = ValidationContext {
        total_heat: 400.0,
        ..Default::default()
    };

    assert_eq!(rule.validate(&server_cabinet(), &heat(150.0), &ctx).errors.len(), 1);
    assert_eq!(rule.validate(&server_cabinet(), &heat(60.0), &ctx).warnings.len(), 1);

    // 机柜散热能力回落到 thermal.coolingPower
    let r = rule.validate(&thermal_cabinet(), &heat(250.0), &ValidationContext::new());
    assert_eq!(r.info.len(), 1);
    assert!(r.info[0].message.contains("近似"));

    // 设备散热量缺失
    let r = rule.validate(&server_cabinet(), &rack_server(1.0), &ctx);
    assert_eq!(r.info.len(), 1);
    assert!(r.info[0].message.contains("延后"));

    // 机柜散热能力缺失
    let mut no_cooling = server_cabinet();
    no_cooling.specifications.cooling = None;
    let r = rule.validate(&no_cooling, &heat(10.0), &ctx);
    assert_eq!(r.info.len(), 1);
    assert!(r.info[0].message.contains("延后"));
}

// ==========================================
// 兼容性 / 尺寸 / 安装方式
// ==========================================

#[test]
fn test_compatibility_rule() {
    let rule = CompatibilityRule::new();
    let ctx = ValidationContext::new();

    let din = equipment(json!({ "id": "b", "category": "protection", "mounting": { "type": "din_rail" } }));
    let r = rule.validate(&server_cabinet(), &din, &ctx);
    assert_eq!(r.errors.len(), 1);
    assert!(r.errors[0].message.contains("rack_unit, mounting_plate"));
    // protection 不是服务器柜典型设备
    assert_eq!(r.warnings.len(), 1);

    let unknown = equipment(json!({ "id": "u" }));
    let r = rule.validate(&thermal_cabinet(), &unknown, &ctx);
    assert!(r.errors.is_empty());
    assert_eq!(r.warnings.len(), 1);

    let r = rule.validate(&server_cabinet(), &rack_server(5.0), &ctx);
    assert_eq!(r.total(), 0);
}

#[test]
fn test_dimension_rule() {
    let rule = DimensionRule::new(thresholds());
    let ctx = ValidationContext::new();

    let too_wide = equipment(json!({ "id": "w", "dimensions": { "width": 650, "depth": 100 } }));
    let r = rule.validate(&server_cabinet(), &too_wide, &ctx);
    assert_eq!(r.errors.len(), 1);

    let tight = equipment(json!({ "id": "t", "dimensions": { "width": 580, "depth": 950 } }));
    let r = rule.validate(&server_cabinet(), &tight, &ctx);
    assert!(r.errors.is_empty());
    assert_eq!(r.warnings.len(), 2);

    let no_dims = equipment(json!({ "id": "n" }));
    assert_eq!(rule.validate(&server_cabinet(), &no_dims, &ctx).info.len(), 1);

    let full = ValidationContext {
        used_rack_units: 42,
        ..Default::default()
    };
    let r = rule.validate(&server_cabinet(), &rack_server(1.0), &full);
    assert_eq!(r.errors.len(), 1);
    assert!(r.errors[0].message.contains("剩余 0U"));
}

#[test]
fn test_mount_type_rule() {
    let rule = MountTypeRule::new(thresholds());
    let ctx = ValidationContext::new();

    let wide_module = equipment(json!({
        "id": "m", "mounting": { "type": "DIN_RAIL", "moduleWidth": 30 }
    }));
    let r = rule.validate(&thermal_cabinet(), &wide_module, &ctx);
    assert!(r.errors.is_empty());
    assert_eq!(r.warnings.len(), 1);

    // 服务器柜没有 DIN 安装区
    let r = rule.validate(&server_cabinet(), &wide_module, &ctx);
    assert_eq!(r.errors.len(), 1);

    let shallow = equipment(json!({
        "id": "s", "dimensions": { "depth": 150 }, "mounting": { "type": "rack_unit" }
    }));
    assert_eq!(rule.validate(&server_cabinet(), &shallow, &ctx).warnings.len(), 1);

    let preferring = equipment(json!({
        "id": "p", "mounting": { "type": "din_rail", "preferredZone": "din_rail_2" }
    }));
    assert_eq!(rule.validate(&thermal_cabinet(), &preferring, &ctx).total(), 0);

    let mut occupied = ValidationContext::new();
    occupied.occupy_zone("din_rail_2");
    let r = rule.validate(&thermal_cabinet(), &preferring, &occupied);
    assert_eq!(r.warnings.len(), 1);
    assert!(r.warnings[0].message.contains("已被占用"));
}

#[test]
fn test_mount_type_rule_mounting_holes() {
    let rule = MountTypeRule::new(thresholds());
    let ctx = ValidationContext::new();
    let plate_item = |holes: serde_json::Value| {
        equipment(json!({
            "id": "relay", "mounting": { "type": "mounting_plate", "mountingHoles": holes }
        }))
    };

    let complete = plate_item(json!({ "pattern": "4xM4", "spacing": 60 }));
    assert_eq!(rule.validate(&server_cabinet(), &complete, &ctx).total(), 0);

    for partial in [json!({ "pattern": "4xM4" }), json!({ "spacing": 60 }), json!({})] {
        let r = rule.validate(&server_cabinet(), &plate_item(partial), &ctx);
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].message.contains("固定孔"));
    }

    // 未声明固定孔不检查
    let bare = equipment(json!({ "id": "relay", "mounting": { "type": "mounting_plate" } }));
    assert_eq!(rule.validate(&server_cabinet(), &bare, &ctx).total(), 0);
}

// ==========================================
// 引擎
// ==========================================

#[test]
fn test_engine_runs_all_rules_without_short_circuit() {
    let engine = ValidationEngine::with_default_rules(&thresholds());
    assert_eq!(
        engine.rule_names(),
        vec![
            COMPATIBILITY_RULE,
            DIMENSION_RULE,
            MOUNT_TYPE_RULE,
            WEIGHT_RULE,
            POWER_RULE,
            THERMAL_RULE
        ]
    );

    // 兼容性 error + 后续规则照常执行
    let item = equipment(json!({
        "id": "heavy-din",
        "category": "protection",
        "specifications": { "weight": 500, "power": 5000, "heatDissipation": 900 },
        "dimensions": { "width": 18, "height": 80, "depth": 70 },
        "mounting": { "type": "din_rail" }
    }));
    let r = engine.evaluate(&server_cabinet(), &item, &ValidationContext::new());

    assert_eq!(r.errors[0].rule, COMPATIBILITY_RULE);
    let reporting = r.rules_reporting();
    for name in [COMPATIBILITY_RULE, MOUNT_TYPE_RULE, WEIGHT_RULE, POWER_RULE, THERMAL_RULE] {
        assert!(reporting.contains(&name), "missing findings from {}", name);
    }
    assert!(!engine.can_mount(&server_cabinet(), &item, &ValidationContext::new()));
}

#[test]
fn test_engine_is_deterministic() {
    let engine = ValidationEngine::with_default_rules(&thresholds());
    let item = rack_server(95.0);
    let ctx = ValidationContext::new();
    let first = engine.evaluate(&server_cabinet(), &item, &ctx);
    let second = engine.evaluate(&server_cabinet(), &item, &ctx);
    assert_eq!(first, second);
}

#[test]
fn test_engine_rule_management() {
    let mut engine = ValidationEngine::with_default_rules(&thresholds());
    assert_eq!(engine.len(), 6);
    assert_eq!(engine.remove_rule(THERMAL_RULE), 1);
    assert_eq!(engine.remove_rule("Nope"), 0);
    assert_eq!(engine.len(), 5);

    engine.clear_rules();
    assert!(engine.is_empty());
    let r = engine.evaluate(&server_cabinet(), &rack_server(1.0), &ValidationContext::new());
    assert_eq!(r.total(), 0);
    assert!(engine.can_mount(&server_cabinet(), &rack_server(1.0), &ValidationContext::new()));
}

#[test]
fn test_report_and_stats() {
    let engine = ValidationEngine::with_default_rules(&thresholds());
    let r = engine.evaluate(&server_cabinet(), &rack_server(120.0), &ValidationContext::new());
    let stats = engine.stats(&r);
    assert_eq!(stats.rules, 6);
    assert_eq!(stats.errors, 1);

    let report = ValidationEngine::format_report(&r);
    assert!(report.starts_with("校验结果: 未通过"));
    assert!(report.contains("[WeightRule]"));
}

#[test]
fn test_context_commit_accumulates() {
    let mut ctx = ValidationContext::new();
    ctx.commit(&equipment(json!({
        "id": "a",
        "specifications": { "weight": 10, "power": 200, "heatDissipation": 150 },
        "mounting": { "type": "rack_unit", "rackUnits": 2 }
    })));
    ctx.commit(&rack_server(5.0));

    assert_eq!(ctx.total_weight, 15.0);
    assert_eq!(ctx.total_power, 200.0);
    assert_eq!(ctx.total_heat, 150.0);
    assert_eq!(ctx.used_rack_units, 3);
}
