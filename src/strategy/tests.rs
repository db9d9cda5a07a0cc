use super::*;
use crate::domain::cabinet::{CabinetDefinition, CabinetType};
use crate::domain::equipment::EquipmentItem;
use serde_json::json;
use std::sync::Arc;

// ==========================================
// 测试辅助函数
// ==========================================

/// 两根 90mm 导轨（每根 5 个模数）+ 24U 机架 + 安装板
fn mixed_cabinet() -> CabinetType {
    let def: CabinetDefinition = serde_json::from_value(json!({
        "id": "mixed-600",
        "name": "Mixed 600",
        "category": "universal",
        "dimensions": { "width": 600, "height": 1200, "depth": 600 },
        "specifications": { "rackUnits": 24 },
        "mountingCapabilities": ["din_rail", "rack_unit", "mounting_plate"],
        "mountingZones": [
            { "type": "din_rail", "componentNames": ["din_rail_1", "din_rail_2"], "lengthMm": 90 },
            { "type": "rack_unit", "componentNames": ["rack_front"] },
            { "type": "mounting_plate", "componentNames": ["plate_main"] }
        ]
    }))
    .unwrap();
    CabinetType::from_definition(&def)
}

fn din_only_cabinet() -> CabinetType {
    let def: CabinetDefinition = serde_json::from_value(json!({
        "id": "din-only",
        "name": "DIN only",
        "category": "electrical",
        "dimensions": { "width": 300, "height": 400, "depth": 150 },
        "mountingCapabilities": ["din_rail"],
        "mountingZones": [{ "type": "din_rail", "componentNames": ["din_rail_1"] }]
    }))
    .unwrap();
    CabinetType::from_definition(&def)
}

fn din_device(id: &str, modules: u32) -> EquipmentItem {
    serde_json::from_value(json!({
        "id": id,
        "category": "protection",
        "mounting": { "type": "din_rail", "moduleWidth": modules }
    }))
    .unwrap()
}

fn rack_device(id: &str, units: u32) -> EquipmentItem {
    serde_json::from_value(json!({
        "id": id,
        "category": "server",
        "mounting": { "type": "rack_unit", "rackUnits": units }
    }))
    .unwrap()
}

fn plate_device(id: &str) -> EquipmentItem {
    serde_json::from_value(json!({
        "id": id,
        "dimensions": { "width": 100, "height": 100, "depth": 50 },
        "mounting": { "type": "mounting_plate" }
    }))
    .unwrap()
}

// ==========================================
// 注册表
// ==========================================

#[test]
fn test_builtin_registry_resolves_aliases_to_same_constructor() {
    let registry = StrategyRegistry::with_builtin_strategies();

    let by_alias = registry.get("DIN").unwrap();
    let by_key = registry.get("din_rail").unwrap();
    assert!(Arc::ptr_eq(&by_alias, &by_key));

    assert!(registry.has(" Rack "));
    assert!(registry.has("19inch"));
    assert!(registry.has("plate"));
    assert!(!registry.has("magnetic"));

    assert_eq!(
        registry.registered_types(),
        vec!["din_rail", "rack_unit", "mounting_plate"]
    );
    assert_eq!(registry.aliases("din_rail"), vec!["din", "rail"]);
}

#[test]
fn test_registry_stats() {
    let registry = StrategyRegistry::with_builtin_strategies();
    let stats = registry.stats();
    assert_eq!(stats.unique_types, 3);
    assert_eq!(stats.total_aliases, 5);
    assert_eq!(stats.total_keys, 8);
}

#[test]
fn test_unregister_removes_key_and_aliases() {
    let mut registry = StrategyRegistry::with_builtin_strategies();
    assert!(registry.unregister("din_rail"));

    assert!(!registry.has("din_rail"));
    assert!(!registry.has("din"));
    assert!(!registry.has("rail"));
    assert!(registry.has("rack"));
    assert!(!registry.unregister("din_rail"));
}

#[test]
fn test_unregister_alias_only_removes_alias() {
    let mut registry = StrategyRegistry::with_builtin_strategies();
    assert!(registry.unregister("rack"));
    assert!(!registry.has("rack"));
    assert!(registry.has("rack_unit"));
    assert!(registry.has("19inch"));
}

#[test]
fn test_register_rejects_invalid_constructor() {
    let mut registry = StrategyRegistry::new();
    let ctor = StrategyConstructor::new("Broken", |cabinet, options| {
        Ok(Box::new(DinRailStrategy::new(cabinet, options)?) as Box<dyn MountingStrategy>)
    })
    .with_capabilities(StrategyCapabilities {
        can_mount: true,
        mount: false,
    });

    let err = registry.register("broken", ctor, &[]).unwrap_err();
    assert!(matches!(err, StrategyError::InvalidStrategy { .. }));
    assert!(registry.is_empty());
}

#[test]
fn test_validate_strategy_reads_declared_capabilities() {
    let declared = StrategyConstructor::new("Plain", |cabinet, options| {
        Ok(Box::new(MountingPlateStrategy::new(cabinet, options)?) as Box<dyn MountingStrategy>)
    });
    assert!(StrategyRegistry::validate_strategy(&declared).is_ok());

    let err = StrategyRegistry::validate_strategy(&declared.clone().with_capabilities(
        StrategyCapabilities {
            can_mount: false,
            mount: false,
        },
    ))
    .unwrap_err();
    assert!(err.to_string().contains("can_mount, mount"));
}

#[test]
fn test_register_overwrites_existing_key() {
    let mut registry = StrategyRegistry::with_builtin_strategies();
    let replacement = StrategyConstructor::new("CustomDin", |cabinet, options| {
        Ok(Box::new(DinRailStrategy::new(cabinet, options)?) as Box<dyn MountingStrategy>)
    });
    registry
        .register("DIN_RAIL", replacement, &["dinrail"])
        .unwrap();

    assert_eq!(registry.get("din_rail").unwrap().name(), "CustomDin");
    // 旧别名随覆盖一起移除
    assert!(!registry.has("din"));
    assert!(registry.has("dinrail"));
    assert_eq!(registry.registered_types().len(), 3);
}

#[test]
fn test_create_unknown_returns_none() {
    let registry = StrategyRegistry::with_builtin_strategies();
    let cabinet = mixed_cabinet();
    assert!(registry
        .create("magnetic", &cabinet, &StrategyOptions::default())
        .is_none());

    let err = registry
        .try_create("magnetic", &cabinet, &StrategyOptions::default())
        .err()
        .unwrap();
    assert!(err.to_string().contains("din_rail"));
}

#[test]
fn test_create_construction_failure_returns_none() {
    let mut registry = StrategyRegistry::new();
    registry
        .register(
            "failing",
            StrategyConstructor::new("Failing", |_, _| {
                Err(StrategyError::Construction {
                    key: "failing".to_string(),
                    reason: "boom".to_string(),
                })
            }),
            &[],
        )
        .unwrap();
    assert!(registry
        .create("failing", &mixed_cabinet(), &StrategyOptions::default())
        .is_none());
}

// ==========================================
// 工厂
// ==========================================

#[test]
fn test_factory_creates_for_cabinet_capabilities() {
    let registry = StrategyRegistry::with_builtin_strategies();
    let factory = StrategyFactory::new(&registry);
    let strategies = factory.create_for_cabinet(&mixed_cabinet(), &StrategyOptions::default());

    let keys: Vec<&str> = strategies.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["din_rail", "mounting_plate", "rack_unit"]);
    assert_eq!(strategies["rack_unit"].mount_type(), "rack_unit");
}

#[test]
fn test_factory_fallback_and_info() {
    let registry = StrategyRegistry::with_builtin_strategies();
    let factory = StrategyFactory::new(&registry);
    let cabinet = mixed_cabinet();

    let fallback = StrategyConstructor::new("PlateFallback", |cabinet, options| {
        Ok(Box::new(MountingPlateStrategy::new(cabinet, options)?) as Box<dyn MountingStrategy>)
    });
    let strategy = factory
        .create_with_fallback("magnetic", &cabinet, &StrategyOptions::default(), &fallback)
        .unwrap();
    assert_eq!(strategy.mount_type(), "mounting_plate");

    let info = factory.strategy_info("19INCH").unwrap();
    assert_eq!(info.requested, "19inch");
    assert_eq!(info.mount_type, "rack_unit");
    assert_eq!(info.name, "RackUnitStrategy");
    assert_eq!(info.aliases, vec!["19inch", "rack"]);
    assert!(factory.strategy_info("magnetic").is_none());
    assert!(factory.supports("plate"));
}

#[test]
fn test_factory_validate_mount() {
    let registry = StrategyRegistry::with_builtin_strategies();
    let factory = StrategyFactory::new(&registry);

    let check = factory.validate_mount("din", &mixed_cabinet(), &din_device("qf1", 1));
    assert!(check.can_mount);
    assert!(check.reason.is_none());

    let check = factory.validate_mount("rack", &din_only_cabinet(), &rack_device("srv", 1));
    assert!(!check.can_mount);
    assert!(check.reason.unwrap().contains("din-only"));

    let check = factory.validate_mount("magnetic", &mixed_cabinet(), &din_device("qf1", 1));
    assert!(!check.can_mount);

    // 设备安装方式与策略不符
    let check = factory.validate_mount("din_rail", &mixed_cabinet(), &rack_device("srv", 1));
    assert!(!check.can_mount);
}

// ==========================================
// DIN 导轨
// ==========================================

#[test]
fn test_din_rail_fills_first_rail_then_next() {
    let cabinet = mixed_cabinet();
    let mut strategy = DinRailStrategy::new(&cabinet, &StrategyOptions::default()).unwrap();
    assert_eq!(strategy.rail_count(), 2);

    let first = strategy
        .mount(&din_device("qf1", 3), &PlacementRequest::default())
        .unwrap();
    assert_eq!(first.zone, "din_rail_1");
    assert_eq!(
        first.position,
        PlacementPosition::RailSlot {
            rail_index: 0,
            start_mm: 0.0,
            end_mm: 54.0
        }
    );

    // 剩余 36mm，放不下 3 个模数 -> 第二根导轨
    let second = strategy
        .mount(&din_device("qf2", 3), &PlacementRequest::default())
        .unwrap();
    assert_eq!(second.zone, "din_rail_2");

    // 2 个模数正好填满第一根导轨
    let third = strategy
        .mount(&din_device("qf3", 2), &PlacementRequest::default())
        .unwrap();
    assert_eq!(third.zone, "din_rail_1");

    let occupancy = strategy.rail_occupancy(0).unwrap();
    assert_eq!(occupancy.capacity, 90.0);
    assert_eq!(occupancy.free, 0.0);
    assert_eq!(occupancy.fill_percent, 100.0);
    assert_eq!(occupancy.items, 2);
}

#[test]
fn test_din_rail_reuses_gap_after_unmount() {
    let cabinet = mixed_cabinet();
    let mut strategy = DinRailStrategy::new(&cabinet, &StrategyOptions::default()).unwrap();
    for (id, modules) in [("a", 2), ("b", 1), ("c", 2)] {
        strategy
            .mount(&din_device(id, modules), &PlacementRequest::in_zone("din_rail_1"))
            .unwrap();
    }
    assert!(strategy.unmount("b"));
    assert!(!strategy.unmount("b"));

    let placed = strategy
        .mount(&din_device("d", 1), &PlacementRequest::in_zone("din_rail_1"))
        .unwrap();
    assert_eq!(
        placed.position,
        PlacementPosition::RailSlot {
            rail_index: 0,
            start_mm: 36.0,
            end_mm: 54.0
        }
    );
}

#[test]
fn test_din_rail_requested_zone_first() {
    let cabinet = mixed_cabinet();
    let mut strategy = DinRailStrategy::new(&cabinet, &StrategyOptions::default()).unwrap();
    let placed = strategy
        .mount(&din_device("qf1", 1), &PlacementRequest::in_zone("din_rail_2"))
        .unwrap();
    assert_eq!(placed.zone, "din_rail_2");
}

#[test]
fn test_din_rail_no_capacity() {
    let cabinet = mixed_cabinet();
    let mut strategy = DinRailStrategy::new(&cabinet, &StrategyOptions::default()).unwrap();
    let err = strategy
        .mount(&din_device("wide", 6), &PlacementRequest::default())
        .unwrap_err();
    assert!(matches!(err, StrategyError::NoCapacity(_)));
    assert_eq!(strategy.occupancy().items, 0);
}

#[test]
fn test_din_rail_length_falls_back_to_cabinet_width() {
    let strategy = DinRailStrategy::new(&din_only_cabinet(), &StrategyOptions::default()).unwrap();
    assert_eq!(strategy.occupancy().capacity, 300.0);

    let options = StrategyOptions {
        rail_length_mm: Some(180.0),
        ..Default::default()
    };
    let strategy = DinRailStrategy::new(&din_only_cabinet(), &options).unwrap();
    assert_eq!(strategy.occupancy().capacity, 180.0);
}

#[test]
fn test_din_rail_rejects_other_mount_types() {
    let cabinet = mixed_cabinet();
    let mut strategy = DinRailStrategy::new(&cabinet, &StrategyOptions::default()).unwrap();
    assert!(!strategy.can_mount(&rack_device("srv", 1)));
    let err = strategy
        .mount(&rack_device("srv", 1), &PlacementRequest::default())
        .unwrap_err();
    assert!(matches!(err, StrategyError::MountFailed(_)));
}

// ==========================================
// 机架 / 安装板
// ==========================================

#[test]
fn test_rack_unit_allocation() {
    let cabinet = mixed_cabinet();
    let mut strategy = RackUnitStrategy::new(&cabinet, &StrategyOptions::default()).unwrap();
    assert_eq!(strategy.total_units(), 24);

    let placed = strategy
        .mount(&rack_device("srv-a", 2), &PlacementRequest::at_unit(4))
        .unwrap();
    assert_eq!(
        placed.position,
        PlacementPosition::RackUnit {
            start_unit: 4,
            units: 2
        }
    );
    assert_eq!(placed.zone, "rack_front");

    // 自动分配从 0 开始的第一段空闲
    let placed = strategy
        .mount(&rack_device("srv-b", 4), &PlacementRequest::default())
        .unwrap();
    assert_eq!(
        placed.position,
        PlacementPosition::RackUnit {
            start_unit: 0,
            units: 4
        }
    );

    // 与已占用区间重叠
    let err = strategy
        .mount(&rack_device("srv-c", 2), &PlacementRequest::at_unit(5))
        .unwrap_err();
    assert!(matches!(err, StrategyError::NoCapacity(_)));

    let err = strategy
        .mount(&rack_device("srv-d", 20), &PlacementRequest::default())
        .unwrap_err();
    assert!(err.to_string().contains("剩余 18U"));

    assert_eq!(strategy.used_units(), 6);
    assert!(strategy.unmount("srv-a"));
    assert_eq!(strategy.occupancy().occupied, 4.0);
}

#[test]
fn test_rack_strategy_without_rack_zone() {
    let strategy = RackUnitStrategy::new(&din_only_cabinet(), &StrategyOptions::default()).unwrap();
    assert_eq!(strategy.total_units(), DEFAULT_RACK_UNITS);
    assert!(!strategy.can_mount(&rack_device("srv", 1)));
}

#[test]
fn test_rack_unit_out_of_range_requests_are_refused() {
    let cabinet = mixed_cabinet();
    let mut strategy = RackUnitStrategy::new(&cabinet, &StrategyOptions::default()).unwrap();

    let err = strategy
        .mount(&rack_device("srv-x", 1), &PlacementRequest::at_unit(u32::MAX))
        .unwrap_err();
    assert!(matches!(err, StrategyError::NoCapacity(_)));
    assert!(err.to_string().contains("U4294967296"));

    let err = strategy
        .mount(&rack_device("srv-y", u32::MAX), &PlacementRequest::default())
        .unwrap_err();
    assert!(matches!(err, StrategyError::NoCapacity(_)));

    let err = strategy
        .mount(&rack_device("srv-z", 2), &PlacementRequest::at_unit(u32::MAX - 1))
        .unwrap_err();
    assert!(matches!(err, StrategyError::NoCapacity(_)));

    assert_eq!(strategy.used_units(), 0);
    assert!(strategy.mount(&rack_device("srv-ok", 24), &PlacementRequest::default()).is_ok());
}

#[test]
fn test_mounting_plate_records_position() {
    let cabinet = mixed_cabinet();
    let mut strategy = MountingPlateStrategy::new(&cabinet, &StrategyOptions::default()).unwrap();

    let placed = strategy
        .mount(&plate_device("psu"), &PlacementRequest::at_point(50.0, 120.0))
        .unwrap();
    assert_eq!(placed.zone, "plate_main");
    assert_eq!(
        placed.position,
        PlacementPosition::Plate {
            x_mm: 50.0,
            y_mm: 120.0
        }
    );
    assert_eq!(strategy.items_on("plate_main"), vec![("psu", 50.0, 120.0)]);

    let err = strategy
        .mount(&plate_device("psu2"), &PlacementRequest::at_point(550.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, StrategyError::MountFailed(_)));
    assert_eq!(strategy.occupancy().items, 1);
}
