// ==========================================
// 装配校验集成测试
// ==========================================
// 场景: 目录机柜 + 目录设备 -> 六规则引擎
// 阈值: 配置读取接口提供（MockConfig / ConfigManager）
// ==========================================

mod helpers;
mod test_helpers;

use std::collections::BTreeSet;

use cabinet_configurator::config::ConfigReader;
use cabinet_configurator::domain::cabinet::CabinetType;
use cabinet_configurator::engine::{Finding, ValidationContext, ValidationEngine};
use helpers::fixtures::{cabinet, din_module, equipment, small_din_cabinet};
use helpers::mock_config::MockConfig;
use test_helpers::{create_config_manager, insert_test_config, open_test_connection};

fn rules_of(findings: &[Finding]) -> BTreeSet<&str> {
    findings.iter().map(|f| f.rule.as_str()).collect()
}

async fn engine_from(reader: &dyn ConfigReader) -> ValidationEngine {
    let thresholds = reader
        .get_validation_thresholds()
        .await
        .expect("thresholds should load");
    ValidationEngine::with_default_rules(&thresholds)
}

#[tokio::test]
async fn test_server_in_din_cabinet_reports_every_failing_rule() {
    let engine = engine_from(&MockConfig::default()).await;
    let cabinet = CabinetType::from_definition(&cabinet("tsh_700_500_240"));
    let server = equipment("server_1u");

    let result = engine.evaluate(&cabinet, &server, &ValidationContext::new());

    assert!(!result.is_valid());
    assert_eq!(
        rules_of(&result.errors),
        BTreeSet::from(["CompatibilityRule", "DimensionRule", "MountTypeRule", "ThermalRule"])
    );
    assert!(!engine.can_mount(&cabinet, &server, &ValidationContext::new()));

    let report = ValidationEngine::format_report(&result);
    assert!(report.starts_with("校验结果: 未通过"));
    assert!(report.contains("错误 (4):"));
    assert!(report.contains("[CompatibilityRule]"));
}

#[tokio::test]
async fn test_server_in_server_cabinet_is_clean() {
    let engine = engine_from(&MockConfig::default()).await;
    let cabinet = CabinetType::from_definition(&cabinet("srv-42u"));

    let result = engine.evaluate(&cabinet, &equipment("server_1u"), &ValidationContext::new());

    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
    assert!(result.warnings.is_empty(), "unexpected warnings: {:?}", result.warnings);
}

#[tokio::test]
async fn test_weight_escalates_with_committed_load() {
    let engine = engine_from(&MockConfig::default()).await;
    let cabinet = CabinetType::from_definition(&small_din_cabinet());
    let mut context = ValidationContext::new();

    let first = din_module("a", 2, 4.0, 10.0);
    let result = engine.evaluate(&cabinet, &first, &context);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
    context.commit(&first);

    let second = din_module("b", 2, 4.0, 10.0);
    assert!(engine.can_mount(&cabinet, &second, &context));
    context.commit(&second);
    assert_eq!(context.total_weight, 8.0);

    // 8 + 2 = 10，恰好等于上限: 警告而非错误
    let at_limit = din_module("c", 1, 2.0, 10.0);
    let result = engine.evaluate(&cabinet, &at_limit, &context);
    assert!(result.is_valid());
    assert_eq!(rules_of(&result.warnings), BTreeSet::from(["WeightRule"]));

    let over = din_module("d", 1, 2.5, 10.0);
    let result = engine.evaluate(&cabinet, &over, &context);
    assert_eq!(rules_of(&result.errors), BTreeSet::from(["WeightRule"]));
    assert!(result.errors[0].message.contains("10.5kg"));
}

#[tokio::test]
async fn test_configured_thresholds_shift_levels() {
    let cabinet = CabinetType::from_definition(&small_din_cabinet());
    let device = din_module("a", 2, 8.5, 10.0);
    let context = ValidationContext::new();

    // 默认 90% / 75%: 8.5kg 属于偏高，只有 info
    let default_engine = engine_from(&MockConfig::default()).await;
    let result = default_engine.evaluate(&cabinet, &device, &context);
    assert!(result.warnings.is_empty());
    assert!(result
        .info
        .iter()
        .any(|f| f.rule == "WeightRule" && f.message.contains("85.0%")));

    // 收紧到 80% / 50%: 同一设备给出警告
    let strict_engine = engine_from(&MockConfig::with_thresholds(0.8, 0.5)).await;
    let result = strict_engine.evaluate(&cabinet, &device, &context);
    assert_eq!(rules_of(&result.warnings), BTreeSet::from(["WeightRule"]));
}

#[tokio::test]
async fn test_engine_reads_thresholds_from_config_manager() {
    let (temp_file, manager) = create_config_manager().expect("Failed to create ConfigManager");
    let conn = open_test_connection(temp_file.path().to_str().unwrap()).unwrap();
    insert_test_config(&conn).unwrap();

    let engine = engine_from(&manager).await;
    let cabinet = CabinetType::from_definition(&small_din_cabinet());
    let result = engine.evaluate(&cabinet, &din_module("a", 2, 8.5, 10.0), &ValidationContext::new());
    assert_eq!(rules_of(&result.warnings), BTreeSet::from(["WeightRule"]));
}

#[tokio::test]
async fn test_missing_specs_only_produce_info() {
    let engine = engine_from(&MockConfig::default()).await;
    let cabinet = CabinetType::from_definition(&small_din_cabinet());
    let mut device = din_module("bare", 1, 0.0, 0.0);
    device.specs = Default::default();
    device.dimensions = None;

    let result = engine.evaluate(&cabinet, &device, &ValidationContext::new());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
    let info_rules = rules_of(&result.info);
    for rule in ["WeightRule", "PowerRule", "ThermalRule", "DimensionRule"] {
        assert!(info_rules.contains(rule), "{rule} should report info");
    }
}
