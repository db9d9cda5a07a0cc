// ==========================================
// 机柜配置器 - 校验引擎
// ==========================================
// 职责: 按注册顺序执行全部规则，汇总 errors / warnings / info
// 红线: 规则之间不短路；规则结果是数据，不是错误
// 红线: 同一输入下规则顺序与各级别内的发现顺序稳定
// ==========================================

use crate::config::thresholds::ValidationThresholds;
use crate::domain::cabinet::CabinetType;
use crate::domain::equipment::EquipmentItem;
use crate::engine::rules::{
    CompatibilityRule, DimensionRule, MountTypeRule, PowerRule, ThermalRule, WeightRule,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::{debug, instrument, warn};

// ==========================================
// Finding / ValidationResult
// ==========================================

/// 单条校验发现
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: String,
    pub message: String,
}

/// 校验结果
///
/// - errors: 阻止安装（调用方必须拒绝）
/// - warnings: 提示性，调用方可确认后覆盖
/// - info: 纯描述
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub info: Vec<Finding>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&mut self, rule: &str, message: impl Into<String>) {
        self.errors.push(Finding {
            rule: rule.to_string(),
            message: message.into(),
        });
    }

    pub fn push_warning(&mut self, rule: &str, message: impl Into<String>) {
        self.warnings.push(Finding {
            rule: rule.to_string(),
            message: message.into(),
        });
    }

    pub fn push_info(&mut self, rule: &str, message: impl Into<String>) {
        self.info.push(Finding {
            rule: rule.to_string(),
            message: message.into(),
        });
    }

    /// 追加另一份结果（保持顺序）
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.info.extend(other.info);
    }

    /// 无 error 即可安装
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn total(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.info.len()
    }

    /// 所有发现涉及的规则名（去重，按首次出现顺序）
    pub fn rules_reporting(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for finding in self.errors.iter().chain(&self.warnings).chain(&self.info) {
            if !names.contains(&finding.rule.as_str()) {
                names.push(finding.rule.as_str());
            }
        }
        names
    }
}

// ==========================================
// ValidationContext - 当前已提交负载
// ==========================================
// 表示候选设备加入之前机柜中已提交的累计值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationContext {
    /// kg
    pub total_weight: f64,
    /// W
    pub total_power: f64,
    /// W
    pub total_heat: f64,
    pub used_rack_units: u32,
    /// 已被占用的安装区组件名
    #[serde(default)]
    pub occupied_zones: Vec<String>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 提交设备：累加重量 / 功率 / 散热 / 机架 U 数
    pub fn commit(&mut self, equipment: &EquipmentItem) {
        self.total_weight += equipment.specs.weight.unwrap_or(0.0);
        self.total_power += equipment.specs.power.unwrap_or(0.0);
        self.total_heat += equipment.specs.heat_dissipation.unwrap_or(0.0);
        self.used_rack_units += equipment.rack_units().unwrap_or(0);
    }

    pub fn occupy_zone(&mut self, zone: &str) {
        if !self.is_zone_occupied(zone) {
            self.occupied_zones.push(zone.to_string());
        }
    }

    pub fn is_zone_occupied(&self, zone: &str) -> bool {
        self.occupied_zones.iter().any(|z| z == zone)
    }
}

// ==========================================
// ValidationRule - 规则接口
// ==========================================
/// 校验规则
///
/// 对三个输入是纯函数，不持有可变状态
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &str;

    fn validate(
        &self,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
        context: &ValidationContext,
    ) -> ValidationResult;
}

/// 结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub rules: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

// ==========================================
// ValidationEngine
// ==========================================
#[derive(Default)]
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// 空引擎（不含规则）
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// 标准六规则引擎
    ///
    /// 顺序: 兼容性 -> 尺寸 -> 安装方式 -> 重量 -> 功率 -> 散热
    pub fn with_default_rules(thresholds: &ValidationThresholds) -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(CompatibilityRule::new()));
        engine.add_rule(Box::new(DimensionRule::new(thresholds.clone())));
        engine.add_rule(Box::new(MountTypeRule::new(thresholds.clone())));
        engine.add_rule(Box::new(WeightRule::new(thresholds.clone())));
        engine.add_rule(Box::new(PowerRule::new(thresholds.clone())));
        engine.add_rule(Box::new(ThermalRule::new(thresholds.clone())));
        engine
    }

    /// 追加规则（同名规则允许并存，但记录警告）
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            warn!(rule = rule.name(), "规则重名，后注册的规则同样会执行");
        }
        self.rules.push(rule);
    }

    /// 按名称移除规则，返回移除数量
    pub fn remove_rule(&mut self, name: &str) -> usize {
        let before = self.rules.len();
        self.rules.retain(|r| r.name() != name);
        before - self.rules.len()
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 执行全部规则并汇总结果
    ///
    /// 任何规则报 error 都不会阻止后续规则执行
    #[instrument(level = "debug", skip_all, fields(cabinet = %cabinet.id, equipment = %equipment.id))]
    pub fn evaluate(
        &self,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
        context: &ValidationContext,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();
        for rule in &self.rules {
            let partial = rule.validate(cabinet, equipment, context);
            debug!(
                rule = rule.name(),
                errors = partial.errors.len(),
                warnings = partial.warnings.len(),
                info = partial.info.len(),
                "规则执行完成"
            );
            result.merge(partial);
        }
        result
    }

    /// 是否可以安装（无 error）
    pub fn can_mount(
        &self,
        cabinet: &CabinetType,
        equipment: &EquipmentItem,
        context: &ValidationContext,
    ) -> bool {
        self.evaluate(cabinet, equipment, context).is_valid()
    }

    pub fn stats(&self, result: &ValidationResult) -> ValidationStats {
        ValidationStats {
            rules: self.rules.len(),
            errors: result.errors.len(),
            warnings: result.warnings.len(),
            info: result.info.len(),
        }
    }

    /// 生成文本报告
    pub fn format_report(result: &ValidationResult) -> String {
        let mut report = String::new();
        let status = if result.is_valid() { "通过" } else { "未通过" };
        let _ = writeln!(report, "校验结果: {}", status);

        let sections = [
            ("错误", &result.errors),
            ("警告", &result.warnings),
            ("信息", &result.info),
        ];
        for (title, findings) in sections {
            if findings.is_empty() {
                continue;
            }
            let _ = writeln!(report, "{} ({}):", title, findings.len());
            for finding in findings {
                let _ = writeln!(report, "  - [{}] {}", finding.rule, finding.message);
            }
        }
        report
    }
}
