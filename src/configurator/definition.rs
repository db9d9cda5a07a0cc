// ==========================================
// 机柜配置器 - 向导定义
// ==========================================
// 职责: 向导步骤定义 + 导航/冲突/存储设置，构造期结构校验
// 红线: 结构性错误在构造期一次性拒绝（ConfigurationError）
// ==========================================

use crate::configurator::error::{ConfiguratorError, ConfiguratorResult};
use crate::domain::wizard::{ResolutionAction, ShowCondition, Step};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_DRAFT_STORAGE_KEY: &str = "cabinet-configurator-draft";
pub const DEFAULT_STATE_STORAGE_KEY: &str = "cabinet-configurator-state";
/// auto 冲突在一次重算中最多自动应用的次数
pub const DEFAULT_MAX_AUTO_PASSES: usize = 8;

// ==========================================
// 导航策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationPolicy {
    pub allow_back_navigation: bool,
    /// 回退时清空回退目标之后步骤的选择
    pub clear_future_on_back: bool,
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self {
            allow_back_navigation: true,
            clear_future_on_back: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConflictSettings {
    /// 是否自动应用 auto 类型冲突的首个方案
    pub auto_resolve: bool,
    pub max_auto_passes: usize,
}

impl Default for ConflictSettings {
    fn default() -> Self {
        Self {
            auto_resolve: true,
            max_auto_passes: DEFAULT_MAX_AUTO_PASSES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftSettings {
    pub enabled: bool,
    pub storage_key: String,
    /// 每次状态变更后自动保存草稿
    pub auto_save: bool,
}

impl Default for DraftSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            storage_key: DEFAULT_DRAFT_STORAGE_KEY.to_string(),
            auto_save: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// 每次状态变更后持久化完整状态
    pub save_state: bool,
    pub state_key: String,
    pub restore_on_load: bool,
    pub draft: DraftSettings,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_state: false,
            state_key: DEFAULT_STATE_STORAGE_KEY.to_string(),
            restore_on_load: false,
            draft: DraftSettings::default(),
        }
    }
}

// ==========================================
// ConfiguratorConfig - 向导定义
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguratorConfig {
    #[serde(default)]
    pub id: Option<String>,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub navigation: NavigationPolicy,
    #[serde(default)]
    pub conflicts: ConflictSettings,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl ConfiguratorConfig {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            id: None,
            steps,
            navigation: NavigationPolicy::default(),
            conflicts: ConflictSettings::default(),
            storage: StorageConfig::default(),
        }
    }

    /// 从 JSON 文本解析并校验
    pub fn from_json(json: &str) -> ConfiguratorResult<Self> {
        let config: ConfiguratorConfig = serde_json::from_str(json)
            .map_err(|e| ConfiguratorError::Configuration(format!("JSON 解析失败: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_navigation(mut self, navigation: NavigationPolicy) -> Self {
        self.navigation = navigation;
        self
    }

    /// 结构校验
    ///
    /// # 校验规则
    /// 1. 步骤非空，id 非空且唯一
    /// 2. 同一步骤内选项值唯一
    /// 3. showWhen 目标存在且位于当前步骤之前，specific 条件的取值必须是目标步骤的选项
    /// 4. 冲突条件非空，引用的步骤存在
    /// 5. 冲突方案中的注入步骤 / 选择修改引用可解析
    pub fn validate(&self) -> ConfiguratorResult<()> {
        if self.steps.is_empty() {
            return Err(ConfiguratorError::Configuration("向导至少需要一个步骤".to_string()));
        }
        validate_steps(&self.steps)?;

        let configured: HashSet<&str> = self.steps.iter().map(|s| s.id.as_str()).collect();
        let mut known: HashSet<&str> = configured.clone();
        for step in &self.steps {
            for rule in &step.conflict_rules {
                if let Some(resolution) = &rule.conflict.resolution {
                    for option in &resolution.options {
                        if let ResolutionAction::AddStep { new_step, .. } = &option.action {
                            known.insert(new_step.id.as_str());
                        }
                    }
                }
            }
        }

        for step in &self.steps {
            for rule in &step.conflict_rules {
                let conflict_id = &rule.conflict.id;
                if conflict_id.trim().is_empty() {
                    return Err(ConfiguratorError::Configuration(format!(
                        "步骤 {} 的冲突规则缺少 id",
                        step.id
                    )));
                }
                if rule.condition.is_empty() {
                    return Err(ConfiguratorError::Configuration(format!(
                        "冲突 {} 的触发条件为空",
                        conflict_id
                    )));
                }
                for step_id in rule.condition.keys() {
                    if !known.contains(step_id.as_str()) {
                        return Err(ConfiguratorError::Configuration(format!(
                            "冲突 {} 引用了不存在的步骤: {}",
                            conflict_id, step_id
                        )));
                    }
                }

                let Some(resolution) = &rule.conflict.resolution else {
                    continue;
                };
                for option in &resolution.options {
                    match &option.action {
                        ResolutionAction::AddStep { new_step, after } => {
                            if new_step.id.trim().is_empty() || configured.contains(new_step.id.as_str()) {
                                return Err(ConfiguratorError::Configuration(format!(
                                    "冲突 {} 注入的步骤 id 无效或与已有步骤重复: '{}'",
                                    conflict_id, new_step.id
                                )));
                            }
                            if let Some(after) = after {
                                if !configured.contains(after.as_str()) {
                                    return Err(ConfiguratorError::Configuration(format!(
                                        "冲突 {} 注入位置不存在: after={}",
                                        conflict_id, after
                                    )));
                                }
                            }
                        }
                        ResolutionAction::ModifySelection { modifications } => {
                            for step_id in modifications.keys() {
                                if !known.contains(step_id.as_str()) {
                                    return Err(ConfiguratorError::Configuration(format!(
                                        "冲突 {} 修改了不存在的步骤: {}",
                                        conflict_id, step_id
                                    )));
                                }
                            }
                        }
                        ResolutionAction::Recompute => {}
                    }
                }
            }
        }

        Ok(())
    }
}

// ==========================================
// 注入步骤（由 AddStep 方案插入）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectedStep {
    pub step: Step,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// 步骤列表结构校验（配置步骤与注入后的有效步骤共用）
pub(crate) fn validate_steps(steps: &[Step]) -> ConfiguratorResult<()> {
    let mut seen: Vec<&str> = Vec::with_capacity(steps.len());

    for step in steps {
        if step.id.trim().is_empty() {
            return Err(ConfiguratorError::Configuration("步骤 id 不能为空".to_string()));
        }
        if seen.contains(&step.id.as_str()) {
            return Err(ConfiguratorError::Configuration(format!("步骤 id 重复: {}", step.id)));
        }

        let mut values: HashSet<&str> = HashSet::new();
        for option in &step.options {
            if !values.insert(option.value.as_str()) {
                return Err(ConfiguratorError::Configuration(format!(
                    "步骤 {} 的选项值重复: {}",
                    step.id, option.value
                )));
            }
        }

        if let Some(show_when) = &step.show_when {
            // 目标必须在前面，保证可见性可以按顺序一次算完
            let target = steps
                .iter()
                .take(seen.len())
                .find(|s| s.id == show_when.step)
                .ok_or_else(|| {
                    ConfiguratorError::Configuration(format!(
                        "步骤 {} 的 showWhen 目标不存在或不在其之前: {}",
                        step.id, show_when.step
                    ))
                })?;

            if show_when.condition == ShowCondition::Specific {
                if show_when.values.is_empty() {
                    return Err(ConfiguratorError::Configuration(format!(
                        "步骤 {} 的 showWhen 为 specific 但未给出取值",
                        step.id
                    )));
                }
                for value in &show_when.values {
                    if target.find_option(value).is_none() {
                        return Err(ConfiguratorError::Configuration(format!(
                            "步骤 {} 的 showWhen 取值 {} 不是步骤 {} 的选项",
                            step.id, value, target.id
                        )));
                    }
                }
            }
        }

        seen.push(step.id.as_str());
    }

    Ok(())
}

/// 由配置步骤 + 注入步骤构建有效步骤列表，并做结构校验
pub(crate) fn build_effective_steps(
    base: &[Step],
    injected: &[InjectedStep],
) -> ConfiguratorResult<Vec<Step>> {
    let mut steps = base.to_vec();
    for item in injected {
        let position = match &item.after {
            Some(after) => steps
                .iter()
                .position(|s| &s.id == after)
                .map(|i| i + 1)
                .ok_or_else(|| {
                    ConfiguratorError::Configuration(format!(
                        "注入步骤 {} 的插入位置不存在: after={}",
                        item.step.id, after
                    ))
                })?,
            None => steps.len(),
        };
        steps.insert(position, item.step.clone());
    }
    validate_steps(&steps)?;
    Ok(steps)
}
