// ==========================================
// 机柜配置器 - 向导定义模型
// ==========================================
// 职责: 向导步骤、选项、显示条件、冲突规则与冲突解决方式
// 说明: 冲突解决只携带数据（AddStep / ModifySelection / Recompute），
//       不携带可执行闭包，保证状态可序列化、可测试
// 序列化: camelCase（与外部 JSON 定义一致）
// ==========================================

use crate::domain::types::{ConflictSeverity, ConflictType, Params};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 用户在某一步的选择
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub params: Params,
}

/// 步骤选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Params,
}

impl StepOption {
    pub fn to_selection(&self) -> Selection {
        Selection {
            value: self.value.clone(),
            label: self.label.clone(),
            params: self.params.clone(),
        }
    }
}

// ==========================================
// 显示条件 (showWhen)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowCondition {
    /// 依赖步骤有任意选择即显示
    Any,
    /// 依赖步骤的选择值落在 values 中才显示
    Specific,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowWhen {
    /// 依赖的步骤 ID
    pub step: String,
    pub condition: ShowCondition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl ShowWhen {
    /// 依赖步骤的当前选择是否满足显示条件
    pub fn is_satisfied_by(&self, selection: Option<&Selection>) -> bool {
        match (self.condition, selection) {
            (_, None) => false,
            (ShowCondition::Any, Some(_)) => true,
            (ShowCondition::Specific, Some(sel)) => self.values.iter().any(|v| v == &sel.value),
        }
    }
}

// ==========================================
// 冲突规则
// ==========================================

/// 冲突条件中的取值：单值或候选集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    One(String),
    AnyOf(Vec<String>),
}

impl ConditionValue {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            ConditionValue::One(v) => v == value,
            ConditionValue::AnyOf(values) => values.iter().any(|v| v == value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRule {
    /// stepId -> 取值条件，全部满足才触发
    pub condition: BTreeMap<String, ConditionValue>,
    pub conflict: Conflict,
}

impl ConflictRule {
    pub fn is_triggered(&self, selections: &BTreeMap<String, Selection>) -> bool {
        !self.condition.is_empty()
            && self.condition.iter().all(|(step_id, expected)| {
                selections
                    .get(step_id)
                    .map(|sel| expected.matches(&sel.value))
                    .unwrap_or(false)
            })
    }
}

/// 冲突
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub id: String,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub message: String,
    #[serde(default)]
    pub affected_steps: Vec<String>,
    pub severity: ConflictSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ConflictResolution>,
}

impl Conflict {
    pub fn is_error(&self) -> bool {
        self.severity == ConflictSeverity::Error
    }

    pub fn find_option(&self, option_id: &str) -> Option<&ResolutionOption> {
        self.resolution
            .as_ref()
            .and_then(|r| r.options.iter().find(|o| o.id == option_id))
    }
}

// ==========================================
// 冲突解决
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    /// 提供备选路径，由用户选择
    Branch,
    /// 仅提示
    Suggestion,
    /// 重算时自动采用第一个选项
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResolution {
    #[serde(rename = "type")]
    pub kind: ResolutionKind,
    #[serde(default)]
    pub options: Vec<ResolutionOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub action: ResolutionAction,
}

/// 解决动作（纯数据）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ResolutionAction {
    /// 注入新步骤（after 为空时追加到末尾）
    AddStep {
        #[serde(rename = "newStep")]
        new_step: Box<Step>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        after: Option<String>,
    },
    /// 改写已有选择
    ModifySelection {
        modifications: BTreeMap<String, Selection>,
    },
    /// 标记已处理，条件仍成立期间不再阻塞
    Recompute,
}

// ==========================================
// 步骤
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_when: Option<ShowWhen>,
    #[serde(default)]
    pub options: Vec<StepOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflict_rules: Vec<ConflictRule>,
}

impl Step {
    pub fn find_option(&self, value: &str) -> Option<&StepOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn option_values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }
}
