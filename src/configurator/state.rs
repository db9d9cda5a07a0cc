// ==========================================
// 机柜配置器 - 向导状态与草稿
// ==========================================
// 红线: visible_steps / conflicts / is_valid 只能由重算得出，不允许外部直接修改
// ==========================================

use crate::configurator::definition::InjectedStep;
use crate::domain::wizard::{Conflict, Selection};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 草稿 schema 版本，恢复时严格相等比较
pub const DRAFT_SCHEMA_VERSION: &str = "1.0";

// ==========================================
// ConfiguratorState - 向导状态
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguratorState {
    /// 当前步骤在有效步骤列表中的下标
    pub current_step: usize,
    /// stepId -> 选择（每步至多一个）
    pub selections: BTreeMap<String, Selection>,
    pub is_valid: bool,
    /// 按步骤顺序排列的可见步骤 id
    pub visible_steps: Vec<String>,
    /// 已访问步骤下标栈
    pub history: Vec<usize>,
    /// 当前生效的冲突（按首次触发顺序）
    pub conflicts: Vec<Conflict>,
    /// 已解决 / 已确认的冲突 id，冲突条件失效时自动移除
    #[serde(default)]
    pub resolved_conflicts: BTreeSet<String>,
    #[serde(default)]
    pub injected_steps: Vec<InjectedStep>,
    pub draft_saved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved_at: Option<i64>,
}

impl ConfiguratorState {
    pub fn is_resolved(&self, conflict_id: &str) -> bool {
        self.resolved_conflicts.contains(conflict_id)
    }

    /// 未解决的冲突
    pub fn unresolved_conflicts(&self) -> impl Iterator<Item = &Conflict> {
        self.conflicts
            .iter()
            .filter(move |c| !self.resolved_conflicts.contains(&c.id))
    }

    pub fn has_blocking_conflict(&self) -> bool {
        self.unresolved_conflicts().any(|c| c.is_error())
    }
}

// ==========================================
// Draft - 草稿快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub selections: BTreeMap<String, Selection>,
    pub current_step: usize,
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
    /// 保存时间（epoch 毫秒）
    pub saved_at: i64,
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub injected_steps: Vec<InjectedStep>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub resolved_conflicts: BTreeSet<String>,
}

impl Draft {
    pub fn from_state(state: &ConfiguratorState, saved_at: i64) -> Self {
        Self {
            selections: state.selections.clone(),
            current_step: state.current_step,
            conflicts: state.conflicts.clone(),
            saved_at,
            version: DRAFT_SCHEMA_VERSION.to_string(),
            injected_steps: state.injected_steps.clone(),
            resolved_conflicts: state.resolved_conflicts.clone(),
        }
    }

    pub fn is_compatible(&self) -> bool {
        self.version == DRAFT_SCHEMA_VERSION
    }
}
