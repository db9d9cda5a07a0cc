// ==========================================
// 机柜配置器 - 向导层错误类型
// ==========================================
// 职责: 区分结构性错误（构造期致命）与运行期可恢复错误
// 说明: Selection / InvalidNavigation 均为无副作用拒绝，状态保持不变
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfiguratorError {
    /// 向导定义不合法（重复 id、showWhen 目标不可解析等）
    #[error("向导配置错误: {0}")]
    Configuration(String),

    #[error("选择无效: step={step_id}, {reason}")]
    Selection { step_id: String, reason: String },

    #[error("导航无效: {0}")]
    InvalidNavigation(String),

    #[error("草稿不兼容: {reason}")]
    DraftIncompatible { reason: String },

    #[error("草稿不存在: key={0}")]
    DraftNotFound(String),

    #[error("草稿功能未启用")]
    DraftDisabled,

    #[error("冲突不存在或已失效: {0}")]
    ConflictNotFound(String),

    #[error("冲突解决方案不存在: conflict={conflict_id}, option={option_id}")]
    ResolutionNotFound {
        conflict_id: String,
        option_id: String,
    },

    /// 只有 warning 级冲突允许用户直接确认
    #[error("错误级冲突不能直接确认: {0}")]
    ConflictNotAcknowledgeable(String),

    #[error("本地存储错误: {0}")]
    Storage(#[from] RepositoryError),
}

impl ConfiguratorError {
    pub(crate) fn selection(step_id: &str, reason: impl Into<String>) -> Self {
        ConfiguratorError::Selection {
            step_id: step_id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn incompatible(reason: impl Into<String>) -> Self {
        ConfiguratorError::DraftIncompatible {
            reason: reason.into(),
        }
    }
}

pub type ConfiguratorResult<T> = Result<T, ConfiguratorError>;
