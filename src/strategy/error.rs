// ==========================================
// 机柜配置器 - 安装策略错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("未找到安装策略: {key}（可用: {available}）")]
    NotFound { key: String, available: String },

    /// 注册时能力校验失败
    #[error("安装策略不合法: {name}，{reason}")]
    InvalidStrategy { name: String, reason: String },

    #[error("安装策略构造失败: {key}: {reason}")]
    Construction { key: String, reason: String },

    #[error("安装失败: {0}")]
    MountFailed(String),

    #[error("安装空间不足: {0}")]
    NoCapacity(String),
}

pub type StrategyResult<T> = Result<T, StrategyError>;
