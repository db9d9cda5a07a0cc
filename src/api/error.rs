// ==========================================
// 机柜配置器 - API 层错误类型
// ==========================================
// 职责: 汇总各层错误，给调用方统一的失败原因
// 红线: 校验发现是数据；只有"有 error 级发现仍要求安装"才转为拒绝错误
// ==========================================

use crate::catalog::error::CatalogError;
use crate::configurator::error::ConfiguratorError;
use crate::engine::validation::Finding;
use crate::registry::error::RegistryError;
use crate::repository::error::RepositoryError;
use crate::strategy::error::StrategyError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与查找
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("机柜未提供安装方式 {0} 的策略")]
    StrategyNotFound(String),

    // ==========================================
    // 安装拒绝
    // ==========================================
    /// 校验存在 error 级发现
    #[error("设备 {equipment_id} 校验未通过: {summary}")]
    ValidationRejected {
        equipment_id: String,
        summary: String,
        errors: Vec<Finding>,
    },

    // ==========================================
    // 下层错误
    // ==========================================
    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Configurator(#[from] ConfiguratorError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("存储错误: {0}")]
    Storage(#[from] RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub(crate) fn rejected(equipment_id: &str, errors: Vec<Finding>) -> Self {
        let summary = errors
            .iter()
            .map(|f| format!("[{}] {}", f.rule, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        ApiError::ValidationRejected {
            equipment_id: equipment_id.to_string(),
            summary,
            errors,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_summary_lists_rules() {
        let err = ApiError::rejected(
            "srv-1u",
            vec![
                Finding {
                    rule: "WeightRule".to_string(),
                    message: "超重".to_string(),
                },
                Finding {
                    rule: "PowerRule".to_string(),
                    message: "超功率".to_string(),
                },
            ],
        );
        assert_eq!(
            err.to_string(),
            "设备 srv-1u 校验未通过: [WeightRule] 超重; [PowerRule] 超功率"
        );
    }

    #[test]
    fn test_strategy_error_converts_transparently() {
        let err: ApiError = StrategyError::NoCapacity("机架已满".to_string()).into();
        assert_eq!(err.to_string(), "安装空间不足: 机架已满");
    }
}
