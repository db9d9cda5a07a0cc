// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use cabinet_configurator::config::{ConfigReader, ValidationThresholds};
use cabinet_configurator::configurator::definition::{NavigationPolicy, DEFAULT_DRAFT_STORAGE_KEY};
use cabinet_configurator::repository::RepositoryResult;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub thresholds: ValidationThresholds,
    pub navigation: NavigationPolicy,
    pub catalog_path: Option<String>,
    pub draft_key: String,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            thresholds: ValidationThresholds::default(),
            navigation: NavigationPolicy::default(),
            catalog_path: None,
            draft_key: DEFAULT_DRAFT_STORAGE_KEY.to_string(),
        }
    }

    /// 收紧告警阈值
    pub fn with_thresholds(critical: f64, info: f64) -> Self {
        let mut config = Self::default();
        config.thresholds.critical_warning_pct = critical;
        config.thresholds.info_pct = info;
        config
    }

    /// 禁止回退
    pub fn forward_only() -> Self {
        let mut config = Self::default();
        config.navigation.allow_back_navigation = false;
        config
    }
}

#[async_trait]
impl ConfigReader for MockConfig {
    async fn get_validation_thresholds(&self) -> RepositoryResult<ValidationThresholds> {
        Ok(self.thresholds.clone())
    }

    async fn get_navigation_policy(&self) -> RepositoryResult<NavigationPolicy> {
        Ok(self.navigation)
    }

    async fn get_catalog_path(&self) -> RepositoryResult<Option<String>> {
        Ok(self.catalog_path.clone())
    }

    async fn get_draft_storage_key(&self) -> RepositoryResult<String> {
        Ok(self.draft_key.clone())
    }
}
