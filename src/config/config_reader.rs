// ==========================================
// 机柜配置器 - 配置读取 Trait
// ==========================================
// 职责: 定义启动期所需的配置读取接口（不包含实现）
// 实现者: ConfigManager（从 config_kv 表读取）、测试中的 MockConfig
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::thresholds::ValidationThresholds;
use crate::configurator::definition::NavigationPolicy;
use crate::repository::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait ConfigReader: Send + Sync {
    /// 获取校验阈值
    ///
    /// # 默认值
    /// - critical_warning_pct = 0.9, info_pct = 0.75（见 thresholds 模块）
    async fn get_validation_thresholds(&self) -> RepositoryResult<ValidationThresholds>;

    /// 获取向导导航策略
    ///
    /// # 默认值
    /// - allow_back_navigation = true
    /// - clear_future_on_back = true
    async fn get_navigation_policy(&self) -> RepositoryResult<NavigationPolicy>;

    /// 获取目录文件路径（None 表示未配置）
    async fn get_catalog_path(&self) -> RepositoryResult<Option<String>>;

    /// 获取草稿存储键
    ///
    /// # 默认值
    /// - cabinet-configurator-draft
    async fn get_draft_storage_key(&self) -> RepositoryResult<String>;
}
