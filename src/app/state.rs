// ==========================================
// 机柜配置器 - 应用状态
// ==========================================
// 职责: 持有进程级共享对象（配置、本地存储、目录、注册表、工厂）
// 红线: 不使用全局单例；测试通过 reset() 恢复初始状态
// 红线: 注册表锁不跨 await 持有
// ==========================================

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::placement_api::PlacementApi;
use crate::catalog::service::CatalogService;
use crate::catalog::source::{CatalogSource, FileCatalogSource, StaticCatalogSource};
use crate::config::config_manager::ConfigManager;
use crate::config::config_reader::ConfigReader;
use crate::configurator::definition::{ConfiguratorConfig, DEFAULT_DRAFT_STORAGE_KEY};
use crate::configurator::machine::Configurator;
use crate::db::open_sqlite_connection;
use crate::engine::validation::ValidationEngine;
use crate::registry::cabinet_classes::{constructor, Cabinet, ServerCabinet, SERVER_CABINET_CLASS};
use crate::registry::cabinet_factory::{CabinetAssembly, CabinetFactory};
use crate::registry::cabinet_registry::CabinetRegistry;
use crate::registry::module_loader::{ModuleLoader, StaticModuleLoader};
use crate::repository::error::RepositoryError;
use crate::repository::local_store_repo::{LocalStore, SqliteLocalStore};
use crate::strategy::mounting::StrategyOptions;
use crate::strategy::registry::StrategyRegistry;

/// 应用状态
pub struct AppState {
    /// 本地存储路径
    pub db_path: String,

    pub config_manager: Arc<ConfigManager>,

    /// 草稿 / 向导状态存储
    pub local_store: Arc<dyn LocalStore>,

    pub catalog_service: Arc<CatalogService>,

    pub cabinet_factory: Arc<CabinetFactory>,

    strategy_registry: RwLock<StrategyRegistry>,

    cabinet_registry: RwLock<CabinetRegistry>,
}

impl AppState {
    /// 打开本地存储并初始化全部共享对象
    ///
    /// 目录来源取自配置 catalog.path；未配置时使用空目录
    pub async fn new(db_path: String) -> ApiResult<Self> {
        Self::open(db_path, None).await
    }

    /// 同 new，未配置 catalog.path 时使用调用方提供的目录来源
    pub async fn open(
        db_path: String,
        fallback_catalog: Option<Arc<dyn CatalogSource>>,
    ) -> ApiResult<Self> {
        info!("初始化AppState，本地存储路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone())?);
        let local_store: Arc<dyn LocalStore> = Arc::new(SqliteLocalStore::from_connection(conn)?);

        let catalog_source: Arc<dyn CatalogSource> =
            match config_manager.get_catalog_path().await? {
                Some(path) => Arc::new(FileCatalogSource::new(path)),
                None => match fallback_catalog {
                    Some(source) => {
                        info!(source = %source.describe(), "未配置目录路径，使用内置目录");
                        source
                    }
                    None => {
                        warn!("未配置目录路径 (catalog.path)，使用空目录");
                        Arc::new(StaticCatalogSource::default())
                    }
                },
            };

        Ok(Self::with_components(
            db_path,
            config_manager,
            local_store,
            catalog_source,
            Arc::new(StaticModuleLoader::with_builtin_modules()),
        ))
    }

    /// 由外部提供各组件（测试与嵌入场景）
    pub fn with_components(
        db_path: String,
        config_manager: Arc<ConfigManager>,
        local_store: Arc<dyn LocalStore>,
        catalog_source: Arc<dyn CatalogSource>,
        module_loader: Arc<dyn ModuleLoader>,
    ) -> Self {
        Self {
            db_path,
            config_manager,
            local_store,
            catalog_service: Arc::new(CatalogService::new(catalog_source)),
            cabinet_factory: Arc::new(CabinetFactory::new(module_loader)),
            strategy_registry: RwLock::new(StrategyRegistry::with_builtin_strategies()),
            cabinet_registry: RwLock::new(builtin_cabinet_registry()),
        }
    }

    // ==========================================
    // 注册表访问
    // ==========================================

    pub fn strategies(&self) -> RwLockReadGuard<'_, StrategyRegistry> {
        self.strategy_registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn strategies_mut(&self) -> RwLockWriteGuard<'_, StrategyRegistry> {
        self.strategy_registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cabinet_classes(&self) -> RwLockReadGuard<'_, CabinetRegistry> {
        self.cabinet_registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cabinet_classes_mut(&self) -> RwLockWriteGuard<'_, CabinetRegistry> {
        self.cabinet_registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// 恢复初始状态: 清空目录缓存，注册表回到内置内容
    pub fn reset(&self) {
        self.catalog_service.clear_cache();
        *self.strategies_mut() = StrategyRegistry::with_builtin_strategies();
        *self.cabinet_classes_mut() = builtin_cabinet_registry();
        info!("AppState 已重置");
    }

    // ==========================================
    // 组装入口
    // ==========================================

    /// 按当前配置阈值构建标准校验引擎
    pub async fn validation_engine(&self) -> ApiResult<ValidationEngine> {
        let thresholds = self.config_manager.get_validation_thresholds().await?;
        Ok(ValidationEngine::with_default_rules(&thresholds))
    }

    /// 打开向导
    ///
    /// 导航策略取自应用配置；向导未自定义草稿键时使用配置中的键
    pub async fn open_configurator(
        &self,
        mut config: ConfiguratorConfig,
    ) -> ApiResult<Configurator> {
        config.navigation = self.config_manager.get_navigation_policy().await?;
        if config.storage.draft.storage_key == DEFAULT_DRAFT_STORAGE_KEY {
            config.storage.draft.storage_key =
                self.config_manager.get_draft_storage_key().await?;
        }
        Ok(Configurator::restore_or_new(config, self.local_store.clone())?)
    }

    /// 从目录组装机柜
    ///
    /// 已注册的类直接实例化，否则按 className + modulePath 动态加载
    pub async fn assemble_cabinet(&self, cabinet_id: &str) -> ApiResult<CabinetAssembly> {
        let def = self
            .catalog_service
            .get_cabinet_definition(cabinet_id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("机柜不存在: {}", cabinet_id)))?;

        let registered = def
            .class_name
            .as_deref()
            .filter(|name| self.cabinet_classes().has(name))
            .map(|name| self.cabinet_classes().instantiate(name));
        let instance: Box<dyn Cabinet> = match registered {
            Some(instance) => instance?,
            None => self.cabinet_factory.create_from_catalog(&def).await?,
        };

        let strategies = self.strategies();
        Ok(CabinetFactory::assemble(
            instance,
            &def,
            &strategies,
            &StrategyOptions::default(),
        ))
    }

    /// 组装机柜并创建设备安装 API
    pub async fn placement_api(&self, cabinet_id: &str) -> ApiResult<PlacementApi> {
        let engine = self.validation_engine().await?;
        let assembly = self.assemble_cabinet(cabinet_id).await?;
        Ok(PlacementApi::new(engine, assembly))
    }
}

fn builtin_cabinet_registry() -> CabinetRegistry {
    let mut registry = CabinetRegistry::new();
    registry.register(SERVER_CABINET_CLASS, constructor(|| ServerCabinet));
    registry
}
