// ==========================================
// AppState 测试构造
// ==========================================

use std::sync::Arc;

use cabinet_configurator::catalog::{Catalog, CatalogSource, StaticCatalogSource};
use cabinet_configurator::config::ConfigManager;
use cabinet_configurator::registry::StaticModuleLoader;
use cabinet_configurator::repository::{LocalStore, MemoryLocalStore};
use cabinet_configurator::AppState;
use tempfile::NamedTempFile;

/// 测试用 AppState
///
/// 配置写入临时文件，草稿存内存，目录为传入的静态目录
pub fn create_test_state(catalog: Catalog) -> (NamedTempFile, AppState) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file
        .path()
        .to_str()
        .expect("temp path should be utf-8")
        .to_string();

    let config_manager = Arc::new(ConfigManager::new(&db_path).expect("Failed to create ConfigManager"));
    let local_store: Arc<dyn LocalStore> = Arc::new(MemoryLocalStore::new());
    let catalog_source: Arc<dyn CatalogSource> = Arc::new(StaticCatalogSource::new(catalog));

    let state = AppState::with_components(
        db_path,
        config_manager,
        local_store,
        catalog_source,
        Arc::new(StaticModuleLoader::with_builtin_modules()),
    );
    (temp_file, state)
}
