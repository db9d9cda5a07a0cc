// ==========================================
// 机柜配置器 - 目录服务
// ==========================================
// 职责: 缓存唯一一份目录；并发加载共享同一次读取
// 红线: 失败降级为空目录返回，但不写入缓存（允许重试）
// 红线: 锁只保护缓存状态，不跨 await 持有
// ==========================================

use crate::catalog::error::CatalogResult;
use crate::catalog::model::{CabinetSummary, Catalog};
use crate::catalog::source::CatalogSource;
use crate::domain::cabinet::CabinetDefinition;
use crate::domain::equipment::EquipmentItem;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

type InFlightLoad = Shared<BoxFuture<'static, CatalogResult<Arc<Catalog>>>>;

#[derive(Default)]
struct CacheState {
    catalog: Option<Arc<Catalog>>,
    /// (加载序号, 共享的加载任务)
    in_flight: Option<(u64, InFlightLoad)>,
    next_load_id: u64,
}

pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    state: Mutex<CacheState>,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            state: Mutex::new(CacheState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_cached(&self) -> bool {
        self.state().catalog.is_some()
    }

    /// 加载目录
    ///
    /// 已缓存直接返回；已有加载进行中则等待同一结果；否则发起新的读取
    pub async fn load_catalog(&self) -> Arc<Catalog> {
        let (load_id, load) = {
            let mut state = self.state();
            if let Some(catalog) = &state.catalog {
                return catalog.clone();
            }
            let existing = state
                .in_flight
                .as_ref()
                .map(|(load_id, load)| (*load_id, load.clone()));
            match existing {
                Some((load_id, load)) => {
                    debug!(load_id, "目录加载进行中，共享结果");
                    (load_id, load)
                }
                None => {
                    let load_id = state.next_load_id;
                    state.next_load_id += 1;
                    let source = self.source.clone();
                    let load = async move { source.fetch().await.map(Arc::new) }
                        .boxed()
                        .shared();
                    state.in_flight = Some((load_id, load.clone()));
                    debug!(load_id, source = %self.source.describe(), "开始加载目录");
                    (load_id, load)
                }
            }
        };

        let result = load.await;

        let mut state = self.state();
        // clear_cache 或其他调用方已处理时 in_flight 不再是本次加载
        let is_current = matches!(&state.in_flight, Some((id, _)) if *id == load_id);
        if is_current {
            state.in_flight = None;
        }

        match result {
            Ok(catalog) => {
                if is_current {
                    info!(
                        cabinets = catalog.cabinets.len(),
                        equipment = catalog.equipment.len(),
                        "目录已加载"
                    );
                    state.catalog = Some(catalog.clone());
                }
                catalog
            }
            Err(e) => {
                if is_current {
                    error!(
                        source = %self.source.describe(),
                        error = %e,
                        "目录加载失败，返回空目录"
                    );
                }
                Arc::new(Catalog::default())
            }
        }
    }

    /// 清空缓存与进行中的加载标记
    pub fn clear_cache(&self) {
        let mut state = self.state();
        state.catalog = None;
        state.in_flight = None;
        debug!("目录缓存已清空");
    }

    pub async fn get_catalog(&self) -> Arc<Catalog> {
        self.load_catalog().await
    }

    pub async fn get_available_cabinets(&self) -> Vec<CabinetSummary> {
        let catalog = self.load_catalog().await;
        catalog.cabinets.iter().map(CabinetSummary::from).collect()
    }

    pub async fn get_cabinet_definition(&self, id: &str) -> Option<CabinetDefinition> {
        self.load_catalog().await.find_cabinet(id).cloned()
    }

    pub async fn get_equipment_definition(&self, id: &str) -> Option<EquipmentItem> {
        self.load_catalog().await.find_equipment(id).cloned()
    }
}
