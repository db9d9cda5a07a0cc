// ==========================================
// 机柜配置器 - 目录来源
// ==========================================

use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::model::Catalog;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// 日志用的来源描述
    fn describe(&self) -> String;

    async fn fetch(&self) -> CatalogResult<Catalog>;
}

// ==========================================
// FileCatalogSource - 本地 JSON 文件
// ==========================================
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> CatalogResult<Catalog> {
        debug!(path = %self.path.display(), "读取目录文件");
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CatalogError::Status {
                    status: 404,
                    message: format!("目录不存在: {}", self.path.display()),
                },
                _ => CatalogError::Io {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                },
            })?;
        Catalog::from_json(&raw).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

// ==========================================
// StaticCatalogSource - 内存目录
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    catalog: Catalog,
}

impl StaticCatalogSource {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn from_json(json: &str) -> CatalogResult<Self> {
        Catalog::from_json(json)
            .map(Self::new)
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    fn describe(&self) -> String {
        format!("static({} cabinets)", self.catalog.cabinets.len())
    }

    async fn fetch(&self) -> CatalogResult<Catalog> {
        Ok(self.catalog.clone())
    }
}
