// ==========================================
// 机柜配置器 - 目录层
// ==========================================
// 职责: 目录来源（文件 / 内存）与带缓存的目录服务
// ==========================================

pub mod error;
pub mod model;
pub mod service;
pub mod source;


pub use error::{CatalogError, CatalogResult};
pub use model::{CabinetSummary, Catalog};
pub use service::CatalogService;
pub use source::{CatalogSource, FileCatalogSource, StaticCatalogSource};
