// ==========================================
// 机柜配置器 - API 层
// ==========================================
// 职责: 面向调用方的设备安装入口
// ==========================================

pub mod error;
pub mod placement_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use placement_api::{PlacementApi, PlacementOutcome, PlacementRecord};
