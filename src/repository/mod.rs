// ==========================================
// 机柜配置器 - 仓储层
// ==========================================
// 职责: 本地持久化（向导状态、草稿）
// 红线: 仓储层只存取 JSON 文本，不做业务判断
// ==========================================

pub mod error;
pub mod local_store_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use local_store_repo::{LocalStore, MemoryLocalStore, SqliteLocalStore};
