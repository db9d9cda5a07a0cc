// ==========================================
// 机柜配置器 - 目录加载错误
// ==========================================
// 目录服务内部使用；对外一律降级为空目录
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("目录读取失败: {path}: {message}")]
    Io { path: String, message: String },

    #[error("目录解析失败: {0}")]
    Parse(String),

    /// 来源返回非成功状态（文件不存在按 404 处理）
    #[error("目录不可用 ({status}): {message}")]
    Status { status: u16, message: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
