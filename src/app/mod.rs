// ==========================================
// 机柜配置器 - 应用层
// ==========================================
// 职责: 组装进程级共享对象，提供向导 / 装配入口
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
