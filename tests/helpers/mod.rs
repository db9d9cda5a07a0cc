// ==========================================
// 集成测试共享辅助模块
// ==========================================

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_config;
pub mod state_helper;
