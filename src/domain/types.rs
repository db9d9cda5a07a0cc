// ==========================================
// 机柜配置器 - 领域类型定义
// ==========================================
// 职责: 跨模块共享的枚举与常量（安装方式、机柜类别、冲突级别）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 向导选项携带的参数（扁平 key/value，最终合并为配置输出）
pub type Params = serde_json::Map<String, serde_json::Value>;

// ==========================================
// 安装方式 (Mount Type)
// ==========================================
// 目录数据中以字符串出现，注册表按规范化后的字符串索引
pub mod mount_types {
    pub const DIN_RAIL: &str = "din_rail";
    pub const RACK_UNIT: &str = "rack_unit";
    pub const MOUNTING_PLATE: &str = "mounting_plate";
}

/// 规范化键（小写 + 去首尾空白）
///
/// 策略注册表、类型注册表共用同一口径
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

// ==========================================
// 机柜类别 (Cabinet Category)
// ==========================================
// 别名: outdoor -> thermal, network -> telecom, datacenter -> server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinetCategory {
    Thermal,
    Telecom,
    Server,
    Generic,
}

impl CabinetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CabinetCategory::Thermal => "thermal",
            CabinetCategory::Telecom => "telecom",
            CabinetCategory::Server => "server",
            CabinetCategory::Generic => "generic",
        }
    }

    /// 从目录类别字符串解析（未知类别回落到 Generic）
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "thermal" | "outdoor" => CabinetCategory::Thermal,
            "telecom" | "network" => CabinetCategory::Telecom,
            "server" | "datacenter" => CabinetCategory::Server,
            _ => CabinetCategory::Generic,
        }
    }

    /// 该类别机柜的典型设备类别（用于兼容性软提示）
    ///
    /// 返回 None 表示不做类别提示
    pub fn typical_equipment(&self) -> Option<&'static [&'static str]> {
        match self {
            CabinetCategory::Server => Some(&["server", "network", "storage", "pdu"]),
            _ => None,
        }
    }
}

impl Default for CabinetCategory {
    fn default() -> Self {
        CabinetCategory::Generic
    }
}

impl fmt::Display for CabinetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 冲突类型与级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Incompatibility,
    Validation,
}

/// 冲突级别
///
/// Error 级冲突未解决时向导不可提交
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    Error,
    Warning,
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictSeverity::Error => write!(f, "error"),
            ConflictSeverity::Warning => write!(f, "warning"),
        }
    }
}
