// ==========================================
// 机柜配置器 - 目录数据
// ==========================================

use crate::domain::cabinet::{CabinetDefinition, Dimensions};
use crate::domain::equipment::EquipmentItem;
use serde::{Deserialize, Serialize};

/// 机柜 + 设备目录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub cabinets: Vec<CabinetDefinition>,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
}

impl Catalog {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.cabinets.is_empty() && self.equipment.is_empty()
    }

    pub fn find_cabinet(&self, id: &str) -> Option<&CabinetDefinition> {
        self.cabinets.iter().find(|c| c.id == id)
    }

    pub fn find_equipment(&self, id: &str) -> Option<&EquipmentItem> {
        self.equipment.iter().find(|e| e.id == id)
    }
}

/// 机柜列表项（选择界面用的基础信息）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinetSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub dimensions: Dimensions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&CabinetDefinition> for CabinetSummary {
    fn from(def: &CabinetDefinition) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            category: def.category.clone(),
            dimensions: def.dimensions.clone(),
            thumbnail: def.thumbnail.clone(),
            description: def.description.clone(),
        }
    }
}
