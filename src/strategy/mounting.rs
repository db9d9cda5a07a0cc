// ==========================================
// 机柜配置器 - 安装策略
// ==========================================
// 职责: 在机柜的安装区内为设备分配位置（一维槽位 / U 位 / 坐标）
// 红线: 策略只负责分配，不做负载校验（负载由校验引擎负责）
// ==========================================

use crate::domain::cabinet::CabinetType;
use crate::domain::equipment::EquipmentItem;
use crate::domain::types::{mount_types, normalize_key};
use crate::strategy::error::{StrategyError, StrategyResult};
use serde::{Deserialize, Serialize};

/// DIN 导轨模数宽度（mm）
pub const DIN_MODULE_PITCH_MM: f64 = 18.0;

/// 未声明 U 数的机架柜按标准 42U 处理
pub const DEFAULT_RACK_UNITS: u32 = 42;

// ==========================================
// 构造选项 / 安装请求 / 安装结果
// ==========================================

/// 策略构造选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOptions {
    /// 覆盖导轨长度（mm）
    #[serde(default)]
    pub rail_length_mm: Option<f64>,
    /// 覆盖模数宽度（mm）
    #[serde(default)]
    pub module_pitch_mm: Option<f64>,
}

/// 安装请求（全部可选，未指定时由策略自动分配）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    /// 优先安装区（组件名）
    #[serde(default)]
    pub zone: Option<String>,
    /// 指定起始 U 位（0 起）
    #[serde(default)]
    pub unit_index: Option<u32>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl PlacementRequest {
    pub fn in_zone(zone: impl Into<String>) -> Self {
        Self {
            zone: Some(zone.into()),
            ..Self::default()
        }
    }

    pub fn at_unit(unit_index: u32) -> Self {
        Self {
            unit_index: Some(unit_index),
            ..Self::default()
        }
    }

    pub fn at_point(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementPosition {
    RailSlot {
        rail_index: usize,
        start_mm: f64,
        end_mm: f64,
    },
    RackUnit {
        start_unit: u32,
        units: u32,
    },
    Plate {
        x_mm: f64,
        y_mm: f64,
    },
}

/// 安装结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub equipment_id: String,
    pub mount_type: String,
    /// 安装区组件名
    pub zone: String,
    pub position: PlacementPosition,
}

/// 占用统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyStats {
    pub capacity: f64,
    pub occupied: f64,
    pub free: f64,
    pub fill_percent: f64,
    pub items: usize,
}

impl OccupancyStats {
    fn from_totals(capacity: f64, occupied: f64, items: usize) -> Self {
        let fill_percent = if capacity > 0.0 {
            occupied / capacity * 100.0
        } else {
            0.0
        };
        Self {
            capacity,
            occupied,
            free: (capacity - occupied).max(0.0),
            fill_percent,
            items,
        }
    }
}

// ==========================================
// MountingStrategy - 策略接口
// ==========================================
pub trait MountingStrategy: Send + Sync {
    /// 规范化的安装方式
    fn mount_type(&self) -> &str;

    /// 设备安装方式匹配且机柜有对应安装区
    fn can_mount(&self, equipment: &EquipmentItem) -> bool;

    fn mount(
        &mut self,
        equipment: &EquipmentItem,
        request: &PlacementRequest,
    ) -> StrategyResult<Placement>;

    /// 返回是否确实移除了设备
    fn unmount(&mut self, equipment_id: &str) -> bool;

    fn occupancy(&self) -> OccupancyStats;

    /// 安装区已无法再容纳设备（默认可共享）
    fn is_zone_full(&self, _zone: &str) -> bool {
        false
    }
}

fn equipment_mount_type(equipment: &EquipmentItem) -> Option<String> {
    equipment.mount_type().map(normalize_key)
}

/// 请求区优先，其次设备首选区，其余按机柜声明顺序
fn zone_search_order(names: &[String], preferred: &[Option<&str>]) -> Vec<usize> {
    let mut order: Vec<usize> = Vec::with_capacity(names.len());
    for wanted in preferred.iter().flatten() {
        if let Some(idx) = names.iter().position(|n| n.as_str() == *wanted) {
            if !order.contains(&idx) {
                order.push(idx);
            }
        }
    }
    for idx in 0..names.len() {
        if !order.contains(&idx) {
            order.push(idx);
        }
    }
    order
}

// ==========================================
// DinRailStrategy - DIN 导轨
// ==========================================
#[derive(Debug, Clone, PartialEq)]
struct RailSlot {
    start: f64,
    end: f64,
    equipment_id: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Rail {
    component: String,
    length_mm: f64,
    slots: Vec<RailSlot>,
}

impl Rail {
    fn occupied_mm(&self) -> f64 {
        self.slots.iter().map(|s| s.end - s.start).sum()
    }

    /// 从左到右第一个能放下 width 的空隙
    fn next_free_position(&self, width: f64) -> Option<f64> {
        let mut slots: Vec<&RailSlot> = self.slots.iter().collect();
        slots.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut cursor: f64 = 0.0;
        for slot in slots {
            if cursor + width <= slot.start {
                return Some(cursor);
            }
            cursor = cursor.max(slot.end);
        }
        if cursor + width <= self.length_mm {
            Some(cursor)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct DinRailStrategy {
    rails: Vec<Rail>,
    module_pitch_mm: f64,
}

impl DinRailStrategy {
    /// 每个 din_rail 安装区的每个组件视为一根导轨
    ///
    /// 导轨长度: 选项覆盖 > 安装区长度 > 机柜宽度
    pub fn new(cabinet: &CabinetType, options: &StrategyOptions) -> StrategyResult<Self> {
        let mut rails = Vec::new();
        for zone in cabinet.mounting_zones(mount_types::DIN_RAIL) {
            let length_mm = options
                .rail_length_mm
                .or(zone.length_mm)
                .or(cabinet.dimensions.width)
                .filter(|l| *l > 0.0)
                .ok_or_else(|| StrategyError::Construction {
                    key: mount_types::DIN_RAIL.to_string(),
                    reason: format!("无法确定导轨长度: 机柜 {}", cabinet.id),
                })?;
            for component in &zone.component_names {
                rails.push(Rail {
                    component: component.clone(),
                    length_mm,
                    slots: Vec::new(),
                });
            }
        }

        Ok(Self {
            rails,
            module_pitch_mm: options.module_pitch_mm.unwrap_or(DIN_MODULE_PITCH_MM),
        })
    }

    pub fn rail_count(&self) -> usize {
        self.rails.len()
    }

    /// 设备占用宽度: 模数 × 模数宽度，其次外形宽度，默认 1 个模数
    pub fn equipment_width(&self, equipment: &EquipmentItem) -> f64 {
        equipment
            .mounting
            .as_ref()
            .and_then(|m| m.module_width)
            .filter(|w| *w > 0)
            .map(|w| f64::from(w) * self.module_pitch_mm)
            .or_else(|| equipment.width_mm().filter(|w| *w > 0.0))
            .unwrap_or(self.module_pitch_mm)
    }

    pub fn rail_occupancy(&self, rail_index: usize) -> Option<OccupancyStats> {
        self.rails.get(rail_index).map(|rail| {
            OccupancyStats::from_totals(rail.length_mm, rail.occupied_mm(), rail.slots.len())
        })
    }
}

impl MountingStrategy for DinRailStrategy {
    fn mount_type(&self) -> &str {
        mount_types::DIN_RAIL
    }

    fn can_mount(&self, equipment: &EquipmentItem) -> bool {
        equipment_mount_type(equipment).as_deref() == Some(mount_types::DIN_RAIL)
            && !self.rails.is_empty()
    }

    fn mount(
        &mut self,
        equipment: &EquipmentItem,
        request: &PlacementRequest,
    ) -> StrategyResult<Placement> {
        if !self.can_mount(equipment) {
            return Err(StrategyError::MountFailed(format!(
                "设备 {} 无法安装到 DIN 导轨",
                equipment.id
            )));
        }

        let width = self.equipment_width(equipment);
        let names: Vec<String> = self.rails.iter().map(|r| r.component.clone()).collect();
        let preferred_zone = equipment
            .mounting
            .as_ref()
            .and_then(|m| m.preferred_zone.as_deref());
        let order = zone_search_order(&names, &[request.zone.as_deref(), preferred_zone]);

        for rail_index in order {
            let rail = &mut self.rails[rail_index];
            if let Some(start) = rail.next_free_position(width) {
                rail.slots.push(RailSlot {
                    start,
                    end: start + width,
                    equipment_id: equipment.id.clone(),
                });
                return Ok(Placement {
                    equipment_id: equipment.id.clone(),
                    mount_type: mount_types::DIN_RAIL.to_string(),
                    zone: rail.component.clone(),
                    position: PlacementPosition::RailSlot {
                        rail_index,
                        start_mm: start,
                        end_mm: start + width,
                    },
                });
            }
        }

        Err(StrategyError::NoCapacity(format!(
            "导轨剩余空间不足以安装 {}（需要 {:.0}mm）",
            equipment.id, width
        )))
    }

    fn unmount(&mut self, equipment_id: &str) -> bool {
        let mut removed = false;
        for rail in &mut self.rails {
            let before = rail.slots.len();
            rail.slots.retain(|s| s.equipment_id != equipment_id);
            removed |= rail.slots.len() != before;
        }
        removed
    }

    fn occupancy(&self) -> OccupancyStats {
        let capacity = self.rails.iter().map(|r| r.length_mm).sum();
        let occupied = self.rails.iter().map(Rail::occupied_mm).sum();
        let items = self.rails.iter().map(|r| r.slots.len()).sum();
        OccupancyStats::from_totals(capacity, occupied, items)
    }

    /// 剩余空隙放不下一个模数
    fn is_zone_full(&self, zone: &str) -> bool {
        self.rails
            .iter()
            .find(|r| r.component == zone)
            .is_some_and(|r| r.next_free_position(self.module_pitch_mm).is_none())
    }
}

// ==========================================
// RackUnitStrategy - 19 英寸机架
// ==========================================
#[derive(Debug, Clone, PartialEq)]
struct RackSlot {
    start: u32,
    units: u32,
    equipment_id: String,
}

#[derive(Debug, Clone)]
pub struct RackUnitStrategy {
    zone: Option<String>,
    total_units: u32,
    slots: Vec<RackSlot>,
}

impl RackUnitStrategy {
    pub fn new(cabinet: &CabinetType, _options: &StrategyOptions) -> StrategyResult<Self> {
        let zone = cabinet
            .mounting_zones(mount_types::RACK_UNIT)
            .into_iter()
            .flat_map(|z| z.component_names.iter())
            .next()
            .cloned();
        let total_units = match cabinet.rack_units() {
            0 => DEFAULT_RACK_UNITS,
            units => units,
        };
        Ok(Self {
            zone,
            total_units,
            slots: Vec::new(),
        })
    }

    pub fn total_units(&self) -> u32 {
        self.total_units
    }

    pub fn used_units(&self) -> u32 {
        self.slots.iter().map(|s| s.units).sum()
    }

    fn is_range_free(&self, start: u32, units: u32) -> bool {
        let Some(end) = start.checked_add(units) else {
            return false;
        };
        end <= self.total_units
            && self
                .slots
                .iter()
                .all(|s| end <= s.start || start >= s.start + s.units)
    }

    fn first_free_range(&self, units: u32) -> Option<u32> {
        if units > self.total_units {
            return None;
        }
        (0..=self.total_units - units).find(|start| self.is_range_free(*start, units))
    }
}

impl MountingStrategy for RackUnitStrategy {
    fn mount_type(&self) -> &str {
        mount_types::RACK_UNIT
    }

    fn can_mount(&self, equipment: &EquipmentItem) -> bool {
        equipment_mount_type(equipment).as_deref() == Some(mount_types::RACK_UNIT)
            && self.zone.is_some()
    }

    fn mount(
        &mut self,
        equipment: &EquipmentItem,
        request: &PlacementRequest,
    ) -> StrategyResult<Placement> {
        let zone = match (&self.zone, self.can_mount(equipment)) {
            (Some(zone), true) => zone.clone(),
            _ => {
                return Err(StrategyError::MountFailed(format!(
                    "设备 {} 无法安装到机架",
                    equipment.id
                )))
            }
        };

        let units = equipment.rack_units().filter(|u| *u > 0).unwrap_or(1);
        let start = match request.unit_index {
            Some(start) if self.is_range_free(start, units) => start,
            Some(start) => {
                return Err(StrategyError::NoCapacity(format!(
                    "U{} 起的 {}U 空间不可用",
                    u64::from(start) + 1,
                    units
                )))
            }
            None => self.first_free_range(units).ok_or_else(|| {
                StrategyError::NoCapacity(format!(
                    "机架没有连续 {}U 空间（剩余 {}U）",
                    units,
                    self.total_units.saturating_sub(self.used_units())
                ))
            })?,
        };

        self.slots.push(RackSlot {
            start,
            units,
            equipment_id: equipment.id.clone(),
        });

        Ok(Placement {
            equipment_id: equipment.id.clone(),
            mount_type: mount_types::RACK_UNIT.to_string(),
            zone,
            position: PlacementPosition::RackUnit {
                start_unit: start,
                units,
            },
        })
    }

    fn unmount(&mut self, equipment_id: &str) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.equipment_id != equipment_id);
        self.slots.len() != before
    }

    fn occupancy(&self) -> OccupancyStats {
        OccupancyStats::from_totals(
            f64::from(self.total_units),
            f64::from(self.used_units()),
            self.slots.len(),
        )
    }

    fn is_zone_full(&self, zone: &str) -> bool {
        self.zone.as_deref() == Some(zone) && self.first_free_range(1).is_none()
    }
}

// ==========================================
// MountingPlateStrategy - 安装板
// ==========================================
#[derive(Debug, Clone, PartialEq)]
struct PlateItem {
    component: String,
    equipment_id: String,
    x: f64,
    y: f64,
    area: f64,
}

#[derive(Debug, Clone)]
pub struct MountingPlateStrategy {
    plates: Vec<String>,
    /// 安装板尺寸取机柜宽 × 高（未知时不做边界检查）
    width_mm: Option<f64>,
    height_mm: Option<f64>,
    items: Vec<PlateItem>,
}

impl MountingPlateStrategy {
    pub fn new(cabinet: &CabinetType, _options: &StrategyOptions) -> StrategyResult<Self> {
        let plates = cabinet
            .mounting_zones(mount_types::MOUNTING_PLATE)
            .into_iter()
            .flat_map(|z| z.component_names.iter().cloned())
            .collect();
        Ok(Self {
            plates,
            width_mm: cabinet.dimensions.width,
            height_mm: cabinet.dimensions.height,
            items: Vec::new(),
        })
    }
}

impl MountingStrategy for MountingPlateStrategy {
    fn mount_type(&self) -> &str {
        mount_types::MOUNTING_PLATE
    }

    fn can_mount(&self, equipment: &EquipmentItem) -> bool {
        equipment_mount_type(equipment).as_deref() == Some(mount_types::MOUNTING_PLATE)
            && !self.plates.is_empty()
    }

    fn mount(
        &mut self,
        equipment: &EquipmentItem,
        request: &PlacementRequest,
    ) -> StrategyResult<Placement> {
        if !self.can_mount(equipment) {
            return Err(StrategyError::MountFailed(format!(
                "设备 {} 无法安装到安装板",
                equipment.id
            )));
        }

        let x = request.x.unwrap_or(0.0);
        let y = request.y.unwrap_or(0.0);
        let dims = equipment.dimensions.clone().unwrap_or_default();
        let w = dims.width.unwrap_or(0.0);
        let h = dims.height.unwrap_or(0.0);

        let out_of_bounds = x < 0.0
            || y < 0.0
            || self.width_mm.map_or(false, |max| x + w > max)
            || self.height_mm.map_or(false, |max| y + h > max);
        if out_of_bounds {
            return Err(StrategyError::MountFailed(format!(
                "设备 {} 超出安装板范围 ({:.0}, {:.0})",
                equipment.id, x, y
            )));
        }

        let names = self.plates.clone();
        let component = zone_search_order(&names, &[request.zone.as_deref()])
            .first()
            .map(|idx| names[*idx].clone())
            .unwrap_or_default();

        self.items.push(PlateItem {
            component: component.clone(),
            equipment_id: equipment.id.clone(),
            x,
            y,
            area: w * h,
        });

        Ok(Placement {
            equipment_id: equipment.id.clone(),
            mount_type: mount_types::MOUNTING_PLATE.to_string(),
            zone: component,
            position: PlacementPosition::Plate { x_mm: x, y_mm: y },
        })
    }

    fn unmount(&mut self, equipment_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.equipment_id != equipment_id);
        self.items.len() != before
    }

    /// 按面积统计（mm²）
    fn occupancy(&self) -> OccupancyStats {
        let capacity = match (self.width_mm, self.height_mm) {
            (Some(w), Some(h)) => w * h * self.plates.len() as f64,
            _ => 0.0,
        };
        let occupied = self.items.iter().map(|i| i.area).sum();
        OccupancyStats::from_totals(capacity, occupied, self.items.len())
    }
}

impl MountingPlateStrategy {
    /// 指定安装板上的设备 (id, x, y)
    pub fn items_on(&self, component: &str) -> Vec<(&str, f64, f64)> {
        self.items
            .iter()
            .filter(|i| i.component == component)
            .map(|i| (i.equipment_id.as_str(), i.x, i.y))
            .collect()
    }
}
