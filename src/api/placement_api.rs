// ==========================================
// 机柜配置器 - 设备安装 API
// ==========================================
// 职责: 校验 -> 拒绝 error -> 选择策略 -> 分配位置 -> 提交负载
// 红线: 校验有 error 时绝不调用策略；提交只发生在安装成功之后
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::equipment::EquipmentItem;
use crate::domain::types::normalize_key;
use crate::engine::validation::{ValidationContext, ValidationEngine, ValidationResult};
use crate::registry::cabinet_factory::CabinetAssembly;
use crate::strategy::mounting::{OccupancyStats, Placement, PlacementRequest};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// 已安装设备
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    pub equipment: EquipmentItem,
    pub placement: Placement,
}

/// 安装结果（附带本次校验的 warnings / info）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementOutcome {
    pub placement: Placement,
    pub validation: ValidationResult,
}

// ==========================================
// PlacementApi
// ==========================================
pub struct PlacementApi {
    engine: ValidationEngine,
    assembly: CabinetAssembly,
    context: ValidationContext,
    records: Vec<PlacementRecord>,
}

impl PlacementApi {
    pub fn new(engine: ValidationEngine, assembly: CabinetAssembly) -> Self {
        Self {
            engine,
            assembly,
            context: ValidationContext::new(),
            records: Vec::new(),
        }
    }

    pub fn assembly(&self) -> &CabinetAssembly {
        &self.assembly
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    pub fn placements(&self) -> &[PlacementRecord] {
        &self.records
    }

    /// 通用规则 + 机柜类专属检查
    pub fn check(&self, equipment: &EquipmentItem) -> ValidationResult {
        let cabinet = &self.assembly.cabinet_type;
        let mut result = self.engine.evaluate(cabinet, equipment, &self.context);
        result.merge(self.assembly.instance.validate_equipment(cabinet, equipment));
        result
    }

    /// 文本报告
    pub fn report(&self, equipment: &EquipmentItem) -> String {
        ValidationEngine::format_report(&self.check(equipment))
    }

    /// 安装设备
    #[instrument(skip_all, fields(cabinet = %self.assembly.cabinet_type.id, equipment = %equipment.id))]
    pub fn place(
        &mut self,
        equipment: &EquipmentItem,
        request: &PlacementRequest,
    ) -> ApiResult<PlacementOutcome> {
        if equipment.id.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备ID不能为空".to_string()));
        }
        if self.records.iter().any(|r| r.equipment.id == equipment.id) {
            return Err(ApiError::InvalidInput(format!("设备已安装: {}", equipment.id)));
        }

        let validation = self.check(equipment);
        if !validation.is_valid() {
            warn!(errors = validation.errors.len(), "校验未通过，拒绝安装");
            return Err(ApiError::rejected(&equipment.id, validation.errors));
        }

        let mount_type = equipment
            .mount_type()
            .map(normalize_key)
            .ok_or_else(|| {
                ApiError::InvalidInput(format!("设备未声明安装方式: {}", equipment.id))
            })?;
        let strategy = self
            .assembly
            .strategy_mut(&mount_type)
            .ok_or_else(|| ApiError::StrategyNotFound(mount_type.clone()))?;

        let placement = strategy.mount(equipment, request)?;

        self.context.commit(equipment);
        if strategy.is_zone_full(&placement.zone) {
            self.context.occupy_zone(&placement.zone);
        }
        self.records.push(PlacementRecord {
            equipment: equipment.clone(),
            placement: placement.clone(),
        });

        info!(
            mount_type = %mount_type,
            zone = %placement.zone,
            warnings = validation.warnings.len(),
            "设备已安装"
        );

        Ok(PlacementOutcome {
            placement,
            validation,
        })
    }

    /// 拆除设备并重建已提交负载
    pub fn remove(&mut self, equipment_id: &str) -> ApiResult<Placement> {
        let index = self
            .records
            .iter()
            .position(|r| r.equipment.id == equipment_id)
            .ok_or_else(|| ApiError::NotFound(format!("设备未安装: {}", equipment_id)))?;
        let record = self.records.remove(index);

        if let Some(strategy) = self.assembly.strategy_mut(&record.placement.mount_type) {
            strategy.unmount(equipment_id);
        }

        let mut context = ValidationContext::new();
        for r in &self.records {
            context.commit(&r.equipment);
            let full = self
                .assembly
                .strategies
                .get(&r.placement.mount_type)
                .is_some_and(|s| s.is_zone_full(&r.placement.zone));
            if full {
                context.occupy_zone(&r.placement.zone);
            }
        }
        self.context = context;

        info!(equipment = equipment_id, "设备已拆除");
        Ok(record.placement)
    }

    /// 各安装方式的占用统计
    pub fn occupancy(&self) -> BTreeMap<String, OccupancyStats> {
        self.assembly
            .strategies
            .iter()
            .map(|(key, strategy)| (key.clone(), strategy.occupancy()))
            .collect()
    }
}
