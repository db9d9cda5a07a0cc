// ==========================================
// 机柜配置器 - 领域层
// ==========================================
// 职责: 目录记录、向导定义与共享类型
// 红线: 领域层不做 IO，不打日志
// ==========================================

pub mod cabinet;
pub mod equipment;
pub mod types;
pub mod wizard;

pub use cabinet::{
    CabinetDefinition, CabinetSpecifications, CabinetType, ClimateSpec, CoolingSpec, Dimensions,
    MountingZone, ThermalSpec,
};
pub use equipment::{EquipmentItem, EquipmentSpecs, MountingSpec};
pub use types::{mount_types, normalize_key, CabinetCategory, ConflictSeverity, ConflictType, Params};
pub use wizard::{
    ConditionValue, Conflict, ConflictResolution, ConflictRule, ResolutionAction, ResolutionKind,
    ResolutionOption, Selection, ShowCondition, ShowWhen, Step, StepOption,
};
