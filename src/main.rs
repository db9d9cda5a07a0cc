// ==========================================
// 机柜配置器 - 命令行演示入口
// ==========================================
// 流程: 向导选择 -> 组装机柜 -> 校验并安装设备 -> 输出报告与占用
// 环境变量:
//   CABINET_DB_PATH   本地存储路径（默认用户数据目录）
//   CABINET_LOG_JSON  非空时输出 JSON 行日志
// ==========================================

use std::sync::Arc;

use anyhow::{anyhow, Context};
use cabinet_configurator::catalog::source::{CatalogSource, StaticCatalogSource};
use cabinet_configurator::strategy::mounting::PlacementRequest;
use cabinet_configurator::{db, logging, AppState, ConfiguratorConfig, APP_NAME, VERSION};

const DEMO_CATALOG: &str = include_str!("../demos/catalog.json");
const DEMO_WIZARD: &str = include_str!("../demos/wizard.json");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("CABINET_LOG_JSON").map(|v| !v.is_empty()).unwrap_or(false) {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::var("CABINET_DB_PATH").unwrap_or_else(|_| db::get_default_db_path());
    tracing::info!("使用本地存储: {}", db_path);

    let demo_catalog: Arc<dyn CatalogSource> =
        Arc::new(StaticCatalogSource::from_json(DEMO_CATALOG).context("内置目录解析失败")?);
    let state = AppState::open(db_path, Some(demo_catalog))
        .await
        .context("无法初始化AppState")?;

    // ==========================================
    // 向导
    // ==========================================
    let wizard = ConfiguratorConfig::from_json(DEMO_WIZARD).context("内置向导定义无效")?;
    let mut configurator = state.open_configurator(wizard).await?;

    configurator.select_option("location", "outdoor")?;
    configurator.select_option("climate", "heater")?;
    configurator.select_option("size", "rack")?;
    for conflict in configurator.unresolved_conflicts() {
        println!("冲突: [{}] {}", conflict.id, conflict.message);
    }
    configurator.resolve_conflict("outdoor-rack", "use-small")?;
    configurator.save_draft()?;

    let params = configurator.get_params();
    println!("向导参数: {}", serde_json::to_string_pretty(&params)?);
    if !configurator.is_valid() {
        return Err(anyhow!("向导未完成"));
    }

    let cabinet_id = params
        .get("cabinetId")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("向导结果缺少 cabinetId"))?
        .to_string();

    // ==========================================
    // 设备安装
    // ==========================================
    let mut placement = state.placement_api(&cabinet_id).await?;
    println!(
        "机柜: {} ({:?})",
        placement.assembly().cabinet_type.name,
        placement.assembly().instance
    );

    for equipment_id in ["psu_24v_240w", "breaker_1p_16a", "breaker_1p_16a", "server_1u"] {
        let equipment = state
            .catalog_service
            .get_equipment_definition(equipment_id)
            .await
            .ok_or_else(|| anyhow!("设备不存在: {}", equipment_id))?;

        print!("{}", placement.report(&equipment));
        match placement.place(&equipment, &PlacementRequest::in_zone("din_rail_1")) {
            Ok(outcome) => println!(
                "已安装 {} -> {}: {}",
                equipment.name,
                outcome.placement.zone,
                serde_json::to_string(&outcome.placement.position)?
            ),
            Err(e) => println!("未安装 {}: {}", equipment.name, e),
        }
    }

    println!("占用统计:");
    for (mount_type, stats) in placement.occupancy() {
        println!(
            "  {}: {:.1}/{:.1} ({:.1}%)，{} 件",
            mount_type, stats.occupied, stats.capacity, stats.fill_percent, stats.items
        );
    }

    Ok(())
}
