// ==========================================
// 机柜配置器 - 向导状态机
// ==========================================
// 职责: 选择记录、步骤可见性、冲突检测/解决、历史回退、草稿保存/恢复
// 重算顺序: 可见性 -> 冲突（含 auto 方案）-> 有效性，一次调用内原子完成
// 红线: 运行期错误一律无副作用拒绝；存储失败只记日志，不影响向导本身
// ==========================================

use crate::configurator::definition::{build_effective_steps, ConfiguratorConfig, InjectedStep};
use crate::configurator::error::{ConfiguratorError, ConfiguratorResult};
use crate::configurator::state::{ConfiguratorState, Draft, DRAFT_SCHEMA_VERSION};
use crate::domain::types::Params;
use crate::domain::wizard::{Conflict, ResolutionAction, ResolutionKind, Selection, Step};
use crate::repository::{LocalStore, RepositoryError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// Configurator - 向导会话
// ==========================================
// 单会话单所有者，不跨线程共享
pub struct Configurator {
    session_id: String,
    config: ConfiguratorConfig,
    /// 有效步骤 = 配置步骤 + 注入步骤
    steps: Vec<Step>,
    state: ConfiguratorState,
    store: Option<Arc<dyn LocalStore>>,
}

impl Configurator {
    /// 创建向导（不带本地存储）
    pub fn new(config: ConfiguratorConfig) -> ConfiguratorResult<Self> {
        Self::build(config, None)
    }

    /// 创建向导，草稿/状态写入指定本地存储
    pub fn with_store(
        config: ConfiguratorConfig,
        store: Arc<dyn LocalStore>,
    ) -> ConfiguratorResult<Self> {
        Self::build(config, Some(store))
    }

    /// 创建向导，若启用 restoreOnLoad 则尝试恢复上次持久化的状态
    ///
    /// 持久化状态缺失或不可用时退回全新状态
    pub fn restore_or_new(
        config: ConfiguratorConfig,
        store: Arc<dyn LocalStore>,
    ) -> ConfiguratorResult<Self> {
        let restore = config.storage.restore_on_load && config.storage.save_state;
        let mut configurator = Self::with_store(config, store)?;

        if restore {
            match configurator.restore_persisted_state() {
                Ok(true) => info!(session = %configurator.session_id, "已恢复上次的向导状态"),
                Ok(false) => debug!("没有可恢复的向导状态"),
                Err(e) => warn!(error = %e, "恢复向导状态失败，使用全新状态"),
            }
        }

        Ok(configurator)
    }

    fn build(
        config: ConfiguratorConfig,
        store: Option<Arc<dyn LocalStore>>,
    ) -> ConfiguratorResult<Self> {
        config.validate()?;

        let mut configurator = Self {
            session_id: Uuid::new_v4().to_string(),
            steps: config.steps.clone(),
            config,
            state: ConfiguratorState::default(),
            store,
        };
        configurator.recompute();

        info!(
            session = %configurator.session_id,
            steps = configurator.steps.len(),
            "向导已创建"
        );
        Ok(configurator)
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &ConfiguratorConfig {
        &self.config
    }

    pub fn state(&self) -> &ConfiguratorState {
        &self.state
    }

    /// 有效步骤列表（含注入步骤）
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn visible_steps(&self) -> Vec<&Step> {
        self.steps.iter().filter(|s| self.is_visible(&s.id)).collect()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.state.current_step)
    }

    pub fn selection(&self, step_id: &str) -> Option<&Selection> {
        self.state.selections.get(step_id)
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_valid
    }

    pub fn is_visible(&self, step_id: &str) -> bool {
        self.state.visible_steps.iter().any(|id| id == step_id)
    }

    pub fn unresolved_conflicts(&self) -> Vec<&Conflict> {
        self.state.unresolved_conflicts().collect()
    }

    /// 当前可以直接跳转到的最远步骤下标
    ///
    /// 即第一个未选择的可见必选步骤；全部完成时为最后一个可见步骤
    pub fn furthest_reachable_step(&self) -> usize {
        let mut last_visible = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if !self.is_visible(&step.id) {
                continue;
            }
            last_visible = index;
            if step.required && !self.state.selections.contains_key(&step.id) {
                return index;
            }
        }
        last_visible
    }

    /// 合并所有可见步骤的选择参数（按步骤顺序，后者覆盖前者）
    pub fn get_params(&self) -> Params {
        let mut params = Params::new();
        for step in &self.steps {
            if let Some(selection) = self.state.selections.get(&step.id) {
                for (key, value) in &selection.params {
                    params.insert(key.clone(), value.clone());
                }
            }
        }
        params
    }

    // ==========================================
    // 选择
    // ==========================================

    /// 选择某一步的选项
    ///
    /// # 行为
    /// 1. 值变化时清空依赖该步骤的下游选择
    /// 2. 重算可见性、冲突、有效性
    /// 3. 当前步骤前进到所选步骤之后第一个未选择的可见步骤
    ///
    /// # 错误
    /// - Selection: 步骤不存在 / 不可见 / 选项不存在（状态不变）
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub fn select_option(&mut self, step_id: &str, value: &str) -> ConfiguratorResult<()> {
        let index = self
            .index_of(step_id)
            .ok_or_else(|| ConfiguratorError::selection(step_id, "步骤不存在"))?;
        if !self.is_visible(step_id) {
            return Err(ConfiguratorError::selection(step_id, "步骤当前不可见"));
        }

        let step = &self.steps[index];
        let selection = step
            .find_option(value)
            .ok_or_else(|| {
                ConfiguratorError::selection(
                    step_id,
                    format!("选项不存在: {}，可选值: {:?}", value, step.option_values()),
                )
            })?
            .to_selection();

        let previous = self.state.selections.insert(step_id.to_string(), selection);
        if previous.map(|p| p.value != value).unwrap_or(false) {
            self.clear_dependents(step_id);
        }

        self.recompute();
        // auto 方案可能注入步骤，下标需重新定位
        let index = self.index_of(step_id).unwrap_or(index);
        self.advance_from(index);
        self.after_mutation();

        debug!(
            valid = self.state.is_valid,
            current_step = self.state.current_step,
            conflicts = self.state.conflicts.len(),
            "选择已记录"
        );
        Ok(())
    }

    /// 清除某一步的选择，依赖该步骤的下游选择一并清除
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub fn clear_selection(&mut self, step_id: &str) -> ConfiguratorResult<()> {
        if self.index_of(step_id).is_none() {
            return Err(ConfiguratorError::selection(step_id, "步骤不存在"));
        }
        if self.state.selections.remove(step_id).is_none() {
            return Ok(());
        }

        self.clear_dependents(step_id);
        self.recompute();
        self.after_mutation();
        Ok(())
    }

    // ==========================================
    // 导航
    // ==========================================

    /// 跳转到指定步骤
    ///
    /// 只允许跳到可见步骤，且不超过当前可达的最远步骤
    pub fn go_to_step(&mut self, index: usize) -> ConfiguratorResult<()> {
        let step = self.steps.get(index).ok_or_else(|| {
            ConfiguratorError::InvalidNavigation(format!(
                "步骤下标越界: {} (共 {} 步)",
                index,
                self.steps.len()
            ))
        })?;
        if !self.is_visible(&step.id) {
            return Err(ConfiguratorError::InvalidNavigation(format!(
                "步骤不可见: {}",
                step.id
            )));
        }

        let furthest = self.furthest_reachable_step();
        if index > furthest {
            return Err(ConfiguratorError::InvalidNavigation(format!(
                "步骤 {} 尚不可达（当前最远可达步骤: {}）",
                index, furthest
            )));
        }

        if index == self.state.current_step {
            return Ok(());
        }

        self.state.history.push(self.state.current_step);
        self.state.current_step = index;
        self.after_mutation();
        Ok(())
    }

    /// 回退到上一个访问过的步骤，返回回退后的步骤下标
    ///
    /// 已隐藏的历史步骤被跳过；clearFutureOnBack 开启时清空其后步骤的选择
    pub fn go_back(&mut self) -> ConfiguratorResult<usize> {
        if !self.config.navigation.allow_back_navigation {
            return Err(ConfiguratorError::InvalidNavigation(
                "当前向导不允许回退".to_string(),
            ));
        }

        let position = self
            .state
            .history
            .iter()
            .rposition(|&i| self.steps.get(i).map(|s| self.is_visible(&s.id)).unwrap_or(false))
            .ok_or_else(|| ConfiguratorError::InvalidNavigation("没有可回退的历史步骤".to_string()))?;

        let restored = self.state.history[position];
        self.state.history.truncate(position);

        if self.config.navigation.clear_future_on_back {
            let future: Vec<String> = self.steps[restored + 1..].iter().map(|s| s.id.clone()).collect();
            for step_id in future {
                self.state.selections.remove(&step_id);
            }
        }

        self.state.current_step = restored;
        self.recompute();
        self.after_mutation();
        Ok(self.state.current_step)
    }

    // ==========================================
    // 冲突处理
    // ==========================================

    /// 应用冲突的某个解决方案
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub fn resolve_conflict(&mut self, conflict_id: &str, option_id: &str) -> ConfiguratorResult<()> {
        let conflict = self
            .state
            .conflicts
            .iter()
            .find(|c| c.id == conflict_id)
            .ok_or_else(|| ConfiguratorError::ConflictNotFound(conflict_id.to_string()))?;
        let action = conflict
            .find_option(option_id)
            .map(|o| o.action.clone())
            .ok_or_else(|| ConfiguratorError::ResolutionNotFound {
                conflict_id: conflict_id.to_string(),
                option_id: option_id.to_string(),
            })?;

        self.apply_action(conflict_id, &action)?;
        self.recompute();
        self.after_mutation();

        info!(conflict_id, option_id, "冲突方案已应用");
        Ok(())
    }

    /// 用户确认 warning 级冲突（不再视为未解决）
    pub fn acknowledge_conflict(&mut self, conflict_id: &str) -> ConfiguratorResult<()> {
        let conflict = self
            .state
            .conflicts
            .iter()
            .find(|c| c.id == conflict_id)
            .ok_or_else(|| ConfiguratorError::ConflictNotFound(conflict_id.to_string()))?;
        if conflict.is_error() {
            return Err(ConfiguratorError::ConflictNotAcknowledgeable(conflict_id.to_string()));
        }

        self.state.resolved_conflicts.insert(conflict_id.to_string());
        self.state.is_valid = self.compute_validity();
        self.after_mutation();
        Ok(())
    }

    // ==========================================
    // 重置
    // ==========================================

    /// 回到初始状态（注入步骤一并移除），并删除已持久化的状态
    pub fn reset(&mut self) -> ConfiguratorResult<()> {
        self.steps = self.config.steps.clone();
        self.state = ConfiguratorState::default();
        self.recompute();

        if let Some(store) = &self.store {
            if self.config.storage.save_state {
                store.remove(&self.config.storage.state_key)?;
            }
        }

        info!(session = %self.session_id, "向导已重置");
        Ok(())
    }

    // ==========================================
    // 草稿
    // ==========================================

    /// 保存草稿，有本地存储时同时写入存储
    pub fn save_draft(&mut self) -> ConfiguratorResult<Draft> {
        if !self.config.storage.draft.enabled {
            return Err(ConfiguratorError::DraftDisabled);
        }

        let draft = Draft::from_state(&self.state, chrono::Utc::now().timestamp_millis());
        if let Some(store) = &self.store {
            let json = serde_json::to_string(&draft).map_err(RepositoryError::from)?;
            store.save(&self.config.storage.draft.storage_key, &json)?;
        }

        self.state.draft_saved = true;
        self.state.last_saved_at = Some(draft.saved_at);
        if let Err(e) = self.persist_state() {
            warn!(error = %e, "向导状态持久化失败（忽略）");
        }

        debug!(saved_at = draft.saved_at, "草稿已保存");
        Ok(draft)
    }

    /// 从本地存储恢复草稿
    ///
    /// 不兼容的草稿会被丢弃（从存储中删除），当前状态不变
    pub fn restore_draft(&mut self) -> ConfiguratorResult<()> {
        let key = self.config.storage.draft.storage_key.clone();
        let store = self
            .store
            .clone()
            .ok_or_else(|| ConfiguratorError::DraftNotFound(key.clone()))?;
        let raw = store
            .load(&key)?
            .ok_or_else(|| ConfiguratorError::DraftNotFound(key.clone()))?;

        let result = serde_json::from_str::<Draft>(&raw)
            .map_err(|e| ConfiguratorError::incompatible(format!("草稿无法解析: {}", e)))
            .and_then(|draft| self.restore_from_draft(draft));

        if let Err(e) = &result {
            if matches!(e, ConfiguratorError::DraftIncompatible { .. }) {
                warn!(error = %e, key = %key, "丢弃不兼容的草稿");
                if let Err(remove_err) = store.remove(&key) {
                    warn!(error = %remove_err, "删除不兼容草稿失败");
                }
            }
        }
        result
    }

    /// 从草稿对象恢复
    ///
    /// 先完整校验（版本、步骤、选项、下标），通过后整体应用
    pub fn restore_from_draft(&mut self, draft: Draft) -> ConfiguratorResult<()> {
        if !draft.is_compatible() {
            return Err(ConfiguratorError::incompatible(format!(
                "版本不匹配: 期望 {}，实际 {}",
                DRAFT_SCHEMA_VERSION, draft.version
            )));
        }

        let steps = self
            .check_snapshot(&draft.injected_steps, &draft.selections, draft.current_step)
            .map_err(ConfiguratorError::incompatible)?;

        self.steps = steps;
        self.state = ConfiguratorState {
            current_step: draft.current_step,
            selections: draft.selections,
            conflicts: draft.conflicts,
            resolved_conflicts: draft.resolved_conflicts,
            injected_steps: draft.injected_steps,
            draft_saved: true,
            last_saved_at: Some(draft.saved_at),
            ..Default::default()
        };
        self.recompute();

        if let Err(e) = self.persist_state() {
            warn!(error = %e, "向导状态持久化失败（忽略）");
        }
        info!(session = %self.session_id, saved_at = draft.saved_at, "草稿已恢复");
        Ok(())
    }

    // ==========================================
    // 状态持久化
    // ==========================================

    /// 持久化完整状态（saveState 关闭或无存储时不写入），返回是否写入
    pub fn persist_state(&self) -> ConfiguratorResult<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        if !self.config.storage.save_state {
            return Ok(false);
        }

        let json = serde_json::to_string(&self.state).map_err(RepositoryError::from)?;
        store.save(&self.config.storage.state_key, &json)?;
        Ok(true)
    }

    /// 恢复已持久化的状态，返回是否恢复
    ///
    /// 与当前向导定义不一致的状态被删除并忽略
    pub fn restore_persisted_state(&mut self) -> ConfiguratorResult<bool> {
        let Some(store) = self.store.clone() else {
            return Ok(false);
        };
        let key = self.config.storage.state_key.clone();
        let Some(raw) = store.load(&key)? else {
            return Ok(false);
        };

        let checked = serde_json::from_str::<ConfiguratorState>(&raw)
            .map_err(|e| format!("状态无法解析: {}", e))
            .and_then(|saved| {
                self.check_snapshot(&saved.injected_steps, &saved.selections, saved.current_step)
                    .map(|steps| (saved, steps))
            });

        match checked {
            Ok((saved, steps)) => {
                self.steps = steps;
                self.state = ConfiguratorState {
                    current_step: saved.current_step,
                    selections: saved.selections,
                    history: saved.history,
                    conflicts: saved.conflicts,
                    resolved_conflicts: saved.resolved_conflicts,
                    injected_steps: saved.injected_steps,
                    draft_saved: saved.draft_saved,
                    last_saved_at: saved.last_saved_at,
                    ..Default::default()
                };
                self.state.history.retain(|&i| i < self.steps.len());
                self.recompute();
                Ok(true)
            }
            Err(reason) => {
                warn!(%reason, key = %key, "持久化状态与向导定义不一致，已丢弃");
                store.remove(&key)?;
                Ok(false)
            }
        }
    }

    // ==========================================
    // 内部: 重算
    // ==========================================

    /// 可见性 -> 冲突（含 auto 方案，有次数上限）-> 有效性
    fn recompute(&mut self) {
        let settings = self.config.conflicts;
        let mut auto_applied: BTreeSet<String> = BTreeSet::new();

        loop {
            self.recompute_visibility();
            self.recompute_conflicts();

            if !settings.auto_resolve {
                break;
            }
            let Some((conflict_id, action)) = self.next_auto_resolution(&auto_applied) else {
                break;
            };
            if auto_applied.len() >= settings.max_auto_passes {
                warn!(
                    conflict_id = %conflict_id,
                    passes = auto_applied.len(),
                    "auto 冲突方案达到应用上限，停止自动解决"
                );
                break;
            }

            auto_applied.insert(conflict_id.clone());
            match self.apply_action(&conflict_id, &action) {
                Ok(()) => debug!(conflict_id = %conflict_id, "auto 冲突方案已应用"),
                Err(e) => warn!(conflict_id = %conflict_id, error = %e, "auto 冲突方案应用失败"),
            }
        }

        self.clamp_current_step();
        self.state.is_valid = self.compute_validity();
    }

    /// 按步骤顺序计算可见性，隐藏步骤的选择被清除
    fn recompute_visibility(&mut self) {
        let mut visible = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let shown = match &step.show_when {
                None => true,
                Some(show_when) => show_when.is_satisfied_by(self.state.selections.get(&show_when.step)),
            };
            if shown {
                visible.push(step.id.clone());
            } else if self.state.selections.remove(&step.id).is_some() {
                debug!(step_id = %step.id, "步骤被隐藏，选择已清除");
            }
        }
        self.state.visible_steps = visible;
    }

    /// 重新评估全部冲突规则
    ///
    /// 仍成立的冲突保持原顺序，新触发的追加在后（按 id 去重）
    fn recompute_conflicts(&mut self) {
        let mut triggered: Vec<Conflict> = Vec::new();
        for step in &self.steps {
            for rule in &step.conflict_rules {
                if rule.is_triggered(&self.state.selections)
                    && !triggered.iter().any(|c| c.id == rule.conflict.id)
                {
                    triggered.push(rule.conflict.clone());
                }
            }
        }

        let mut next: Vec<Conflict> = Vec::with_capacity(triggered.len());
        for existing in &self.state.conflicts {
            if let Some(current) = triggered.iter().find(|c| c.id == existing.id) {
                next.push(current.clone());
            }
        }
        for conflict in triggered {
            if !next.iter().any(|c| c.id == conflict.id) {
                info!(conflict_id = %conflict.id, severity = %conflict.severity, "检测到冲突");
                next.push(conflict);
            }
        }

        self.state
            .resolved_conflicts
            .retain(|id| next.iter().any(|c| &c.id == id));
        self.state.conflicts = next;
    }

    fn next_auto_resolution(
        &self,
        auto_applied: &BTreeSet<String>,
    ) -> Option<(String, ResolutionAction)> {
        self.state.unresolved_conflicts().find_map(|conflict| {
            let resolution = conflict.resolution.as_ref()?;
            if resolution.kind != ResolutionKind::Auto || auto_applied.contains(&conflict.id) {
                return None;
            }
            let option = resolution.options.first()?;
            Some((conflict.id.clone(), option.action.clone()))
        })
    }

    /// 应用方案动作并标记冲突已解决
    ///
    /// 动作先整体校验再修改状态，失败时状态不变
    fn apply_action(&mut self, conflict_id: &str, action: &ResolutionAction) -> ConfiguratorResult<()> {
        match action {
            ResolutionAction::ModifySelection { modifications } => {
                let mut resolved: BTreeMap<String, Selection> = BTreeMap::new();
                for (step_id, requested) in modifications {
                    let step = self
                        .find_step(step_id)
                        .ok_or_else(|| ConfiguratorError::selection(step_id, "修改的步骤不存在"))?;
                    let option = step.find_option(&requested.value).ok_or_else(|| {
                        ConfiguratorError::selection(step_id, format!("修改的选项不存在: {}", requested.value))
                    })?;

                    let mut selection = option.to_selection();
                    if !requested.label.is_empty() {
                        selection.label = requested.label.clone();
                    }
                    if !requested.params.is_empty() {
                        selection.params = requested.params.clone();
                    }
                    resolved.insert(step_id.clone(), selection);
                }

                let changed: Vec<String> = resolved
                    .iter()
                    .filter(|(step_id, sel)| {
                        self.state
                            .selections
                            .get(*step_id)
                            .map(|prev| prev.value != sel.value)
                            .unwrap_or(false)
                    })
                    .map(|(step_id, _)| step_id.clone())
                    .collect();
                for step_id in &changed {
                    self.clear_dependents(step_id);
                }
                self.state.selections.extend(resolved);
            }
            ResolutionAction::AddStep { new_step, after } => {
                if self.index_of(&new_step.id).is_none() {
                    let mut injected = self.state.injected_steps.clone();
                    injected.push(InjectedStep {
                        step: (**new_step).clone(),
                        after: after.clone(),
                    });
                    let steps = build_effective_steps(&self.config.steps, &injected)?;

                    if let Some(position) = steps.iter().position(|s| s.id == new_step.id) {
                        if self.state.current_step >= position {
                            self.state.current_step += 1;
                        }
                        for index in self.state.history.iter_mut() {
                            if *index >= position {
                                *index += 1;
                            }
                        }
                    }

                    self.steps = steps;
                    self.state.injected_steps = injected;
                    info!(step_id = %new_step.id, "已注入步骤");
                }
            }
            ResolutionAction::Recompute => {}
        }

        self.state.resolved_conflicts.insert(conflict_id.to_string());
        Ok(())
    }

    fn compute_validity(&self) -> bool {
        let required_done = self
            .steps
            .iter()
            .filter(|s| s.required && self.is_visible(&s.id))
            .all(|s| self.state.selections.contains_key(&s.id));
        required_done && !self.state.has_blocking_conflict()
    }

    /// 当前步骤被隐藏时，移到其后第一个可见步骤，没有则移到其前最近的可见步骤
    fn clamp_current_step(&mut self) {
        let last = self.steps.len().saturating_sub(1);
        let index = self.state.current_step.min(last);
        let visible_at = |i: usize| self.steps.get(i).map(|s| self.is_visible(&s.id)).unwrap_or(false);

        let target = if visible_at(index) {
            index
        } else {
            (index..self.steps.len())
                .find(|&i| visible_at(i))
                .or_else(|| (0..index).rev().find(|&i| visible_at(i)))
                .unwrap_or(0)
        };
        self.state.current_step = target;
    }

    /// 前进到 index 之后第一个未选择的可见步骤
    fn advance_from(&mut self, index: usize) {
        let next = (index + 1..self.steps.len()).find(|&i| {
            let step = &self.steps[i];
            self.is_visible(&step.id) && !self.state.selections.contains_key(&step.id)
        });

        if let Some(next) = next {
            if next != self.state.current_step {
                self.state.history.push(self.state.current_step);
                self.state.current_step = next;
            }
        }
    }

    /// 清除（传递）依赖 step_id 的下游步骤的选择
    fn clear_dependents(&mut self, step_id: &str) {
        let mut roots: Vec<&str> = vec![step_id];
        let mut dependents: Vec<String> = Vec::new();
        for step in &self.steps {
            if let Some(show_when) = &step.show_when {
                if roots.contains(&show_when.step.as_str()) {
                    roots.push(step.id.as_str());
                    dependents.push(step.id.clone());
                }
            }
        }

        for dependent in dependents {
            if self.state.selections.remove(&dependent).is_some() {
                debug!(step_id = %dependent, upstream = %step_id, "下游选择已清除");
            }
        }
    }

    /// 快照（草稿 / 持久化状态）与当前向导定义的一致性校验
    fn check_snapshot(
        &self,
        injected: &[InjectedStep],
        selections: &BTreeMap<String, Selection>,
        current_step: usize,
    ) -> Result<Vec<Step>, String> {
        let steps = build_effective_steps(&self.config.steps, injected).map_err(|e| e.to_string())?;

        for (step_id, selection) in selections {
            let step = steps
                .iter()
                .find(|s| &s.id == step_id)
                .ok_or_else(|| format!("未知步骤: {}", step_id))?;
            if step.find_option(&selection.value).is_none() {
                return Err(format!("步骤 {} 不存在选项 {}", step_id, selection.value));
            }
        }
        if current_step >= steps.len() {
            return Err(format!("当前步骤下标越界: {}", current_step));
        }
        Ok(steps)
    }

    fn index_of(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    fn find_step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// 变更后的收尾：标记草稿过期、持久化状态、按需自动保存草稿（均为尽力而为）
    fn after_mutation(&mut self) {
        self.state.draft_saved = false;
        if let Err(e) = self.persist_state() {
            warn!(error = %e, "向导状态持久化失败（忽略）");
        }

        let draft = &self.config.storage.draft;
        if draft.enabled && draft.auto_save && self.store.is_some() {
            if let Err(e) = self.save_draft() {
                warn!(error = %e, "草稿自动保存失败（忽略）");
            }
        }
    }
}
