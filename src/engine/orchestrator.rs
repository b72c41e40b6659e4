// ==========================================
// 轮班排班系统 - 引擎编排器
// ==========================================
// 用途: 引擎边界。校验输入 -> 自动调整搜索 -> 工时汇总
// 红线: 引擎内无 I/O，输出要么完整要么失败
// ==========================================

use crate::domain::cycle::Cycle;
use crate::domain::roster::RosterInput;
use crate::engine::auto_adjust::{
    AdjustPolicy, AttemptRecord, AutoAdjustController, PatternSearch,
};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::hours::{HoursEvaluator, HoursReport};
use tracing::{info, warn};

// ==========================================
// RosterOutcome - 排班结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RosterOutcome {
    pub cycle: Cycle,
    pub hours: HoursReport,
    pub attempts: Vec<AttemptRecord>,
}

// ==========================================
// RosterOrchestrator - 引擎编排器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RosterOrchestrator {
    policy: AdjustPolicy,
}

impl RosterOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: AdjustPolicy) -> Self {
        Self { policy }
    }

    /// 生成可循环周期班表
    ///
    /// # 参数
    /// - input: 班组 + 规则 + 起始日期 + 可选周期周数
    ///
    /// # 返回
    /// - `Ok(RosterOutcome)`: 被接受的周期及工时汇总
    /// - `Err(EngineError::Configuration)`: 输入未通过校验
    /// - `Err(EngineError::ExhaustedCeiling)`: 松弛阶梯耗尽
    pub fn run(&self, input: &RosterInput) -> EngineResult<RosterOutcome> {
        input.validate().map_err(EngineError::Configuration)?;
        if input.initial_weeks() > self.policy.max_cycle_weeks {
            return Err(EngineError::Configuration(format!(
                "起始周期 {} 周超过周期周数上限 {} 周",
                input.initial_weeks(),
                self.policy.max_cycle_weeks
            )));
        }

        let base_weeks = input.base_cycle_weeks();
        let soft = input.rules.has_soft_preferences(input.any_group_overfills());
        info!(
            groups = input.groups.len(),
            persons = input.persons().count(),
            start_date = %input.start_date,
            base_weeks,
            soft_preferences = soft,
            "开始生成周期班表"
        );

        let search = PatternSearch::new(&input.groups, &input.rules, input.start_date);
        let report = AutoAdjustController::new(search, base_weeks)
            .with_policy(self.policy)
            .with_soft_preferences(soft)
            .enabled(input.rules.enable_auto_adjust)
            .starting_at(input.initial_weeks())
            .run();

        match report.outcome {
            Ok(cycle) => {
                let hours = HoursEvaluator::new(&input.groups, &input.rules).summarize(&cycle);
                info!(
                    cycle_weeks = cycle.cycle_weeks,
                    level = %cycle.level,
                    attempts = report.attempts.len(),
                    spread = hours.spread(),
                    "周期班表生成完成"
                );
                Ok(RosterOutcome {
                    cycle,
                    hours,
                    attempts: report.attempts,
                })
            }
            Err(failed) => {
                warn!(
                    cycle_weeks = failed.cycle_weeks,
                    level = %failed.last_level,
                    attempts = failed.attempts,
                    reason = %failed.reason,
                    "未找到可行周期"
                );
                Err(EngineError::ExhaustedCeiling(failed))
            }
        }
    }
}
