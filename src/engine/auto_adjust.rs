// ==========================================
// 轮班排班系统 - 自动调整控制器
// ==========================================
// 职责: 沿松弛阶梯反复尝试，直到得到可接受周期或触及周数上限
// 状态机: Initial -> Relaxed* -> Accepted | Failed
// ==========================================
// 阶梯:
//   等级 0: 按配置原样
//   等级 1: 放弃软偏好（周三超配、周五夜班优先）
//   等级 2: 周期周数 += 基础周期，回到等级 0
// 顺序由 LadderOrder 决定；无软偏好时跳过等级 1
// 关闭自动调整: 只做一次等级 0 基础周期尝试
// ==========================================

use crate::domain::cycle::Cycle;
use crate::domain::roster::MAX_CYCLE_WEEKS;
use crate::domain::rules::Rules;
use crate::domain::shift_group::ShiftGroup;
use crate::domain::types::RelaxationLevel;
use crate::engine::error::{AttemptFailure, InfeasibleCause};
use crate::engine::hours::{HoursEvaluator, HoursReject};
use crate::engine::pattern::PatternBuilder;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

// ==========================================
// LadderOrder - 阶梯顺序策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LadderOrder {
    /// 同一周数下先放弃软偏好，再延长周期
    #[default]
    RelaxThenGrow,
    /// 先在等级 0 下延长到上限，再放弃软偏好从基础周期重来
    GrowThenRelax,
}

impl fmt::Display for LadderOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LadderOrder::RelaxThenGrow => write!(f, "relax-first"),
            LadderOrder::GrowThenRelax => write!(f, "grow-first"),
        }
    }
}

impl FromStr for LadderOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relax-first" | "relax_then_grow" => Ok(LadderOrder::RelaxThenGrow),
            "grow-first" | "grow_then_relax" => Ok(LadderOrder::GrowThenRelax),
            other => Err(format!("未知的阶梯顺序: {}（可选 relax-first / grow-first）", other)),
        }
    }
}

/// 调整策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustPolicy {
    pub order: LadderOrder,
    /// 周期周数上限，不会超过 MAX_CYCLE_WEEKS
    pub max_cycle_weeks: u32,
}

impl Default for AdjustPolicy {
    fn default() -> Self {
        Self {
            order: LadderOrder::default(),
            max_cycle_weeks: MAX_CYCLE_WEEKS,
        }
    }
}

impl AdjustPolicy {
    pub fn with_order(mut self, order: LadderOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_max_cycle_weeks(mut self, weeks: u32) -> Self {
        self.max_cycle_weeks = weeks.clamp(1, MAX_CYCLE_WEEKS);
        self
    }

    fn ceiling(&self) -> u32 {
        self.max_cycle_weeks.clamp(1, MAX_CYCLE_WEEKS)
    }
}

// ==========================================
// 状态机
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum AdjustState {
    Initial { cycle_weeks: u32 },
    Relaxed { level: RelaxationLevel, cycle_weeks: u32 },
    Accepted(Cycle),
    Failed(FailedReport),
}

/// 单次尝试记录
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub level: RelaxationLevel,
    pub cycle_weeks: u32,
    /// None 表示该次尝试被接受
    pub failure: Option<AttemptFailure>,
}

impl AttemptRecord {
    pub fn accepted(&self) -> bool {
        self.failure.is_none()
    }
}

/// 阶梯耗尽后的诊断
#[derive(Debug, Clone, PartialEq)]
pub struct FailedReport {
    pub last_level: RelaxationLevel,
    pub cycle_weeks: u32,
    pub reason: AttemptFailure,
    pub attempts: usize,
    pub auto_adjust: bool,
}

impl fmt::Display for FailedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "未找到可行周期（共尝试 {} 次，最后一次 {} 周 / 等级 {}）: {}",
            self.attempts, self.cycle_weeks, self.last_level, self.reason
        )
    }
}

impl FailedReport {
    /// 可操作的调整建议
    pub fn hints(&self) -> Vec<String> {
        let mut hints: Vec<String> = Vec::new();
        match &self.reason {
            AttemptFailure::InfeasibleDay { group, cause, .. } => match cause {
                InfeasibleCause::Understaffed { kind, .. } => {
                    hints.push(format!("为班组 '{}' 增加人员，或降低 {} 最少在岗人数", group, kind));
                    hints.push("提高 max_shifts_in_row".to_string());
                    hints.push("降低 min_days_off 或 min_days_off_after_night_streak".to_string());
                }
                InfeasibleCause::RestOverrun { .. } => {
                    hints.push(format!("放宽班组 '{}' 的最多在岗人数", group));
                    hints.push("提高 max_days_off".to_string());
                }
            },
            AttemptFailure::ClosureViolation { .. } => {
                hints.push("降低 min_days_off 或 min_days_off_after_night_streak".to_string());
                hints.push("提高 max_days_off 或 max_shifts_in_row".to_string());
                hints.push("关闭 no_day_after_night".to_string());
            }
            AttemptFailure::CeilingExceeded { .. } => {
                hints.push("减小显式周期周数或 pattern_weeks，或提高周期周数上限".to_string());
            }
            AttemptFailure::Hours(reject) => match reject {
                HoursReject::BelowMin { .. } | HoursReject::AboveMax { .. } => {
                    hints.push("放宽 target_weekly_hours_min / target_weekly_hours_max".to_string());
                    hints.push("调整班次时长或在岗人数".to_string());
                }
                HoursReject::Unequal { .. } => {
                    hints.push("关闭 require_equal_hours".to_string());
                    hints.push("调整班组人数使班次可被均分".to_string());
                }
            },
        }
        if !self.auto_adjust {
            hints.push("开启 enable_auto_adjust 以允许放弃软偏好与延长周期".to_string());
        }
        hints
    }
}

/// 控制器运行结果
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustReport {
    pub outcome: Result<Cycle, FailedReport>,
    pub attempts: Vec<AttemptRecord>,
}

impl AdjustReport {
    pub fn is_accepted(&self) -> bool {
        self.outcome.is_ok()
    }
}

// ==========================================
// CycleAttempt - 单次尝试接口
// ==========================================
pub trait CycleAttempt {
    fn attempt(&self, level: RelaxationLevel, cycle_weeks: u32) -> Result<Cycle, AttemptFailure>;
}

/// 构建 + 工时判定
pub struct PatternSearch<'a> {
    groups: &'a [ShiftGroup],
    rules: &'a Rules,
    start: NaiveDate,
}

impl<'a> PatternSearch<'a> {
    pub fn new(groups: &'a [ShiftGroup], rules: &'a Rules, start: NaiveDate) -> Self {
        Self {
            groups,
            rules,
            start,
        }
    }
}

impl CycleAttempt for PatternSearch<'_> {
    fn attempt(&self, level: RelaxationLevel, cycle_weeks: u32) -> Result<Cycle, AttemptFailure> {
        let cycle = PatternBuilder::new(self.groups, self.rules, self.start).build(level, cycle_weeks)?;
        HoursEvaluator::new(self.groups, self.rules).evaluate(&cycle)?;
        Ok(cycle)
    }
}

// ==========================================
// AutoAdjustController - 自动调整控制器
// ==========================================
pub struct AutoAdjustController<A: CycleAttempt> {
    attempt: A,
    policy: AdjustPolicy,
    base_weeks: u32,
    initial_weeks: u32,
    soft_preferences: bool,
    enabled: bool,
}

impl<A: CycleAttempt> AutoAdjustController<A> {
    /// # 参数
    /// - `base_weeks`: 基础周期（各班组 pattern_weeks 的最小公倍数）
    pub fn new(attempt: A, base_weeks: u32) -> Self {
        let base_weeks = base_weeks.max(1);
        Self {
            attempt,
            policy: AdjustPolicy::default(),
            base_weeks,
            initial_weeks: base_weeks,
            soft_preferences: false,
            enabled: true,
        }
    }

    pub fn with_policy(mut self, policy: AdjustPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 规则是否带有可放弃的软偏好（决定等级 1 是否有意义）
    pub fn with_soft_preferences(mut self, soft: bool) -> Self {
        self.soft_preferences = soft;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// 从显式周数开始（默认从基础周期开始）
    pub fn starting_at(mut self, weeks: u32) -> Self {
        self.initial_weeks = weeks.max(1);
        self
    }

    /// 失败后的下一步；None 表示阶梯耗尽
    fn next_step(&self, level: RelaxationLevel, weeks: u32) -> Option<(RelaxationLevel, u32)> {
        if !self.enabled {
            return None;
        }
        let can_relax = level == RelaxationLevel::L0 && self.soft_preferences;
        let grown = weeks + self.base_weeks;
        let can_grow = grown <= self.policy.ceiling();

        match self.policy.order {
            LadderOrder::RelaxThenGrow => {
                if can_relax {
                    Some((RelaxationLevel::L1, weeks))
                } else if can_grow {
                    Some((RelaxationLevel::L0, grown))
                } else {
                    None
                }
            }
            LadderOrder::GrowThenRelax => {
                if can_grow {
                    Some((level, grown))
                } else if can_relax {
                    Some((RelaxationLevel::L1, self.initial_weeks))
                } else {
                    None
                }
            }
        }
    }

    /// 运行状态机直到终态
    ///
    /// 起始周数已超过上限时不做任何尝试，直接失败
    pub fn run(&self) -> AdjustReport {
        let ceiling = self.policy.ceiling();
        if self.initial_weeks > ceiling {
            warn!(initial_weeks = self.initial_weeks, ceiling, "起始周期超过上限");
            return AdjustReport {
                outcome: Err(FailedReport {
                    last_level: RelaxationLevel::L0,
                    cycle_weeks: self.initial_weeks,
                    reason: AttemptFailure::CeilingExceeded {
                        cycle_weeks: self.initial_weeks,
                        ceiling,
                    },
                    attempts: 0,
                    auto_adjust: self.enabled,
                }),
                attempts: Vec::new(),
            };
        }

        let mut attempts = Vec::new();
        let mut state = AdjustState::Initial {
            cycle_weeks: self.initial_weeks,
        };

        info!(
            base_weeks = self.base_weeks,
            initial_weeks = self.initial_weeks,
            ceiling,
            order = %self.policy.order,
            auto_adjust = self.enabled,
            "开始搜索可行周期"
        );

        loop {
            let (level, cycle_weeks) = match state {
                AdjustState::Initial { cycle_weeks } => (RelaxationLevel::L0, cycle_weeks),
                AdjustState::Relaxed { level, cycle_weeks } => (level, cycle_weeks),
                AdjustState::Accepted(cycle) => {
                    return AdjustReport {
                        outcome: Ok(cycle),
                        attempts,
                    }
                }
                AdjustState::Failed(report) => {
                    return AdjustReport {
                        outcome: Err(report),
                        attempts,
                    }
                }
            };

            state = match self.attempt.attempt(level, cycle_weeks) {
                Ok(cycle) => {
                    attempts.push(AttemptRecord {
                        level,
                        cycle_weeks,
                        failure: None,
                    });
                    info!(%level, cycle_weeks, attempts = attempts.len(), "找到可行周期");
                    AdjustState::Accepted(cycle)
                }
                Err(failure) => {
                    debug!(%level, cycle_weeks, reason = %failure, "尝试失败");
                    attempts.push(AttemptRecord {
                        level,
                        cycle_weeks,
                        failure: Some(failure.clone()),
                    });
                    match self.next_step(level, cycle_weeks) {
                        Some((level, cycle_weeks)) => AdjustState::Relaxed { level, cycle_weeks },
                        None => {
                            info!(%level, cycle_weeks, attempts = attempts.len(), "松弛阶梯耗尽");
                            AdjustState::Failed(FailedReport {
                                last_level: level,
                                cycle_weeks,
                                reason: failure,
                                attempts: attempts.len(),
                                auto_adjust: self.enabled,
                            })
                        }
                    }
                }
            };
        }
    }
}
