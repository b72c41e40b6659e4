// ==========================================
// 轮班排班系统 - 引擎错误类型
// ==========================================
// AttemptFailure: 单次尝试失败，由自动调整控制器吸收
// EngineError: 唯一跨越引擎边界的错误
// ==========================================

use crate::domain::types::ShiftKind;
use crate::engine::auto_adjust::FailedReport;
use crate::engine::cycle_check::Violation;
use crate::engine::hours::HoursReject;
use chrono::NaiveDate;
use thiserror::Error;

/// 某日无可行安排的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InfeasibleCause {
    #[error("{kind} 可用人数 {eligible} 低于最少人数 {required}")]
    Understaffed {
        kind: ShiftKind,
        eligible: usize,
        required: usize,
    },

    #[error("{person} 已连续休息 {off_run} 天（上限 {max_days_off}），当天却无法安排上班")]
    RestOverrun {
        person: String,
        off_run: u32,
        max_days_off: u32,
    },
}

/// 单次尝试失败
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    #[error("{cycle_weeks} 周周期在 {date} 班组 '{group}' 无可行安排: {cause}")]
    InfeasibleDay {
        cycle_weeks: u32,
        date: NaiveDate,
        group: String,
        cause: InfeasibleCause,
    },

    #[error("{cycle_weeks} 周周期首尾衔接不满足约束: {violation}")]
    ClosureViolation {
        cycle_weeks: u32,
        violation: Violation,
    },

    #[error("工时不满足目标: {0}")]
    Hours(#[from] HoursReject),

    #[error("起始周期 {cycle_weeks} 周超过上限 {ceiling} 周")]
    CeilingExceeded { cycle_weeks: u32, ceiling: u32 },
}

/// 引擎错误
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("配置无效: {0}")]
    Configuration(String),

    #[error("{0}")]
    ExhaustedCeiling(FailedReport),
}

pub type EngineResult<T> = Result<T, EngineError>;
