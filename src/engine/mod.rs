// ==========================================
// 轮班排班系统 - 引擎层
// ==========================================
// 叶子优先: calendar / streak -> staffing -> pattern -> hours -> auto_adjust
// 职责: 生成满足硬约束、工时目标的可循环周期
// 红线: 引擎不做 I/O，所有失败都带原因
// ==========================================

pub mod auto_adjust;
pub mod calendar;
pub mod cycle_check;
pub mod error;
pub mod hours;
pub mod orchestrator;
pub mod pattern;
pub mod staffing;
pub mod streak;

// 重导出核心引擎
pub use auto_adjust::{
    AdjustPolicy, AdjustReport, AdjustState, AttemptRecord, AutoAdjustController, CycleAttempt,
    FailedReport, LadderOrder, PatternSearch,
};
pub use calendar::{CalendarDay, CalendarWalker};
pub use cycle_check::{CycleChecker, CycleReport, Violation};
pub use error::{AttemptFailure, EngineError, EngineResult, InfeasibleCause};
pub use hours::{HoursEvaluator, HoursReject, HoursReport, PersonHours, EQUAL_HOURS_TOLERANCE};
pub use orchestrator::{RosterOrchestrator, RosterOutcome};
pub use pattern::{PatternBuilder, CLOSURE_PASSES};
pub use staffing::{Allocation, AllocationRule, Candidate, StaffingAllocator};
pub use streak::{StreakState, StreakTracker};
