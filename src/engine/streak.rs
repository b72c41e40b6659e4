// ==========================================
// 轮班排班系统 - 连续段跟踪器
// ==========================================
// 职责: 判定某人今天能否上某个班次
// 红线: 纯函数，状态全部是显式计数器，无隐藏历史
// ==========================================

use crate::domain::rules::Rules;
use crate::domain::types::DayStatus;

// ==========================================
// StreakState - 个人连续段状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakState {
    /// 前一天的状态；None 表示无历史（周期起点的初始状态）
    pub last: Option<DayStatus>,
    /// 当前连续上班天数（白班夜班合并）
    pub work_run: u32,
    /// 当前连续休息天数
    pub off_run: u32,
    /// 当前休息段是否紧接在夜班之后
    pub off_follows_night: bool,
}

impl StreakState {
    pub fn fresh() -> Self {
        Self::default()
    }

    pub fn is_resting(&self) -> bool {
        self.last == Some(DayStatus::Off)
    }

    /// 推进一天
    pub fn advance(self, status: DayStatus) -> StreakState {
        if status.is_working() {
            let work_run = match self.last {
                Some(prev) if prev.is_working() => self.work_run + 1,
                _ => 1,
            };
            StreakState {
                last: Some(status),
                work_run,
                off_run: 0,
                off_follows_night: false,
            }
        } else if self.is_resting() {
            StreakState {
                off_run: self.off_run + 1,
                ..self
            }
        } else {
            StreakState {
                last: Some(DayStatus::Off),
                work_run: 0,
                off_run: 1,
                off_follows_night: self.last == Some(DayStatus::Night),
            }
        }
    }
}

// ==========================================
// StreakTracker - 连续段规则判定
// ==========================================
pub struct StreakTracker<'a> {
    rules: &'a Rules,
}

impl<'a> StreakTracker<'a> {
    pub fn new(rules: &'a Rules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &Rules {
        self.rules
    }

    /// 快速局部判定：能否以 status 延续当前状态
    ///
    /// # 规则
    /// 1. 连续上班天数达到 max_shifts_in_row 后不能再上班
    /// 2. no_day_after_night 时，夜班次日不能上白班
    pub fn can_extend(&self, state: &StreakState, status: DayStatus) -> bool {
        match status {
            DayStatus::Off => true,
            DayStatus::Day | DayStatus::Night => {
                let working_yesterday = state.last.map(|s| s.is_working()).unwrap_or(false);
                if working_yesterday && state.work_run >= self.rules.max_shifts_in_row {
                    return false;
                }
                if status == DayStatus::Day
                    && self.rules.no_day_after_night
                    && state.last == Some(DayStatus::Night)
                {
                    return false;
                }
                true
            }
        }
    }

    /// 当前休息段所需的最少天数
    pub fn required_rest(&self, state: &StreakState) -> u32 {
        if state.off_follows_night {
            self.rules.rest_after_night()
        } else {
            self.rules.min_days_off
        }
    }

    /// 今天上班会结束当前休息段时，该休息段是否已满足下限
    ///
    /// 不在休息段中（或无历史）时总是可以
    pub fn can_close(&self, state: &StreakState) -> bool {
        if !state.is_resting() {
            return true;
        }
        state.off_run >= self.required_rest(state)
    }

    /// 休息段已达 max_days_off，今天必须上班
    pub fn must_work(&self, state: &StreakState) -> bool {
        state.is_resting() && state.off_run >= self.rules.max_days_off
    }

    /// 综合判定：能否安排上 status 对应的班次
    pub fn allows(&self, state: &StreakState, status: DayStatus) -> bool {
        if !status.is_working() {
            return true;
        }
        self.can_extend(state, status) && self.can_close(state)
    }
}
