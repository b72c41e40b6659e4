// ==========================================
// 轮班排班系统 - 日历遍历
// ==========================================
// 职责: 生成候选周期内按顺序排列的日期与星期
// ==========================================

use crate::domain::cycle::DAYS_PER_WEEK;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// 周期中的某一天
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub index: usize,
    pub date: NaiveDate,
    pub weekday: Weekday,
}

impl CalendarDay {
    pub fn is_wednesday(&self) -> bool {
        self.weekday == Weekday::Wed
    }

    pub fn is_friday(&self) -> bool {
        self.weekday == Weekday::Fri
    }
}

pub struct CalendarWalker {
    start: NaiveDate,
}

impl CalendarWalker {
    pub fn new(start: NaiveDate) -> Self {
        Self { start }
    }

    /// 生成 cycle_weeks 周的全部日期
    ///
    /// 星期取自真实日期，起始日不是周一时周三/周五的位置随之移动
    pub fn walk(&self, cycle_weeks: u32) -> Vec<CalendarDay> {
        let total = cycle_weeks as usize * DAYS_PER_WEEK;
        (0..total)
            .map(|index| {
                let date = self.start + Duration::days(index as i64);
                CalendarDay {
                    index,
                    date,
                    weekday: date.weekday(),
                }
            })
            .collect()
    }
}
