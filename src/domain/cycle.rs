// ==========================================
// 轮班排班系统 - 周期班表领域模型
// ==========================================
// DayState -> WeekSlice -> Cycle
// PersonLedger: 每人逐日状态（DAY/NIGHT/OFF）
// ==========================================
// 红线: Cycle 一经接受即不可变，末周之后原样循环
// ==========================================

use crate::domain::shift_group::ShiftGroup;
use crate::domain::types::{DayStatus, RelaxationLevel, ShiftKind};
use chrono::{Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: usize = 7;

// ==========================================
// GroupAssignment - 某班组某日的白班/夜班名单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub group: String,
    pub day: Vec<String>,
    pub night: Vec<String>,
}

impl GroupAssignment {
    pub fn members(&self, kind: ShiftKind) -> &[String] {
        match kind {
            ShiftKind::Day => &self.day,
            ShiftKind::Night => &self.night,
        }
    }

    /// 不在白班/夜班名单中即为休息
    pub fn status_of(&self, name: &str) -> DayStatus {
        if self.day.iter().any(|n| n == name) {
            DayStatus::Day
        } else if self.night.iter().any(|n| n == name) {
            DayStatus::Night
        } else {
            DayStatus::Off
        }
    }
}

// ==========================================
// DayState - 单日状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayState {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub groups: Vec<GroupAssignment>, // 与班组配置顺序一致
}

impl DayState {
    pub fn group(&self, name: &str) -> Option<&GroupAssignment> {
        self.groups.iter().find(|g| g.group == name)
    }
}

// ==========================================
// WeekSlice - 连续 7 天
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSlice {
    pub week_index: u32,
    pub days: Vec<DayState>,
}

// ==========================================
// PersonLedger - 个人逐日状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonLedger {
    pub person: String,
    pub group: String,
    pub statuses: Vec<DayStatus>,
}

impl PersonLedger {
    pub fn count(&self, status: DayStatus) -> usize {
        self.statuses.iter().filter(|s| **s == status).count()
    }

    pub fn working_days(&self) -> usize {
        self.statuses.iter().filter(|s| s.is_working()).count()
    }

    /// 第 week 周的状态切片
    pub fn week(&self, week: usize) -> &[DayStatus] {
        let start = week * DAYS_PER_WEEK;
        let end = (start + DAYS_PER_WEEK).min(self.statuses.len());
        &self.statuses[start.min(end)..end]
    }
}

/// 循环展开后的某一天
#[derive(Debug, Clone, Copy)]
pub struct RepeatedDay<'a> {
    pub week_index: u32,
    pub date: NaiveDate,
    pub state: &'a DayState,
}

// ==========================================
// Cycle - 可循环的周期班表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub start_date: NaiveDate,
    pub cycle_weeks: u32,
    pub level: RelaxationLevel, // 生成时使用的规则变体
    pub weeks: Vec<WeekSlice>,
    pub ledgers: Vec<PersonLedger>,
}

impl Cycle {
    /// 由逐日状态组装周期班表，同时推导每人台账
    ///
    /// # 参数
    /// - `days`: 长度必须为 7 的整数倍
    /// - `groups`: 班组配置（决定台账顺序）
    pub fn assemble(
        start_date: NaiveDate,
        level: RelaxationLevel,
        days: Vec<DayState>,
        groups: &[ShiftGroup],
    ) -> Cycle {
        let mut ledgers = Vec::new();
        for group in groups {
            for member in &group.members {
                let statuses = days
                    .iter()
                    .map(|d| {
                        d.group(&group.name)
                            .map(|g| g.status_of(member))
                            .unwrap_or(DayStatus::Off)
                    })
                    .collect();
                ledgers.push(PersonLedger {
                    person: member.clone(),
                    group: group.name.clone(),
                    statuses,
                });
            }
        }

        let weeks: Vec<WeekSlice> = days
            .chunks(DAYS_PER_WEEK)
            .enumerate()
            .map(|(i, chunk)| WeekSlice {
                week_index: i as u32,
                days: chunk.to_vec(),
            })
            .collect();

        Cycle {
            start_date,
            cycle_weeks: weeks.len() as u32,
            level,
            weeks,
            ledgers,
        }
    }

    pub fn day_count(&self) -> usize {
        self.weeks.iter().map(|w| w.days.len()).sum()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayState> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    pub fn ledger(&self, person: &str) -> Option<&PersonLedger> {
        self.ledgers.iter().find(|l| l.person == person)
    }

    /// 按循环展开 total_weeks 周（日期顺延，班表按 week % cycle_weeks 取用）
    pub fn repeat(&self, total_weeks: u32) -> impl Iterator<Item = RepeatedDay<'_>> {
        let cycle_weeks = self.weeks.len().max(1);
        let start = self.start_date;
        let total_weeks = if self.weeks.is_empty() { 0 } else { total_weeks };
        (0..total_weeks).flat_map(move |w| {
            let slice = &self.weeks[w as usize % cycle_weeks];
            slice.days.iter().enumerate().map(move |(i, state)| RepeatedDay {
                week_index: w,
                date: start + Duration::days(w as i64 * DAYS_PER_WEEK as i64 + i as i64),
                state,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shift_group::{StaffingBounds, TimeWindow};
    use chrono::{Datelike, NaiveTime};

    fn group() -> ShiftGroup {
        let w = TimeWindow::new(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        );
        ShiftGroup::new(
            "G1",
            &["Alice", "Bob"],
            w,
            w,
            StaffingBounds::new(1, 1),
            StaffingBounds::new(0, 1),
        )
    }

    fn days(start: NaiveDate, n: usize) -> Vec<DayState> {
        (0..n)
            .map(|i| {
                let date = start + Duration::days(i as i64);
                let (day, night) = if i % 2 == 0 {
                    (vec!["Alice".to_string()], vec![])
                } else {
                    (vec!["Bob".to_string()], vec!["Alice".to_string()])
                };
                DayState {
                    date,
                    weekday: date.weekday(),
                    groups: vec![GroupAssignment {
                        group: "G1".to_string(),
                        day,
                        night,
                    }],
                }
            })
            .collect()
    }

    #[test]
    fn test_assemble_derives_ledgers_and_slices() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let cycle = Cycle::assemble(start, RelaxationLevel::L0, days(start, 14), &[group()]);

        assert_eq!(cycle.cycle_weeks, 2);
        assert_eq!(cycle.day_count(), 14);
        assert_eq!(cycle.weeks[1].week_index, 1);

        let alice = cycle.ledger("Alice").unwrap();
        assert_eq!(alice.statuses.len(), 14);
        assert_eq!(alice.statuses[0], DayStatus::Day);
        assert_eq!(alice.statuses[1], DayStatus::Night);
        assert_eq!(alice.count(DayStatus::Off), 0);

        let bob = cycle.ledger("Bob").unwrap();
        assert_eq!(bob.count(DayStatus::Off), 7);
        assert_eq!(bob.week(1).len(), 7);
    }

    #[test]
    fn test_repeat_shifts_dates_and_wraps_slices() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let cycle = Cycle::assemble(start, RelaxationLevel::L0, days(start, 7), &[group()]);

        let expanded: Vec<_> = cycle.repeat(3).collect();
        assert_eq!(expanded.len(), 21);
        assert_eq!(expanded[7].week_index, 1);
        assert_eq!(expanded[7].date, NaiveDate::from_ymd_opt(2025, 1, 13).unwrap());
        assert_eq!(expanded[7].state, expanded[0].state);
        assert_eq!(expanded[20].date, NaiveDate::from_ymd_opt(2025, 1, 26).unwrap());
    }
}
