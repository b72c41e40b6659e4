// ==========================================
// 轮班排班系统 - 周期校验器
// ==========================================
// 职责: 对候选周期做完整的循环不变量审计
// 规则: 末日与首日相接（周期无限重复），连续段按环形计算
// ==========================================
// 检查项:
// 1. 台账长度 = 周期天数
// 2. 连续上班 <= max_shifts_in_row
// 3. 休息段 ∈ [min_days_off, max_days_off]
// 4. no_day_after_night（含末日 -> 首日）
// 5. 夜班后休息段 >= 夜班后最少休息天数
// 6. 人数上下限（周三白班超配）、白夜班不重叠、成员归属
// ==========================================

use crate::domain::cycle::{Cycle, DayState};
use crate::domain::rules::Rules;
use crate::domain::shift_group::{ShiftGroup, StaffingBounds};
use crate::domain::types::{DayStatus, ShiftKind};
use crate::engine::calendar::CalendarDay;
use crate::engine::staffing::StaffingAllocator;
use chrono::NaiveDate;
use thiserror::Error;

/// 不变量违反项（day / start_day 为周期内的 0 基天序号）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("{person} 台账长度 {actual} 与周期天数 {expected} 不一致")]
    LedgerLength {
        person: String,
        expected: usize,
        actual: usize,
    },

    #[error("{person} 自第 {start_day} 天起连续上班 {length} 天，超过上限 {max}")]
    WorkStreakTooLong {
        person: String,
        start_day: usize,
        length: usize,
        max: u32,
    },

    #[error("{person} 自第 {start_day} 天起休息 {length} 天，少于下限 {min}")]
    OffRunTooShort {
        person: String,
        start_day: usize,
        length: usize,
        min: u32,
    },

    #[error("{person} 自第 {start_day} 天起休息 {length} 天，超过上限 {max}")]
    OffRunTooLong {
        person: String,
        start_day: usize,
        length: usize,
        max: u32,
    },

    #[error("{person} 第 {day} 天夜班后紧接白班")]
    DayAfterNight { person: String, day: usize },

    #[error("{person} 夜班后自第 {start_day} 天起只休息 {length} 天，要求至少 {required} 天")]
    RestAfterNightTooShort {
        person: String,
        start_day: usize,
        length: usize,
        required: u32,
    },

    #[error("班组 '{group}' {date} {kind} 人数 {count} 不在 [{min}, {max}] 内")]
    StaffingOutOfBounds {
        group: String,
        date: NaiveDate,
        kind: ShiftKind,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("班组 '{group}' {date} {person} 同时出现在白班和夜班")]
    OverlappingAssignment {
        group: String,
        date: NaiveDate,
        person: String,
    },

    #[error("班组 '{group}' {date} 名单包含非本组人员 {person}")]
    UnknownMember {
        group: String,
        date: NaiveDate,
        person: String,
    },

    #[error("{date} 缺少班组 '{group}' 的安排")]
    MissingGroup { group: String, date: NaiveDate },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub violations: Vec<Violation>,
}

impl CycleReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    pub fn into_first(self) -> Option<Violation> {
        self.violations.into_iter().next()
    }
}

/// 环形连续段
#[derive(Debug, Clone, Copy)]
struct Run {
    start: usize,
    length: usize,
    working: bool,
    /// 段前一天是夜班
    after_night: bool,
}

pub struct CycleChecker<'a> {
    groups: &'a [ShiftGroup],
    rules: &'a Rules,
}

impl<'a> CycleChecker<'a> {
    /// rules 应为生成该周期时使用的规则变体
    pub fn new(groups: &'a [ShiftGroup], rules: &'a Rules) -> Self {
        Self { groups, rules }
    }

    pub fn check(&self, cycle: &Cycle) -> CycleReport {
        let mut violations = Vec::new();
        let expected = cycle.day_count();

        for ledger in &cycle.ledgers {
            if ledger.statuses.len() != expected {
                violations.push(Violation::LedgerLength {
                    person: ledger.person.clone(),
                    expected,
                    actual: ledger.statuses.len(),
                });
                continue;
            }
            self.check_ledger(&ledger.person, &ledger.statuses, &mut violations);
        }

        for (index, day) in cycle.days().enumerate() {
            self.check_day(index, day, &mut violations);
        }

        CycleReport { violations }
    }

    fn check_ledger(&self, person: &str, statuses: &[DayStatus], out: &mut Vec<Violation>) {
        let n = statuses.len();
        if n == 0 {
            return;
        }
        let rules = self.rules;

        // 周期无限重复：全上班或全休息都是无界连续段
        if statuses.iter().all(|s| s.is_working()) {
            out.push(Violation::WorkStreakTooLong {
                person: person.to_string(),
                start_day: 0,
                length: n,
                max: rules.max_shifts_in_row,
            });
            return;
        }
        if statuses.iter().all(|s| !s.is_working()) {
            out.push(Violation::OffRunTooLong {
                person: person.to_string(),
                start_day: 0,
                length: n,
                max: rules.max_days_off,
            });
            return;
        }

        for run in cyclic_runs(statuses) {
            if run.working {
                if run.length > rules.max_shifts_in_row as usize {
                    out.push(Violation::WorkStreakTooLong {
                        person: person.to_string(),
                        start_day: run.start,
                        length: run.length,
                        max: rules.max_shifts_in_row,
                    });
                }
                continue;
            }

            if run.length < rules.min_days_off as usize {
                out.push(Violation::OffRunTooShort {
                    person: person.to_string(),
                    start_day: run.start,
                    length: run.length,
                    min: rules.min_days_off,
                });
            } else if run.after_night && run.length < rules.rest_after_night() as usize {
                out.push(Violation::RestAfterNightTooShort {
                    person: person.to_string(),
                    start_day: run.start,
                    length: run.length,
                    required: rules.rest_after_night(),
                });
            }
            if run.length > rules.max_days_off as usize {
                out.push(Violation::OffRunTooLong {
                    person: person.to_string(),
                    start_day: run.start,
                    length: run.length,
                    max: rules.max_days_off,
                });
            }
        }

        if rules.no_day_after_night {
            for i in 0..n {
                let next = (i + 1) % n;
                if statuses[i] == DayStatus::Night && statuses[next] == DayStatus::Day {
                    out.push(Violation::DayAfterNight {
                        person: person.to_string(),
                        day: next,
                    });
                }
            }
        }
    }

    fn check_day(&self, index: usize, state: &DayState, out: &mut Vec<Violation>) {
        let allocator = StaffingAllocator::new(self.rules);
        let calendar_day = CalendarDay {
            index,
            date: state.date,
            weekday: state.weekday,
        };

        for group in self.groups {
            let Some(assignment) = state.group(&group.name) else {
                out.push(Violation::MissingGroup {
                    group: group.name.clone(),
                    date: state.date,
                });
                continue;
            };

            for person in assignment.day.iter().chain(assignment.night.iter()) {
                if !group.contains(person) {
                    out.push(Violation::UnknownMember {
                        group: group.name.clone(),
                        date: state.date,
                        person: person.clone(),
                    });
                }
            }
            for person in &assignment.day {
                if assignment.night.contains(person) {
                    out.push(Violation::OverlappingAssignment {
                        group: group.name.clone(),
                        date: state.date,
                        person: person.clone(),
                    });
                }
            }

            for kind in ShiftKind::ALL {
                let count = assignment.members(kind).len();
                let bounds = StaffingBounds::new(
                    group.staffing(kind, state.weekday).min,
                    allocator.upper_bound(group, &calendar_day, kind),
                );
                if !bounds.contains(count) {
                    out.push(Violation::StaffingOutOfBounds {
                        group: group.name.clone(),
                        date: state.date,
                        kind,
                        count,
                        min: bounds.min,
                        max: bounds.max,
                    });
                }
            }
        }
    }
}

/// 按环形切分连续段（上班/休息），要求序列中两类状态都存在
fn cyclic_runs(statuses: &[DayStatus]) -> Vec<Run> {
    let n = statuses.len();
    let boundary = |i: usize| statuses[i].is_working() != statuses[(i + n - 1) % n].is_working();
    let Some(pivot) = (0..n).find(|&i| boundary(i)) else {
        return Vec::new();
    };

    let mut runs = Vec::new();
    let mut k = 0;
    while k < n {
        let start = (pivot + k) % n;
        let working = statuses[start].is_working();
        let mut length = 0;
        while k < n && statuses[(pivot + k) % n].is_working() == working {
            length += 1;
            k += 1;
        }
        runs.push(Run {
            start,
            length,
            working,
            after_night: statuses[(start + n - 1) % n] == DayStatus::Night,
        });
    }
    runs
}
