// ==========================================
// 轮班排班系统 - 工时评估器
// ==========================================
// 职责: 计算每人每周工时与周期平均工时，判定是否落在目标区间
// 输入: Cycle + 班组配置（班次时长）
// 输出: HoursReport 或 HoursReject
// ==========================================
// 班次时长: end < start 视为跨午夜，时长 = (end - start) mod 24h
// 均衡要求: require_equal_hours 时所有人平均工时相差不超过 0.5h
// ==========================================

use crate::domain::cycle::Cycle;
use crate::domain::rules::Rules;
use crate::domain::shift_group::ShiftGroup;
use crate::domain::types::{DayStatus, ShiftKind};
use serde::Serialize;
use thiserror::Error;

/// 工时均衡容差（小时）
pub const EQUAL_HOURS_TOLERANCE: f64 = 0.5;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonHours {
    pub person: String,
    pub group: String,
    pub weekly: Vec<f64>,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HoursReport {
    pub people: Vec<PersonHours>,
}

impl HoursReport {
    pub fn person(&self, name: &str) -> Option<&PersonHours> {
        self.people.iter().find(|p| p.person == name)
    }

    pub fn lowest(&self) -> Option<&PersonHours> {
        self.people
            .iter()
            .min_by(|a, b| a.average.total_cmp(&b.average))
    }

    pub fn highest(&self) -> Option<&PersonHours> {
        self.people
            .iter()
            .max_by(|a, b| a.average.total_cmp(&b.average))
    }

    /// 最高与最低平均工时之差
    pub fn spread(&self) -> f64 {
        match (self.lowest(), self.highest()) {
            (Some(lo), Some(hi)) => hi.average - lo.average,
            _ => 0.0,
        }
    }
}

/// 工时判定失败
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HoursReject {
    #[error("{person} 平均周工时 {average:.2}h 低于下限 {min:.2}h")]
    BelowMin {
        person: String,
        average: f64,
        min: f64,
    },

    #[error("{person} 平均周工时 {average:.2}h 高于上限 {max:.2}h")]
    AboveMax {
        person: String,
        average: f64,
        max: f64,
    },

    #[error("工时不均衡: {highest} 与 {lowest} 相差 {spread:.2}h（容差 0.5h）")]
    Unequal {
        spread: f64,
        lowest: String,
        highest: String,
    },
}

pub struct HoursEvaluator<'a> {
    groups: &'a [ShiftGroup],
    rules: &'a Rules,
}

impl<'a> HoursEvaluator<'a> {
    pub fn new(groups: &'a [ShiftGroup], rules: &'a Rules) -> Self {
        Self { groups, rules }
    }

    /// 只统计不判定
    pub fn summarize(&self, cycle: &Cycle) -> HoursReport {
        let weeks = cycle.weeks.len();
        let people = cycle
            .ledgers
            .iter()
            .map(|ledger| {
                let group = self.groups.iter().find(|g| g.name == ledger.group);
                let hours_of = |status: &DayStatus| match (status, group) {
                    (DayStatus::Day, Some(g)) => g.shift_hours(ShiftKind::Day),
                    (DayStatus::Night, Some(g)) => g.shift_hours(ShiftKind::Night),
                    _ => 0.0,
                };

                let weekly: Vec<f64> = (0..weeks)
                    .map(|w| ledger.week(w).iter().map(hours_of).sum())
                    .collect();
                let average = if weekly.is_empty() {
                    0.0
                } else {
                    weekly.iter().sum::<f64>() / weekly.len() as f64
                };

                PersonHours {
                    person: ledger.person.clone(),
                    group: ledger.group.clone(),
                    weekly,
                    average,
                }
            })
            .collect();

        HoursReport { people }
    }

    /// 统计并判定
    ///
    /// # 返回
    /// - `Ok(HoursReport)`: 所有人平均工时在 [min, max] 内（且满足均衡要求）
    /// - `Err(HoursReject)`: 第一个不满足的人，或整体不均衡
    pub fn evaluate(&self, cycle: &Cycle) -> Result<HoursReport, HoursReject> {
        let report = self.summarize(cycle);
        let (min, max) = (
            self.rules.target_weekly_hours_min,
            self.rules.target_weekly_hours_max,
        );

        for p in &report.people {
            if p.average < min - EPSILON {
                return Err(HoursReject::BelowMin {
                    person: p.person.clone(),
                    average: p.average,
                    min,
                });
            }
            if p.average > max + EPSILON {
                return Err(HoursReject::AboveMax {
                    person: p.person.clone(),
                    average: p.average,
                    max,
                });
            }
        }

        if self.rules.require_equal_hours {
            let spread = report.spread();
            if spread > EQUAL_HOURS_TOLERANCE + EPSILON {
                let lowest = report.lowest().map(|p| p.person.clone()).unwrap_or_default();
                let highest = report.highest().map(|p| p.person.clone()).unwrap_or_default();
                return Err(HoursReject::Unequal {
                    spread,
                    lowest,
                    highest,
                });
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cycle::{DayState, GroupAssignment};
    use crate::domain::shift_group::{StaffingBounds, TimeWindow};
    use crate::domain::types::RelaxationLevel;
    use chrono::{Datelike, Duration, NaiveDate};

    fn group() -> ShiftGroup {
        ShiftGroup::new(
            "G",
            &["Alice", "Bob"],
            TimeWindow::parse("09:00", "18:00").unwrap(),
            TimeWindow::parse("22:00", "08:00").unwrap(),
            StaffingBounds::new(0, 2),
            StaffingBounds::new(0, 2),
        )
    }

    /// pattern: 每天 (白班, 夜班) 名单
    fn cycle(pattern: &[(Vec<&str>, Vec<&str>)]) -> Cycle {
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let days = pattern
            .iter()
            .enumerate()
            .map(|(i, (day, night))| {
                let date = start + Duration::days(i as i64);
                DayState {
                    date,
                    weekday: date.weekday(),
                    groups: vec![GroupAssignment {
                        group: "G".to_string(),
                        day: day.iter().map(|s| s.to_string()).collect(),
                        night: night.iter().map(|s| s.to_string()).collect(),
                    }],
                }
            })
            .collect();
        Cycle::assemble(start, RelaxationLevel::L0, days, &[group()])
    }

    fn rules(min: f64, max: f64, equal: bool) -> Rules {
        Rules {
            target_weekly_hours_min: min,
            target_weekly_hours_max: max,
            require_equal_hours: equal,
            ..Rules::default()
        }
    }

    // Alice: 4 个白班 (36h)，Bob: 3 个夜班 (30h)
    fn week() -> Vec<(Vec<&'static str>, Vec<&'static str>)> {
        vec![
            (vec!["Alice"], vec!["Bob"]),
            (vec![], vec![]),
            (vec!["Alice"], vec!["Bob"]),
            (vec![], vec![]),
            (vec!["Alice"], vec!["Bob"]),
            (vec![], vec![]),
            (vec!["Alice"], vec![]),
        ]
    }

    #[test]
    fn test_summarize_counts_midnight_crossing_shifts() {
        let groups = [group()];
        let rules = rules(0.0, 100.0, false);
        let report = HoursEvaluator::new(&groups, &rules).summarize(&cycle(&week()));

        assert_eq!(report.person("Alice").unwrap().weekly, vec![36.0]);
        assert_eq!(report.person("Bob").unwrap().average, 30.0);
        assert_eq!(report.spread(), 6.0);
    }

    #[test]
    fn test_average_over_multiple_weeks() {
        let mut two = week();
        two.extend(vec![(vec![], vec![]); 7]);
        let groups = [group()];
        let rules = rules(0.0, 100.0, false);
        let report = HoursEvaluator::new(&groups, &rules).summarize(&cycle(&two));

        let alice = report.person("Alice").unwrap();
        assert_eq!(alice.weekly, vec![36.0, 0.0]);
        assert_eq!(alice.average, 18.0);
    }

    #[test]
    fn test_evaluate_bounds() {
        let groups = [group()];
        let c = cycle(&week());

        assert!(HoursEvaluator::new(&groups, &rules(30.0, 36.0, false)).evaluate(&c).is_ok());

        let err = HoursEvaluator::new(&groups, &rules(32.0, 40.0, false))
            .evaluate(&c)
            .unwrap_err();
        assert!(matches!(err, HoursReject::BelowMin { ref person, .. } if person == "Bob"));

        let err = HoursEvaluator::new(&groups, &rules(0.0, 35.0, false))
            .evaluate(&c)
            .unwrap_err();
        assert!(matches!(err, HoursReject::AboveMax { ref person, .. } if person == "Alice"));
    }

    #[test]
    fn test_equal_hours_tolerance() {
        let groups = [group()];
        let err = HoursEvaluator::new(&groups, &rules(0.0, 100.0, true))
            .evaluate(&cycle(&week()))
            .unwrap_err();
        match err {
            HoursReject::Unequal { spread, lowest, highest } => {
                assert_eq!(spread, 6.0);
                assert_eq!(lowest, "Bob");
                assert_eq!(highest, "Alice");
            }
            other => panic!("unexpected: {other:?}"),
        }

        // 完全相同的工时通过均衡校验
        let even = vec![(vec!["Alice"], vec!["Bob"]); 7];
        assert!(HoursEvaluator::new(&groups, &rules(0.0, 100.0, true))
            .evaluate(&cycle(&even))
            .is_ok());
    }
}
