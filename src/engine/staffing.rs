// ==========================================
// 轮班排班系统 - 人员配置分配器
// ==========================================
// 职责: 在人数上下限内为某班组某日某班次挑选人员
// 输入: 连续段跟踪器放行的候选人
// 输出: 当班名单 或 人数不足
// ==========================================
// 优先级:
// (a) 周五夜班 + 优先名单: 名单内人员优先，不足部分按公平性补齐
// (b) 周三白班 + 超配开启: 目标 = 上限 + 超配人数
// (c) 其余: [min, max] 内最小可行人数
// 公平性: 累计排班次数少者优先，其次按姓名
// ==========================================

use crate::domain::rules::Rules;
use crate::domain::shift_group::ShiftGroup;
use crate::domain::types::ShiftKind;
use crate::engine::calendar::CalendarDay;
use std::cmp::Ordering;

/// 候选人
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub name: &'a str,
    /// 休息段已达上限，今天必须上班
    pub must_work: bool,
    /// 本轮累计上班次数
    pub assignments: u32,
}

/// 生效的分配规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationRule {
    FridayNightPriority,
    WednesdayOverfill,
    MinimumFeasible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub members: Vec<String>, // 按班组成员顺序
    pub rule: AllocationRule,
}

/// 候选人数低于下限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub eligible: usize,
    pub required: usize,
}

pub struct StaffingAllocator<'a> {
    rules: &'a Rules,
}

impl<'a> StaffingAllocator<'a> {
    pub fn new(rules: &'a Rules) -> Self {
        Self { rules }
    }

    pub fn rule_for(&self, group: &ShiftGroup, day: &CalendarDay, kind: ShiftKind) -> AllocationRule {
        match kind {
            ShiftKind::Night
                if day.is_friday()
                    && group.members.iter().any(|m| self.rules.is_friday_priority(m)) =>
            {
                AllocationRule::FridayNightPriority
            }
            ShiftKind::Day
                if day.is_wednesday()
                    && self.rules.wednesday_day_overfill
                    && group.wednesday_overfill_count > 0 =>
            {
                AllocationRule::WednesdayOverfill
            }
            _ => AllocationRule::MinimumFeasible,
        }
    }

    /// 当日人数上限（周三超配时 = max + 超配人数）
    pub fn upper_bound(&self, group: &ShiftGroup, day: &CalendarDay, kind: ShiftKind) -> usize {
        let bounds = group.staffing(kind, day.weekday);
        match self.rule_for(group, day, kind) {
            AllocationRule::WednesdayOverfill => bounds.max + group.wednesday_overfill_count,
            _ => bounds.max,
        }
    }

    /// 挑选当班人员
    ///
    /// # 参数
    /// - `candidates`: 已通过连续段判定的候选人
    ///
    /// # 返回
    /// - `Ok(Allocation)`: 名单人数落在 [min, upper] 内
    /// - `Err(Shortfall)`: 候选人数低于 min
    pub fn allocate(
        &self,
        group: &ShiftGroup,
        day: &CalendarDay,
        kind: ShiftKind,
        candidates: &[Candidate<'_>],
    ) -> Result<Allocation, Shortfall> {
        let bounds = group.staffing(kind, day.weekday);
        if candidates.len() < bounds.min {
            return Err(Shortfall {
                eligible: candidates.len(),
                required: bounds.min,
            });
        }

        let rule = self.rule_for(group, day, kind);
        let upper = self.upper_bound(group, day, kind);
        let prioritized = |c: &Candidate<'_>| {
            rule == AllocationRule::FridayNightPriority && self.rules.is_friday_priority(c.name)
        };

        let must = candidates.iter().filter(|c| c.must_work).count();
        let wanted = match rule {
            AllocationRule::WednesdayOverfill => upper,
            AllocationRule::FridayNightPriority => {
                let listed = candidates.iter().filter(|c| prioritized(c)).count();
                bounds.min.max(must).max(listed)
            }
            AllocationRule::MinimumFeasible => bounds.min.max(must),
        };
        let target = wanted.min(upper).min(candidates.len());

        let mut ranked: Vec<&Candidate<'_>> = candidates.iter().collect();
        ranked.sort_by(|a, b| rank(a, b, prioritized(a), prioritized(b)));

        let mut members: Vec<String> = ranked
            .into_iter()
            .take(target)
            .map(|c| c.name.to_string())
            .collect();
        members.sort_by_key(|n| group.members.iter().position(|m| m == n));

        Ok(Allocation { members, rule })
    }
}

/// 必须上班 > 优先名单 > 累计次数少 > 姓名
fn rank(a: &Candidate<'_>, b: &Candidate<'_>, a_listed: bool, b_listed: bool) -> Ordering {
    b.must_work
        .cmp(&a.must_work)
        .then_with(|| b_listed.cmp(&a_listed))
        .then_with(|| a.assignments.cmp(&b.assignments))
        .then_with(|| a.name.cmp(b.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shift_group::{StaffingBounds, TimeWindow};
    use chrono::{Datelike, NaiveDate};

    fn group(min: usize, max: usize, overfill: usize) -> ShiftGroup {
        let w = TimeWindow::parse("09:00", "18:00").unwrap();
        let mut g = ShiftGroup::new(
            "Shift 2",
            &["Alice", "Bob", "Carol", "Dina"],
            w,
            w,
            StaffingBounds::new(min, max),
            StaffingBounds::new(min, max),
        );
        g.wednesday_overfill_count = overfill;
        g
    }

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        CalendarDay {
            index: 0,
            date,
            weekday: date.weekday(),
        }
    }

    fn monday() -> CalendarDay {
        day(2025, 1, 6)
    }

    fn wednesday() -> CalendarDay {
        day(2025, 1, 8)
    }

    fn friday() -> CalendarDay {
        day(2025, 1, 10)
    }

    fn cand(name: &str, assignments: u32) -> Candidate<'_> {
        Candidate {
            name,
            must_work: false,
            assignments,
        }
    }

    #[test]
    fn test_minimum_feasible_count_by_fairness() {
        let rules = Rules::default();
        let allocator = StaffingAllocator::new(&rules);
        let g = group(1, 3, 0);
        let candidates = [cand("Dina", 0), cand("Bob", 2), cand("Alice", 0)];

        let alloc = allocator.allocate(&g, &monday(), ShiftKind::Day, &candidates).unwrap();
        assert_eq!(alloc.rule, AllocationRule::MinimumFeasible);
        // 次数相同按姓名：Alice 在 Dina 之前
        assert_eq!(alloc.members, vec!["Alice".to_string()]);
    }

    #[test]
    fn test_must_work_raises_count_and_goes_first() {
        let rules = Rules::default();
        let allocator = StaffingAllocator::new(&rules);
        let g = group(1, 2, 0);
        let mut carol = cand("Carol", 5);
        carol.must_work = true;
        let mut dina = cand("Dina", 5);
        dina.must_work = true;
        let candidates = [cand("Alice", 0), carol, dina];

        let alloc = allocator.allocate(&g, &monday(), ShiftKind::Day, &candidates).unwrap();
        assert_eq!(alloc.members, vec!["Carol".to_string(), "Dina".to_string()]);
    }

    #[test]
    fn test_shortfall_when_candidates_below_min() {
        let rules = Rules::default();
        let allocator = StaffingAllocator::new(&rules);
        let g = group(2, 2, 0);
        let err = allocator
            .allocate(&g, &monday(), ShiftKind::Day, &[cand("Alice", 0)])
            .unwrap_err();
        assert_eq!(err, Shortfall { eligible: 1, required: 2 });
    }

    #[test]
    fn test_wednesday_overfill_targets_max_plus_count() {
        let rules = Rules::default();
        let allocator = StaffingAllocator::new(&rules);
        let g = group(1, 1, 2);
        let candidates = [cand("Alice", 0), cand("Bob", 0), cand("Carol", 0), cand("Dina", 0)];

        let alloc = allocator.allocate(&g, &wednesday(), ShiftKind::Day, &candidates).unwrap();
        assert_eq!(alloc.rule, AllocationRule::WednesdayOverfill);
        assert_eq!(alloc.members.len(), 3);

        // 夜班不超配
        let alloc = allocator.allocate(&g, &wednesday(), ShiftKind::Night, &candidates).unwrap();
        assert_eq!(alloc.members.len(), 1);

        // 关闭超配后回到最小人数
        let relaxed = rules.without_soft_preferences();
        let allocator = StaffingAllocator::new(&relaxed);
        let alloc = allocator.allocate(&g, &wednesday(), ShiftKind::Day, &candidates).unwrap();
        assert_eq!(alloc.members.len(), 1);
    }

    #[test]
    fn test_wednesday_overfill_takes_what_is_available() {
        let rules = Rules::default();
        let allocator = StaffingAllocator::new(&rules);
        let g = group(1, 1, 2);
        let candidates = [cand("Alice", 0), cand("Bob", 0)];
        let alloc = allocator.allocate(&g, &wednesday(), ShiftKind::Day, &candidates).unwrap();
        assert_eq!(alloc.members.len(), 2);
    }

    #[test]
    fn test_friday_night_prefers_priority_names() {
        let rules = Rules {
            friday_night_priority_names: vec!["Dina".to_string()],
            ..Rules::default()
        };
        let allocator = StaffingAllocator::new(&rules);
        let g = group(1, 2, 0);
        let candidates = [cand("Alice", 0), cand("Dina", 4)];

        let alloc = allocator.allocate(&g, &friday(), ShiftKind::Night, &candidates).unwrap();
        assert_eq!(alloc.rule, AllocationRule::FridayNightPriority);
        assert_eq!(alloc.members, vec!["Dina".to_string()]);

        // 非周五不生效
        let alloc = allocator.allocate(&g, &monday(), ShiftKind::Night, &candidates).unwrap();
        assert_eq!(alloc.members, vec!["Alice".to_string()]);
    }

    #[test]
    fn test_friday_priority_fills_remainder_by_fairness() {
        let rules = Rules {
            friday_night_priority_names: vec!["Dina".to_string()],
            ..Rules::default()
        };
        let allocator = StaffingAllocator::new(&rules);
        let g = group(3, 3, 0);
        let candidates = [cand("Alice", 3), cand("Bob", 1), cand("Carol", 0), cand("Dina", 9)];

        let alloc = allocator.allocate(&g, &friday(), ShiftKind::Night, &candidates).unwrap();
        assert_eq!(
            alloc.members,
            vec!["Bob".to_string(), "Carol".to_string(), "Dina".to_string()]
        );
    }
}
