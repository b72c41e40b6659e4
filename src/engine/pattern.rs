// ==========================================
// 轮班排班系统 - 周期模式构建器
// ==========================================
// 职责: 在给定规则变体与周期周数下生成一个候选 Cycle
// 流程: 按日期前向推进（不回溯），每天每班组先白班后夜班
// ==========================================
// 闭合: 以上一轮末日状态为种子重跑，直到末日状态 = 起始状态
//       （最多 CLOSURE_PASSES 轮），最后一轮交由 CycleChecker 审计
// 红线: 人数不足时返回显式失败，绝不产出残缺周期
// ==========================================

use crate::domain::cycle::{Cycle, DayState, GroupAssignment};
use crate::domain::rules::Rules;
use crate::domain::shift_group::ShiftGroup;
use crate::domain::types::{DayStatus, RelaxationLevel, ShiftKind};
use crate::engine::calendar::{CalendarDay, CalendarWalker};
use crate::engine::cycle_check::CycleChecker;
use crate::engine::error::{AttemptFailure, InfeasibleCause};
use crate::engine::staffing::{Candidate, StaffingAllocator};
use crate::engine::streak::{StreakState, StreakTracker};
use chrono::NaiveDate;
use tracing::{debug, instrument};

/// 闭合轮次上限
pub const CLOSURE_PASSES: usize = 3;

// ==========================================
// PatternBuilder - 周期模式构建器
// ==========================================
pub struct PatternBuilder<'a> {
    groups: &'a [ShiftGroup],
    rules: &'a Rules,
    start: NaiveDate,
}

/// 单轮前向推进的结果
struct PassOutcome {
    days: Vec<DayState>,
    end: Vec<StreakState>,
}

impl<'a> PatternBuilder<'a> {
    pub fn new(groups: &'a [ShiftGroup], rules: &'a Rules, start: NaiveDate) -> Self {
        Self {
            groups,
            rules,
            start,
        }
    }

    fn person_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    /// 构建候选周期
    ///
    /// # 参数
    /// - `level`: 规则松弛等级（L1 放弃软偏好）
    /// - `cycle_weeks`: 周期周数
    ///
    /// # 返回
    /// - `Ok(Cycle)`: 满足全部硬约束的可循环周期
    /// - `Err(AttemptFailure)`: 某日无可行安排，或首尾衔接违反约束
    #[instrument(skip(self), fields(start = %self.start))]
    pub fn build(&self, level: RelaxationLevel, cycle_weeks: u32) -> Result<Cycle, AttemptFailure> {
        let rules = self.rules.for_level(level);
        let calendar = CalendarWalker::new(self.start).walk(cycle_weeks);

        let mut seed = vec![StreakState::fresh(); self.person_count()];
        let mut pass = self.run_pass(&rules, &calendar, cycle_weeks, &seed)?;
        let mut passes = 1;
        while pass.end != seed && passes < CLOSURE_PASSES {
            seed = pass.end;
            pass = self.run_pass(&rules, &calendar, cycle_weeks, &seed)?;
            passes += 1;
        }
        debug!(passes, closed = pass.end == seed, "闭合推进完成");

        let cycle = Cycle::assemble(self.start, level, pass.days, self.groups);
        let report = CycleChecker::new(self.groups, &rules).check(&cycle);
        if let Some(violation) = report.into_first() {
            debug!(%violation, "候选周期未通过循环审计");
            return Err(AttemptFailure::ClosureViolation {
                cycle_weeks,
                violation,
            });
        }

        Ok(cycle)
    }

    /// 单轮前向推进
    ///
    /// seed 与返回的 end 均按班组顺序、组内成员顺序排列
    fn run_pass(
        &self,
        rules: &Rules,
        calendar: &[CalendarDay],
        cycle_weeks: u32,
        seed: &[StreakState],
    ) -> Result<PassOutcome, AttemptFailure> {
        let tracker = StreakTracker::new(rules);
        let allocator = StaffingAllocator::new(rules);

        let mut states = seed.to_vec();
        let mut assignments = vec![0u32; states.len()];
        let mut days = Vec::with_capacity(calendar.len());

        for day in calendar {
            let mut groups = Vec::with_capacity(self.groups.len());
            let mut offset = 0;
            for group in self.groups {
                let range = offset..offset + group.members.len();
                offset = range.end;
                let assignment = self.assign_group(
                    &tracker,
                    &allocator,
                    group,
                    day,
                    cycle_weeks,
                    &mut states[range.clone()],
                    &mut assignments[range],
                )?;
                groups.push(assignment);
            }
            days.push(DayState {
                date: day.date,
                weekday: day.weekday,
                groups,
            });
        }

        Ok(PassOutcome { days, end: states })
    }

    /// 为单个班组安排某一天，并推进组内每人的连续段状态
    #[allow(clippy::too_many_arguments)]
    fn assign_group(
        &self,
        tracker: &StreakTracker<'_>,
        allocator: &StaffingAllocator<'_>,
        group: &ShiftGroup,
        day: &CalendarDay,
        cycle_weeks: u32,
        states: &mut [StreakState],
        counts: &mut [u32],
    ) -> Result<GroupAssignment, AttemptFailure> {
        let infeasible = |cause: InfeasibleCause| AttemptFailure::InfeasibleDay {
            cycle_weeks,
            date: day.date,
            group: group.name.clone(),
            cause,
        };

        let mut statuses = vec![DayStatus::Off; group.members.len()];
        let mut lists: [Vec<String>; 2] = [Vec::new(), Vec::new()];

        for (slot, kind) in ShiftKind::ALL.into_iter().enumerate() {
            let status = DayStatus::from(kind);
            let candidates: Vec<Candidate<'_>> = group
                .members
                .iter()
                .enumerate()
                .filter(|(i, _)| statuses[*i] == DayStatus::Off && tracker.allows(&states[*i], status))
                .map(|(i, name)| Candidate {
                    name,
                    must_work: tracker.must_work(&states[i]),
                    assignments: counts[i],
                })
                .collect();

            let allocation = allocator
                .allocate(group, day, kind, &candidates)
                .map_err(|shortfall| {
                    infeasible(InfeasibleCause::Understaffed {
                        kind,
                        eligible: shortfall.eligible,
                        required: shortfall.required,
                    })
                })?;

            for name in &allocation.members {
                if let Some(i) = group.members.iter().position(|m| m == name) {
                    statuses[i] = status;
                    counts[i] += 1;
                }
            }
            debug!(
                group = %group.name,
                date = %day.date,
                kind = %kind,
                eligible = candidates.len(),
                assigned = allocation.members.len(),
                rule = ?allocation.rule,
                "班次分配完成"
            );
            lists[slot] = allocation.members;
        }

        for (i, name) in group.members.iter().enumerate() {
            if statuses[i] == DayStatus::Off && tracker.must_work(&states[i]) {
                return Err(infeasible(InfeasibleCause::RestOverrun {
                    person: name.clone(),
                    off_run: states[i].off_run,
                    max_days_off: tracker.rules().max_days_off,
                }));
            }
        }

        for (state, status) in states.iter_mut().zip(statuses) {
            *state = state.advance(status);
        }

        let [day_members, night_members] = lists;
        Ok(GroupAssignment {
            group: group.name.clone(),
            day: day_members,
            night: night_members,
        })
    }
}
