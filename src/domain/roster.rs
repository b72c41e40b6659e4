// ==========================================
// 轮班排班系统 - 引擎输入
// ==========================================
// RosterInput = 班组 + 规则 + 起始日期 + 可选周期周数
// 校验规则在配置加载和引擎入口两处复用
// ==========================================

use crate::domain::rules::Rules;
use crate::domain::shift_group::{Person, ShiftGroup};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::warn;

/// 周期长度上限（周）
pub const MAX_CYCLE_WEEKS: u32 = 104;

#[derive(Debug, Clone, PartialEq)]
pub struct RosterInput {
    pub groups: Vec<ShiftGroup>,
    pub rules: Rules,
    pub start_date: NaiveDate,
    /// 显式周期周数；None 时由基础周期决定
    pub explicit_weeks: Option<u32>,
}

impl RosterInput {
    pub fn new(groups: Vec<ShiftGroup>, rules: Rules, start_date: NaiveDate) -> Self {
        Self {
            groups,
            rules,
            start_date,
            explicit_weeks: None,
        }
    }

    pub fn with_weeks(mut self, weeks: u32) -> Self {
        self.explicit_weeks = Some(weeks);
        self
    }

    pub fn persons(&self) -> impl Iterator<Item = Person> + '_ {
        self.groups.iter().flat_map(|g| g.persons())
    }

    /// 基础周期 = 各班组 pattern_weeks 的最小公倍数（至少为 1）
    ///
    /// 溢出时饱和为 u32::MAX，由校验拒绝
    pub fn base_cycle_weeks(&self) -> u32 {
        base_cycle_weeks_of(&self.groups).unwrap_or(u32::MAX)
    }

    pub fn any_group_overfills(&self) -> bool {
        self.groups.iter().any(|g| g.wednesday_overfill_count > 0)
    }

    /// 初始周期周数
    pub fn initial_weeks(&self) -> u32 {
        self.explicit_weeks.unwrap_or_else(|| self.base_cycle_weeks())
    }

    /// 校验输入（班组 + 规则 + 显式周数）
    ///
    /// # 返回
    /// - `Ok(())`: 输入有效
    /// - `Err(String)`: 第一个违反项的描述
    pub fn validate(&self) -> Result<(), String> {
        validate_roster(&self.groups, &self.rules)?;

        if let Some(weeks) = self.explicit_weeks {
            let base = self.base_cycle_weeks();
            if weeks == 0 || weeks > MAX_CYCLE_WEEKS {
                return Err(format!(
                    "周期周数 {} 超出范围 [1, {}]",
                    weeks, MAX_CYCLE_WEEKS
                ));
            }
            if weeks % base != 0 {
                return Err(format!(
                    "周期周数 {} 必须是基础周期 {} 的整数倍",
                    weeks, base
                ));
            }
        }
        Ok(())
    }
}

/// 校验班组与规则的自洽性
pub fn validate_roster(groups: &[ShiftGroup], rules: &Rules) -> Result<(), String> {
    if groups.is_empty() {
        return Err("至少需要配置一个班组".to_string());
    }

    let mut group_names = HashSet::new();
    let mut person_names = HashSet::new();

    for g in groups {
        if g.name.trim().is_empty() {
            return Err("班组名称不能为空".to_string());
        }
        if !group_names.insert(g.name.as_str()) {
            return Err(format!("班组名称重复: {}", g.name));
        }
        if g.members.is_empty() {
            return Err(format!("班组 '{}' 至少需要一名成员", g.name));
        }
        for m in &g.members {
            if m.trim().is_empty() {
                return Err(format!("班组 '{}' 包含空成员名", g.name));
            }
            if !person_names.insert(m.as_str()) {
                return Err(format!("人员 '{}' 重复出现（每人只能属于一个班组）", m));
            }
        }
        if g.pattern_weeks == 0 || g.pattern_weeks > MAX_CYCLE_WEEKS {
            return Err(format!(
                "班组 '{}' pattern_weeks ({}) 超出范围 [1, {}]",
                g.name, g.pattern_weeks, MAX_CYCLE_WEEKS
            ));
        }
        if g.day_window.duration_hours() <= 0.0 || g.night_window.duration_hours() <= 0.0 {
            return Err(format!("班组 '{}' 班次时长不能为 0", g.name));
        }

        for (label, plan) in [("day", &g.day_staff), ("night", &g.night_staff)] {
            for bounds in plan.all_bounds() {
                if bounds.min > bounds.max {
                    return Err(format!(
                        "班组 '{}' max_{}_staff ({}) 不能小于 min_{}_staff ({})",
                        g.name, label, bounds.max, label, bounds.min
                    ));
                }
                if bounds.max > g.members.len() {
                    return Err(format!(
                        "班组 '{}' max_{}_staff ({}) 不能超过成员数 ({})",
                        g.name,
                        label,
                        bounds.max,
                        g.members.len()
                    ));
                }
            }
        }
    }

    match base_cycle_weeks_of(groups) {
        Some(base) if base <= MAX_CYCLE_WEEKS => {}
        _ => {
            return Err(format!(
                "各班组 pattern_weeks 的最小公倍数超过周期上限 {} 周",
                MAX_CYCLE_WEEKS
            ))
        }
    }

    if rules.max_shifts_in_row == 0 {
        return Err("max_shifts_in_row 必须为正数".to_string());
    }
    if rules.min_days_off > rules.max_days_off {
        return Err(format!(
            "min_days_off ({}) 不能超过 max_days_off ({})",
            rules.min_days_off, rules.max_days_off
        ));
    }
    if rules.max_days_off == 0 {
        return Err("max_days_off 必须 >= 1（周期循环时必须存在休息日）".to_string());
    }
    if rules.min_days_off_after_night_streak > rules.max_days_off {
        return Err(format!(
            "min_days_off_after_night_streak ({}) 不能超过 max_days_off ({})",
            rules.min_days_off_after_night_streak, rules.max_days_off
        ));
    }

    let (lo, hi) = (rules.target_weekly_hours_min, rules.target_weekly_hours_max);
    if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || hi < 0.0 {
        return Err("目标周工时必须为非负有限值".to_string());
    }
    if lo > hi {
        return Err(format!(
            "target_weekly_hours_min ({}) 不能超过 target_weekly_hours_max ({})",
            lo, hi
        ));
    }

    for name in &rules.friday_night_priority_names {
        if !person_names.contains(name.as_str()) {
            warn!(name = %name, "周五夜班优先名单中的人员不存在，已忽略");
        }
    }

    Ok(())
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// None 表示溢出
fn lcm(a: u32, b: u32) -> Option<u32> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

fn base_cycle_weeks_of(groups: &[ShiftGroup]) -> Option<u32> {
    groups
        .iter()
        .map(|g| g.pattern_weeks.max(1))
        .try_fold(1, lcm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shift_group::{StaffingBounds, TimeWindow};

    fn group(name: &str, members: &[&str], pattern_weeks: u32) -> ShiftGroup {
        let w = TimeWindow::parse("09:00", "18:00").unwrap();
        let mut g = ShiftGroup::new(
            name,
            members,
            w,
            w,
            StaffingBounds::new(1, 1),
            StaffingBounds::new(0, 1),
        );
        g.pattern_weeks = pattern_weeks;
        g
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn test_base_cycle_is_lcm_of_group_periods() {
        let input = RosterInput::new(
            vec![group("A", &["a1", "a2"], 2), group("B", &["b1", "b2"], 3)],
            Rules::default(),
            start(),
        );
        assert_eq!(input.base_cycle_weeks(), 6);
        assert_eq!(input.initial_weeks(), 6);
        assert_eq!(input.with_weeks(12).initial_weeks(), 12);
    }

    #[test]
    fn test_pattern_weeks_beyond_ceiling_is_rejected() {
        let input = RosterInput::new(vec![group("A", &["a1", "a2"], 120)], Rules::default(), start());
        assert!(input.validate().is_err());

        // 单组合法，但最小公倍数 97 * 101 超过上限
        let input = RosterInput::new(
            vec![group("A", &["a1", "a2"], 97), group("B", &["b1", "b2"], 101)],
            Rules::default(),
            start(),
        );
        assert_eq!(input.base_cycle_weeks(), 9797);
        assert!(input.validate().unwrap_err().contains("最小公倍数"));
    }

    #[test]
    fn test_base_cycle_saturates_instead_of_overflowing() {
        let input = RosterInput::new(
            vec![group("A", &["a1", "a2"], 70_001), group("B", &["b1", "b2"], 70_003)],
            Rules::default(),
            start(),
        );
        assert_eq!(input.base_cycle_weeks(), u32::MAX);
        assert!(input.validate().is_err());
        assert_eq!(lcm(70_001, 70_003), None);
        assert_eq!(lcm(4, 6), Some(12));
    }

    #[test]
    fn test_validate_accepts_sane_input() {
        let input = RosterInput::new(vec![group("A", &["a1", "a2"], 1)], Rules::default(), start());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_person_across_groups() {
        let input = RosterInput::new(
            vec![group("A", &["x", "a2"], 1), group("B", &["x"], 1)],
            Rules::default(),
            start(),
        );
        let err = input.validate().unwrap_err();
        assert!(err.contains("重复"));
    }

    #[test]
    fn test_validate_rejects_min_staff_above_max() {
        let mut g = group("A", &["a1", "a2"], 1);
        g.day_staff.default = StaffingBounds::new(2, 1);
        let input = RosterInput::new(vec![g], Rules::default(), start());
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_contradictory_rules() {
        let groups = vec![group("A", &["a1", "a2"], 1)];
        for rules in [
            Rules { min_days_off: 3, max_days_off: 2, ..Rules::default() },
            Rules { max_days_off: 0, min_days_off: 0, ..Rules::default() },
            Rules { max_shifts_in_row: 0, ..Rules::default() },
            Rules { min_days_off_after_night_streak: 3, ..Rules::default() },
            Rules { target_weekly_hours_min: 50.0, ..Rules::default() },
        ] {
            let input = RosterInput::new(groups.clone(), rules, start());
            assert!(input.validate().is_err());
        }
    }

    #[test]
    fn test_validate_explicit_weeks() {
        let input = RosterInput::new(vec![group("A", &["a1", "a2"], 2)], Rules::default(), start());
        assert!(input.clone().with_weeks(4).validate().is_ok());
        assert!(input.clone().with_weeks(3).validate().is_err());
        assert!(input.clone().with_weeks(0).validate().is_err());
        assert!(input.with_weeks(106).validate().is_err());
    }
}
