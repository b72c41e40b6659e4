// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的班组、规则、临时配置文件等
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use shift_roster::domain::{PersonLedger, Rules, ShiftGroup, StaffingBounds, TimeWindow};
use shift_roster::DayStatus;
use std::io::Write;
use tempfile::NamedTempFile;

/// 2025-01-06（周一）
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

pub fn window(start: &str, end: &str) -> TimeWindow {
    TimeWindow::parse(start, end).unwrap()
}

/// 白班 09:00-18:00，夜班 17:00-02:00（均为 9 小时）
pub fn group(name: &str, members: &[&str], day: (usize, usize), night: (usize, usize)) -> ShiftGroup {
    ShiftGroup::new(
        name,
        members,
        window("09:00", "18:00"),
        window("17:00", "02:00"),
        StaffingBounds::new(day.0, day.1),
        StaffingBounds::new(night.0, night.1),
    )
}

/// 两人班组：白班恰好 1 人，夜班 0-1 人
///
/// 两人每周各至少休息一天时最多提供 12 个人次，
/// 白班夜班下限都为 1 需要 14 个人次，因此夜班下限取 0
pub fn two_person_group() -> ShiftGroup {
    group("Shift 1", &["Alice", "Bob"], (1, 1), (0, 1))
}

/// 与两人班组的交替排法相匹配的工时目标（27h ~ 36h）
pub fn two_person_rules() -> Rules {
    Rules {
        target_weekly_hours_min: 27.0,
        target_weekly_hours_max: 36.0,
        ..Rules::default()
    }
}

/// 每人每周至少休息一天
pub fn has_weekly_rest(ledger: &PersonLedger) -> bool {
    (0..ledger.statuses.len() / 7).all(|w| ledger.week(w).contains(&DayStatus::Off))
}

/// 夜班次日（含末日 -> 首日）是否出现白班
pub fn has_day_after_night(ledger: &PersonLedger) -> bool {
    let n = ledger.statuses.len();
    (0..n).any(|i| {
        ledger.statuses[i] == DayStatus::Night && ledger.statuses[(i + 1) % n] == DayStatus::Day
    })
}

/// 环形连续段: (是否上班, 长度, 段前一天是否夜班)
///
/// 全上班或全休息时返回单个覆盖整个周期的段
pub fn cyclic_runs(statuses: &[DayStatus]) -> Vec<(bool, usize, bool)> {
    let n = statuses.len();
    let Some(first) = (0..n).find(|&i| statuses[i].is_working() != statuses[(i + n - 1) % n].is_working())
    else {
        return if n == 0 {
            Vec::new()
        } else {
            vec![(statuses[0].is_working(), n, false)]
        };
    };

    let mut runs = Vec::new();
    let mut offset = 0;
    while offset < n {
        let start = (first + offset) % n;
        let working = statuses[start].is_working();
        let mut length = 0;
        while offset < n && statuses[(first + offset) % n].is_working() == working {
            length += 1;
            offset += 1;
        }
        runs.push((working, length, statuses[(start + n - 1) % n] == DayStatus::Night));
    }
    runs
}

/// 独立于引擎校验器，按环形重新检查一个人的台账
pub fn assert_cyclic_bounds(ledger: &PersonLedger, rules: &Rules) {
    let person = &ledger.person;
    for (working, length, after_night) in cyclic_runs(&ledger.statuses) {
        if working {
            assert!(
                length <= rules.max_shifts_in_row as usize,
                "{person} 连续上班 {length} 天"
            );
            continue;
        }
        assert!(length >= rules.min_days_off as usize, "{person} 休息段 {length} 天过短");
        assert!(length <= rules.max_days_off as usize, "{person} 休息段 {length} 天过长");
        if after_night {
            assert!(
                length >= rules.rest_after_night() as usize,
                "{person} 夜班后只休息 {length} 天"
            );
        }
    }
    if rules.no_day_after_night {
        assert!(!has_day_after_night(ledger), "{person} 夜班后接白班");
    }
}

/// 将 JSON 写入临时文件（需要保持存活）
pub fn write_temp_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
